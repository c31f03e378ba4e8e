use crate::algebra::*;

/// Runs the multiply kernels with fixed [`MultiplySettings`], on a
/// dedicated rayon pool when `max_threads` is nonzero.
///
/// ```no_run
/// use diagmat::algebra::*;
///
/// let settings = MultiplySettingsBuilder::default()
///     .max_threads(2)
///     .build()
///     .unwrap();
/// let engine = MultiplyEngine::new(settings).unwrap();
///
/// let A = DiagonalMatrix::<f64>::identity(3);
/// let B = Matrix::<f64>::identity(3);
/// let mut C = Matrix::<f64>::zeros((3, 3));
/// engine.mul(&mut C, &A, &B, 1.0, 0.0).unwrap();
/// ```
pub struct MultiplyEngine {
    settings: MultiplySettings,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl MultiplyEngine {
    /// # Errors
    /// Fails if `settings` do not validate, or if the worker pool can
    /// not be created.
    pub fn new(settings: MultiplySettings) -> Result<Self, MultiplyError> {
        settings.validate()?;

        cfg_if::cfg_if! {
            if #[cfg(feature = "parallel")] {
                let pool = match settings.max_threads {
                    0 => None,
                    nthreads => Some(create_thread_pool(nthreads as usize)?),
                };
                Ok(Self { settings, pool })
            } else {
                Ok(Self { settings })
            }
        }
    }

    pub fn settings(&self) -> &MultiplySettings {
        &self.settings
    }

    /// `C = β*C + α*A*B`, for any destination and operand combination
    /// implementing [`MultiplyAccumulate`].
    pub fn mul<MC, MA, MB>(
        &self,
        C: &mut MC,
        A: &MA,
        B: &MB,
        α: MC::T,
        β: MC::T,
    ) -> Result<(), MultiplyError>
    where
        MC: MultiplyAccumulate<MA, MB> + Send,
        MA: Sync,
        MB: Sync,
    {
        let mut op = || {
            C.mul_accumulate_with(A, B, α, β, &self.settings)
                .map(|_| ())
        };

        cfg_if::cfg_if! {
            if #[cfg(feature = "parallel")] {
                match &self.pool {
                    Some(pool) => pool.install(op),
                    None => op(),
                }
            } else {
                op()
            }
        }
    }
}

#[cfg(feature = "parallel")]
fn create_thread_pool(nthreads: usize) -> Result<rayon::ThreadPool, MultiplyError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(nthreads)
        .thread_name(|i| format!("diagmat-{i}"))
        .build()
        .map_err(|e| MultiplyError::ThreadPool(e.to_string()))?;
    tracing::info!(nthreads, "created multiply thread pool");
    Ok(pool)
}

#[test]
fn test_engine_matches_direct_call() {
    let A = DiagonalMatrix::from_diagonals(
        vec![2, 3, 5],
        vec![vec![1., 2.], vec![3., 4., 5.], vec![6.]],
        3,
        3,
    )
    .unwrap();
    assert!(A.check_format().is_ok());
    let B = Matrix::from(&[[1., 2.], [3., 4.], [5., 6.]]);

    let mut expected = Matrix::zeros((3, 2));
    expected.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();

    for max_threads in [0, 1, 3] {
        let settings = MultiplySettingsBuilder::default()
            .max_threads(max_threads)
            .min_parallel_len(1)
            .min_task_len(1)
            .build()
            .unwrap();
        let engine = MultiplyEngine::new(settings).unwrap();
        assert_eq!(engine.settings().max_threads, max_threads);

        let mut C = Matrix::zeros((3, 2));
        engine.mul(&mut C, &A, &B, 1.0, 0.0).unwrap();
        assert_eq!(C, expected);

        let mut D = DiagonalMatrix::new(3, 3);
        engine.mul(&mut D, &A, &A, 1.0, 0.0).unwrap();
        assert_eq!(D.to_dense().data, {
            let mut P = Matrix::zeros((3, 3));
            P.mul(&A.to_dense(), &A.to_dense(), 1.0, 0.0);
            P.data
        });
    }
}

#[test]
fn test_engine_rejects_bad_settings() {
    let settings = MultiplySettings {
        min_task_len: 0,
        ..MultiplySettings::default()
    };
    assert!(matches!(
        MultiplyEngine::new(settings),
        Err(MultiplyError::Settings(SettingsError::BadFieldValue(
            "min_task_len"
        )))
    ));
}
