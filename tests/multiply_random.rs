#![allow(non_snake_case)]
use diagmat::algebra::*;
use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

// a collection of tests checking the multiply kernels against the
// dense reference product on randomly generated operands

const RTOL: f64 = 1e-9;

fn random_diagonal(rng: &mut StdRng, m: usize, n: usize, ndiags: usize) -> DiagonalMatrix<f64> {
    let nids = m + n - 1;
    // sampled ids come back unsorted, which also exercises the constructor sort
    let ids: Vec<usize> = sample(rng, nids, ndiags.min(nids))
        .into_iter()
        .map(|k| k + 1)
        .collect();
    let vals: Vec<Vec<f64>> = ids
        .iter()
        .map(|&id| {
            let len = if id < m { id.min(n) } else { m.min(m + n - id) };
            (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect::<Vec<f64>>()
        })
        .collect();
    let A = DiagonalMatrix::from_diagonals(ids, vals, m, n).unwrap();
    assert!(A.check_format().is_ok());
    A
}

fn random_dense(rng: &mut StdRng, m: usize, n: usize) -> Matrix<f64> {
    let data: Vec<f64> = (0..m * n).map(|_| rng.gen_range(-1.0..1.0)).collect();
    Matrix::new_from_slice((m, n), &data)
}

fn reference(A: &Matrix<f64>, B: &Matrix<f64>, C: &Matrix<f64>, α: f64, β: f64) -> Matrix<f64> {
    let mut R = C.clone();
    R.mul(A, B, α, β);
    R
}

fn assert_close(C: &Matrix<f64>, R: &Matrix<f64>) {
    assert_eq!(C.size(), R.size());
    let scale = f64::max(1.0, R.data.norm_inf());
    let err = C.data.norm_inf_diff(&R.data);
    assert!(err <= RTOL * scale, "error {err:e} exceeds tolerance");
}

fn settings_variants() -> Vec<MultiplySettings> {
    vec![
        MultiplySettings::default(),
        MultiplySettingsBuilder::default()
            .min_parallel_len(1)
            .min_task_len(1)
            .build()
            .unwrap(),
        MultiplySettingsBuilder::default()
            .min_parallel_len(8)
            .min_task_len(4)
            .build()
            .unwrap(),
    ]
}

const SHAPES: [(usize, usize, usize); 5] = [
    (60, 60, 60),
    (45, 70, 30),
    (70, 25, 50),
    (1, 9, 1),
    (128, 96, 7),
];

#[test]
fn test_diag_dense_random() {
    let mut rng = StdRng::seed_from_u64(11);
    for (m, k, n) in SHAPES {
        let A = random_diagonal(&mut rng, m, k, 12);
        let B = random_dense(&mut rng, k, n);
        let C0 = random_dense(&mut rng, m, n);
        let (α, β) = (rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        let R = reference(&A.to_dense(), &B, &C0, α, β);

        for settings in settings_variants() {
            let mut C = C0.clone();
            C.mul_accumulate_with(&A, &B, α, β, &settings).unwrap();
            assert_close(&C, &R);
        }
    }
}

#[test]
fn test_dense_diag_random() {
    let mut rng = StdRng::seed_from_u64(12);
    for (m, k, n) in SHAPES {
        let A = random_dense(&mut rng, m, k);
        let B = random_diagonal(&mut rng, k, n, 12);
        let C0 = random_dense(&mut rng, m, n);
        let (α, β) = (rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        let R = reference(&A, &B.to_dense(), &C0, α, β);

        for settings in settings_variants() {
            let mut C = C0.clone();
            C.mul_accumulate_with(&A, &B, α, β, &settings).unwrap();
            assert_close(&C, &R);
        }
    }
}

#[test]
fn test_diag_diag_dense_random() {
    let mut rng = StdRng::seed_from_u64(13);
    for (m, k, n) in SHAPES {
        let A = random_diagonal(&mut rng, m, k, 10);
        let B = random_diagonal(&mut rng, k, n, 10);
        let C0 = random_dense(&mut rng, m, n);
        let (α, β) = (rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        let R = reference(&A.to_dense(), &B.to_dense(), &C0, α, β);

        for settings in settings_variants() {
            let mut C = C0.clone();
            C.mul_accumulate_with(&A, &B, α, β, &settings).unwrap();
            assert_close(&C, &R);
        }
    }
}

#[test]
fn test_diag_diag_diag_random() {
    let mut rng = StdRng::seed_from_u64(14);
    for (m, k, n) in SHAPES {
        let A = random_diagonal(&mut rng, m, k, 10);
        let B = random_diagonal(&mut rng, k, n, 10);
        let C0 = random_diagonal(&mut rng, m, n, 5);
        let (α, β) = (rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
        let R = reference(&A.to_dense(), &B.to_dense(), &C0.to_dense(), α, β);

        for settings in settings_variants() {
            let mut C = C0.clone();
            C.mul_accumulate_with(&A, &B, α, β, &settings).unwrap();
            assert!(C.check_format().is_ok());
            assert_close(&C.to_dense(), &R);

            // the existing pattern is kept
            assert!(C0.diagonal_ids().iter().all(|&id| C.diagonal(id).is_some()));
        }
    }
}

#[test]
fn test_alpha_beta_contract() {
    let mut rng = StdRng::seed_from_u64(15);
    let (m, k, n) = (40, 30, 20);
    let A = random_diagonal(&mut rng, m, k, 8);
    let B = random_dense(&mut rng, k, n);
    let Bd = random_diagonal(&mut rng, k, n, 8);
    let C0 = random_dense(&mut rng, m, n);

    // α = 0, β = 1 leaves the destination unchanged
    let mut C = C0.clone();
    C.mul_accumulate(&A, &B, 0.0, 1.0).unwrap();
    assert_eq!(C, C0);

    let mut D = random_diagonal(&mut rng, m, n, 6);
    let D0 = D.to_dense();
    D.mul_accumulate(&A, &Bd, 0.0, 1.0).unwrap();
    assert_eq!(D.to_dense(), D0);

    // α = 1, β = 0 is the plain product
    let mut C = C0.clone();
    C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
    assert_close(&C, &reference(&A.to_dense(), &B, &Matrix::zeros((m, n)), 1.0, 0.0));

    let mut D = random_diagonal(&mut rng, m, n, 6);
    D.mul_accumulate(&A, &Bd, 1.0, 0.0).unwrap();
    let mut E = Matrix::zeros((m, n));
    E.mul_accumulate(&A, &Bd, 1.0, 0.0).unwrap();
    assert_close(&D.to_dense(), &E);
}

#[test]
fn test_dense_conversion_agrees() {
    let mut rng = StdRng::seed_from_u64(16);
    let A = random_diagonal(&mut rng, 30, 50, 15);
    let M = A.to_dense();
    for i in 0..30 {
        for j in 0..50 {
            assert_eq!(A.get(i, j), Ok(M[(i, j)]));
        }
    }
    assert_eq!(DiagonalMatrix::from_dense(&M, false).to_dense(), M);
}

#[test]
fn test_transpose_product_identity() {
    // (A*B)' = B'*A'
    let mut rng = StdRng::seed_from_u64(17);
    let A = random_diagonal(&mut rng, 25, 35, 9);
    let B = random_diagonal(&mut rng, 35, 15, 9);

    let mut AB = DiagonalMatrix::new(25, 15);
    AB.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
    let mut BtAt = DiagonalMatrix::new(15, 25);
    BtAt.mul_accumulate(&B.transpose(), &A.transpose(), 1.0, 0.0)
        .unwrap();

    assert_close(&AB.transpose().to_dense(), &BtAt.to_dense());
}

#[test]
#[ignore = "large, run with --ignored"]
fn test_large_5000() {
    let mut rng = StdRng::seed_from_u64(5000);
    let n = 5000;
    let A = random_diagonal(&mut rng, n, n, 40);
    let B = random_diagonal(&mut rng, n, n, 40);
    let x: Vec<f64> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();

    // sparse product checked through its action on a vector
    let mut C = DiagonalMatrix::new(n, n);
    C.mul_accumulate(&A, &B, 1.0, 0.0).unwrap();
    let mut y = vec![0.0; n];
    C.gemv(&mut y, &x, 1.0, 0.0);

    let mut Bx = vec![0.0; n];
    B.gemv(&mut Bx, &x, 1.0, 0.0);
    let mut ABx = vec![0.0; n];
    A.gemv(&mut ABx, &Bx, 1.0, 0.0);
    assert!(y.norm_inf_diff(&ABx) <= RTOL * f64::max(1.0, ABx.norm_inf()));

    // sparse times thin dense, column by column against gemv
    let D = random_dense(&mut rng, n, 4);
    let mut CD = Matrix::zeros((n, 4));
    CD.mul_accumulate(&A, &D, 1.0, 0.0).unwrap();
    for j in 0..4 {
        let mut col = vec![0.0; n];
        A.gemv(&mut col, D.col_slice(j), 1.0, 0.0);
        assert!(CD.col_slice(j).norm_inf_diff(&col) <= RTOL * f64::max(1.0, col.norm_inf()));
    }
}
