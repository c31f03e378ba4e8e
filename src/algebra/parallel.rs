// Parallel-for over the entries of a single diagonal, and the shared
// write handle the kernels use inside it.

use crate::algebra::MultiplySettings;
use std::marker::PhantomData;

/// Run `op(p)` for every entry offset `p` in `0..len`.
///
/// With the `parallel` feature enabled, diagonals of at least
/// `settings.min_parallel_len` entries are split across the current rayon
/// pool in tasks of at least `settings.min_task_len` entries.  The call
/// returns only after every entry has been processed, so that consecutive
/// calls (one per diagonal) never overlap.
pub(crate) fn for_each_entry<F>(len: usize, settings: &MultiplySettings, op: F)
where
    F: Fn(usize) + Sync + Send,
{
    cfg_if::cfg_if! {
        if #[cfg(feature = "parallel")] {
            use rayon::prelude::*;
            if len >= settings.min_parallel_len {
                (0..len)
                    .into_par_iter()
                    .with_min_len(settings.min_task_len)
                    .for_each(op);
                return;
            }
        } else {
            let _ = settings;
        }
    }
    (0..len).for_each(op);
}

/// Shared mutable handle to a slice written concurrently at disjoint positions.
///
/// The multiply kernels hand one of these to every worker processing the
/// entries of a diagonal.  Distinct entries of one diagonal always map to
/// distinct destination rows (or columns), so no two workers ever write the
/// same element.
pub(crate) struct DisjointSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    lifetime: PhantomData<&'a mut [T]>,
}

// SAFETY: the handle is only used for writes at positions that are
// disjoint across threads.  See `DisjointSlice::get_mut`.
unsafe impl<T: Send> Send for DisjointSlice<'_, T> {}

// SAFETY: as above.
unsafe impl<T: Send> Sync for DisjointSlice<'_, T> {}

impl<'a, T> DisjointSlice<'a, T> {
    pub(crate) fn new(data: &'a mut [T]) -> Self {
        Self {
            ptr: data.as_mut_ptr(),
            len: data.len(),
            lifetime: PhantomData,
        }
    }

    /// # Safety
    ///
    /// No other reference to element `idx` may be live, on this or any
    /// other thread, while the returned reference is in use.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn get_mut(&self, idx: usize) -> &mut T {
        assert!(idx < self.len);
        &mut *self.ptr.add(idx)
    }
}

#[test]
fn test_for_each_entry_visits_all() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let settings = MultiplySettings {
        min_parallel_len: 4,
        min_task_len: 1,
        ..MultiplySettings::default()
    };

    for len in [0, 3, 100] {
        let count = AtomicUsize::new(0);
        let sum = AtomicUsize::new(0);
        for_each_entry(len, &settings, |p| {
            count.fetch_add(1, Ordering::Relaxed);
            sum.fetch_add(p, Ordering::Relaxed);
        });
        assert_eq!(count.into_inner(), len);
        assert_eq!(sum.into_inner(), (0..len).sum::<usize>());
    }
}

#[test]
fn test_disjoint_slice_writes() {
    let mut data = vec![0usize; 50];
    let settings = MultiplySettings {
        min_parallel_len: 1,
        min_task_len: 1,
        ..MultiplySettings::default()
    };
    {
        let out = DisjointSlice::new(&mut data);
        for_each_entry(50, &settings, |p| unsafe {
            *out.get_mut(p) = 2 * p;
        });
    }
    assert!(data.iter().enumerate().all(|(i, &v)| v == 2 * i));
}
