//! Partition-parallel direct transform.
//!
//! Requires the `parallel` feature, which enables the
//! [`rayon`](https://crates.io/crates/rayon) dependency.
//!
//! The output index range is cut into contiguous partitions up front
//! (see [`partition`]). Every partition evaluates the same per-bin sums as
//! [`DirectDft`](crate::dft::DirectDft) over the shared, read-only input and
//! writes only into its own slice of the output buffer, so the compute phase
//! needs no locks. The caller blocks until every partition has finished;
//! the result is assembled in partition order and is therefore independent of
//! completion order. A panicking partition is caught and reported as
//! [`DftError::PartitionFailed`]; the partially written buffer is discarded.
//! Observers run after their partition's bins are written, and a panic inside
//! one never changes the result.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;
use core::ops::Range;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::panic::{catch_unwind, AssertUnwindSafe};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::dft::{
    check_signal_len, forward_bin, inverse_bin, prepare_spectrum, to_f64_samples, Reconstruction,
    TwiddleTable,
};
use crate::error::DftError;
use crate::num::{Complex64, Sample};
use crate::progress::{Direction, Progress, ProgressObserver};
use crate::spectrum::half_len;

/// Partition count used when none is configured.
pub const DEFAULT_PARTITIONS: usize = 8;

/// Split `0..len` into `count` contiguous ranges.
///
/// Every range holds `len / count` indices except the last, which also takes
/// the remainder. The ranges tile `0..len` without gaps or overlaps; when
/// `count > len` the leading ranges are empty.
///
/// # Errors
///
/// [`DftError::InvalidParameter`] if `count` is zero.
///
/// # Examples
/// ```
/// use wavedft::parallel::partition;
/// assert_eq!(partition(10, 3).unwrap(), vec![0..3, 3..6, 6..10]);
/// ```
pub fn partition(len: usize, count: usize) -> Result<Vec<Range<usize>>, DftError> {
    if count == 0 {
        return Err(DftError::InvalidParameter(
            "partition count must be at least 1",
        ));
    }
    let step = len / count;
    Ok((0..count)
        .map(|p| {
            let start = p * step;
            let end = if p + 1 == count { len } else { start + step };
            start..end
        })
        .collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Progress is advisory: a panicking observer is ignored.
fn notify(observer: &dyn ProgressObserver, progress: Progress) {
    if catch_unwind(AssertUnwindSafe(|| observer.on_progress(progress))).is_err() {
        verbose!(
            "progress observer panicked at {}/{}",
            progress.completed,
            progress.total
        );
    }
}

/// Direct transform evaluated on a fixed-size worker pool.
pub struct ParallelDft {
    partitions: usize,
    pool: ThreadPool,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl core::fmt::Debug for ParallelDft {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParallelDft")
            .field("partitions", &self.partitions)
            .field("threads", &self.pool.current_num_threads())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl ParallelDft {
    /// `partitions` work units on a pool with one thread per logical CPU.
    pub fn new(partitions: usize) -> Result<Self, DftError> {
        Self::with_threads(partitions, num_cpus::get().max(1))
    }

    /// `partitions` work units on a pool of exactly `threads` threads.
    ///
    /// # Errors
    ///
    /// [`DftError::InvalidParameter`] if either count is zero,
    /// [`DftError::ThreadPool`] if the pool cannot be started.
    pub fn with_threads(partitions: usize, threads: usize) -> Result<Self, DftError> {
        if partitions == 0 {
            return Err(DftError::InvalidParameter(
                "partition count must be at least 1",
            ));
        }
        if threads == 0 {
            return Err(DftError::InvalidParameter("thread count must be at least 1"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| alloc::format!("wavedft-worker-{i}"))
            .build()
            .map_err(|e| DftError::ThreadPool(e.to_string()))?;
        Ok(Self {
            partitions,
            pool,
            observer: None,
        })
    }

    /// Notify `observer` each time a partition completes.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Half spectrum of `signal`, bins partitioned across the pool.
    ///
    /// # Errors
    ///
    /// [`DftError::Shape`] for an empty signal,
    /// [`DftError::PartitionFailed`] if a partition panicked.
    pub fn forward<S: Sample>(&self, signal: &[S]) -> Result<Vec<Complex64>, DftError> {
        check_signal_len(signal.len())?;
        let samples = to_f64_samples(signal);
        let table = TwiddleTable::new(samples.len());
        let bins = half_len(samples.len());
        verbose!(
            "parallel forward: {} samples -> {} bins in {} partitions",
            samples.len(),
            bins,
            self.partitions
        );
        self.scatter_gather(Direction::Forward, bins, |k| {
            forward_bin(&samples, &table, k)
        })
    }

    /// Inverse of `spectrum` (mirrored first when `mirror_half` is set),
    /// samples partitioned across the pool.
    ///
    /// # Errors
    ///
    /// As [`DirectDft::inverse`](crate::dft::DirectDft::inverse), plus
    /// [`DftError::PartitionFailed`].
    pub fn inverse(
        &self,
        spectrum: &[Complex64],
        mirror_half: bool,
    ) -> Result<Reconstruction, DftError> {
        let full = prepare_spectrum(spectrum, mirror_half)?;
        let n = full.len();
        let table = TwiddleTable::new(n);
        verbose!(
            "parallel inverse: {} bins in {} partitions",
            n,
            self.partitions
        );
        self.scatter_gather(Direction::Inverse, n, |k| inverse_bin(&full, &table, k))
            .map(Reconstruction::from_values)
    }

    fn scatter_gather<F>(
        &self,
        direction: Direction,
        len: usize,
        kernel: F,
    ) -> Result<Vec<Complex64>, DftError>
    where
        F: Fn(usize) -> Complex64 + Sync,
    {
        let ranges = partition(len, self.partitions)?;
        let mut out = vec![Complex64::zero(); len];

        let mut slots: Vec<(usize, Range<usize>, &mut [Complex64])> =
            Vec::with_capacity(ranges.len());
        let mut rest: &mut [Complex64] = &mut out;
        for (idx, range) in ranges.into_iter().enumerate() {
            let (head, tail) = core::mem::take(&mut rest).split_at_mut(range.len());
            slots.push((idx, range, head));
            rest = tail;
        }

        let completed = AtomicUsize::new(0);
        let observer = self.observer.as_deref();
        let outcomes: Vec<Result<(), DftError>> = self.pool.install(|| {
            slots
                .into_par_iter()
                .map(|(idx, range, slot)| {
                    let (start, end) = (range.start, range.end);
                    catch_unwind(AssertUnwindSafe(|| {
                        for (offset, value) in slot.iter_mut().enumerate() {
                            *value = kernel(start + offset);
                        }
                    }))
                    .map_err(|payload: Box<dyn Any + Send>| DftError::PartitionFailed {
                        partition: idx,
                        start,
                        end,
                        message: panic_message(payload.as_ref()),
                    })?;
                    let done =
                        completed.fetch_add(end - start, Ordering::Relaxed) + (end - start);
                    if let Some(observer) = observer {
                        notify(
                            observer,
                            Progress {
                                direction,
                                completed: done,
                                total: len,
                            },
                        );
                    }
                    Ok(())
                })
                .collect()
        });

        if let Some(err) = outcomes.into_iter().find_map(Result::err) {
            verbose!("parallel {:?} aborted: {}", direction, err);
            return Err(err);
        }
        Ok(out)
    }
}

/// Half spectrum of `signal` using `partitions` work units on a default pool.
pub fn forward<S: Sample>(signal: &[S], partitions: usize) -> Result<Vec<Complex64>, DftError> {
    ParallelDft::new(partitions)?.forward(signal)
}

/// Inverse of `spectrum` using `partitions` work units on a default pool.
pub fn inverse(
    spectrum: &[Complex64],
    mirror_half: bool,
    partitions: usize,
) -> Result<Reconstruction, DftError> {
    ParallelDft::new(partitions)?.inverse(spectrum, mirror_half)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<i32> {
        (0..n as i32).map(|i| (i * 7919) % 601 - 300).collect()
    }

    #[test]
    fn partitions_tile_the_range() {
        for len in [0usize, 1, 5, 8, 33, 100] {
            for count in [1usize, 2, 3, 8, 17, 200] {
                let parts = partition(len, count).unwrap();
                assert_eq!(parts.len(), count);
                assert_eq!(parts[0].start, 0);
                assert_eq!(parts[count - 1].end, len);
                for w in parts.windows(2) {
                    assert_eq!(w[0].end, w[1].start);
                }
            }
        }
    }

    #[test]
    fn last_partition_absorbs_remainder() {
        assert_eq!(
            partition(9, 8).unwrap(),
            vec![0..1, 1..2, 2..3, 3..4, 4..5, 5..6, 6..7, 7..9]
        );
        assert_eq!(partition(3, 5).unwrap(), vec![0..0, 0..0, 0..0, 0..0, 0..3]);
    }

    #[test]
    fn zero_partitions_rejected() {
        assert!(matches!(partition(4, 0), Err(DftError::InvalidParameter(_))));
        assert!(matches!(
            ParallelDft::new(0),
            Err(DftError::InvalidParameter(_))
        ));
        assert!(matches!(
            ParallelDft::with_threads(4, 0),
            Err(DftError::InvalidParameter(_))
        ));
    }

    #[test]
    fn matches_direct_for_many_partition_counts() {
        let signal = ramp(100);
        let direct = crate::dft::forward(&signal).unwrap();
        for count in [1usize, 3, 8, 17, 64] {
            let par = ParallelDft::with_threads(count, 4).unwrap();
            let spectrum = par.forward(&signal).unwrap();
            assert_eq!(spectrum.len(), direct.len());
            for (a, b) in spectrum.iter().zip(direct.iter()) {
                assert!((a.re - b.re).abs() < 1e-9 && (a.im - b.im).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn inverse_roundtrip() {
        let signal = ramp(50);
        let half = crate::dft::forward(&signal).unwrap();
        let rec = inverse(&half, true, 3).unwrap();
        assert_eq!(rec.samples, signal);
    }

    #[test]
    fn failing_kernel_reports_first_partition() {
        let par = ParallelDft::with_threads(4, 2).unwrap();
        let err = par
            .scatter_gather(Direction::Forward, 16, |k| {
                if k == 6 || k == 13 {
                    panic!("bin {k} failed");
                }
                Complex64::zero()
            })
            .unwrap_err();
        match err {
            DftError::PartitionFailed {
                partition,
                start,
                end,
                message,
            } => {
                assert_eq!(partition, 1);
                assert_eq!((start, end), (4, 8));
                assert_eq!(message, "bin 6 failed");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn panicking_observer_keeps_the_spectrum() {
        let signal = ramp(16);
        let par = ParallelDft::with_threads(4, 2)
            .unwrap()
            .with_observer(Arc::new(|_: Progress| panic!("observer exploded")));
        assert_eq!(
            par.forward(&signal).unwrap(),
            crate::dft::forward(&signal).unwrap()
        );
    }

    #[test]
    fn observer_reaches_total() {
        let seen = Arc::new(AtomicUsize::new(0));
        let max = seen.clone();
        let par = ParallelDft::with_threads(5, 3)
            .unwrap()
            .with_observer(Arc::new(move |p: Progress| {
                max.fetch_max(p.completed, Ordering::Relaxed);
            }));
        par.inverse(&crate::dft::forward(&ramp(20)).unwrap(), true)
            .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 20);
    }
}
