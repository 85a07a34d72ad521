//! Advisory progress reporting.
//!
//! Observers are notified at fixed milestones while a transform runs. They
//! receive copies of the counters only and cannot influence the result.

/// Number of milestones reported by the sequential transforms.
pub const MILESTONES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Snapshot of a running transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub direction: Direction,
    /// Output indices computed so far.
    pub completed: usize,
    /// Output indices the transform will compute in total.
    pub total: usize,
}

impl Progress {
    /// Completion in whole percent.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.completed * 100 / self.total
        }
    }
}

/// Receives [`Progress`] snapshots.
///
/// The parallel transform notifies from worker threads, hence `Send + Sync`.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: Progress);
}

impl<F> ProgressObserver for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn on_progress(&self, progress: Progress) {
        self(progress)
    }
}

/// Forwards milestones to the `log` facade at `trace` level.
#[cfg(feature = "verbose-logging")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

#[cfg(feature = "verbose-logging")]
impl ProgressObserver for LogProgress {
    fn on_progress(&self, p: Progress) {
        log::trace!(
            "{:?} progress: {}% ({}/{})",
            p.direction,
            p.percent(),
            p.completed,
            p.total
        );
    }
}

/// Decides when a sequential loop over `total` indices reports progress.
pub(crate) struct Milestones<'a> {
    observer: Option<&'a dyn ProgressObserver>,
    direction: Direction,
    total: usize,
    step: usize,
}

impl<'a> Milestones<'a> {
    pub(crate) fn new(
        observer: Option<&'a dyn ProgressObserver>,
        direction: Direction,
        total: usize,
    ) -> Self {
        Self {
            observer,
            direction,
            total,
            step: (total / MILESTONES).max(1),
        }
    }

    /// Call after `completed` indices are done.
    #[inline]
    pub(crate) fn reached(&self, completed: usize) {
        if let Some(observer) = self.observer {
            if completed % self.step == 0 || completed == self.total {
                observer.on_progress(Progress {
                    direction: self.direction,
                    completed,
                    total: self.total,
                });
            }
        }
    }
}
