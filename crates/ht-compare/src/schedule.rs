use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

pub type Action = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a deferred action.
pub trait TaskHandle: Send + Sync {
    /// Prevents the action from running if it has not run yet.
    fn cancel(&self);
    fn is_finished(&self) -> bool;
}

/// Runs actions after a delay.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, action: Action) -> Box<dyn TaskHandle>;
}

impl TaskHandle for AbortHandle {
    fn cancel(&self) {
        self.abort();
    }

    fn is_finished(&self) -> bool {
        AbortHandle::is_finished(self)
    }
}

/// Spawns one sleeping task per action on a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling task.
    ///
    /// # Panics
    /// Panics when called outside of a Tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, action: Action) -> Box<dyn TaskHandle> {
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Box::new(task.abort_handle())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::{Scheduler, TokioScheduler};

    #[tokio::test(start_paused = true)]
    async fn actions_run_after_delay_unless_cancelled() {
        let scheduler = TokioScheduler::current();
        let fired = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&fired);
        let kept = scheduler.schedule(
            Duration::from_millis(500),
            Box::new(move || {
                f.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let f = Arc::clone(&fired);
        let cancelled = scheduler.schedule(
            Duration::from_millis(500),
            Box::new(move || {
                f.fetch_add(10, Ordering::SeqCst);
            }),
        );
        cancelled.cancel();

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(kept.is_finished());
        assert!(cancelled.is_finished());
    }
}
