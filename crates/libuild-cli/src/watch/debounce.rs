//! Leading-edge debouncer for rebuilds.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delay between the first event of a burst and the rebuild.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Coalesces events into at most one pending rebuild.
///
/// The first event arms a timer; events that arrive while it is armed are
/// dropped and do not move the deadline. The pending flag is cleared right
/// before the rebuild starts, so an event during a slow rebuild arms the
/// next cycle instead of being lost.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Arc<AtomicBool>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(AtomicBool::new(false)),
            timer: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Arm the timer for `rebuild` unless one is already pending.
    ///
    /// Returns `false` when the event was absorbed by a pending rebuild.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, rebuild: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.pending.swap(true, Ordering::AcqRel) {
            return false;
        }

        let pending = Arc::clone(&self.pending);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.store(false, Ordering::Release);
            rebuild().await;
        });

        *self.timer.lock() = Some(handle);
        true
    }

    /// Abort a pending timer. A rebuild that already started is aborted too.
    pub fn cancel(&self) {
        if let Some(handle) = self.timer.lock().take() {
            handle.abort();
        }
        self.pending.store(false, Ordering::Release);
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting(count: &Arc<AtomicUsize>) -> impl FnOnce() -> std::future::Ready<()> + Send + 'static {
        let count = Arc::clone(count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_events_triggers_one_rebuild() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let count = Arc::new(AtomicUsize::new(0));

        assert!(debouncer.schedule(counting(&count)));
        assert!(!debouncer.schedule(counting(&count)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!debouncer.schedule(counting(&count)));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn later_events_do_not_extend_the_window() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let count = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting(&count));
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!debouncer.schedule(counting(&count)));

        tokio::time::sleep(Duration::from_millis(110)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn event_during_slow_rebuild_schedules_another() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let count = Arc::new(AtomicUsize::new(0));

        let slow = Arc::clone(&count);
        debouncer.schedule(move || async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            slow.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!debouncer.is_pending());
        assert!(debouncer.schedule(counting(&count)));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_pending_rebuild() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let count = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting(&count));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert!(debouncer.schedule(counting(&count)));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
