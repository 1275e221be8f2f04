use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, trace};

#[derive(Default)]
struct Slot {
    timer: Option<JoinHandle<()>>,
    /// Bumped on every arm; a timer that wakes with an older epoch has been superseded.
    epoch: u64,
    in_flight: usize,
    closed: bool,
}

impl Slot {
    #[inline] fn pending(&self) -> bool { self.timer.is_some() || self.in_flight > 0 }
}

/// Runs an action once a burst of triggers has been quiet for `delay`.
///
/// At most one timer is live; arming again cancels it. Actions that already started
/// are left to finish.
pub struct Debouncer {
    delay: Duration,
    slot: Mutex<Slot>,
    pending: watch::Sender<bool>,
}

/// Marks one running action; dropping it, even on panic, clears it from the pending signal.
struct InFlight(Arc<Debouncer>);

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut slot = self.0.lock();
        slot.in_flight -= 1;
        self.0.publish(&slot);
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { delay, slot: Mutex::default(), pending: watch::Sender::new(false) })
    }

    #[inline] pub fn delay(&self) -> Duration { self.delay }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, slot: &Slot) {
        let now = slot.pending();
        self.pending.send_if_modified(|pending| std::mem::replace(pending, now) != now);
    }

    /// (Re)start the timer; `action` runs when it fires unless another arm comes first.
    /// Ignored after [`Debouncer::cancel`]. Must be called from within a tokio runtime.
    pub fn arm<F, Fut>(self: &Arc<Self>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.lock();
        if slot.closed { return }

        if let Some(previous) = slot.timer.take() {
            previous.abort();
        }
        trace!("[debounce] timer armed for {:?}", self.delay);
        slot.epoch += 1;
        let epoch = slot.epoch;

        let this = Arc::clone(self);
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(this.delay).await;

            let guard = {
                let mut slot = this.lock();
                if slot.epoch != epoch || slot.closed { return }
                slot.timer = None;
                slot.in_flight += 1;
                InFlight(Arc::clone(&this))
            };
            debug!("[debounce] timer fired");

            // Detached so that a later arm cannot abort an update that already started.
            tokio::spawn(async move {
                let _guard = guard;
                action().await;
            });
        }));
        self.publish(&slot);
    }

    /// Whether a timer is armed or a fired action is still running.
    pub fn is_pending(&self) -> bool { self.lock().pending() }

    pub fn subscribe(&self) -> watch::Receiver<bool> { self.pending.subscribe() }

    /// Clear the armed timer and refuse further arms.
    pub fn cancel(&self) {
        let mut slot = self.lock();
        slot.closed = true;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        self.publish(&slot);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::{future::BoxFuture, FutureExt};
    use tokio::time::{advance, sleep};

    use super::*;

    fn bump(count: &Arc<AtomicUsize>) -> impl FnOnce() -> BoxFuture<'static, ()> + Send + 'static {
        let count = Arc::clone(count);
        move || async move { count.fetch_add(1, Ordering::SeqCst); }.boxed()
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_one_run() {
        let debouncer = Debouncer::new(Duration::from_millis(1000));
        let count = Arc::new(AtomicUsize::new(0));

        debouncer.arm(bump(&count));
        advance(Duration::from_millis(200)).await;
        debouncer.arm(bump(&count));
        advance(Duration::from_millis(200)).await;
        debouncer.arm(bump(&count));
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(1100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let debouncer = Debouncer::new(Duration::from_millis(1000));
        let count = Arc::new(AtomicUsize::new(0));

        debouncer.arm(bump(&count));
        debouncer.cancel();
        debouncer.arm(bump(&count));
        assert!(!debouncer.is_pending());

        sleep(Duration::from_millis(3000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_covers_running_action() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let mut pending = debouncer.subscribe();

        debouncer.arm(|| async { sleep(Duration::from_millis(500)).await });
        assert!(*pending.borrow_and_update());

        sleep(Duration::from_millis(300)).await;
        assert!(debouncer.is_pending());

        pending.wait_for(|pending| !*pending).await.unwrap();
        assert!(!debouncer.is_pending());
    }
}
