use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    due_at: Instant,
    payload: T,
}

/// Holds at most one pending payload and releases it after a quiet period.
///
/// Scheduling while a payload is pending replaces it, so only the most
/// recently scheduled payload can ever fire. The payload is captured when
/// scheduled. Dropping the debouncer drops any pending payload unfired.
///
/// Time is passed in by the caller's event loop, the same way the runtime
/// scheduler is driven, so no thread or timer is involved.
#[derive(Debug)]
pub struct Debouncer<T> {
    pending: Option<Pending<T>>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer for `payload`, discarding any earlier pending payload.
    pub fn schedule(&mut self, payload: T, delay: Duration, now: Instant) {
        if self.pending.is_some() {
            tracing::trace!("debounce superseded");
        }
        self.pending = Some(Pending {
            due_at: now + delay,
            payload,
        });
    }

    /// Drops the pending payload, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::trace!("debounce cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due_at)
    }

    /// Releases the payload once its deadline has passed. A released payload
    /// is gone; later polls return `None` until the next `schedule`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.due_at <= now);
        if !due {
            return None;
        }
        tracing::trace!("debounce fired");
        self.pending.take().map(|pending| pending.payload)
    }

    /// How long an event loop may block before this debouncer needs a poll.
    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        match self.deadline() {
            Some(due_at) => due_at.saturating_duration_since(now).min(default_timeout),
            None => default_timeout,
        }
    }
}

impl<F> Debouncer<F>
where
    F: FnOnce(),
{
    /// Invokes the pending callback if it is due. Returns whether it ran.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        match self.poll(now) {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn later_schedule_supersedes_earlier() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();

        debouncer.schedule("A", DELAY, start);
        debouncer.schedule("B", DELAY, start + Duration::from_millis(100));

        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(399)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(400)), Some("B"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(800)), None);
    }

    #[test]
    fn cancel_is_idempotent() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        debouncer.cancel();

        debouncer.schedule(1u8, DELAY, start);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        debouncer.cancel();

        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + DELAY * 2), None);
    }

    #[test]
    fn callback_fires_exactly_once() {
        let start = Instant::now();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let mut debouncer: Debouncer<Box<dyn FnOnce()>> = Debouncer::new();

        let sink = Arc::clone(&fired);
        debouncer.schedule(
            Box::new(move || sink.lock().expect("lock").push("A")),
            DELAY,
            start,
        );
        let sink = Arc::clone(&fired);
        debouncer.schedule(
            Box::new(move || sink.lock().expect("lock").push("B")),
            DELAY,
            start + Duration::from_millis(100),
        );

        assert!(!debouncer.fire_due(start + DELAY));
        assert!(debouncer.fire_due(start + Duration::from_millis(400)));
        assert!(!debouncer.fire_due(start + Duration::from_millis(900)));
        assert_eq!(fired.lock().expect("lock").as_slice(), &["B"]);
    }

    #[test]
    fn poll_timeout_tracks_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new();
        let idle = Duration::from_millis(100);

        assert_eq!(debouncer.poll_timeout(start, idle), idle);

        debouncer.schedule((), Duration::from_millis(40), start);
        assert_eq!(
            debouncer.poll_timeout(start + Duration::from_millis(10), idle),
            Duration::from_millis(30)
        );
        assert_eq!(
            debouncer.poll_timeout(start + Duration::from_millis(90), idle),
            Duration::ZERO
        );
    }
}
