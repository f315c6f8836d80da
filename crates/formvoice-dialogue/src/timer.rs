//! Cancellable one-shot delays that report back as dialogue events.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::event::{DialogueEvent, EventSender};

/// Identifies one scheduled delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// At most one pending delay; scheduling another replaces it.
///
/// A zero delay, or one scheduled outside a tokio runtime, fires by queueing
/// [`DialogueEvent::TimerFired`] immediately.
pub struct DelayTimer {
    events: EventSender,
    active: Option<(TimerId, Option<JoinHandle<()>>)>,
    next_id: u64,
}

impl DelayTimer {
    #[must_use]
    pub const fn new(events: EventSender) -> Self {
        Self {
            events,
            active: None,
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, after: Duration) -> TimerId {
        self.cancel();

        self.next_id += 1;
        let id = TimerId(self.next_id);
        let events = self.events.clone();

        let task = match Handle::try_current() {
            Ok(handle) if !after.is_zero() => Some(handle.spawn(async move {
                tokio::time::sleep(after).await;
                let _ = events.send(DialogueEvent::TimerFired { id });
            })),
            _ => {
                let _ = events.send(DialogueEvent::TimerFired { id });
                None
            }
        };

        tracing::debug!(timer = %id, delay = ?after, "Timer scheduled");
        self.active = Some((id, task));
        id
    }

    /// Consume the expiry of `id`. Returns `false` if it was cancelled or replaced.
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.active.as_ref().is_some_and(|(active, _)| *active == id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        if let Some((id, task)) = self.active.take() {
            tracing::debug!(timer = %id, "Timer cancelled");
            if let Some(task) = task {
                task.abort();
            }
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for DelayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn zero_delay_fires_immediately_without_a_runtime() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DelayTimer::new(tx);

        let id = timer.schedule(Duration::ZERO);

        let Ok(DialogueEvent::TimerFired { id: got }) = rx.try_recv() else {
            panic!("expected a timer event");
        };
        assert_eq!(got, id);
        assert!(timer.fire(id));
        assert!(!timer.fire(id));
    }

    #[test]
    fn rescheduling_makes_the_old_timer_stale() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timer = DelayTimer::new(tx);

        let first = timer.schedule(Duration::ZERO);
        let second = timer.schedule(Duration::ZERO);

        assert!(!timer.fire(first));
        assert!(timer.fire(second));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_the_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DelayTimer::new(tx);

        let id = timer.schedule(Duration::from_millis(800));
        assert!(rx.try_recv().is_err());

        let Some(DialogueEvent::TimerFired { id: got }) = rx.recv().await else {
            panic!("expected a timer event");
        };
        assert_eq!(got, id);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DelayTimer::new(tx);

        timer.schedule(Duration::from_millis(800));
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(rx.try_recv().is_err());
        assert!(!timer.is_pending());
    }
}
