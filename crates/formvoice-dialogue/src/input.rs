//! Speech input channel: single-shot capture with an idempotent start.

use formvoice_core::{CaptureCallback, RequestId, SpeechRecognizer};

use crate::event::{DialogueEvent, EventSender};

/// Wraps a [`SpeechRecognizer`] so that at most one capture is active and
/// each capture yields at most one result.
pub struct SpeechInputChannel {
    engine: Box<dyn SpeechRecognizer>,
    events: EventSender,
    active: Option<RequestId>,
    next_id: u64,
}

impl SpeechInputChannel {
    #[must_use]
    pub fn new(engine: Box<dyn SpeechRecognizer>, events: EventSender) -> Self {
        Self {
            engine,
            events,
            active: None,
            next_id: 0,
        }
    }

    /// Begin listening.
    ///
    /// Returns `None` without touching the engine if a capture is already
    /// active.
    pub fn start(&mut self) -> Option<RequestId> {
        if let Some(active) = self.active {
            tracing::debug!(request = %active, "Already listening");
            return None;
        }

        self.next_id += 1;
        let id = RequestId(self.next_id);
        let events = self.events.clone();
        let done: CaptureCallback = Box::new(move |outcome| {
            let _ = events.send(DialogueEvent::Input { id, outcome });
        });

        self.active = Some(id);
        tracing::debug!(request = %id, "Listening");
        self.engine.start(done);
        Some(id)
    }

    /// Accept the result for `id`. Returns `false` for a stale or repeated
    /// result.
    pub fn complete(&mut self, id: RequestId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Abort the active capture. No result will be accepted for it.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(id) => {
                tracing::debug!(request = %id, "Stopping capture");
                self.engine.stop();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
