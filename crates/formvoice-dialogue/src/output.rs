//! Speech output channel: one utterance at a time, newest request wins.
//!
//! Wraps a [`SpeechSynthesizer`] so that:
//!
//! - at most one utterance is in flight,
//! - a new request cancels the one in flight instead of queueing behind it,
//! - every utterance is logged when it is *issued*, so the transcript keeps
//!   prompt/answer order even when completions arrive late.
//!
//! Completions come back as [`DialogueEvent::Output`] tagged with the
//! request id; [`complete`](SpeechOutputChannel::complete) tells the caller
//! whether that id is still the current one.

use formvoice_core::{
    ConversationLog, RequestId, SpeakerRole, SpeechCallback, SpeechRequest, SpeechSynthesizer,
};

use crate::event::{DialogueEvent, EventSender};

pub struct SpeechOutputChannel {
    engine: Box<dyn SpeechSynthesizer>,
    events: EventSender,
    active: Option<RequestId>,
    next_id: u64,
}

impl SpeechOutputChannel {
    #[must_use]
    pub fn new(engine: Box<dyn SpeechSynthesizer>, events: EventSender) -> Self {
        Self {
            engine,
            events,
            active: None,
            next_id: 0,
        }
    }

    /// Speak `text` as `role`, preempting anything in flight.
    ///
    /// The utterance is appended to `log` before the engine is invoked.
    pub fn speak(&mut self, text: &str, role: SpeakerRole, log: &mut ConversationLog) -> RequestId {
        if let Some(previous) = self.active.take() {
            tracing::debug!(request = %previous, "Preempting in-flight utterance");
            self.engine.cancel();
        }

        self.next_id += 1;
        let id = RequestId(self.next_id);
        log.append(role, text);

        let events = self.events.clone();
        let done: SpeechCallback = Box::new(move |outcome| {
            // The loop may already be gone during shutdown.
            let _ = events.send(DialogueEvent::Output { id, outcome });
        });

        self.active = Some(id);
        tracing::debug!(request = %id, %role, text, "Speaking");
        self.engine.speak(
            SpeechRequest {
                id,
                text: text.to_string(),
                role,
            },
            done,
        );
        id
    }

    /// Mark `id` as finished. Returns `false` if it is not the current request.
    pub fn complete(&mut self, id: RequestId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Cancel the utterance in flight. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(id) => {
                tracing::debug!(request = %id, "Cancelling utterance");
                self.engine.cancel();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub const fn active(&self) -> Option<RequestId> {
        self.active
    }
}
