//! Speech engine ports: single-utterance synthesis and single-shot recognition.
//!
//! Both engines are fire-and-return: `speak` / `start` hand the engine a
//! callback and return immediately. The engine invokes the callback at most
//! once, later, from whatever thread it runs on. A cancelled request may
//! simply drop its callback.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::SpeakerRole;

/// Identifies one speak or listen request so late results can be matched
/// against the request that is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single utterance to synthesize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub id: RequestId,
    pub text: String,
    /// Engines may pick a different voice for the respondent role.
    pub role: SpeakerRole,
}

/// Speech synthesis failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// No audio output is available.
    #[error("no audio output available")]
    NoOutput,

    /// The engine rejected or failed the utterance.
    #[error("speech synthesis failed: {0}")]
    Engine(String),
}

/// Speech recognition failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// The recognizer heard nothing it could transcribe.
    #[error("no speech detected")]
    NoSpeech,

    /// Capture was aborted by the platform (permission revoked, device lost).
    #[error("recognition aborted: {0}")]
    Aborted(String),

    /// Any other engine failure.
    #[error("speech recognition failed: {0}")]
    Engine(String),
}

/// How a speak request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Finished,
    Failed(SynthesisError),
}

/// How a listen request ended. Exactly one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A final transcript, verbatim.
    Captured(String),
    Failed(RecognitionError),
    /// The session ended without producing a result.
    Ended,
}

/// Invoked once when a speak request ends.
pub type SpeechCallback = Box<dyn FnOnce(SpeechOutcome) + Send + 'static>;

/// Invoked once when a listen request ends.
pub type CaptureCallback = Box<dyn FnOnce(CaptureOutcome) + Send + 'static>;

/// Single-utterance text-to-speech engine.
pub trait SpeechSynthesizer: Send {
    /// Begin speaking `request`. Must not block until playback ends.
    fn speak(&mut self, request: SpeechRequest, done: SpeechCallback);

    /// Stop the utterance in flight, if any. Its callback need not fire.
    fn cancel(&mut self);
}

/// Single-shot speech-to-text engine.
pub trait SpeechRecognizer: Send {
    /// Begin one capture. Must not block until a result is available.
    fn start(&mut self, done: CaptureCallback);

    /// Abort the capture in flight without delivering a result.
    fn stop(&mut self);
}
