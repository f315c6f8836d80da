//! Shared fakes for driving the orchestrator without audio.
//!
//! The fake engines never block: a speak request either completes on the
//! spot, fails on the spot, or is held until the test releases it. Captures
//! stay pending until the test answers them.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use formvoice_core::{
    CaptureCallback, CaptureOutcome, DialogueConfig, DocumentParseError, DocumentSink,
    FieldSource, FieldSpec, LoadedDocument, SessionEvent, SessionEventEmitter, SpeakerRole,
    SpeechCallback, SpeechOutcome, SpeechRecognizer, SpeechRequest, SpeechSynthesizer,
    SynthesisError,
};
use formvoice_dialogue::{DialogueDeps, DialogueEvent, DialogueOrchestrator, MockAnswerTable};

// ── Fake speech engines ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthBehavior {
    /// Report `Finished` immediately.
    Complete,
    /// Keep the callback until [`SynthState::release`] is called.
    Hold,
    /// Report a synthesis failure immediately.
    Fail,
}

pub struct SynthState {
    pub behavior: SynthBehavior,
    pub spoken: Vec<SpeechRequest>,
    pub cancels: usize,
    pub held: Vec<SpeechCallback>,
}

pub struct FakeSynthesizer(pub Arc<Mutex<SynthState>>);

impl SpeechSynthesizer for FakeSynthesizer {
    fn speak(&mut self, request: SpeechRequest, done: SpeechCallback) {
        let behavior = {
            let mut state = self.0.lock().unwrap();
            state.spoken.push(request);
            state.behavior
        };
        match behavior {
            SynthBehavior::Complete => done(SpeechOutcome::Finished),
            SynthBehavior::Fail => done(SpeechOutcome::Failed(SynthesisError::NoOutput)),
            SynthBehavior::Hold => self.0.lock().unwrap().held.push(done),
        }
    }

    fn cancel(&mut self) {
        self.0.lock().unwrap().cancels += 1;
    }
}

#[derive(Default)]
pub struct RecognizerState {
    pub starts: usize,
    pub stops: usize,
    pub pending: Option<CaptureCallback>,
    /// Callbacks of stopped captures, kept so tests can fire them late.
    pub abandoned: Vec<CaptureCallback>,
}

pub struct FakeRecognizer(pub Arc<Mutex<RecognizerState>>);

impl SpeechRecognizer for FakeRecognizer {
    fn start(&mut self, done: CaptureCallback) {
        let mut state = self.0.lock().unwrap();
        state.starts += 1;
        state.pending = Some(done);
    }

    fn stop(&mut self) {
        let mut state = self.0.lock().unwrap();
        state.stops += 1;
        if let Some(done) = state.pending.take() {
            state.abandoned.push(done);
        }
    }
}

// ── Fake document collaborators ────────────────────────────────────

pub struct StaticFields(pub Vec<String>);

impl FieldSource for StaticFields {
    fn extract_fields(
        &self,
        _document: &LoadedDocument,
    ) -> Result<Vec<FieldSpec>, DocumentParseError> {
        Ok(self.0.iter().map(FieldSpec::text).collect())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub replaced: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<(String, String)>>,
    pub snapshots: Mutex<usize>,
}

impl DocumentSink for RecordingSink {
    fn replace(&self, document: LoadedDocument) {
        self.replaced.lock().unwrap().push(document.name);
    }

    fn submit_field(&self, identity: &str, text: &str) {
        self.submitted
            .lock()
            .unwrap()
            .push((identity.to_string(), text.to_string()));
    }

    fn request_snapshot(&self) {
        *self.snapshots.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct RecordingEmitter(pub Mutex<Vec<SessionEvent>>);

impl SessionEventEmitter for RecordingEmitter {
    fn emit(&self, event: SessionEvent) {
        self.0.lock().unwrap().push(event);
    }
}

// ── Harness ────────────────────────────────────────────────────────

pub struct Harness {
    pub orch: DialogueOrchestrator,
    pub rx: mpsc::UnboundedReceiver<DialogueEvent>,
    pub synth: Arc<Mutex<SynthState>>,
    pub recognizer: Arc<Mutex<RecognizerState>>,
    pub sink: Arc<RecordingSink>,
    pub emitted: Arc<RecordingEmitter>,
}

impl Harness {
    /// Zero-delay harness over a document with the given field names.
    pub fn new(fields: &[&str], answers: MockAnswerTable) -> Self {
        let source = StaticFields(fields.iter().map(ToString::to_string).collect());
        Self::with_source(DialogueConfig::immediate(), Arc::new(source), answers)
    }

    pub fn with_source(
        config: DialogueConfig,
        fields: Arc<dyn FieldSource>,
        answers: MockAnswerTable,
    ) -> Self {
        let synth = Arc::new(Mutex::new(SynthState {
            behavior: SynthBehavior::Complete,
            spoken: Vec::new(),
            cancels: 0,
            held: Vec::new(),
        }));
        let recognizer = Arc::new(Mutex::new(RecognizerState::default()));
        let sink = Arc::new(RecordingSink::default());
        let emitted = Arc::new(RecordingEmitter::default());

        let deps = DialogueDeps {
            synthesizer: Box::new(FakeSynthesizer(Arc::clone(&synth))),
            recognizer: Box::new(FakeRecognizer(Arc::clone(&recognizer))),
            fields,
            documents: sink.clone(),
            emitter: emitted.clone(),
            answers,
        };
        let (orch, rx) = DialogueOrchestrator::new(config, deps);

        Self {
            orch,
            rx,
            synth,
            recognizer,
            sink,
            emitted,
        }
    }

    /// Handle every queued event, checking channel exclusivity after each.
    pub fn pump(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.orch.handle_event(event);
            self.assert_exclusive();
        }
    }

    pub fn assert_exclusive(&self) {
        let session = self.orch.session();
        assert!(
            !(session.input_active && session.output_active),
            "input and output both active: {session:?}"
        );
    }

    /// Load a document named `form.json` and let the announcement finish.
    pub fn load(&mut self) -> usize {
        let count = self
            .orch
            .load_document(LoadedDocument::new("form.json", b"{}".to_vec()))
            .unwrap();
        self.pump();
        count
    }

    pub fn set_synth(&self, behavior: SynthBehavior) {
        self.synth.lock().unwrap().behavior = behavior;
    }

    /// Finish every held utterance.
    pub fn release_speech(&mut self) {
        let held: Vec<_> = self.synth.lock().unwrap().held.drain(..).collect();
        for done in held {
            done(SpeechOutcome::Finished);
        }
        self.pump();
    }

    pub fn is_listening(&self) -> bool {
        self.recognizer.lock().unwrap().pending.is_some()
    }

    /// Complete the pending capture with `outcome`. Returns `false` if
    /// nothing was listening.
    pub fn respond(&mut self, outcome: CaptureOutcome) -> bool {
        let pending = self.recognizer.lock().unwrap().pending.take();
        let Some(done) = pending else {
            return false;
        };
        done(outcome);
        self.pump();
        true
    }

    pub fn answer(&mut self, text: &str) {
        assert!(
            self.respond(CaptureOutcome::Captured(text.to_string())),
            "no capture pending for answer {text:?}"
        );
    }

    /// Fire the oldest abandoned capture callback.
    pub fn fire_abandoned(&mut self, outcome: CaptureOutcome) {
        let done = self.recognizer.lock().unwrap().abandoned.remove(0);
        done(outcome);
        self.pump();
    }

    pub fn transcript(&self) -> Vec<(SpeakerRole, String)> {
        self.orch.conversation().transcript()
    }

    pub fn captured(&self) -> Vec<String> {
        self.orch
            .catalog()
            .map(|catalog| catalog.iter().map(|f| f.captured_value.clone()).collect())
            .unwrap_or_default()
    }

    pub fn submitted(&self) -> Vec<(String, String)> {
        self.sink.submitted.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.emitted.0.lock().unwrap().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.synth
            .lock()
            .unwrap()
            .spoken
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }
}

pub fn agent(text: &str) -> (SpeakerRole, String) {
    (SpeakerRole::Agent, text.to_string())
}

pub fn user(text: &str) -> (SpeakerRole, String) {
    (SpeakerRole::Respondent, text.to_string())
}
