//! The dialogue state machine.
//!
//! [`DialogueOrchestrator`] owns the only mutable turn state. Every
//! asynchronous result (speech finished, transcript captured, delay elapsed)
//! and every user command arrives as a [`DialogueEvent`] and goes through
//! [`handle_event`](DialogueOrchestrator::handle_event), one at a time.
//!
//! Each outstanding request remembers what it was issued for (which field,
//! which purpose). A result whose request id is no longer the current one is
//! dropped without touching any field, which is what keeps late engine
//! callbacks from a restarted or re-moded session harmless.

use std::sync::Arc;

use tokio::sync::mpsc;

use formvoice_core::{
    CaptureOutcome, ConversationLog, DialogueConfig, DialogueError, DialogueMode,
    DialogueSession, DocumentSink, FieldCatalog, FieldSource, LoadedDocument,
    RecognitionError, RequestId, RunMode, SessionEvent, SessionEventEmitter, SpeakerRole,
    SpeechOutcome, SpeechRecognizer, SpeechSynthesizer, TurnState,
};

use crate::command::VoiceCommand;
use crate::demo::{DemoScriptProvider, MockAnswerTable};
use crate::event::{DialogueCommand, DialogueEvent, EventSender, SessionSnapshot};
use crate::handle::DialogueHandle;
use crate::input::SpeechInputChannel;
use crate::output::SpeechOutputChannel;
use crate::timer::{DelayTimer, TimerId};

const DOWNLOAD_MESSAGE: &str = "Downloading your document now.";
const NO_FIELDS_MESSAGE: &str = "I couldn't find any fillable text fields in this document.";
const LOAD_ERROR_MESSAGE: &str = "Sorry, I encountered an error loading this document.";

/// External collaborators the orchestrator drives.
pub struct DialogueDeps {
    pub synthesizer: Box<dyn SpeechSynthesizer>,
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub fields: Arc<dyn FieldSource>,
    pub documents: Arc<dyn DocumentSink>,
    pub emitter: Arc<dyn SessionEventEmitter>,
    pub answers: MockAnswerTable,
}

/// What to do when the utterance in flight finishes.
#[derive(Debug)]
enum AfterSpeech {
    Prompt { index: usize },
    DemoAnswer { index: usize, text: String },
    Announcement,
}

/// What the capture in flight is for.
#[derive(Debug, Clone, Copy)]
enum ListenPurpose {
    Answer { index: usize },
    Command,
}

#[derive(Debug, Clone, Copy)]
enum TimerPurpose {
    DemoThink { index: usize },
    Dwell { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerOrigin {
    Live,
    Demo,
}

pub struct DialogueOrchestrator {
    config: DialogueConfig,

    // Session state
    mode: DialogueMode,
    preferred_mode: RunMode,
    cursor: Option<usize>,
    turn_state: TurnState,
    last_transcript: Option<String>,
    catalog: Option<FieldCatalog>,
    log: ConversationLog,

    // Channels
    output: SpeechOutputChannel,
    input: SpeechInputChannel,
    timer: DelayTimer,
    demo: DemoScriptProvider,

    // Outstanding requests
    after_speech: Option<(RequestId, AfterSpeech)>,
    listening_for: Option<(RequestId, ListenPurpose)>,
    timer_for: Option<(TimerId, TimerPurpose)>,

    fields: Arc<dyn FieldSource>,
    documents: Arc<dyn DocumentSink>,
    emitter: Arc<dyn SessionEventEmitter>,
    events_tx: EventSender,
    last_view: DialogueSession,
}

impl DialogueOrchestrator {
    /// Build an orchestrator and the event channel that feeds it.
    pub fn new(
        config: DialogueConfig,
        deps: DialogueDeps,
    ) -> (Self, mpsc::UnboundedReceiver<DialogueEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let demo = DemoScriptProvider::new(deps.answers, config.default_answer.clone());

        let orchestrator = Self {
            mode: DialogueMode::Idle,
            preferred_mode: RunMode::default(),
            cursor: None,
            turn_state: TurnState::Idle,
            last_transcript: None,
            catalog: None,
            log: ConversationLog::new(),
            output: SpeechOutputChannel::new(deps.synthesizer, events_tx.clone()),
            input: SpeechInputChannel::new(deps.recognizer, events_tx.clone()),
            timer: DelayTimer::new(events_tx.clone()),
            demo,
            after_speech: None,
            listening_for: None,
            timer_for: None,
            fields: deps.fields,
            documents: deps.documents,
            emitter: deps.emitter,
            events_tx,
            last_view: DialogueSession::default(),
            config,
        };
        (orchestrator, events_rx)
    }

    /// A handle for sending commands from other tasks.
    #[must_use]
    pub fn handle(&self) -> DialogueHandle {
        DialogueHandle::new(self.events_tx.clone())
    }

    /// Current read-only view.
    #[must_use]
    pub fn session(&self) -> DialogueSession {
        DialogueSession {
            mode: self.mode,
            cursor: self.cursor,
            turn_state: self.turn_state,
            input_active: self.input.is_active(),
            output_active: self.output.is_active(),
            field_count: self.field_count(),
            last_transcript: self.last_transcript.clone(),
        }
    }

    #[must_use]
    pub const fn conversation(&self) -> &ConversationLog {
        &self.log
    }

    #[must_use]
    pub const fn catalog(&self) -> Option<&FieldCatalog> {
        self.catalog.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.session(),
            transcript: self.log.entries().to_vec(),
            fields: self
                .catalog
                .as_ref()
                .map(|catalog| catalog.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Catalog `document` and make it the target of the next session.
    ///
    /// On a parse error the previous document and session are left as they
    /// were.
    pub fn load_document(&mut self, document: LoadedDocument) -> Result<usize, DialogueError> {
        let result = self.install_document(document);
        self.publish_state();
        result
    }

    /// Start from the first field in the preferred mode.
    pub fn start(&mut self) -> Result<(), DialogueError> {
        let result = self.begin_session(self.preferred_mode);
        self.publish_state();
        result
    }

    /// Start from the first field in `mode`, which becomes the preferred mode.
    pub fn restart(&mut self, mode: RunMode) -> Result<(), DialogueError> {
        self.preferred_mode = mode;
        let result = self.begin_session(mode);
        self.publish_state();
        result
    }

    /// Start or stop listening, depending on where the dialogue stands.
    pub fn toggle_input(&mut self) {
        self.toggle_listening();
        self.publish_state();
    }

    /// Ask the document writer for a snapshot of the filled document.
    pub fn download(&mut self) -> Result<(), DialogueError> {
        let result = self.request_download();
        self.publish_state();
        result
    }

    /// Switch mode. A running turn is cancelled and its field asked again.
    pub fn set_mode(&mut self, mode: RunMode) {
        self.switch_mode(mode);
        self.publish_state();
    }

    // =========================================================================
    // Event dispatch
    // =========================================================================

    /// Apply one event. The only place session state changes.
    pub fn handle_event(&mut self, event: DialogueEvent) {
        match event {
            DialogueEvent::Output { id, outcome } => self.on_output(id, outcome),
            DialogueEvent::Input { id, outcome } => self.on_input(id, outcome),
            DialogueEvent::TimerFired { id } => self.on_timer(id),
            DialogueEvent::Command(command) => self.on_command(command),
        }
        self.publish_state();
    }

    /// Process events until a shutdown command arrives.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<DialogueEvent>) {
        tracing::info!("Dialogue loop started");
        while let Some(event) = events.recv().await {
            if matches!(event, DialogueEvent::Command(DialogueCommand::Shutdown)) {
                self.cancel_in_flight();
                self.publish_state();
                break;
            }
            self.handle_event(event);
        }
        tracing::info!("Dialogue loop stopped");
    }

    fn on_command(&mut self, command: DialogueCommand) {
        match command {
            DialogueCommand::LoadDocument { document, reply } => {
                let result = self.install_document(document);
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            DialogueCommand::Start => log_rejection(self.begin_session(self.preferred_mode)),
            DialogueCommand::Restart(mode) => {
                self.preferred_mode = mode;
                log_rejection(self.begin_session(mode));
            }
            DialogueCommand::ToggleInput => self.toggle_listening(),
            DialogueCommand::Download => log_rejection(self.request_download()),
            DialogueCommand::SetMode(mode) => self.switch_mode(mode),
            DialogueCommand::Inspect(reply) => {
                let _ = reply.send(self.snapshot());
            }
            DialogueCommand::Shutdown => self.cancel_in_flight(),
        }
    }

    fn on_output(&mut self, id: RequestId, outcome: SpeechOutcome) {
        if !self.output.complete(id) {
            tracing::debug!(request = %id, "Discarding stale speech completion");
            return;
        }
        if let SpeechOutcome::Failed(e) = &outcome {
            // A broken output device must not deadlock the dialogue.
            tracing::warn!(request = %id, error = %e, "Speech output failed; continuing");
        }

        let next = match self.after_speech.take() {
            Some((expected, next)) if expected == id => next,
            other => {
                self.after_speech = other;
                return;
            }
        };

        match next {
            AfterSpeech::Prompt { index } => {
                if self.is_current_turn(TurnState::Prompting, index) {
                    self.await_response(index);
                }
            }
            AfterSpeech::DemoAnswer { index, text } => {
                self.accept_answer(index, text, AnswerOrigin::Demo);
            }
            AfterSpeech::Announcement => {}
        }
    }

    fn on_input(&mut self, id: RequestId, outcome: CaptureOutcome) {
        if !self.input.complete(id) {
            tracing::debug!(request = %id, "Discarding stale capture");
            return;
        }

        let purpose = match self.listening_for.take() {
            Some((expected, purpose)) if expected == id => purpose,
            other => {
                self.listening_for = other;
                return;
            }
        };

        match (purpose, outcome) {
            (ListenPurpose::Answer { index }, CaptureOutcome::Captured(text)) => {
                self.accept_answer(index, text, AnswerOrigin::Live);
            }
            (ListenPurpose::Command, CaptureOutcome::Captured(text)) => {
                self.handle_voice_command(text);
            }
            (_, CaptureOutcome::Failed(e)) => {
                tracing::warn!(request = %id, error = %e, "Speech recognition failed");
                let message = match e {
                    RecognitionError::NoSpeech => {
                        "I didn't catch that. Turn the microphone on to try again.".to_string()
                    }
                    other => format!("Speech recognition failed: {other}"),
                };
                self.emitter.emit(SessionEvent::notice(message));
            }
            (_, CaptureOutcome::Ended) => {
                tracing::debug!(request = %id, "Capture ended without a result");
            }
        }
    }

    fn on_timer(&mut self, id: TimerId) {
        if !self.timer.fire(id) {
            tracing::debug!(timer = %id, "Discarding stale timer");
            return;
        }

        let purpose = match self.timer_for.take() {
            Some((expected, purpose)) if expected == id => purpose,
            other => {
                self.timer_for = other;
                return;
            }
        };

        match purpose {
            TimerPurpose::DemoThink { index } => {
                if self.mode == DialogueMode::Demo
                    && self.is_current_turn(TurnState::AwaitingResponse, index)
                {
                    self.speak_demo_answer(index);
                }
            }
            TimerPurpose::Dwell { index } => {
                if self.is_current_turn(TurnState::Advancing, index) {
                    self.advance(index);
                }
            }
        }
    }

    // =========================================================================
    // Turn sequencing
    // =========================================================================

    fn install_document(&mut self, document: LoadedDocument) -> Result<usize, DialogueError> {
        let catalog = match FieldCatalog::extract(self.fields.as_ref(), &document) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::error!(name = %document.name, error = %e, "Failed to load document");
                self.emitter.emit(SessionEvent::error(e.to_string()));
                if !self.turn_state.is_running() {
                    self.speak(LOAD_ERROR_MESSAGE, SpeakerRole::Agent, AfterSpeech::Announcement);
                }
                return Err(e.into());
            }
        };

        let count = catalog.count();
        tracing::info!(name = %document.name, fields = count, "Document loaded");

        self.cancel_in_flight();
        self.clear_transcript();
        self.catalog = Some(catalog);
        self.cursor = None;
        self.mode = DialogueMode::Idle;
        self.set_turn_state(TurnState::Idle);

        self.emitter.emit(SessionEvent::DocumentLoaded {
            name: document.name.clone(),
            field_count: count,
        });
        self.documents.replace(document);

        let announcement = if count == 0 {
            NO_FIELDS_MESSAGE.to_string()
        } else {
            format!("I found {count} fields. Say \"Start\" to begin filling.")
        };
        self.speak(&announcement, SpeakerRole::Agent, AfterSpeech::Announcement);
        Ok(count)
    }

    fn begin_session(&mut self, mode: RunMode) -> Result<(), DialogueError> {
        let Some(count) = self.catalog.as_ref().map(FieldCatalog::count) else {
            self.emitter
                .emit(SessionEvent::error("Load a document before starting."));
            return Err(DialogueError::NoDocument);
        };

        self.cancel_in_flight();
        self.clear_transcript();
        self.mode = mode.into();
        tracing::info!(mode = ?self.mode, fields = count, "Starting session");

        if count == 0 {
            self.cursor = Some(0);
            self.complete_session();
        } else {
            self.prompt(0);
        }
        Ok(())
    }

    fn prompt(&mut self, index: usize) {
        let Some(identity) = self.identity_at(index) else {
            return;
        };
        self.cursor = Some(index);
        self.set_turn_state(TurnState::Prompting);

        tracing::info!(index, %identity, "Prompting for field");
        let question = self.config.prompt_for(&identity);
        self.speak(&question, SpeakerRole::Agent, AfterSpeech::Prompt { index });
    }

    fn await_response(&mut self, index: usize) {
        self.set_turn_state(TurnState::AwaitingResponse);

        if self.mode == DialogueMode::Demo {
            let id = self.timer.schedule(self.config.demo_think_delay());
            self.timer_for = Some((id, TimerPurpose::DemoThink { index }));
        } else {
            self.listen(ListenPurpose::Answer { index });
        }
    }

    fn speak_demo_answer(&mut self, index: usize) {
        let Some(identity) = self.identity_at(index) else {
            return;
        };
        let answer = self.demo.answer_for(&identity).to_string();
        tracing::debug!(index, %identity, %answer, "Speaking scripted answer");

        self.last_transcript = Some(answer.clone());
        self.speak(
            &answer,
            SpeakerRole::Respondent,
            AfterSpeech::DemoAnswer {
                index,
                text: answer.clone(),
            },
        );
    }

    fn accept_answer(&mut self, index: usize, text: String, origin: AnswerOrigin) {
        if !self.is_current_turn(TurnState::AwaitingResponse, index) {
            tracing::debug!(index, cursor = ?self.cursor, state = ?self.turn_state, "Ignoring answer for stale turn");
            return;
        }

        self.set_turn_state(TurnState::Applying);
        self.last_transcript = Some(text.clone());
        // A scripted answer was already logged when it was spoken.
        if origin == AnswerOrigin::Live {
            self.log_utterance(SpeakerRole::Respondent, &text);
        }

        let Some(identity) = self
            .catalog
            .as_mut()
            .and_then(|catalog| catalog.set_captured_value(index, text.as_str()))
            .map(str::to_string)
        else {
            return;
        };

        tracing::info!(index, %identity, value = %text, "Field captured");
        self.documents.submit_field(&identity, &text);
        self.emitter.emit(SessionEvent::FieldCaptured {
            index,
            identity,
            value: text,
        });

        self.set_turn_state(TurnState::Advancing);
        let id = self.timer.schedule(self.config.advance_dwell());
        self.timer_for = Some((id, TimerPurpose::Dwell { index }));
    }

    fn advance(&mut self, index: usize) {
        let count = self.field_count();
        let next = index + 1;

        if next < count {
            self.prompt(next);
        } else {
            self.cursor = Some(count);
            let message = self.config.completion_message.clone();
            self.speak(&message, SpeakerRole::Agent, AfterSpeech::Announcement);
            self.complete_session();
        }
    }

    fn complete_session(&mut self) {
        self.set_turn_state(TurnState::Completed);
        if self.mode == DialogueMode::Auto {
            self.mode = DialogueMode::Idle;
        }
        tracing::info!(fields = self.field_count(), "Session completed");
        self.emitter.emit(SessionEvent::SessionCompleted);
    }

    fn toggle_listening(&mut self) {
        if self.input.stop() {
            self.listening_for = None;
            tracing::info!("Stopped listening");
            return;
        }

        match (self.turn_state, self.cursor) {
            (TurnState::AwaitingResponse, Some(index)) if self.mode != DialogueMode::Demo => {
                self.listen(ListenPurpose::Answer { index });
            }
            (TurnState::Idle | TurnState::Completed, _) => {
                self.listen(ListenPurpose::Command);
            }
            (state, _) => {
                tracing::debug!(?state, mode = ?self.mode, "Ignoring input toggle mid-turn");
            }
        }
    }

    fn handle_voice_command(&mut self, text: String) {
        self.log_utterance(SpeakerRole::Respondent, &text);
        let command = VoiceCommand::parse(&text);
        tracing::info!(transcript = %text, ?command, "Voice command");
        self.last_transcript = Some(text);

        match command {
            VoiceCommand::Start => log_rejection(self.begin_session(RunMode::Auto)),
            VoiceCommand::Download => log_rejection(self.request_download()),
            VoiceCommand::Unrecognized => {}
        }
    }

    fn request_download(&mut self) -> Result<(), DialogueError> {
        if self.catalog.is_none() {
            self.emitter
                .emit(SessionEvent::error("Load a document before downloading."));
            return Err(DialogueError::NoDocument);
        }

        // Announcing mid-turn would preempt the prompt in flight.
        if !self.turn_state.is_running() {
            self.speak(DOWNLOAD_MESSAGE, SpeakerRole::Agent, AfterSpeech::Announcement);
        }
        tracing::info!("Download requested");
        self.documents.request_snapshot();
        Ok(())
    }

    fn switch_mode(&mut self, mode: RunMode) {
        self.preferred_mode = mode;

        let index = match self.cursor {
            Some(index) if self.turn_state.is_running() => index,
            _ => {
                tracing::info!(?mode, "Mode set for next session");
                return;
            }
        };

        let old = self.mode;
        self.cancel_in_flight();
        self.mode = mode.into();
        tracing::info!(?old, new = ?self.mode, index, "Mode switched mid-session");

        if self.turn_state == TurnState::Advancing {
            // The answer is already applied; move on instead of asking again.
            self.advance(index);
        } else {
            self.prompt(index);
        }
    }

    // =========================================================================
    // Channel plumbing
    // =========================================================================

    /// Speak with the input channel closed first, so the two are never both
    /// active.
    fn speak(&mut self, text: &str, role: SpeakerRole, then: AfterSpeech) {
        if self.input.stop() {
            self.listening_for = None;
        }
        let id = self.output.speak(text, role, &mut self.log);
        if let Some(utterance) = self.log.entries().last() {
            self.emitter.emit(SessionEvent::UtteranceLogged {
                utterance: utterance.clone(),
            });
        }
        self.after_speech = Some((id, then));
    }

    fn listen(&mut self, purpose: ListenPurpose) {
        if self.output.cancel() {
            self.after_speech = None;
        }
        if let Some(id) = self.input.start() {
            self.listening_for = Some((id, purpose));
        }
    }

    fn cancel_in_flight(&mut self) {
        self.output.cancel();
        self.input.stop();
        self.timer.cancel();
        self.after_speech = None;
        self.listening_for = None;
        self.timer_for = None;
    }

    fn clear_transcript(&mut self) {
        self.log.clear();
        self.last_transcript = None;
        self.emitter.emit(SessionEvent::TranscriptCleared);
    }

    fn log_utterance(&mut self, role: SpeakerRole, text: &str) {
        let utterance = self.log.append(role, text).clone();
        self.emitter.emit(SessionEvent::UtteranceLogged { utterance });
    }

    fn set_turn_state(&mut self, new: TurnState) {
        let old = self.turn_state;
        if old != new {
            tracing::debug!(?old, ?new, cursor = ?self.cursor, "Dialogue state transition");
            self.turn_state = new;
        }
    }

    fn publish_state(&mut self) {
        let view = self.session();
        if view != self.last_view {
            self.emitter.emit(SessionEvent::StateChanged {
                session: view.clone(),
            });
            self.last_view = view;
        }
    }

    fn is_current_turn(&self, state: TurnState, index: usize) -> bool {
        self.turn_state == state && self.cursor == Some(index)
    }

    fn field_count(&self) -> usize {
        self.catalog.as_ref().map_or(0, FieldCatalog::count)
    }

    fn identity_at(&self, index: usize) -> Option<String> {
        self.catalog
            .as_ref()
            .and_then(|catalog| catalog.at(index))
            .map(|field| field.identity.clone())
    }
}

fn log_rejection(result: Result<(), DialogueError>) {
    if let Err(e) = result {
        tracing::debug!(error = %e, "Command rejected");
    }
}
