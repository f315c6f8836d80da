//! `formvoice run`: fill a form through the console.
//!
//! The dialogue loop and the document writer run as tasks; this handler
//! watches the outbound events, asks for a download once the session
//! completes and writes the filled document to disk.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use formvoice_core::{
    ChannelEmitter, DialogueConfig, RunMode, SessionEvent, SessionEventEmitter,
};
use formvoice_dialogue::{
    DialogueDeps, DialogueHandle, DialogueOrchestrator, DocumentWriter, MockAnswerTable,
};
use formvoice_document::JsonFormCodec;

use crate::bootstrap::{load_answers, read_document};
use crate::commands::RunArgs;
use crate::error::CliError;
use crate::speech::{ConsoleSynthesizer, StdinRecognizer};

/// Run a session on the process's stdin and stdout.
pub async fn execute(config: DialogueConfig, args: RunArgs) -> Result<PathBuf, CliError> {
    let (recognizer, exhausted) = StdinRecognizer::stdin();
    run_session(config, args, recognizer, exhausted, std::io::stdout()).await
}

/// Run a session with lines from `input`, printing the dialogue to `out`.
pub async fn execute_with<R, W>(
    config: DialogueConfig,
    args: RunArgs,
    input: R,
    out: W,
) -> Result<PathBuf, CliError>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    let (recognizer, exhausted) = StdinRecognizer::spawn(input);
    run_session(config, args, recognizer, exhausted, out).await
}

async fn run_session<W: Write + Send + 'static>(
    config: DialogueConfig,
    args: RunArgs,
    recognizer: StdinRecognizer,
    mut exhausted: mpsc::UnboundedReceiver<()>,
    out: W,
) -> Result<PathBuf, CliError> {
    let answers = if args.mode == RunMode::Demo {
        load_answers(args.answers.as_deref())?
    } else {
        MockAnswerTable::new()
    };

    let codec = Arc::new(JsonFormCodec::new());
    let (emitter, mut events) = ChannelEmitter::new();
    let emitter: Arc<dyn SessionEventEmitter> = Arc::new(emitter);
    let (writer, writer_task) =
        DocumentWriter::spawn(codec.clone(), codec.clone(), Arc::clone(&emitter));

    let deps = DialogueDeps {
        synthesizer: Box::new(ConsoleSynthesizer::new(
            out,
            Duration::from_millis(args.pace_ms),
        )),
        recognizer: Box::new(recognizer),
        fields: codec,
        documents: Arc::new(writer),
        emitter,
        answers,
    };
    let (orchestrator, rx) = DialogueOrchestrator::new(config, deps);
    let handle = orchestrator.handle();
    let dialogue_task = tokio::spawn(orchestrator.run(rx));

    let result = drive(&handle, &args, &mut events, &mut exhausted).await;

    // The loop owns the writer handle; both tasks end once it shuts down.
    let _ = handle.shutdown();
    dialogue_task
        .await
        .map_err(|e| CliError::Dialogue(e.to_string()))?;
    writer_task
        .await
        .map_err(|e| CliError::Dialogue(e.to_string()))?;

    result
}

async fn drive(
    handle: &DialogueHandle,
    args: &RunArgs,
    events: &mut mpsc::UnboundedReceiver<SessionEvent>,
    exhausted: &mut mpsc::UnboundedReceiver<()>,
) -> Result<PathBuf, CliError> {
    let count = handle.load_document(read_document(&args.document)?).await?;
    tracing::info!(fields = count, mode = ?args.mode, "Starting console session");
    handle.restart(args.mode)?;

    let mut input_open = true;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::FieldCaptured { identity, value, .. }) => {
                    tracing::debug!(%identity, %value, "Captured");
                }
                Some(SessionEvent::Notice { message }) => {
                    // A failed capture leaves the turn waiting; the next line is the retry.
                    eprintln!("{message}");
                    handle.toggle_input()?;
                }
                Some(SessionEvent::SessionCompleted) => handle.download()?,
                Some(SessionEvent::DownloadReady { file_name, bytes }) => {
                    let path = args
                        .output
                        .clone()
                        .unwrap_or_else(|| args.document.with_file_name(&file_name));
                    std::fs::write(&path, bytes)
                        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
                    return Ok(path);
                }
                Some(SessionEvent::Error { message }) => return Err(CliError::Document(message)),
                Some(_) => {}
                None => return Err(CliError::Dialogue("event stream closed".to_string())),
            },
            signal = exhausted.recv(), if input_open => {
                input_open = false;
                if signal.is_some() {
                    eprintln!("Input closed before the form was finished; saving what was filled.");
                    handle.download()?;
                }
            }
        }
    }
}
