//! Console stand-ins for the speech engines.
//!
//! [`ConsoleSynthesizer`] "speaks" by printing a role-tagged line;
//! [`StdinRecognizer`] "hears" whole lines typed on standard input.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use formvoice_core::{
    CaptureCallback, CaptureOutcome, RecognitionError, SpeechCallback, SpeechOutcome,
    SpeechRecognizer, SpeechRequest, SpeechSynthesizer, SynthesisError,
};

// =============================================================================
// Output
// =============================================================================

/// Prints each utterance as `[agent] text` or `[user] text`.
///
/// With a non-zero `pace` the utterance completes after that delay, which
/// gives a reader time to follow a demo.
pub struct ConsoleSynthesizer<W> {
    out: W,
    pace: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<W: Write + Send> ConsoleSynthesizer<W> {
    pub const fn new(out: W, pace: Duration) -> Self {
        Self {
            out,
            pace,
            pending: None,
        }
    }
}

impl<W: Write + Send> SpeechSynthesizer for ConsoleSynthesizer<W> {
    fn speak(&mut self, request: SpeechRequest, done: SpeechCallback) {
        let written = writeln!(self.out, "[{}] {}", request.role, request.text)
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            done(SpeechOutcome::Failed(SynthesisError::Engine(e.to_string())));
            return;
        }

        match Handle::try_current() {
            Ok(handle) if !self.pace.is_zero() => {
                let pace = self.pace;
                self.pending = Some(handle.spawn(async move {
                    tokio::time::sleep(pace).await;
                    done(SpeechOutcome::Finished);
                }));
            }
            _ => done(SpeechOutcome::Finished),
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

// =============================================================================
// Input
// =============================================================================

#[derive(Default)]
struct InputState {
    /// Lines typed while nobody was listening.
    queued: VecDeque<String>,
    pending: Option<CaptureCallback>,
    closed: bool,
}

/// Single-shot line capture from a reader thread.
///
/// Lines typed ahead are kept and delivered to the next capture in order.
/// An empty line counts as no speech. Once the input is exhausted every
/// capture ends without a result and a signal is sent on the channel
/// returned by [`spawn`](Self::spawn).
pub struct StdinRecognizer {
    state: Arc<Mutex<InputState>>,
    exhausted: mpsc::UnboundedSender<()>,
}

impl StdinRecognizer {
    /// Read from the process's standard input.
    pub fn stdin() -> (Self, mpsc::UnboundedReceiver<()>) {
        Self::spawn(std::io::BufReader::new(std::io::stdin()))
    }

    /// Read lines from `reader` on a background thread.
    pub fn spawn<R: BufRead + Send + 'static>(reader: R) -> (Self, mpsc::UnboundedReceiver<()>) {
        let state = Arc::new(Mutex::new(InputState::default()));
        let (exhausted, exhausted_rx) = mpsc::unbounded_channel();

        let thread_state = Arc::clone(&state);
        let thread_exhausted = exhausted.clone();
        std::thread::spawn(move || read_lines(reader, &thread_state, &thread_exhausted));

        (Self { state, exhausted }, exhausted_rx)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InputState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_lines(
    reader: impl BufRead,
    state: &Mutex<InputState>,
    exhausted: &mpsc::UnboundedSender<()>,
) {
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        let pending = {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            match state.pending.take() {
                Some(done) => Some(done),
                None => {
                    state.queued.push_back(line.clone());
                    None
                }
            }
        };
        if let Some(done) = pending {
            done(outcome_for(&line));
        }
    }

    tracing::debug!("Console input closed");
    let pending = {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        state.closed = true;
        state.pending.take()
    };
    if let Some(done) = pending {
        done(CaptureOutcome::Ended);
        let _ = exhausted.send(());
    }
}

fn outcome_for(line: &str) -> CaptureOutcome {
    let text = line.trim();
    if text.is_empty() {
        CaptureOutcome::Failed(RecognitionError::NoSpeech)
    } else {
        CaptureOutcome::Captured(text.to_string())
    }
}

impl SpeechRecognizer for StdinRecognizer {
    fn start(&mut self, done: CaptureCallback) {
        let mut state = self.lock();
        if let Some(line) = state.queued.pop_front() {
            drop(state);
            done(outcome_for(&line));
        } else if state.closed {
            drop(state);
            done(CaptureOutcome::Ended);
            let _ = self.exhausted.send(());
        } else {
            state.pending = Some(done);
        }
    }

    fn stop(&mut self) {
        // Dropping the callback means no result for this capture.
        self.lock().pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::mpsc as std_mpsc;

    use formvoice_core::{RequestId, SpeakerRole};

    fn capture(recognizer: &mut StdinRecognizer) -> CaptureOutcome {
        let (tx, rx) = std_mpsc::channel();
        recognizer.start(Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }));
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_synthesizer_prints_role_tagged_lines() {
        let mut synth = ConsoleSynthesizer::new(Vec::new(), Duration::ZERO);
        let (tx, rx) = std_mpsc::channel();

        synth.speak(
            SpeechRequest {
                id: RequestId(1),
                text: "What is your Grain?".into(),
                role: SpeakerRole::Agent,
            },
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );

        assert_eq!(rx.recv().unwrap(), SpeechOutcome::Finished);
        assert_eq!(
            String::from_utf8(synth.out).unwrap(),
            "[agent] What is your Grain?\n"
        );
    }

    #[test]
    fn test_typed_ahead_lines_are_delivered_in_order() {
        let (mut recognizer, _exhausted) = StdinRecognizer::spawn(Cursor::new("Wheat\n  1 \n"));

        assert_eq!(
            capture(&mut recognizer),
            CaptureOutcome::Captured("Wheat".into())
        );
        assert_eq!(capture(&mut recognizer), CaptureOutcome::Captured("1".into()));
    }

    #[test]
    fn test_blank_line_is_no_speech() {
        let (mut recognizer, _exhausted) = StdinRecognizer::spawn(Cursor::new("\n"));
        assert_eq!(
            capture(&mut recognizer),
            CaptureOutcome::Failed(RecognitionError::NoSpeech)
        );
    }

    #[test]
    fn test_exhausted_input_ends_capture_and_signals() {
        let (mut recognizer, mut exhausted) = StdinRecognizer::spawn(Cursor::new(""));

        // Either the reader thread or `start` observes the end of input.
        assert_eq!(capture(&mut recognizer), CaptureOutcome::Ended);
        assert_eq!(tokio_test::block_on(exhausted.recv()), Some(()));
    }
}
