//! Fire-and-forget document writer.
//!
//! Field mutations and download snapshots run on a dedicated task so that a
//! slow or failing document adapter never stalls the dialogue. Commands are
//! applied in the order they were sent, so a snapshot always includes every
//! mutation submitted before it.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use formvoice_core::{
    DocumentMutator, DocumentSerializer, DocumentSink, LoadedDocument, SessionEvent,
    SessionEventEmitter,
};

#[derive(Debug)]
enum WriterCommand {
    Replace(LoadedDocument),
    SetField { identity: String, text: String },
    Snapshot,
}

/// Handle to the writer task. Cheap to clone; the task stops when every
/// handle is dropped.
#[derive(Clone)]
pub struct DocumentWriter {
    tx: mpsc::UnboundedSender<WriterCommand>,
}

impl DocumentWriter {
    /// Spawn the writer task on the current runtime.
    pub fn spawn(
        mutator: Arc<dyn DocumentMutator>,
        serializer: Arc<dyn DocumentSerializer>,
        emitter: Arc<dyn SessionEventEmitter>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(writer_loop(rx, mutator, serializer, emitter));
        (Self { tx }, task)
    }

    fn send(&self, command: WriterCommand) {
        if self.tx.send(command).is_err() {
            tracing::warn!("Document writer has stopped; dropping command");
        }
    }
}

impl DocumentSink for DocumentWriter {
    fn replace(&self, document: LoadedDocument) {
        self.send(WriterCommand::Replace(document));
    }

    fn submit_field(&self, identity: &str, text: &str) {
        self.send(WriterCommand::SetField {
            identity: identity.to_string(),
            text: text.to_string(),
        });
    }

    fn request_snapshot(&self) {
        self.send(WriterCommand::Snapshot);
    }
}

async fn writer_loop(
    mut rx: mpsc::UnboundedReceiver<WriterCommand>,
    mutator: Arc<dyn DocumentMutator>,
    serializer: Arc<dyn DocumentSerializer>,
    emitter: Arc<dyn SessionEventEmitter>,
) {
    let mut current: Option<LoadedDocument> = None;

    while let Some(command) = rx.recv().await {
        match command {
            WriterCommand::Replace(document) => {
                tracing::debug!(name = %document.name, "Writer document replaced");
                current = Some(document);
            }

            WriterCommand::SetField { identity, text } => {
                let Some(document) = current.as_mut() else {
                    tracing::warn!(%identity, "Field update with no document loaded");
                    continue;
                };
                match mutator.set_field_value(document, &identity, &text) {
                    Ok(bytes) => {
                        document.bytes = bytes;
                        emitter.emit(SessionEvent::DocumentUpdated {
                            bytes: document.bytes.clone(),
                        });
                    }
                    // The captured value stays in the catalog; only persistence failed.
                    Err(e) => tracing::warn!(%identity, error = %e, "Field update failed"),
                }
            }

            WriterCommand::Snapshot => {
                let Some(document) = current.as_ref() else {
                    emitter.emit(SessionEvent::error("No document loaded to download"));
                    continue;
                };
                match serializer.serialize(document) {
                    Ok(bytes) => emitter.emit(SessionEvent::DownloadReady {
                        file_name: document.filled_name(),
                        bytes,
                    }),
                    Err(e) => {
                        tracing::error!(error = %e, "Document serialization failed");
                        emitter.emit(SessionEvent::error(format!(
                            "Could not prepare the download: {e}"
                        )));
                    }
                }
            }
        }
    }

    tracing::debug!("Document writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    use formvoice_core::{ChannelEmitter, DocumentSerializeError, FieldMutationError};

    /// Appends `identity=text;` to the bytes; rejects identity "locked".
    struct AppendingCodec;

    impl DocumentMutator for AppendingCodec {
        fn set_field_value(
            &self,
            document: &LoadedDocument,
            identity: &str,
            text: &str,
        ) -> Result<Vec<u8>, FieldMutationError> {
            if identity == "locked" {
                return Err(FieldMutationError::NotFound(identity.to_string()));
            }
            let mut bytes = document.bytes.clone();
            bytes.extend_from_slice(format!("{identity}={text};").as_bytes());
            Ok(bytes)
        }
    }

    impl DocumentSerializer for AppendingCodec {
        fn serialize(&self, document: &LoadedDocument) -> Result<Vec<u8>, DocumentSerializeError> {
            Ok(document.bytes.clone())
        }
    }

    fn spawn_writer() -> (
        DocumentWriter,
        JoinHandle<()>,
        mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let (emitter, events) = ChannelEmitter::new();
        let codec = Arc::new(AppendingCodec);
        let (writer, task) = DocumentWriter::spawn(codec.clone(), codec, Arc::new(emitter));
        (writer, task, events)
    }

    #[tokio::test]
    async fn snapshot_sees_every_earlier_update() {
        let (writer, task, mut events) = spawn_writer();

        writer.replace(LoadedDocument::new("receipt.json", Vec::new()));
        writer.submit_field("A", "1");
        writer.submit_field("B", "2");
        writer.request_snapshot();
        drop(writer);
        task.await.unwrap();

        let mut last = None;
        while let Ok(event) = events.try_recv() {
            last = Some(event);
        }
        assert_eq!(
            last,
            Some(SessionEvent::DownloadReady {
                file_name: "filled_receipt.json".into(),
                bytes: b"A=1;B=2;".to_vec(),
            })
        );
    }

    #[tokio::test]
    async fn failed_update_is_skipped_and_later_updates_apply() {
        let (writer, task, mut events) = spawn_writer();

        writer.replace(LoadedDocument::new("f.json", Vec::new()));
        writer.submit_field("locked", "x");
        writer.submit_field("A", "1");
        drop(writer);
        task.await.unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::DocumentUpdated {
                bytes: b"A=1;".to_vec()
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn snapshot_without_document_reports_an_error() {
        let (writer, task, mut events) = spawn_writer();

        writer.request_snapshot();
        drop(writer);
        task.await.unwrap();

        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::Error { .. }
        ));
    }
}
