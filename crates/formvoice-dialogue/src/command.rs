//! Spoken commands recognized while no turn is running.

/// What a transcript captured outside a turn asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Begin filling from the first field.
    Start,
    /// Deliver the document as filled so far.
    Download,
    /// Anything else; logged and otherwise ignored.
    Unrecognized,
}

impl VoiceCommand {
    /// Interpret a transcript by keyword, case-insensitively.
    ///
    /// "start" or "begin" wins over "download" when both appear.
    #[must_use]
    pub fn parse(transcript: &str) -> Self {
        let lower = transcript.to_lowercase();
        if lower.contains("start") || lower.contains("begin") {
            Self::Start
        } else if lower.contains("download") {
            Self::Download
        } else {
            Self::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(VoiceCommand::parse("Start"), VoiceCommand::Start);
        assert_eq!(VoiceCommand::parse("let's BEGIN"), VoiceCommand::Start);
        assert_eq!(VoiceCommand::parse("Download it please"), VoiceCommand::Download);
    }

    #[test]
    fn start_takes_precedence_over_download() {
        assert_eq!(
            VoiceCommand::parse("start the download"),
            VoiceCommand::Start
        );
    }

    #[test]
    fn other_speech_is_unrecognized() {
        assert_eq!(VoiceCommand::parse("hello there"), VoiceCommand::Unrecognized);
        assert_eq!(VoiceCommand::parse(""), VoiceCommand::Unrecognized);
    }
}
