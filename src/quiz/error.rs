use std::path::PathBuf;

use thiserror::Error;

/// Process exit code used when the problem file cannot be opened.
pub const EXIT_SOURCE_UNREADABLE: i32 = 1;
/// Process exit code used when the problem file cannot be decoded.
pub const EXIT_SOURCE_MALFORMED: i32 = 2;
/// Process exit code used when prompts or the score cannot be written.
pub const EXIT_OUTPUT_FAILED: i32 = 3;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("There was an error when attempting to read {}:\n{source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse the csv file {}: {reason}", path.display())]
    SourceMalformed {
        path: PathBuf,
        #[source]
        reason: MalformedReason,
    },

    #[error("Failed to write quiz output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum MalformedReason {
    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// `record` is 1-based so it lines up with what a person sees in an editor.
    #[error("record {record} has {found} field(s), expected at least 2 (question,answer)")]
    TooFewFields { record: usize, found: usize },
}

impl QuizError {
    pub fn exit_code(&self) -> i32 {
        match self {
            QuizError::SourceUnreadable { .. } => EXIT_SOURCE_UNREADABLE,
            QuizError::SourceMalformed { .. } => EXIT_SOURCE_MALFORMED,
            QuizError::Io(_) => EXIT_OUTPUT_FAILED,
        }
    }
}
