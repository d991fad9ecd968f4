//! Error types for deckvoice

use thiserror::Error;

/// Common result type for deckvoice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types across the generation pipeline
///
/// Per-record errors (`EmptyTerm`, `TermTooLong`, `MissingAudioField`,
/// `Synthesis`, `Transcode`) are scoped to the affected record; the batch
/// always continues to the next one.
#[derive(Error, Debug)]
pub enum Error {
    /// Term field is empty (or absent) after normalization
    #[error("Term is empty after normalization")]
    EmptyTerm,

    /// Normalized term exceeds the filesystem-safe length bound
    #[error("Term is too long after normalization ({length} characters, limit {limit})")]
    TermTooLong { length: usize, limit: usize },

    /// Record has no field that can hold the audio reference
    #[error("Record {record_id} has no audio field")]
    MissingAudioField { record_id: i64 },

    /// Configured external tool could not be resolved at startup
    #[error("Executable not found: {program}")]
    ExecutableNotFound { program: String },

    /// Speech synthesizer process failed (spawn failure, non-zero exit, or timeout)
    #[error("Speech synthesis failed for '{term}': {message}")]
    Synthesis { term: String, message: String },

    /// Audio transcoder process failed (spawn failure, non-zero exit, or timeout)
    #[error("Audio transcoding failed for '{term}': {message}")]
    Transcode { term: String, message: String },

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for records that are skipped before generation is attempted
    /// (nothing to pronounce, or nowhere to store the reference). These are
    /// warnings; generation failures are reported as errors. Neither stops
    /// the batch.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Error::EmptyTerm | Error::TermTooLong { .. } | Error::MissingAudioField { .. }
        )
    }
}
