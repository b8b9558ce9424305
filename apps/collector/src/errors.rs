use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type.
/// Everything here is fatal for the run; per-candidate probe failures are
/// downgraded to `ProbeOutcome`s long before they could reach this enum.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("candidate file {}: {message}", path.display())]
    Candidates { path: PathBuf, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error. Unreadable configuration is the
    /// only condition contractually pinned to 2; everything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            _ => 1,
        }
    }
}
