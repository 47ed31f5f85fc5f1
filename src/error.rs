//! Error types shared across the crate.

/// Failure reported by a synthesis engine for a single request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("{status} – {message}")]
    Status { status: u16, message: String },
    /// The provider could not be reached, or the response body could not be read.
    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ledger file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("all API keys have used up their quota")]
    Exhausted,
    #[error("ledger has no entry at index {0}")]
    IndexOutOfRange(usize),
}

#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a run ended before processing every line, or did not start at all.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("no content to synthesize")]
    EmptyInput,
    #[error("all API keys have used up their quota")]
    CredentialsExhausted,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Ledger(LedgerError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl From<LedgerError> for RunError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Exhausted => RunError::CredentialsExhausted,
            other => RunError::Ledger(other),
        }
    }
}
