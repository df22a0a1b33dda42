use thiserror::Error;

/// Errors raised by the sports-data provider client
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider request timed out: {0}")]
    Timeout(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned error status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider reported errors: {0}")]
    Api(String),

    #[error("Fixture not found: {0}")]
    NotFound(u64),

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors raised by the fixture store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A single fixture failed to reconcile; the sweep logs it and moves on
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
