//! Error types for site generation

use thiserror::Error;

/// Result type alias for site operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Errors raised while exporting or serving a site
#[derive(Debug, Error)]
pub enum SiteError {
    /// IO errors (writing pages, copying vault files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing search or graph artifacts failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying vault error
    #[error(transparent)]
    Vault(#[from] bellows_core::VaultError),

    /// The server address could not be parsed or bound
    #[error("invalid server address: {0}")]
    Address(String),

    /// The export file walk failed
    #[error("export walk failed: {0}")]
    Walk(String),
}
