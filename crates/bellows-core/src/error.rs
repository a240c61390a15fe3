//! Error types for the note graph model

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors raised while opening or querying a vault
#[derive(Debug, Error)]
pub enum VaultError {
    /// The configured vault root does not exist or is not a directory
    #[error("vault not found: {0}")]
    VaultNotFound(PathBuf),

    /// A note path was requested that is not part of the vault
    #[error("note not found: {0}")]
    NoteNotFound(String),

    /// The discovery glob pattern could not be built
    #[error("invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A discovered path could not be read during the scan
    #[error("discovery failed: {0}")]
    Discovery(#[from] glob::GlobError),

    /// IO errors (reading note sources, stat'ing assets)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
