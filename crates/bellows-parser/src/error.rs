//! Error types for note rendering

use thiserror::Error;

/// Result type alias for render operations
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Failures while turning a note into HTML.
///
/// These are the render-fatal cases: the top-level render catches them,
/// logs, and substitutes a visible placeholder so one broken note cannot
/// abort a whole export. Syntax-level problems never reach this type —
/// malformed vault syntax makes the rule decline and the text parses as
/// plain Markdown instead.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Two notes embed each other (directly or transitively)
    #[error("embed cycle through '{0}'")]
    EmbedCycle(String),

    /// Embeds nested deeper than the configured limit
    #[error("embed depth limit {limit} exceeded at '{path}'")]
    EmbedDepth { path: String, limit: usize },

    /// The note source could not be read
    #[error(transparent)]
    Vault(#[from] bellows_core::VaultError),
}
