//! Bellows note graph model
//!
//! This crate owns the in-memory representation of a vault: the set of
//! discovered notes, the vault-wide tag index, and the backlink/forward-link
//! sets that accumulate while notes are rendered. It knows nothing about
//! Markdown syntax; the parser crate mutates this model through [`ParseEnv`].

pub mod env;
pub mod error;
pub mod note;
pub mod util;
pub mod vault;

pub use env::ParseEnv;
pub use error::{Result, VaultError};
pub use note::{Note, PropertyMap, PropertyValue};
pub use util::{slugify, title_case};
pub use vault::{NoteId, Vault};
