//! Per-render parse context

use crate::note::PropertyValue;
use crate::vault::{NoteId, Vault};

/// Context binding the note currently being rendered to its vault.
///
/// Every graph mutation the extension rules perform goes through this type.
/// It borrows the vault mutably, so two renders can never share one — the
/// single-writer model the graph relies on is enforced by the borrow
/// checker rather than by locks.
pub struct ParseEnv<'v> {
    vault: &'v mut Vault,
    note: NoteId,
}

impl<'v> ParseEnv<'v> {
    pub fn new(vault: &'v mut Vault, note: NoteId) -> Self {
        Self { vault, note }
    }

    /// The note being rendered.
    pub fn note_id(&self) -> NoteId {
        self.note
    }

    pub fn vault(&self) -> &Vault {
        &*self.vault
    }

    pub fn vault_mut(&mut self) -> &mut Vault {
        &mut *self.vault
    }

    /// Attach a tag to the current note and the vault-wide index.
    pub fn add_tag(&mut self, tag: &str) {
        self.vault.add_note_tag(self.note, tag);
    }

    /// Record a frontmatter property on the current note.
    pub fn add_property(&mut self, key: String, value: PropertyValue) {
        self.vault.add_property(self.note, key, value);
    }

    /// Register a cross-reference from the current note to `target`.
    pub fn add_reference(&mut self, target: NoteId) {
        self.vault.add_reference(self.note, target);
    }

    /// Mark that the current note carries an explicit level-1 heading.
    pub fn mark_has_title(&mut self) {
        self.vault.set_has_title(self.note);
    }

    /// Resolve an asset reference relative to the current note.
    pub fn resolve_asset(&self, name: &str) -> String {
        self.vault.resolve_asset(self.note, name)
    }
}
