use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::vault::NoteId;

/// Property value attached to a note by frontmatter.
pub type PropertyValue = serde_yaml::Value;

/// Frontmatter properties, last write wins per key.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// One Markdown document plus the metadata derived from rendering it.
///
/// Notes are created empty at vault scan time. Tags, properties and link
/// sets accumulate monotonically as notes are rendered; nothing is removed
/// during a single run.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    path: String,
    properties: PropertyMap,
    tags: Vec<String>,
    backlinks: BTreeSet<NoteId>,
    forward_links: BTreeSet<NoteId>,
    has_title: bool,
    #[serde(skip)]
    html: Option<String>,
}

impl Note {
    pub(crate) fn new(path: String) -> Self {
        Self {
            path,
            properties: PropertyMap::new(),
            tags: Vec::new(),
            backlinks: BTreeSet::new(),
            forward_links: BTreeSet::new(),
            has_title: false,
            html: None,
        }
    }

    /// Vault-relative path, the note's unique key (e.g. `papers/Alpha.md`).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Display name: the path stem without directory or extension.
    pub fn name(&self) -> &str {
        let file = self.path.rsplit('/').next().unwrap_or(&self.path);
        file.strip_suffix(".md").unwrap_or(file)
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Tags attached directly to this note, in first-seen order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Notes that reference this note.
    pub fn backlinks(&self) -> &BTreeSet<NoteId> {
        &self.backlinks
    }

    /// Notes this note references.
    pub fn forward_links(&self) -> &BTreeSet<NoteId> {
        &self.forward_links
    }

    /// True once a level-1 heading was seen while rendering this note.
    pub fn has_title(&self) -> bool {
        self.has_title
    }

    /// Cached rendered HTML. Populated by the first render, never
    /// invalidated within a run; a process restart starts from scratch.
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub(crate) fn set_property(&mut self, key: String, value: PropertyValue) {
        self.properties.insert(key, value);
    }

    pub(crate) fn add_tag(&mut self, tag: &str) {
        if !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub(crate) fn add_backlink(&mut self, from: NoteId) {
        self.backlinks.insert(from);
    }

    pub(crate) fn add_forward_link(&mut self, to: NoteId) {
        self.forward_links.insert(to);
    }

    pub(crate) fn set_has_title(&mut self) {
        self.has_title = true;
    }

    pub(crate) fn set_html(&mut self, html: String) {
        self.html = Some(html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_path_stem() {
        let note = Note::new("papers/Deep Work.md".to_string());
        assert_eq!(note.name(), "Deep Work");

        let top = Note::new("Index.md".to_string());
        assert_eq!(top.name(), "Index");
    }

    #[test]
    fn tags_are_idempotent_and_ordered() {
        let mut note = Note::new("a.md".to_string());
        note.add_tag("project");
        note.add_tag("rust");
        note.add_tag("project");
        assert_eq!(note.tags(), ["project", "rust"]);
    }
}
