//! Vault discovery and the vault-wide cross-reference indices

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, VaultError};
use crate::note::{Note, PropertyValue};

/// Index of a note inside its vault.
///
/// Ids are assigned in discovery order and stay stable for the lifetime of
/// the process; they double as the deterministic tie-break for display-name
/// lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NoteId(usize);

impl NoteId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "note#{}", self.0)
    }
}

/// The root collection of notes plus the vault-wide tag index.
///
/// Constructed once per invocation from a directory scan. Every note is
/// reachable by exactly one normalized relative path.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    attachment_dir: String,
    root_url: String,
    files: Vec<String>,
    notes: Vec<Note>,
    tags: BTreeMap<String, BTreeSet<NoteId>>,
}

impl Vault {
    /// Scan `root` for Markdown files and build an empty graph over them.
    ///
    /// Discovered paths are sorted before ids are assigned, so name-collision
    /// tie-breaks do not depend on filesystem iteration order.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VaultError::VaultNotFound(root));
        }

        let pattern = root.join("**/*.md");
        let mut files = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let path = entry?;
            if !path.is_file() {
                continue;
            }
            let Ok(rel) = path.strip_prefix(&root) else {
                continue;
            };
            let rel = normalize_components(rel);
            // .git, .obsidian and friends are not part of the vault
            if rel.split('/').any(|c| c.starts_with('.')) {
                continue;
            }
            files.push(rel);
        }
        files.sort();
        files.dedup();

        tracing::debug!(count = files.len(), root = %root.display(), "vault scan complete");

        let notes = files.iter().map(|p| Note::new(p.clone())).collect();
        Ok(Self {
            root,
            attachment_dir: "Images".to_string(),
            root_url: String::new(),
            files,
            notes,
            tags: BTreeMap::new(),
        })
    }

    /// Directory (relative to the vault root) searched for attachments that
    /// are not next to the referencing note.
    pub fn with_attachment_dir(mut self, dir: impl Into<String>) -> Self {
        self.attachment_dir = dir.into();
        self
    }

    /// Prefix for every generated absolute link, without a trailing slash.
    pub fn with_root_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.root_url = url;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn attachment_dir(&self) -> &str {
        &self.attachment_dir
    }

    /// Discovered note paths in id order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn note(&self, id: NoteId) -> &Note {
        &self.notes[id.0]
    }

    pub(crate) fn note_mut(&mut self, id: NoteId) -> &mut Note {
        &mut self.notes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NoteId, &Note)> {
        self.notes.iter().enumerate().map(|(i, n)| (NoteId(i), n))
    }

    pub fn ids(&self) -> impl Iterator<Item = NoteId> {
        (0..self.notes.len()).map(NoteId)
    }

    /// Tag name to member notes, vault-wide.
    pub fn tags(&self) -> &BTreeMap<String, BTreeSet<NoteId>> {
        &self.tags
    }

    /// Case-insensitive display-name lookup; first match in discovery order.
    pub fn find_by_name(&self, name: &str) -> Option<NoteId> {
        let wanted = name.to_lowercase();
        self.notes
            .iter()
            .position(|n| n.name().to_lowercase() == wanted)
            .map(NoteId)
    }

    /// Lookup by vault-relative path, after normalization (leading slashes
    /// stripped, `.md` appended when missing).
    pub fn find_by_path(&self, path: &str) -> Option<NoteId> {
        let normalized = Self::normalize_path(path);
        self.files.iter().position(|p| *p == normalized).map(NoteId)
    }

    pub fn normalize_path(path: &str) -> String {
        let trimmed = path.trim().trim_start_matches('/');
        if trimmed.ends_with(".md") {
            trimmed.to_string()
        } else {
            format!("{trimmed}.md")
        }
    }

    /// Absolute filesystem path of a note.
    pub fn abs_path(&self, id: NoteId) -> PathBuf {
        self.root.join(&self.files[id.0])
    }

    /// Canonical URL of a note's rendered page.
    pub fn note_url(&self, id: NoteId) -> String {
        let path = &self.files[id.0];
        let html = path.strip_suffix(".md").unwrap_or(path);
        format!("{}/{}.html", self.root_url, html)
    }

    /// URL of a tag's index page.
    pub fn tag_url(&self, tag: &str) -> String {
        format!("{}/tags/{}/", self.root_url, crate::util::slugify(tag))
    }

    pub fn read_note(&self, id: NoteId) -> Result<String> {
        Ok(std::fs::read_to_string(self.abs_path(id))?)
    }

    /// Idempotent insert into the vault-wide tag index.
    pub fn add_tag_ref(&mut self, tag: &str, note: NoteId) {
        self.tags.entry(tag.to_string()).or_default().insert(note);
    }

    /// Record that `from` references `to`: inserted into `to`'s backlinks
    /// and `from`'s forward links, idempotently on both sides.
    pub fn add_reference(&mut self, from: NoteId, to: NoteId) {
        self.notes[to.0].add_backlink(from);
        self.notes[from.0].add_forward_link(to);
    }

    /// Last-write-wins property insert. The `tags` key additionally fans out
    /// into tag registration: a sequence registers every element, a scalar
    /// registers that one value.
    pub fn add_property(&mut self, id: NoteId, key: String, value: PropertyValue) {
        if key == "tags" {
            match &value {
                PropertyValue::Sequence(items) => {
                    let tags: Vec<_> = items.iter().filter_map(property_tag).collect();
                    for tag in tags {
                        self.add_note_tag(id, &tag);
                    }
                }
                other => {
                    if let Some(tag) = property_tag(other) {
                        self.add_note_tag(id, &tag);
                    }
                }
            }
        }
        self.notes[id.0].set_property(key, value);
    }

    /// Attach a tag to a note and index it vault-wide.
    pub fn add_note_tag(&mut self, id: NoteId, tag: &str) {
        self.notes[id.0].add_tag(tag);
        self.add_tag_ref(tag, id);
    }

    pub(crate) fn set_has_title(&mut self, id: NoteId) {
        self.notes[id.0].set_has_title();
    }

    pub fn cached_html(&self, id: NoteId) -> Option<&str> {
        self.notes[id.0].html()
    }

    /// Memoize a note's rendered output. Only called with final output
    /// (successful HTML or a rendered error placeholder).
    pub fn cache_html(&mut self, id: NoteId, html: String) {
        self.notes[id.0].set_html(html);
    }

    /// Resolve a raw asset reference for a note: the note's own directory
    /// first, then the attachment directory, else the reference is returned
    /// unresolved. Never fails.
    pub fn resolve_asset(&self, from: NoteId, name: &str) -> String {
        let name = name.trim();
        let note_path = &self.files[from.0];
        if let Some(dir) = note_path.rsplit_once('/').map(|(d, _)| d) {
            let candidate = format!("{dir}/{name}");
            if self.root.join(&candidate).is_file() {
                return format!("{}/{}", self.root_url, candidate);
            }
        } else if self.root.join(name).is_file() {
            return format!("{}/{}", self.root_url, name);
        }

        let fallback = format!("{}/{}", self.attachment_dir, name);
        if self.root.join(&fallback).is_file() {
            return format!("{}/{}", self.root_url, fallback);
        }

        tracing::debug!(asset = name, note = %note_path, "asset left unresolved");
        name.to_string()
    }
}

fn normalize_components(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn property_tag(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::String(s) => Some(s.clone()),
        PropertyValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
