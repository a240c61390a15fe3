//! Search document index
//!
//! One JSON document per note — canonical URL, display name, and the
//! rendered plain text — consumed by the client-side `search.js`. A note
//! whose render fails contributes its name with empty text rather than
//! failing the index build.

use bellows_core::Vault;
use bellows_parser::VaultRenderer;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SearchDocument {
    pub url: String,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SearchIndex {
    pub documents: Vec<SearchDocument>,
}

pub fn build_index(vault: &mut Vault, renderer: &VaultRenderer) -> SearchIndex {
    let ids: Vec<_> = vault.ids().collect();
    let mut documents = Vec::with_capacity(ids.len());
    for id in ids {
        let text = match renderer.plain_text(vault, id) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(note = %vault.note(id).path(), error = %err, "search text unavailable");
                String::new()
            }
        };
        documents.push(SearchDocument {
            url: vault.note_url(id),
            name: vault.note(id).name().to_string(),
            text,
        });
    }
    SearchIndex { documents }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn index_covers_every_note() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Alpha.md"), "alpha words\n").unwrap();
        fs::write(dir.path().join("Beta.md"), "beta words\n").unwrap();
        let mut vault = Vault::open(dir.path()).unwrap();
        let renderer = VaultRenderer::new();

        let index = build_index(&mut vault, &renderer);

        assert_eq!(index.documents.len(), 2);
        assert_eq!(index.documents[0].name, "Alpha");
        assert!(index.documents[0].text.contains("alpha words"));
        assert_eq!(index.documents[0].url, "/Alpha.html");
    }

    #[test]
    fn broken_note_still_contributes_its_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Loop.md"), "![[Loop]]\n").unwrap();
        let mut vault = Vault::open(dir.path()).unwrap();
        let renderer = VaultRenderer::new();

        let index = build_index(&mut vault, &renderer);

        assert_eq!(index.documents.len(), 1);
        assert_eq!(index.documents[0].name, "Loop");
        assert!(index.documents[0].text.is_empty());
    }
}
