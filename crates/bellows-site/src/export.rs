//! Static site export
//!
//! Renders every note, mirrors the vault's directory layout into the
//! output directory, copies non-Markdown files through, and writes the tag
//! pages, the search and graph artifacts, and the embedded static assets.

use std::fs;
use std::path::Path;

use bellows_core::{slugify, Vault};
use bellows_parser::VaultRenderer;

use crate::error::{Result, SiteError};
use crate::{assets, graph, search, template};

/// Export the whole vault as a static site under `dest`.
///
/// An existing `dest` is removed first. Individual broken notes export as
/// their error placeholders; only IO failures abort the export.
pub fn export_vault(vault: &mut Vault, renderer: &VaultRenderer, dest: &Path) -> Result<()> {
    if dest.exists() {
        tracing::info!(dest = %dest.display(), "removing previous export");
        fs::remove_dir_all(dest)?;
    }
    fs::create_dir_all(dest)?;

    for name in assets::names() {
        if let Some(data) = assets::get(&name) {
            write_file(&dest.join(&name), &data)?;
        }
    }

    // render everything first so the tag index and backlink sets are
    // complete before the index, tag and graph artifacts are built
    let ids: Vec<_> = vault.ids().collect();
    for id in ids.iter().copied() {
        renderer.render_note(vault, id);
    }

    for id in ids.iter().copied() {
        let html = renderer.render_note(vault, id);
        let page = template::note_page(vault, id, &html);
        let rel = Path::new(vault.note(id).path()).with_extension("html");
        write_file(&dest.join(rel), page.as_bytes())?;
    }

    copy_vault_files(vault, dest)?;

    let tags: Vec<String> = vault.tags().keys().cloned().collect();
    for tag in &tags {
        let page = template::tag_page(vault, tag);
        let dir = dest.join("tags").join(slugify(tag));
        write_file(&dir.join("index.html"), page.as_bytes())?;
    }

    write_file(&dest.join("index.html"), template::index_page(vault).as_bytes())?;
    write_file(&dest.join("graph.html"), template::graph_page(vault).as_bytes())?;

    let index = search::build_index(vault, renderer);
    write_file(&dest.join("search.json"), &serde_json::to_vec_pretty(&index)?)?;

    let graph = graph::build_graph(vault);
    write_file(&dest.join("graph.json"), &serde_json::to_vec_pretty(&graph)?)?;

    tracing::info!(
        notes = ids.len(),
        tags = tags.len(),
        dest = %dest.display(),
        "export complete"
    );
    Ok(())
}

/// Copy every non-Markdown vault file (attachments, PDFs, ...) into the
/// export, keeping relative paths.
fn copy_vault_files(vault: &Vault, dest: &Path) -> Result<()> {
    let pattern = vault.root().join("**/*");
    for entry in glob::glob(&pattern.to_string_lossy())
        .map_err(|e| SiteError::Walk(e.to_string()))?
    {
        let path = entry.map_err(|e| SiteError::Walk(e.to_string()))?;
        if !path.is_file() {
            continue;
        }
        let Ok(rel) = path.strip_prefix(vault.root()) else {
            continue;
        };
        let rel_str = rel.to_string_lossy();
        if rel_str.split(['/', '\\']).any(|c| c.starts_with('.')) {
            continue;
        }
        if rel_str.ends_with(".md") {
            continue;
        }
        let target = dest.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&path, &target)?;
    }
    Ok(())
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    Ok(())
}
