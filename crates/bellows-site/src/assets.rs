//! Embedded static assets
//!
//! The stylesheet and the client-side scripts ship inside the binary, so
//! an export or a preview server needs no files beyond the vault itself.

use rust_embed::Embed;

#[derive(Embed)]
#[folder = "$CARGO_MANIFEST_DIR/static"]
pub struct StaticAssets;

/// Look up an embedded asset by file name.
pub fn get(name: &str) -> Option<Vec<u8>> {
    <StaticAssets as Embed>::get(name).map(|f| f.data.to_vec())
}

/// Names of every embedded asset, for the export pipeline.
pub fn names() -> Vec<String> {
    <StaticAssets as Embed>::iter().map(|n| n.to_string()).collect()
}
