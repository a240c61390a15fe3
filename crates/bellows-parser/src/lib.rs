//! Bellows Markdown extension layer
//!
//! Vault-specific grammar on top of the `markdown-it` engine:
//! - YAML frontmatter block at the very start of a document
//! - Obsidian-style callout boxes (`> [!warning]`)
//! - double links and embeds (`[[Note]]`, `![[Other]]`)
//! - inline hashtags (`#project`)
//!
//! Rules only recognize syntax and produce typed AST nodes. Graph side
//! effects (tags, properties, backlinks, embed splicing) happen in a
//! resolve pass over the AST, driven by [`VaultRenderer`], which also
//! memoizes each note's rendered HTML.

pub mod error;
pub mod plugins;
pub mod render;
pub mod resolve;

pub use error::{RenderError, RenderResult};
pub use render::VaultRenderer;
pub use resolve::extract_text;

use markdown_it::MarkdownIt;

/// Build the parser instance used for every note in a vault: CommonMark
/// base plus the vault syntax plugins.
pub fn vault_markdown() -> MarkdownIt {
    let mut md = MarkdownIt::new();
    markdown_it::plugins::cmark::add(&mut md);
    plugins::add_frontmatter_plugin(&mut md);
    plugins::add_callout_plugin(&mut md);
    plugins::add_double_link_plugin(&mut md);
    plugins::add_tag_plugin(&mut md);
    md
}
