//! Cached note rendering
//!
//! One [`VaultRenderer`] serves a whole vault. Rendering a note parses its
//! source, runs the resolve pass (which mutates the note graph and splices
//! embeds), and converts the AST to HTML. The result is memoized on the
//! note: within one process a note renders once, and edits on disk are not
//! picked up until restart. A failed render is caught here, logged, and
//! replaced by a visible placeholder so a multi-note export survives
//! individual broken notes; the placeholder is cached like any output.

use bellows_core::{NoteId, Vault};
use markdown_it::{MarkdownIt, Node};

use crate::error::{RenderError, RenderResult};

/// Embeds nested deeper than this fail with [`RenderError::EmbedDepth`].
pub const MAX_EMBED_DEPTH: usize = 32;

pub struct VaultRenderer {
    md: MarkdownIt,
    max_embed_depth: usize,
}

impl Default for VaultRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultRenderer {
    pub fn new() -> Self {
        Self {
            md: crate::vault_markdown(),
            max_embed_depth: MAX_EMBED_DEPTH,
        }
    }

    pub fn with_max_embed_depth(mut self, depth: usize) -> Self {
        self.max_embed_depth = depth;
        self
    }

    pub fn md(&self) -> &MarkdownIt {
        &self.md
    }

    /// Render a note to HTML, memoized on the note.
    ///
    /// Never fails: render-fatal errors become a placeholder for this one
    /// note. Graph side effects (tags, properties, links) land during the
    /// first render.
    pub fn render_note(&self, vault: &mut Vault, id: NoteId) -> String {
        if let Some(html) = vault.cached_html(id) {
            tracing::trace!(note = %vault.note(id).path(), "render cache hit");
            return html.to_string();
        }

        let html = match self.try_render(vault, id) {
            Ok(html) => html,
            Err(err) => {
                tracing::error!(note = %vault.note(id).path(), error = %err, "note render failed");
                error_placeholder(vault.note(id).name(), &err)
            }
        };
        vault.cache_html(id, html.clone());
        html
    }

    /// Render without the placeholder policy; errors propagate.
    pub fn try_render(&self, vault: &mut Vault, id: NoteId) -> RenderResult<String> {
        let mut stack = Vec::new();
        let ast = self.note_ast(vault, id, &mut stack)?;
        Ok(ast.render())
    }

    /// Plain text of a note's rendered stream, for search indexing.
    pub fn plain_text(&self, vault: &mut Vault, id: NoteId) -> RenderResult<String> {
        let mut stack = Vec::new();
        let ast = self.note_ast(vault, id, &mut stack)?;
        Ok(crate::resolve::extract_text(&ast))
    }

    /// Fully parsed and resolved token stream for a note. `stack` holds the
    /// chain of notes currently being expanded; re-entering one of them is
    /// the defined failure for mutually embedding notes.
    pub(crate) fn note_ast(
        &self,
        vault: &mut Vault,
        id: NoteId,
        stack: &mut Vec<NoteId>,
    ) -> RenderResult<Node> {
        if stack.contains(&id) {
            return Err(RenderError::EmbedCycle(vault.note(id).path().to_string()));
        }
        if stack.len() >= self.max_embed_depth {
            return Err(RenderError::EmbedDepth {
                path: vault.note(id).path().to_string(),
                limit: self.max_embed_depth,
            });
        }

        stack.push(id);
        let result = self.parse_and_resolve(vault, id, stack);
        stack.pop();
        result
    }

    fn parse_and_resolve(
        &self,
        vault: &mut Vault,
        id: NoteId,
        stack: &mut Vec<NoteId>,
    ) -> RenderResult<Node> {
        let src = vault.read_note(id)?;
        let mut ast = self.md.parse(&src);
        self.resolve_node(&mut ast, vault, id, stack)?;
        Ok(ast)
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn error_placeholder(name: &str, err: &RenderError) -> String {
    format!(
        "<div class=\"render-error\"><p>Failed to render <strong>{}</strong>: {}</p></div>\n",
        escape_html(name),
        escape_html(&err.to_string())
    )
}
