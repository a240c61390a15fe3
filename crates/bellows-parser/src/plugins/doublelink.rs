//! Double-link plugin (`[[Note]]`, `[[Note#Anchor|alias]]`, `![[Other]]`)
//!
//! Two inline rules mirror the stock link/image split: `DoubleLinkScanner`
//! for references and `EmbedScanner` for the `!`-prefixed embed form. Both
//! only recognize the syntax; which note (or asset) a target resolves to is
//! decided in the resolve pass, which fills in `href` / `resolution`.

use markdown_it::parser::inline::{InlineRule, InlineState, Text};
use markdown_it::generics::inline::full_link::{LinkPrefixScanner, LinkScanner};
use markdown_it::{MarkdownIt, Node, NodeValue, Renderer};

/// Reference to another note (or a page that does not exist yet).
#[derive(Debug)]
pub struct DoubleLink {
    pub target: String,
    pub anchor: Option<String>,
    pub alias: Option<String>,
    /// Canonical href, set during resolution.
    pub href: Option<String>,
}

impl DoubleLink {
    /// Visible text: the alias if given, else `label > anchor`, else the
    /// raw label.
    pub fn display_text(&self) -> String {
        if let Some(alias) = &self.alias {
            alias.clone()
        } else if let Some(anchor) = &self.anchor {
            format!("{} > {}", self.target, anchor)
        } else {
            self.target.clone()
        }
    }

    /// Best-effort href for a target that resolved to nothing.
    pub fn fallback_href(&self) -> String {
        format!("{}.html", self.target)
    }
}

impl NodeValue for DoubleLink {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        let href = self
            .href
            .clone()
            .unwrap_or_else(|| self.fallback_href());
        fmt.open("a", &[("href", href)]);
        fmt.contents(&node.children);
        fmt.close("a");
    }
}

/// How an embed target resolved.
#[derive(Debug)]
pub enum EmbedResolution {
    /// Bare parse, resolve pass not run yet.
    Pending,
    /// The target matched a note; the node's children hold that note's
    /// rendered token stream, spliced with no wrapping container.
    Note,
    /// The target resolved as an asset image.
    Asset { src: String },
}

/// Inline embed of another note or an asset.
#[derive(Debug)]
pub struct NoteEmbed {
    pub target: String,
    /// For asset embeds the alias carries an optional width.
    pub alias: Option<String>,
    pub resolution: EmbedResolution,
}

impl NoteEmbed {
    fn render_as_image(&self, src: &str, fmt: &mut dyn Renderer) {
        let mut attrs = vec![("src", src.to_string()), ("alt", self.target.clone())];
        if let Some(width) = &self.alias {
            attrs.push(("width", width.clone()));
        }
        fmt.self_close("img", &attrs);
    }
}

impl NodeValue for NoteEmbed {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        match &self.resolution {
            EmbedResolution::Note => fmt.contents(&node.children),
            EmbedResolution::Asset { src } => self.render_as_image(src, fmt),
            EmbedResolution::Pending => self.render_as_image(&self.target, fmt),
        }
    }
}

struct LinkParts {
    target: String,
    anchor: Option<String>,
    alias: Option<String>,
    /// Byte offset just past the closing `]]`.
    end: usize,
}

/// Scan a double-link body. `start` points right after the opening
/// brackets; `max` bounds the scan. The label stops at `]`, `|` or `#`;
/// an anchor runs to `]` or `|`; an alias runs to `]`. A missing closing
/// `]]` declines.
fn parse_double_link(src: &str, start: usize, max: usize) -> Option<LinkParts> {
    let bytes = src.as_bytes();
    let mut pos = start;

    while pos < max && !matches!(bytes[pos], b']' | b'|' | b'#') {
        pos += 1;
    }
    if pos >= max {
        return None;
    }
    let target = src[start..pos].to_string();

    let mut anchor = None;
    if bytes[pos] == b'#' {
        let anchor_start = pos + 1;
        pos = anchor_start;
        while pos < max && !matches!(bytes[pos], b']' | b'|') {
            pos += 1;
        }
        if pos >= max {
            return None;
        }
        anchor = Some(src[anchor_start..pos].to_string());
    }

    let mut alias = None;
    if bytes[pos] == b'|' {
        let alias_start = pos + 1;
        pos = alias_start;
        while pos < max && bytes[pos] != b']' {
            pos += 1;
        }
        if pos >= max {
            return None;
        }
        alias = Some(src[alias_start..pos].to_string());
    }

    if pos + 1 >= max || bytes[pos] != b']' || bytes[pos + 1] != b']' {
        return None;
    }

    Some(LinkParts {
        target,
        anchor,
        alias,
        end: pos + 2,
    })
}

pub struct DoubleLinkScanner;

impl InlineRule for DoubleLinkScanner {
    const MARKER: char = '[';

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        let start = state.pos;
        if !state.src[start..state.pos_max].starts_with("[[") {
            return None;
        }

        let parts = parse_double_link(&state.src, start + 2, state.pos_max)?;
        let link = DoubleLink {
            target: parts.target,
            anchor: parts.anchor,
            alias: parts.alias,
            href: None,
        };
        let text = link.display_text();
        let mut node = Node::new(link);
        node.children.push(Node::new(Text { content: text }));
        Some((node, parts.end - start))
    }
}

pub struct EmbedScanner;

impl InlineRule for EmbedScanner {
    const MARKER: char = '!';

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        let start = state.pos;
        if !state.src[start..state.pos_max].starts_with("![[") {
            return None;
        }

        let parts = parse_double_link(&state.src, start + 3, state.pos_max)?;
        let node = Node::new(NoteEmbed {
            target: parts.target,
            alias: parts.alias,
            resolution: EmbedResolution::Pending,
        });
        Some((node, parts.end - start))
    }
}

pub fn add_double_link_plugin(md: &mut MarkdownIt) {
    // ahead of the stock rules sharing the same marker characters
    md.inline.add_rule::<DoubleLinkScanner>().before::<LinkScanner<false>>();
    md.inline.add_rule::<EmbedScanner>().before::<LinkPrefixScanner<'!', true>>();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MarkdownIt {
        let mut md = MarkdownIt::new();
        markdown_it::plugins::cmark::add(&mut md);
        add_double_link_plugin(&mut md);
        md
    }

    fn links(input: &str) -> Vec<(String, Option<String>, Option<String>)> {
        let ast = parser().parse(input);
        let mut out = Vec::new();
        fn walk(node: &Node, out: &mut Vec<(String, Option<String>, Option<String>)>) {
            if let Some(link) = node.cast::<DoubleLink>() {
                out.push((link.target.clone(), link.anchor.clone(), link.alias.clone()));
            }
            for child in &node.children {
                walk(child, out);
            }
        }
        walk(&ast, &mut out);
        out
    }

    #[test]
    fn plain_reference() {
        assert_eq!(links("See [[Alpha]]."), vec![("Alpha".into(), None, None)]);
    }

    #[test]
    fn alias_and_anchor_forms() {
        assert_eq!(
            links("[[Alpha|See this]]"),
            vec![("Alpha".into(), None, Some("See this".into()))]
        );
        assert_eq!(
            links("[[Alpha#Intro]]"),
            vec![("Alpha".into(), Some("Intro".into()), None)]
        );
        assert_eq!(
            links("[[Alpha#Intro|here]]"),
            vec![("Alpha".into(), Some("Intro".into()), Some("here".into()))]
        );
    }

    #[test]
    fn display_text_composition() {
        let link = DoubleLink {
            target: "Alpha".into(),
            anchor: Some("Intro".into()),
            alias: None,
            href: None,
        };
        assert_eq!(link.display_text(), "Alpha > Intro");
    }

    #[test]
    fn unterminated_link_declines() {
        assert!(links("broken [[Alpha").is_empty());
        let html = parser().parse("broken [[Alpha").render();
        assert!(html.contains("[[Alpha"));
    }

    #[test]
    fn embed_form_produces_embed_node() {
        let ast = parser().parse("![[photo.png]]");
        let mut found = Vec::new();
        fn walk(node: &Node, out: &mut Vec<String>) {
            if let Some(embed) = node.cast::<NoteEmbed>() {
                out.push(embed.target.clone());
            }
            for child in &node.children {
                walk(child, out);
            }
        }
        walk(&ast, &mut found);
        assert_eq!(found, vec!["photo.png"]);
    }

    #[test]
    fn unresolved_render_is_best_effort() {
        let html = parser().parse("[[Missing]]").render();
        assert!(html.contains("href=\"Missing.html\""));
        assert!(html.contains(">Missing</a>"));
    }
}
