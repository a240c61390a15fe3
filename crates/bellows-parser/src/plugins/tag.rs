//! Tag plugin (`#word` hashtags)
//!
//! A tag is a maximal run of alphanumeric characters after `#`. An empty
//! run declines, and so does an all-digit run — `#2024` is far more likely
//! an issue or year reference than a tag.

use bellows_core::slugify;
use markdown_it::parser::inline::{InlineRule, InlineState};
use markdown_it::{MarkdownIt, Node, NodeValue, Renderer};

/// Inline hashtag, linking to the tag's index page.
#[derive(Debug)]
pub struct TagRef {
    pub name: String,
    /// Index-page href, set during resolution.
    pub href: Option<String>,
}

impl NodeValue for TagRef {
    fn render(&self, _node: &Node, fmt: &mut dyn Renderer) {
        let href = self
            .href
            .clone()
            .unwrap_or_else(|| format!("/tags/{}/", slugify(&self.name)));
        fmt.open("a", &[("href", href), ("class", "tag".to_string())]);
        fmt.text(&format!("#{}", self.name));
        fmt.close("a");
    }
}

pub struct TagScanner;

impl InlineRule for TagScanner {
    const MARKER: char = '#';

    fn run(state: &mut InlineState) -> Option<(Node, usize)> {
        let start = state.pos;
        let src = &state.src;
        if !src[start..state.pos_max].starts_with('#') {
            return None;
        }

        // `issue#42` is not a tag
        if let Some(prev) = src[..start].chars().next_back() {
            if prev.is_alphanumeric() || prev == '_' {
                return None;
            }
        }

        let rest = &src[start + 1..state.pos_max];
        let word_len = rest
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(rest.len());
        if word_len == 0 {
            return None;
        }
        let word = &rest[..word_len];
        if word.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let node = Node::new(TagRef {
            name: word.to_string(),
            href: None,
        });
        Some((node, 1 + word_len))
    }
}

pub fn add_tag_plugin(md: &mut MarkdownIt) {
    md.inline.add_rule::<TagScanner>();
}
