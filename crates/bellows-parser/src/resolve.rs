//! Resolve pass over a parsed note
//!
//! Walks the AST once per note and applies everything that needs the
//! vault: frontmatter properties, tag registration, double-link targets,
//! embed splicing, and the render hooks over stock node types (heading
//! anchors, asset-resolved images, new-tab external links). All graph
//! mutation goes through [`ParseEnv`].

use bellows_core::{slugify, NoteId, ParseEnv, Vault};
use markdown_it::parser::inline::Text;
use markdown_it::plugins::cmark::block::heading::ATXHeading;
use markdown_it::plugins::cmark::inline::image::Image;
use markdown_it::plugins::cmark::inline::link::Link;
use markdown_it::{Node, NodeValue, Renderer};

use crate::error::RenderResult;
use crate::plugins::doublelink::{DoubleLink, EmbedResolution, NoteEmbed};
use crate::plugins::frontmatter::Frontmatter;
use crate::plugins::tag::TagRef;
use crate::render::VaultRenderer;

/// Heading carrying a slugified anchor id.
#[derive(Debug)]
pub struct AnchoredHeading {
    pub level: u8,
    pub slug: String,
}

impl NodeValue for AnchoredHeading {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        let tag = format!("h{}", self.level);
        fmt.cr();
        if self.slug.is_empty() {
            fmt.open(&tag, &[]);
        } else {
            fmt.open(&tag, &[("id", self.slug.clone())]);
        }
        fmt.contents(&node.children);
        fmt.close(&tag);
        fmt.cr();
    }
}

/// Image whose source went through asset resolution.
#[derive(Debug)]
pub struct VaultImage {
    pub src: String,
    pub alt: String,
    pub title: Option<String>,
}

impl NodeValue for VaultImage {
    fn render(&self, _node: &Node, fmt: &mut dyn Renderer) {
        let mut attrs = vec![("src", self.src.clone()), ("alt", self.alt.clone())];
        if let Some(title) = &self.title {
            attrs.push(("title", title.clone()));
        }
        fmt.self_close("img", &attrs);
    }
}

/// Link out of the vault; opens in a new tab.
#[derive(Debug)]
pub struct ExternalLink {
    pub url: String,
    pub title: Option<String>,
}

impl NodeValue for ExternalLink {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        let mut attrs = vec![
            ("href", self.url.clone()),
            ("target", "_blank".to_string()),
            ("rel", "noopener".to_string()),
        ];
        if let Some(title) = &self.title {
            attrs.push(("title", title.clone()));
        }
        fmt.open("a", &attrs);
        fmt.contents(&node.children);
        fmt.close("a");
    }
}

/// Collect the literal text under a node, fragments joined by single
/// spaces.
pub fn extract_text(node: &Node) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Node, out: &mut String) {
    if let Some(text) = node.cast::<Text>() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&text.content);
    }
    for child in &node.children {
        collect_text(child, out);
    }
}

impl VaultRenderer {
    pub(crate) fn resolve_node(
        &self,
        node: &mut Node,
        vault: &mut Vault,
        id: NoteId,
        stack: &mut Vec<NoteId>,
    ) -> RenderResult<()> {
        // frontmatter properties land on the current note
        if let Some(frontmatter) = node.cast::<Frontmatter>() {
            let properties = frontmatter.properties.clone();
            let mut env = ParseEnv::new(vault, id);
            for (key, value) in properties {
                env.add_property(key, value);
            }
            return Ok(());
        }

        if let Some(tag) = node.cast::<TagRef>() {
            let name = tag.name.clone();
            ParseEnv::new(vault, id).add_tag(&name);
            let href = vault.tag_url(&name);
            if let Some(tag) = node.cast_mut::<TagRef>() {
                tag.href = Some(href);
            }
            return Ok(());
        }

        if let Some(link) = node.cast::<DoubleLink>() {
            let target = link.target.clone();
            let anchor = link.anchor.clone();
            let found = vault
                .find_by_name(&target)
                .or_else(|| vault.find_by_path(&target));
            let href = match found {
                Some(found) => {
                    ParseEnv::new(vault, id).add_reference(found);
                    let mut href = vault.note_url(found);
                    if let Some(anchor) = &anchor {
                        href.push('#');
                        href.push_str(&slugify(anchor));
                    }
                    href
                }
                None => {
                    tracing::debug!(target = %target, "double link target not in vault");
                    format!("{target}.html")
                }
            };
            if let Some(link) = node.cast_mut::<DoubleLink>() {
                link.href = Some(href);
            }
            // the label is literal text, nothing further to resolve
            return Ok(());
        }

        if node.cast::<NoteEmbed>().is_some() {
            return self.resolve_embed(node, vault, id, stack);
        }

        // render hooks over the stock node types
        if let Some(heading) = node.cast::<ATXHeading>() {
            let level = heading.level;
            if level == 1 {
                ParseEnv::new(vault, id).mark_has_title();
            }
            let slug = slugify(&extract_text(node));
            node.replace(AnchoredHeading { level, slug });
        } else if let Some(image) = node.cast::<Image>() {
            let url = image.url.clone();
            let title = image.title.clone();
            let alt = extract_text(node);
            let src = ParseEnv::new(vault, id).resolve_asset(&url);
            node.replace(VaultImage { src, alt, title });
        } else if let Some(link) = node.cast::<Link>() {
            if link.url.starts_with("http://") || link.url.starts_with("https://") {
                let url = link.url.clone();
                let title = link.title.clone();
                node.replace(ExternalLink { url, title });
            }
        }

        for child in node.children.iter_mut() {
            self.resolve_node(child, vault, id, stack)?;
        }
        Ok(())
    }

    /// Embeds look up notes by display name only; anything else is an
    /// asset. A matched note's resolved stream replaces the node's
    /// children with no wrapping container.
    fn resolve_embed(
        &self,
        node: &mut Node,
        vault: &mut Vault,
        id: NoteId,
        stack: &mut Vec<NoteId>,
    ) -> RenderResult<()> {
        let Some(target) = node.cast::<NoteEmbed>().map(|e| e.target.clone()) else {
            return Ok(());
        };

        match vault.find_by_name(&target) {
            Some(found) => {
                let mut embedded = self.note_ast(vault, found, stack)?;
                if let Some(embed) = node.cast_mut::<NoteEmbed>() {
                    embed.resolution = EmbedResolution::Note;
                }
                node.children = std::mem::take(&mut embedded.children);
            }
            None => {
                let src = ParseEnv::new(vault, id).resolve_asset(&target);
                if let Some(embed) = node.cast_mut::<NoteEmbed>() {
                    embed.resolution = EmbedResolution::Asset { src };
                }
            }
        }
        Ok(())
    }
}
