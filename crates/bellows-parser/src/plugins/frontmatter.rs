//! Frontmatter plugin (leading YAML metadata block)
//!
//! Recognizes a `---` fenced block if and only if it starts on the very
//! first line of the document and a closing fence exists. The enclosed
//! text is parsed as YAML; top-level keys become note properties during
//! the resolve pass. A missing closing fence, a non-mapping body, or
//! unparsable YAML all make the rule decline — the text then parses as
//! ordinary Markdown (usually a thematic break plus a paragraph).

use markdown_it::parser::block::{BlockRule, BlockState};
use markdown_it::{MarkdownIt, Node, NodeValue, Renderer};

/// Parsed frontmatter. Carries the property list in document order;
/// produces no visible output.
#[derive(Debug)]
pub struct Frontmatter {
    pub properties: Vec<(String, serde_yaml::Value)>,
}

impl NodeValue for Frontmatter {
    fn render(&self, _node: &Node, _fmt: &mut dyn Renderer) {
        // metadata only
    }
}

pub struct FrontmatterScanner;

impl FrontmatterScanner {
    fn is_fence(state: &BlockState, line: usize) -> bool {
        state.get_line(line).trim_end() == "---"
    }
}

impl BlockRule for FrontmatterScanner {
    fn check(_state: &mut BlockState) -> Option<()> {
        // only a document prefix can be frontmatter; it never interrupts
        // another block
        None
    }

    fn run(state: &mut BlockState) -> Option<(Node, usize)> {
        if state.line != 0 || !Self::is_fence(state, 0) {
            return None;
        }

        let mut close = None;
        for line in 1..state.line_max {
            if Self::is_fence(state, line) {
                close = Some(line);
                break;
            }
        }
        // no closing fence: decline, never an error
        let close = close?;

        let mut body = String::new();
        for line in 1..close {
            let offsets = &state.line_offsets[line];
            body.push_str(&state.src[offsets.line_start..offsets.line_end]);
            body.push('\n');
        }

        let properties = match serde_yaml::from_str::<serde_yaml::Value>(&body) {
            Ok(serde_yaml::Value::Mapping(mapping)) => mapping
                .into_iter()
                .filter_map(|(key, value)| Some((key.as_str()?.to_string(), value)))
                .collect(),
            // an empty block between the fences is fine
            Ok(serde_yaml::Value::Null) => Vec::new(),
            // scalar body or broken YAML: not a metadata block after all
            Ok(_) | Err(_) => return None,
        };

        let node = Node::new(Frontmatter { properties });
        Some((node, close + 1))
    }
}

pub fn add_frontmatter_plugin(md: &mut MarkdownIt) {
    // must run ahead of the thematic-break rule, which would otherwise
    // claim the opening fence
    md.block.add_rule::<FrontmatterScanner>().before_all();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Node {
        let mut md = MarkdownIt::new();
        markdown_it::plugins::cmark::add(&mut md);
        add_frontmatter_plugin(&mut md);
        md.parse(input)
    }

    fn frontmatter_props(ast: &Node) -> Option<Vec<(String, serde_yaml::Value)>> {
        let mut found = None;
        for child in &ast.children {
            if let Some(fm) = child.cast::<Frontmatter>() {
                found = Some(fm.properties.clone());
            }
        }
        found
    }

    #[test]
    fn recognizes_leading_block() {
        let ast = parse("---\ntitle: Alpha\nstatus: draft\n---\nBody text\n");
        let props = frontmatter_props(&ast).expect("frontmatter node");
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].0, "title");
        assert_eq!(props[1].0, "status");
        // body still parses after the closing fence
        let html = ast.render();
        assert!(html.contains("Body text"));
        assert!(!html.contains("title: Alpha"));
    }

    #[test]
    fn declines_when_not_at_line_zero() {
        let ast = parse("intro\n\n---\nkey: value\n---\n");
        assert!(frontmatter_props(&ast).is_none());
    }

    #[test]
    fn declines_without_closing_fence() {
        let ast = parse("---\nkey: value\nno closing fence\n");
        assert!(frontmatter_props(&ast).is_none());
        // the opening fence falls through to the stock rules
        assert!(ast.render().contains("no closing fence"));
    }

    #[test]
    fn empty_block_has_no_properties() {
        let ast = parse("---\n---\ntext\n");
        let props = frontmatter_props(&ast).expect("frontmatter node");
        assert!(props.is_empty());
    }
}
