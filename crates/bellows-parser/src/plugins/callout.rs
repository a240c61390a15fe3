//! Callout plugin (typed blockquote boxes)
//!
//! Recognizes the `> [!kind]` variant of a blockquote:
//!
//! ```text
//! > [!warning]
//! > anything the vault author wants to highlight
//! ```
//!
//! The rule is a sibling of the stock blockquote scanner and uses the same
//! technique: walk the body line by line, rewrite each line's offsets so
//! the interior tokenizes as if the `>` markers were not there, then
//! restore every touched offset before returning so later rules see the
//! buffer untouched. Lines without the `[!kind]` marker fall through to
//! the stock blockquote rule.

use bellows_core::title_case;
use markdown_it::parser::block::{BlockRule, BlockState};
use markdown_it::plugins::cmark::block::blockquote::BlockquoteScanner;
use markdown_it::{MarkdownIt, Node, NodeValue, Renderer};

/// Kinds with dedicated styling; anything else renders with the
/// `callout-unknown` class.
const KNOWN_KINDS: [&str; 3] = ["note", "help", "warning"];

/// Container node for a callout box.
#[derive(Debug)]
pub struct CalloutBox {
    pub kind: String,
}

impl CalloutBox {
    /// CSS class for this callout's kind.
    pub fn css_class(&self) -> String {
        if KNOWN_KINDS.contains(&self.kind.as_str()) {
            format!("callout callout-{}", self.kind)
        } else {
            "callout callout-unknown".to_string()
        }
    }
}

impl NodeValue for CalloutBox {
    fn render(&self, node: &Node, fmt: &mut dyn Renderer) {
        fmt.cr();
        fmt.open("div", &[("class", self.css_class())]);
        fmt.cr();
        fmt.contents(&node.children);
        fmt.cr();
        fmt.close("div");
        fmt.cr();
    }
}

/// Title line of a callout; content is the raw kind label, displayed
/// title-cased.
#[derive(Debug)]
pub struct CalloutTitle {
    pub kind: String,
}

impl NodeValue for CalloutTitle {
    fn render(&self, _node: &Node, fmt: &mut dyn Renderer) {
        fmt.cr();
        fmt.open("div", &[("class", "callout-title".to_string())]);
        fmt.text(&title_case(&self.kind));
        fmt.close("div");
        fmt.cr();
    }
}

pub struct CalloutScanner;

impl CalloutScanner {
    /// Extract the kind label from an opening line. `line` starts at the
    /// first non-space character. Returns `None` when this is a plain
    /// blockquote (no `[!` pair, or no closing bracket on the line).
    fn parse_kind(line: &str) -> Option<String> {
        let rest = line.strip_prefix('>')?;
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest.strip_prefix("[!")?;
        let end = rest.find(']')?;
        Some(rest[..end].trim().to_string())
    }
}

impl BlockRule for CalloutScanner {
    fn check(state: &mut BlockState) -> Option<()> {
        // four spaces of indent is a code block, not a callout
        if state.line_indent(state.line) >= 4 {
            return None;
        }
        Self::parse_kind(state.get_line(state.line)).map(|_| ())
    }

    fn run(state: &mut BlockState) -> Option<(Node, usize)> {
        let start_line = state.line;

        if state.line_indent(start_line) >= 4 {
            return None;
        }
        let kind = Self::parse_kind(state.get_line(start_line))?;

        // Body scan. For every line inside the callout, strip the marker
        // plus one optional space or tab by rewriting that line's offsets;
        // the pre-mutation entries are kept for restoration below.
        let mut saved = Vec::new();
        let old_line_max = state.line_max;
        let old_blk_indent = state.blk_indent;

        let mut next_line = start_line + 1;
        let mut last_line_empty = false;
        while next_line < state.line_max {
            let offsets = state.line_offsets[next_line].clone();
            let outdented = offsets.indent_nonspace < state.blk_indent as i32;
            let mut pos = offsets.first_nonspace;
            let max = offsets.line_end;

            if pos >= max {
                // empty line outside the body ends the callout
                break;
            }

            if state.src.as_bytes()[pos] == b'>' && !outdented {
                // inside the callout
                pos += 1;
                let mut initial = offsets.indent_nonspace + 1;
                let mut adjust_tab = false;
                match state.src.as_bytes().get(pos) {
                    Some(b' ') => {
                        pos += 1;
                        initial += 1;
                    }
                    Some(b'\t') => {
                        // tab width on 4-column stops against the line's
                        // virtual indent; when the tab closes a stop it is
                        // consumed outright, otherwise it stays part of the
                        // content with one column already spent
                        if initial % 4 == 3 {
                            pos += 1;
                            initial += 1;
                        } else {
                            adjust_tab = true;
                        }
                    }
                    _ => {}
                }

                let line_start = pos;
                let mut offset = initial;
                while pos < max {
                    match state.src.as_bytes()[pos] {
                        b'\t' => {
                            offset += 4 - ((offset + i32::from(adjust_tab)) % 4);
                        }
                        b' ' => offset += 1,
                        _ => break,
                    }
                    pos += 1;
                }
                last_line_empty = pos >= max;

                saved.push((next_line, offsets));
                let entry = &mut state.line_offsets[next_line];
                entry.line_start = line_start;
                entry.first_nonspace = pos;
                entry.indent_nonspace = offset - initial;

                next_line += 1;
                continue;
            }

            // a non-marker line right after an empty body line ends it
            if last_line_empty {
                break;
            }

            // peek the other block rules; a match terminates the callout
            state.line = next_line;
            let terminate = state.test_rules_at_line();
            state.line = start_line;
            if terminate {
                // pin paragraph lookahead so continuation cannot read past
                // the callout's end
                state.line_max = next_line;
                if state.blk_indent != 0 {
                    saved.push((next_line, state.line_offsets[next_line].clone()));
                    state.line_offsets[next_line].indent_nonspace -= state.blk_indent as i32;
                }
                break;
            }

            // lazy paragraph continuation
            saved.push((next_line, state.line_offsets[next_line].clone()));
            state.line_offsets[next_line].indent_nonspace = -1;
            next_line += 1;
        }

        // tokenize the interior with the markers stripped and indentation
        // zeroed; nested callouts re-enter this same rule
        state.blk_indent = 0;
        state.line_max = next_line;
        state.line = start_line + 1;

        let old_node = std::mem::replace(&mut state.node, Node::new(CalloutBox { kind: kind.clone() }));
        state.node.children.push(Node::new(CalloutTitle { kind }));

        let md = state.md;
        md.block.tokenize(state);

        // Restore every touched offset and the parser bounds on the single
        // exit path, so sibling rules can re-examine these lines later in
        // the document without observing our rewrite.
        state.line = start_line;
        state.line_max = old_line_max;
        state.blk_indent = old_blk_indent;
        for (idx, offsets) in saved {
            state.line_offsets[idx] = offsets;
        }

        let node = std::mem::replace(&mut state.node, old_node);
        Some((node, next_line - start_line))
    }
}

pub fn add_callout_plugin(md: &mut MarkdownIt) {
    // ahead of the stock blockquote rule, which would otherwise consume
    // the `>` lines first
    md.block.add_rule::<CalloutScanner>().before::<BlockquoteScanner>();
}
