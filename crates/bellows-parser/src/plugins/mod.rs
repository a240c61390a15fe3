//! markdown-it plugins for the vault syntax
//!
//! Each plugin registers a block or inline rule against the base engine.
//! The rules are side-effect free: they emit typed AST nodes that the
//! resolve pass later matches on.

pub mod callout;
pub mod doublelink;
pub mod frontmatter;
pub mod tag;

pub use callout::add_callout_plugin;
pub use doublelink::add_double_link_plugin;
pub use frontmatter::add_frontmatter_plugin;
pub use tag::add_tag_plugin;
