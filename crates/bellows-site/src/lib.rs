//! Bellows site generation
//!
//! Everything downstream of the note graph: HTML page templates, the
//! export pipeline, the client-side search document index, the link-graph
//! JSON, embedded static assets, and the axum preview server.

pub mod assets;
pub mod error;
pub mod export;
pub mod graph;
pub mod search;
pub mod server;
pub mod template;

pub use error::{Result, SiteError};
pub use export::export_vault;
pub use server::{serve, ServerConfig};
