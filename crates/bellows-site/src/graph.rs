//! Link-graph JSON
//!
//! Nodes are notes and tags, edges are backlinks and tag memberships, in
//! the shape the bundled force-graph script consumes. Node `connectivity`
//! scales the drawn size.

use bellows_core::Vault;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub url: String,
    /// `"note"` or `"tag"`, used for coloring.
    pub group: &'static str,
    pub connectivity: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Build the graph from an already-rendered vault. Call after rendering
/// every note, or the backlink edges will be incomplete.
pub fn build_graph(vault: &Vault) -> Graph {
    let mut nodes = Vec::new();
    let mut links = Vec::new();

    for (id, note) in vault.iter() {
        nodes.push(GraphNode {
            id: vault.note_url(id),
            name: note.name().to_string(),
            url: vault.note_url(id),
            group: "note",
            connectivity: note.backlinks().len() + note.tags().len(),
        });
        for from in note.backlinks() {
            links.push(GraphLink {
                source: vault.note_url(*from),
                target: vault.note_url(id),
            });
        }
    }

    for (tag, members) in vault.tags() {
        let tag_id = format!("tag:{tag}");
        nodes.push(GraphNode {
            id: tag_id.clone(),
            name: format!("#{tag}"),
            url: vault.tag_url(tag),
            group: "tag",
            connectivity: members.len(),
        });
        for member in members {
            links.push(GraphLink {
                source: tag_id.clone(),
                target: vault.note_url(*member),
            });
        }
    }

    Graph { nodes, links }
}
