//! HTML page templates
//!
//! Small string templates around rendered note bodies: the page shell, the
//! index page, and note lists for tag pages. Kept deliberately plain — the
//! interesting HTML comes out of the renderer.

use bellows_core::{NoteId, Vault};

fn escape(text: &str) -> String {
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

/// Wrap a rendered body in the page shell.
pub fn page(title: &str, body: &str, root_url: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{root}/style.css">
</head>
<body>
<header class="site-header">
  <nav>
    <a href="{root}/">Home</a>
    <a href="{root}/graph.html">Graph</a>
  </nav>
  <input id="search" type="search" placeholder="Search notes...">
  <ul id="search-results"></ul>
</header>
<main>
{body}</main>
<script src="{root}/search.js" defer></script>
</body>
</html>
"#,
        title = escape(title),
        root = root_url,
        body = body,
    )
}

/// An unordered list of note links, used by tag pages and the index.
pub fn notes_list(vault: &Vault, ids: impl IntoIterator<Item = NoteId>) -> String {
    let mut out = String::from("<ul class=\"notes-list\">\n");
    for id in ids {
        let note = vault.note(id);
        out.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            vault.note_url(id),
            escape(note.name()),
        ));
    }
    out.push_str("</ul>\n");
    out
}

/// Landing page: every note, plus the tag index.
pub fn index_page(vault: &Vault) -> String {
    let mut body = String::from("<h1>Notes</h1>\n");
    body.push_str(&notes_list(vault, vault.ids()));

    if !vault.tags().is_empty() {
        body.push_str("<h2>Tags</h2>\n<ul class=\"tags-list\">\n");
        for (tag, members) in vault.tags() {
            body.push_str(&format!(
                "<li><a href=\"{}\">#{}</a> ({})</li>\n",
                vault.tag_url(tag),
                escape(tag),
                members.len(),
            ));
        }
        body.push_str("</ul>\n");
    }

    page("Notes", &body, vault.root_url())
}

/// Index page for one tag.
pub fn tag_page(vault: &Vault, tag: &str) -> String {
    let mut body = format!("<h1>#{}</h1>\n", escape(tag));
    if let Some(members) = vault.tags().get(tag) {
        body.push_str(&notes_list(vault, members.iter().copied()));
    }
    page(&format!("#{tag}"), &body, vault.root_url())
}

/// Note page; notes without an explicit level-1 heading get their display
/// name as the title line.
pub fn note_page(vault: &Vault, id: NoteId, html: &str) -> String {
    let note = vault.note(id);
    let mut body = String::new();
    if !note.has_title() {
        body.push_str(&format!("<h1>{}</h1>\n", escape(note.name())));
    }
    body.push_str(html);
    page(note.name(), &body, vault.root_url())
}

/// The graph visualization page; data comes from `graph.json`.
pub fn graph_page(vault: &Vault) -> String {
    let body = r#"<h1>Link graph</h1>
<div id="graph"></div>
<script src="https://unpkg.com/force-graph@1.43.4/dist/force-graph.min.js"></script>
<script type="module" src="graph.js"></script>
"#;
    page("Link graph", body, vault.root_url())
}
