//! End-to-end tests for the render pipeline: vault on disk, parse,
//! resolve, render, and the graph side effects.

use std::fs;

use bellows_core::Vault;
use bellows_parser::{RenderError, VaultRenderer};
use tempfile::TempDir;

fn vault_with(files: &[(&str, &str)]) -> (TempDir, Vault) {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let abs = dir.path().join(path);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(abs, content).unwrap();
    }
    let vault = Vault::open(dir.path()).unwrap();
    (dir, vault)
}

#[test]
fn frontmatter_properties_land_on_the_note() {
    let (_dir, mut vault) = vault_with(&[(
        "Alpha.md",
        "---\ntitle: Alpha\nstatus: draft\n---\nFirst paragraph\n",
    )]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    let note = vault.note(alpha);
    assert_eq!(note.properties().len(), 2);
    assert!(note.properties().contains_key("title"));
    assert!(note.properties().contains_key("status"));
    // visible output starts after the closing fence
    assert!(html.contains("First paragraph"));
    assert!(!html.contains("status: draft"));
}

#[test]
fn frontmatter_tags_fan_out_into_the_index() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "---\ntags: [research, rust]\n---\nbody\n"),
        ("Beta.md", "---\ntags: solo\n---\nbody\n"),
    ]);
    let renderer = VaultRenderer::new();
    for id in vault.ids().collect::<Vec<_>>() {
        renderer.render_note(&mut vault, id);
    }

    let alpha = vault.find_by_name("Alpha").unwrap();
    let beta = vault.find_by_name("Beta").unwrap();
    assert_eq!(vault.note(alpha).tags(), ["research", "rust"]);
    assert_eq!(vault.note(beta).tags(), ["solo"]);
    assert!(vault.tags()["research"].contains(&alpha));
    assert!(vault.tags()["solo"].contains(&beta));
}

#[test]
fn double_link_resolves_and_registers_backlink() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "alpha body\n"),
        ("Beta.md", "see [[Alpha]]\n"),
    ]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();
    let beta = vault.find_by_name("Beta").unwrap();

    let html = renderer.render_note(&mut vault, beta);

    assert!(html.contains("href=\"/Alpha.html\""));
    assert!(html.contains(">Alpha</a>"));
    assert!(vault.note(alpha).backlinks().contains(&beta));
    assert!(vault.note(beta).forward_links().contains(&alpha));
}

#[test]
fn double_link_alias_changes_visible_text_only() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "alpha body\n"),
        ("Beta.md", "see [[Alpha|See this]]\n"),
    ]);
    let renderer = VaultRenderer::new();
    let beta = vault.find_by_name("Beta").unwrap();

    let html = renderer.render_note(&mut vault, beta);

    assert!(html.contains("href=\"/Alpha.html\""));
    assert!(html.contains(">See this</a>"));
}

#[test]
fn double_link_anchor_is_slugified_into_the_href() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "# Deep Section\n"),
        ("Beta.md", "see [[Alpha#Deep Section]]\n"),
    ]);
    let renderer = VaultRenderer::new();
    let beta = vault.find_by_name("Beta").unwrap();

    let html = renderer.render_note(&mut vault, beta);

    assert!(html.contains("href=\"/Alpha.html#deep-section\""));
    assert!(html.contains(">Alpha &gt; Deep Section</a>"));
}

#[test]
fn missing_target_gets_best_effort_href_and_no_backlink() {
    let (_dir, mut vault) = vault_with(&[("Beta.md", "see [[Missing]]\n")]);
    let renderer = VaultRenderer::new();
    let beta = vault.find_by_name("Beta").unwrap();

    let html = renderer.render_note(&mut vault, beta);

    assert!(html.contains("href=\"Missing.html\""));
    assert!(vault.note(beta).forward_links().is_empty());
}

#[test]
fn embed_splices_note_content_without_a_container() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "before\n\n![[Beta]]\n\nafter\n"),
        ("Beta.md", "embedded beta body\n"),
    ]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    assert!(html.contains("embedded beta body"));
    assert!(!html.contains("<img"));
}

#[test]
fn embed_of_unknown_name_resolves_as_asset() {
    let (_dir, mut vault) = vault_with(&[("Alpha.md", "![[photo.png]]\n")]);
    fs::create_dir_all(vault.root().join("Images")).unwrap();
    fs::write(vault.root().join("Images/photo.png"), b"png").unwrap();
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    assert!(html.contains("<img"));
    assert!(html.contains("src=\"/Images/photo.png\""));
    assert!(html.contains("alt=\"photo.png\""));
}

#[test]
fn asset_embed_alias_sets_the_width() {
    let (_dir, mut vault) = vault_with(&[("Alpha.md", "![[photo.png|300]]\n")]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    assert!(html.contains("width=\"300\""));
}

#[test]
fn tags_register_once_per_note() {
    let (_dir, mut vault) = vault_with(&[(
        "Alpha.md",
        "working on #project, still #project later\n",
    )]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    assert_eq!(vault.note(alpha).tags(), ["project"]);
    assert_eq!(vault.tags()["project"].len(), 1);
    assert!(html.contains("href=\"/tags/project/\""));
    assert!(html.contains(">#project</a>"));
}

#[test]
fn all_digit_tag_stays_plain_text() {
    let (_dir, mut vault) = vault_with(&[("Alpha.md", "released in #2024\n")]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    assert!(html.contains("#2024"));
    assert!(vault.note(alpha).tags().is_empty());
    assert!(vault.tags().is_empty());
}

#[test]
fn second_render_is_a_byte_identical_cache_hit() {
    let (_dir, mut vault) = vault_with(&[("Alpha.md", "original content\n")]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let first = renderer.render_note(&mut vault, alpha);
    // rewrite the source; a cache hit must not see it
    fs::write(vault.abs_path(alpha), "changed content\n").unwrap();
    let second = renderer.render_note(&mut vault, alpha);

    assert_eq!(first, second);
    assert!(second.contains("original content"));
}

#[test]
fn mutual_embeds_fail_with_a_cycle_error() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "![[Beta]]\n"),
        ("Beta.md", "![[Alpha]]\n"),
    ]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let err = renderer.try_render(&mut vault, alpha).unwrap_err();
    assert!(matches!(err, RenderError::EmbedCycle(_)));

    // the public entry point degrades to a placeholder instead
    let html = renderer.render_note(&mut vault, alpha);
    assert!(html.contains("render-error"));
    assert!(html.contains("Failed to render"));
}

#[test]
fn self_embed_is_a_cycle_too() {
    let (_dir, mut vault) = vault_with(&[("Alpha.md", "![[Alpha]]\n")]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let err = renderer.try_render(&mut vault, alpha).unwrap_err();
    assert!(matches!(err, RenderError::EmbedCycle(_)));
}

#[test]
fn deep_embed_chains_hit_the_depth_limit() {
    let (_dir, mut vault) = vault_with(&[
        ("A.md", "![[B]]\n"),
        ("B.md", "![[C]]\n"),
        ("C.md", "bottom\n"),
    ]);
    let renderer = VaultRenderer::new().with_max_embed_depth(2);
    let a = vault.find_by_name("A").unwrap();

    let err = renderer.try_render(&mut vault, a).unwrap_err();
    assert!(matches!(err, RenderError::EmbedDepth { .. }));
}

#[test]
fn level_one_heading_sets_the_title_flag() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "# Alpha Title\n\nbody\n"),
        ("Beta.md", "## only a subheading\n"),
    ]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();
    let beta = vault.find_by_name("Beta").unwrap();

    let html = renderer.render_note(&mut vault, alpha);
    renderer.render_note(&mut vault, beta);

    assert!(vault.note(alpha).has_title());
    assert!(!vault.note(beta).has_title());
    assert!(html.contains("id=\"alpha-title\""));
}

#[test]
fn external_links_open_in_a_new_tab() {
    let (_dir, mut vault) = vault_with(&[(
        "Alpha.md",
        "see [the docs](https://example.com/docs)\n",
    )]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    assert!(html.contains("target=\"_blank\""));
    assert!(html.contains("rel=\"noopener\""));
    assert!(html.contains("href=\"https://example.com/docs\""));
}

#[test]
fn markdown_images_resolve_through_the_attachment_dir() {
    let (_dir, mut vault) = vault_with(&[("Alpha.md", "![figure](chart.png)\n")]);
    fs::create_dir_all(vault.root().join("Images")).unwrap();
    fs::write(vault.root().join("Images/chart.png"), b"png").unwrap();
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let html = renderer.render_note(&mut vault, alpha);

    assert!(html.contains("src=\"/Images/chart.png\""));
    assert!(html.contains("alt=\"figure\""));
}

#[test]
fn plain_text_extraction_feeds_search() {
    let (_dir, mut vault) = vault_with(&[(
        "Alpha.md",
        "# Title\n\nSome **bold** words here\n",
    )]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();

    let text = renderer.plain_text(&mut vault, alpha).unwrap();

    assert!(text.contains("Title"));
    assert!(text.contains("bold"));
    assert!(text.contains("words"));
    assert!(!text.contains("**"));
}

#[test]
fn embedded_note_keeps_its_own_graph_identity() {
    let (_dir, mut vault) = vault_with(&[
        ("Alpha.md", "![[Beta]]\n"),
        ("Beta.md", "#shared tag here\n"),
        ("Gamma.md", "gamma\n"),
    ]);
    let renderer = VaultRenderer::new();
    let alpha = vault.find_by_name("Alpha").unwrap();
    let beta = vault.find_by_name("Beta").unwrap();

    renderer.render_note(&mut vault, alpha);

    // the tag inside Beta belongs to Beta even when first seen through
    // Alpha's embed
    assert!(vault.note(beta).tags().contains(&"shared".to_string()));
    assert!(!vault.note(alpha).tags().contains(&"shared".to_string()));
}
