// tests/page_loading.rs

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use tprl::document::{load_page, DEFAULT_TITLE};
use tprl::element::{Element, RenderContext};
use tprl::error::LoadError;
use tprl::registry::Registry;

fn write_doc(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("doc.tprl");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_unknown_nodes_render_empty_and_title_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, r#"{"body": [["label", "hi"], ["bogus"], ["nl"]]}"#);
    let registry = Registry::builtin().unwrap();

    let mut page = load_page(&path, &registry).unwrap();

    assert_eq!(page.body().len(), 3);
    assert_eq!(page.body()[1], Element::Nothing);
    assert_eq!(page.render(&RenderContext::new(80)), "hi\n");
    assert_eq!(page.title(), DEFAULT_TITLE);
}

#[test]
fn test_empty_title_falls_back_to_default() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, r#"{"title": "", "body": []}"#);
    let page = load_page(&path, &Registry::builtin().unwrap()).unwrap();
    assert_eq!(page.title(), "page");
}

#[test]
fn test_line_spans_the_render_width() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, r#"{"body": [["line", "xyz"], ["line", ""]]}"#);
    let mut page = load_page(&path, &Registry::builtin().unwrap()).unwrap();

    for columns in [1u16, 33, 120] {
        let text = page.render(&RenderContext::new(columns)).to_string();
        assert_eq!(text.len(), columns as usize);
        assert!(text.chars().all(|c| c == 'z'));
    }
}

#[test]
fn test_every_node_is_decoded_in_order() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(
        &dir,
        r#"{"title": "All", "body": [
            ["para", "p", {"style": "bold"}],
            ["label", "l"],
            ["label"],
            ["nl", "extra"],
            ["line", 5],
            "not a node",
            ["nl"]
        ]}"#,
    );
    let mut page = load_page(&path, &Registry::builtin().unwrap()).unwrap();

    let nothing = page.body().iter().filter(|e| e.is_nothing()).count();
    assert_eq!(nothing, 4);
    assert_eq!(page.render(&RenderContext::new(10)), "p\nl\n");
    assert_eq!(page.title(), "All");
}

#[test]
fn test_reload_is_idempotent_for_unchanged_file() {
    let dir = TempDir::new().unwrap();
    let path = write_doc(&dir, r#"{"body": [["para", "a"], ["line", "-"], ["label", "b"]]}"#);
    let registry = Registry::builtin().unwrap();
    let ctx = RenderContext::new(24);

    let first = load_page(&path, &registry).unwrap().render(&ctx).to_string();
    let second = load_page(&path, &registry).unwrap().render(&ctx).to_string();
    assert_eq!(first, second);
}

#[test]
fn test_load_failures_are_reported() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::builtin().unwrap();

    let missing = load_page(&dir.path().join("missing.tprl"), &registry).unwrap_err();
    assert!(matches!(missing, LoadError::Io { .. }));

    let not_json = write_doc(&dir, "{");
    assert!(matches!(
        load_page(&not_json, &registry).unwrap_err(),
        LoadError::Parse { .. }
    ));

    let no_body = write_doc(&dir, r#"{"title": "x"}"#);
    assert!(matches!(
        load_page(&no_body, &registry).unwrap_err(),
        LoadError::Parse { .. }
    ));

    let bad_title = write_doc(&dir, r#"{"title": 3, "body": []}"#);
    assert!(matches!(
        load_page(&bad_title, &registry).unwrap_err(),
        LoadError::Parse { .. }
    ));
}

#[test]
fn test_bundled_main_page_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("main_page.tprl");
    let mut page = load_page(&path, &Registry::builtin().unwrap()).unwrap();
    assert_eq!(page.title(), "TPRL");
    assert!(page.body().iter().all(|e| !e.is_nothing()));
    assert!(page.render(&RenderContext::new(20)).starts_with("Welcome to TPRL.\n"));
}
