// src/document.rs

//! Documents on disk and the pages built from them.

use std::fs;
use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::decode::decode_all;
use crate::element::{Element, RenderContext};
use crate::error::LoadError;
use crate::platform::platform_trait::Platform;
use crate::registry::Registry;

/// Title used when a document has none, or an empty one.
pub const DEFAULT_TITLE: &str = "page";

/// A document as read from disk, before its nodes are decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDocument {
    pub body: Vec<Value>,
    #[serde(default)]
    pub title: Option<String>,
}

pub fn load_document(path: &Path) -> Result<RawDocument, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the document at `path` and decodes it into a fresh page.
pub fn load_page(path: &Path, registry: &Registry) -> Result<Page, LoadError> {
    load_page_with_default_title(path, registry, DEFAULT_TITLE)
}

/// Like `load_page`, with `default_title` for documents without a title.
pub fn load_page_with_default_title(
    path: &Path,
    registry: &Registry,
    default_title: &str,
) -> Result<Page, LoadError> {
    let raw = load_document(path)?;
    let page = Page::from_raw_with_default_title(raw, registry, default_title);
    info!(
        "Loaded '{}' from {} ({} elements)",
        page.title(),
        path.display(),
        page.body().len()
    );
    Ok(page)
}

/// An ordered run of elements plus a title.
///
/// The text of the last render is kept so it can be shown again without
/// rendering a second time.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    title: String,
    body: Vec<Element>,
    rendered: Option<String>,
}

impl Page {
    pub fn new(body: Vec<Element>, title: Option<&str>) -> Self {
        Self::with_default_title(body, title, DEFAULT_TITLE)
    }

    pub fn with_default_title(body: Vec<Element>, title: Option<&str>, default_title: &str) -> Self {
        Self {
            title: normalize_title(title, default_title).to_string(),
            body,
            rendered: None,
        }
    }

    pub fn from_raw(raw: RawDocument, registry: &Registry) -> Self {
        Self::from_raw_with_default_title(raw, registry, DEFAULT_TITLE)
    }

    pub fn from_raw_with_default_title(
        raw: RawDocument,
        registry: &Registry,
        default_title: &str,
    ) -> Self {
        let body = decode_all(registry, &raw.body);
        let dropped = body.iter().filter(|e| e.is_nothing()).count();
        if dropped > 0 {
            debug!("Page: {} node(s) decoded to nothing", dropped);
        }
        Self::with_default_title(body, raw.title.as_deref(), default_title)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &[Element] {
        &self.body
    }

    /// Text produced by the most recent `render`, if any.
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    /// Concatenates the output of every element in order and caches it.
    pub fn render(&mut self, ctx: &RenderContext) -> &str {
        let text: String = self.body.iter().map(|e| e.render(ctx)).collect();
        self.rendered.insert(text).as_str()
    }

    pub fn publish_title(&self, platform: &mut dyn Platform) -> anyhow::Result<()> {
        platform
            .set_title(&self.title)
            .with_context(|| format!("Failed to set terminal title to '{}'", self.title))
    }
}

/// Empty or missing titles fall back to `default_title`, and an empty
/// `default_title` to `DEFAULT_TITLE`.
pub fn normalize_title<'a>(title: Option<&'a str>, default_title: &'a str) -> &'a str {
    match title {
        Some(t) if !t.is_empty() => t,
        _ if !default_title.is_empty() => default_title,
        _ => DEFAULT_TITLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Label, Para};
    use crate::platform::actions::PlatformAction;
    use crate::platform::mock::MockPlatform;
    use serde_json::json;

    fn raw(body: Value, title: Option<&str>) -> RawDocument {
        RawDocument {
            body: body.as_array().cloned().unwrap_or_default(),
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn renders_in_order_skipping_unknown_nodes() {
        let registry = Registry::builtin().unwrap();
        let mut page = Page::from_raw(
            raw(json!([["label", "hi"], ["bogus"], ["nl"]]), None),
            &registry,
        );
        assert_eq!(page.body().len(), 3);
        assert_eq!(page.render(&RenderContext::new(80)), "hi\n");
        assert_eq!(page.title(), "page");
    }

    #[test]
    fn render_caches_text() {
        let mut page = Page::new(
            vec![Element::Para(Para::new("a")), Element::Label(Label::new("b"))],
            Some("doc"),
        );
        assert_eq!(page.rendered(), None);
        page.render(&RenderContext::new(10));
        assert_eq!(page.rendered(), Some("a\nb"));
    }

    #[test]
    fn empty_titles_normalize_to_default() {
        assert_eq!(normalize_title(None, DEFAULT_TITLE), "page");
        assert_eq!(normalize_title(Some(""), DEFAULT_TITLE), "page");
        assert_eq!(normalize_title(Some("Home"), DEFAULT_TITLE), "Home");
        assert_eq!(Page::new(Vec::new(), Some("")).title(), "page");
    }

    #[test]
    fn configured_default_title_is_used_for_untitled_pages() {
        assert_eq!(normalize_title(None, "untitled"), "untitled");
        assert_eq!(normalize_title(Some(""), "untitled"), "untitled");
        assert_eq!(normalize_title(Some("Home"), "untitled"), "Home");
        assert_eq!(normalize_title(None, ""), "page");

        let registry = Registry::builtin().unwrap();
        let page = Page::from_raw_with_default_title(raw(json!([]), None), &registry, "untitled");
        assert_eq!(page.title(), "untitled");
    }

    #[test]
    fn publish_title_reaches_platform() {
        let mut platform = MockPlatform::new();
        let page = Page::new(Vec::new(), Some("Home"));
        page.publish_title(&mut platform).unwrap();
        assert_eq!(
            platform.dispatched_actions(),
            &[PlatformAction::SetTitle("Home".to_string())]
        );
    }

    #[test]
    fn raw_document_requires_body() {
        assert!(serde_json::from_str::<RawDocument>(r#"{"title": "x"}"#).is_err());
        let doc: RawDocument = serde_json::from_str(r#"{"body": []}"#).unwrap();
        assert_eq!(doc.title, None);
        let doc: RawDocument = serde_json::from_str(r#"{"body": [], "title": null}"#).unwrap();
        assert_eq!(doc.title, None);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_document(Path::new("/definitely/not/here.tprl")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert_eq!(err.path(), Path::new("/definitely/not/here.tprl"));
    }
}
