// src/registry.rs

//! Maps element tags, as they appear in a document, to constructors.

use std::collections::HashMap;

use log::debug;
use serde_json::Value;

use crate::element::{Element, Label, Line, Para};
use crate::error::{ElementError, RegistryError};

/// Builds an element from the positional arguments that follow its tag.
pub type Constructor = fn(&[Value]) -> Result<Element, ElementError>;

/// The set of known element kinds, keyed by tag.
///
/// Tags are matched exactly and case-sensitively. Registering the same tag
/// twice is an error rather than silent shadowing.
#[derive(Clone, Default)]
pub struct Registry {
    constructors: HashMap<String, Constructor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in element kind.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register("label", |args| Label::from_args(args).map(Element::Label))?;
        registry.register("para", |args| Para::from_args(args).map(Element::Para))?;
        registry.register("line", |args| Line::from_args(args).map(Element::Line))?;
        registry.register("nl", Element::new_line_from_args)?;
        Ok(registry)
    }

    pub fn register(
        &mut self,
        tag: impl Into<String>,
        constructor: Constructor,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        if self.constructors.contains_key(&tag) {
            return Err(RegistryError::DuplicateTag(tag));
        }
        debug!("Registry: registered element tag '{}'", tag);
        self.constructors.insert(tag, constructor);
        Ok(())
    }

    pub fn resolve(&self, tag: &str) -> Option<Constructor> {
        self.constructors.get(tag).copied()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("tags", &self.tags()).finish()
    }
}
