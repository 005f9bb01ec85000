// src/error.rs

//! Error types shared by the element, registry and document layers.

use std::path::PathBuf;
use thiserror::Error;

/// Raised by an element constructor when the positional arguments of a node
/// don't fit the element kind. The decoder turns every one of these into
/// `Element::Nothing`, so they never reach the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElementError {
    #[error("'{tag}' takes {expected} argument(s), got {got}")]
    Arity {
        tag: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("'{tag}' argument {position} must be {expected}")]
    ArgumentType {
        tag: &'static str,
        position: usize,
        expected: &'static str,
    },
    #[error("'line' needs a non-empty fill string")]
    EmptyFill,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("element tag '{0}' is registered more than once")]
    DuplicateTag(String),
}

/// Failure to turn a file on disk into a document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read document {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document {} is malformed", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}
