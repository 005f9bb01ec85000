//! tprl library crate.
//!
//! Reads small JSON page documents, decodes their nodes into elements, and
//! shows the result in the terminal behind a single-key command loop.

pub mod config;
pub mod controller;
pub mod decode;
pub mod document;
pub mod element;
pub mod error;
pub mod keys;
pub mod platform;
pub mod registry;
