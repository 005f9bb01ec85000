// src/decode.rs

//! Turns one raw document node into an `Element`.
//!
//! A node is a JSON array `[tag, arg1?, arg2?]`. Decoding never fails: any
//! node that can't be understood becomes `Element::Nothing`, so a single bad
//! entry vanishes from the page instead of aborting the whole render.

use log::debug;
use serde_json::Value;

use crate::element::Element;
use crate::registry::Registry;

/// Most positional arguments any node may carry after its tag.
pub const MAX_NODE_ARGS: usize = 2;

pub fn decode(registry: &Registry, node: &Value) -> Element {
    let Some((tag, args)) = split_node(node) else {
        debug!("decode: node {} is not a tagged array, dropping it", node);
        return Element::Nothing;
    };

    let Some(constructor) = registry.resolve(tag) else {
        debug!("decode: unknown element tag '{}'", tag);
        return Element::Nothing;
    };

    if args.len() > MAX_NODE_ARGS {
        debug!(
            "decode: '{}' node carries {} arguments, at most {} allowed",
            tag,
            args.len(),
            MAX_NODE_ARGS
        );
        return Element::Nothing;
    }

    match constructor(args) {
        Ok(element) => element,
        Err(e) => {
            debug!("decode: dropping '{}' node: {}", tag, e);
            Element::Nothing
        }
    }
}

/// Decodes every node of a body in order. Failed nodes keep their position as
/// `Element::Nothing`.
pub fn decode_all(registry: &Registry, nodes: &[Value]) -> Vec<Element> {
    nodes.iter().map(|node| decode(registry, node)).collect()
}

fn split_node(node: &Value) -> Option<(&str, &[Value])> {
    let (tag, args) = node.as_array()?.split_first()?;
    Some((tag.as_str()?, args))
}
