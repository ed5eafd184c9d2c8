//! Route tree assembly.
//!
//! Top-level routes stay in a flat list; `#`-marked routes are spliced into
//! their parent's `children`. Nested routes are processed in reverse
//! discovery order and parents are located by full URL path across the
//! top-level forest and the not-yet-attached nested routes, so a
//! multi-level chain resolves no matter the discovery order. Paths are only
//! shortened to their trailing segment once every route has found its place.

use tracing::warn;

use crate::nodes::RouteNode;

/// Partition nodes into the top-level forest and splice nested nodes in.
///
/// A nested node whose parent cannot be located is dropped from the tree
/// with a warning; its component is still generated.
pub fn assemble_tree(nodes: Vec<RouteNode>) -> Vec<RouteNode> {
    let mut top_level = Vec::new();
    let mut nested = Vec::new();

    for node in nodes {
        if node.is_nested() {
            nested.push(node);
        } else {
            top_level.push(node);
        }
    }

    while let Some(node) = nested.pop() {
        let parent_path = match node.url_path.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };

        let parent = match find_by_path(&mut top_level, &parent_path) {
            Some(found) => Some(found),
            None => find_by_path(&mut nested, &parent_path),
        };

        match parent {
            Some(parent) => parent.children.push(node),
            None => {
                warn!(
                    path = node.url_path.as_str(),
                    "no route at '{}' to nest under; dropped", parent_path
                );
            },
        }
    }

    for node in &mut top_level {
        shorten_children(node);
    }

    top_level
}

fn find_by_path<'a>(nodes: &'a mut [RouteNode], path: &str) -> Option<&'a mut RouteNode> {
    for node in nodes {
        if node.url_path == path {
            return Some(node);
        }
        if let Some(found) = find_by_path(&mut node.children, path) {
            return Some(found);
        }
    }
    None
}

/// Reduce child paths to their segment relative to the parent.
///
/// Children are processed before their own path is shortened, so each level
/// strips against the full path below it.
fn shorten_children(node: &mut RouteNode) {
    let prefix = format!("{}/", node.url_path);
    for child in &mut node.children {
        shorten_children(child);
        if let Some(rest) = child.url_path.strip_prefix(&prefix) {
            child.url_path = rest.to_string();
        }
    }
}
