use tracing::trace;

use super::absolute::segments;
use crate::filesystem::{EntryId, Tree};

/// Name reported for the root, which has none of its own.
pub const ROOT_NAME: &str = "~";

/// Result of walking an absolute path through the tree. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNode {
    pub name: String,
    pub id: EntryId,
    pub path: String,
    pub parent: Option<EntryId>,
    pub is_root: bool,
}

impl ResolvedNode {
    fn root(tree: &Tree) -> Self {
        Self {
            name: ROOT_NAME.to_string(),
            id: tree.root(),
            path: "/".to_string(),
            parent: None,
            is_root: true,
        }
    }
}

/// Walks `absolute` from the root.
///
/// Returns `None` if any segment is missing or an intermediate segment is a
/// file.
pub fn resolve(tree: &Tree, absolute: &str) -> Option<ResolvedNode> {
    let segments = segments(absolute);
    let Some(name) = segments.last() else {
        return Some(ResolvedNode::root(tree));
    };

    let mut parent = tree.root();
    let mut current = tree.root();
    for segment in &segments {
        let Some(next) = tree.child(current, segment) else {
            trace!("Segment '{}' of {} not found", segment, absolute);
            return None;
        };
        parent = current;
        current = next;
    }

    Some(ResolvedNode {
        name: name.to_string(),
        id: current,
        path: format!("/{}", segments.join("/")),
        parent: Some(parent),
        is_root: false,
    })
}

pub fn is_directory(tree: &Tree, node: &ResolvedNode) -> bool {
    tree.get(node.id).is_some_and(|n| n.is_directory())
}

pub fn is_file(tree: &Tree, node: &ResolvedNode) -> bool {
    tree.get(node.id).is_some_and(|n| n.is_file())
}

/// True only for a directory without children.
pub fn is_empty(tree: &Tree, node: &ResolvedNode) -> bool {
    tree.children(node.id).is_some_and(|children| children.is_empty())
}
