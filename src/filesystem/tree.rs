use std::collections::HashMap;
use std::time::SystemTime;

use hashlink::LinkedHashMap;
use snafu::{OptionExt, Snafu, ensure};
use tracing::debug;

use super::entry::{Entry, EntryId, FIRST_ENTRY_ID, IdAllocator, Node};
use super::template::Template;

/// Arena-backed directory tree.
///
/// Every entry lives in a flat table keyed by its id. Directories store the
/// ids of their children, children store the id of their parent, so moving a
/// subtree is a matter of re-linking two keys.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: HashMap<EntryId, Node>,
    root: EntryId,
    ids: IdAllocator,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: HashMap::new(),
            root: EntryId::from(FIRST_ENTRY_ID),
            ids: IdAllocator::default(),
        };
        tree.root = tree.create_directory();
        tree
    }

    pub fn root(&self) -> EntryId {
        self.root
    }

    /// Creates a detached, empty directory with a fresh id.
    pub fn create_directory(&mut self) -> EntryId {
        self.insert_detached(Entry::empty_directory())
    }

    /// Creates a detached, empty file with a fresh id.
    pub fn create_file(&mut self) -> EntryId {
        self.insert_detached(Entry::empty_file())
    }

    fn insert_detached(&mut self, entry: Entry) -> EntryId {
        let id = self.ids.allocate();
        self.nodes.insert(id, Node::detached(id, entry));
        id
    }

    pub fn get(&self, id: EntryId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn node(&self, id: EntryId) -> Result<&Node, TreeError> {
        self.nodes.get(&id).context(MissingEntrySnafu { id })
    }

    fn node_mut(&mut self, id: EntryId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(&id).context(MissingEntrySnafu { id })
    }

    /// Number of entries held by the arena, detached ones included.
    pub fn entry_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children(&self, dir: EntryId) -> Option<&LinkedHashMap<String, EntryId>> {
        self.get(dir).and_then(|node| node.entry.children())
    }

    pub fn child(&self, dir: EntryId, name: &str) -> Option<EntryId> {
        self.children(dir).and_then(|children| children.get(name).copied())
    }

    /// Links `child` into `parent` under `name`.
    ///
    /// A child that is still linked elsewhere is detached first. Returns the
    /// entry previously stored under `name`, now detached but still in the
    /// arena.
    pub fn attach(
        &mut self,
        parent: EntryId,
        name: &str,
        child: EntryId,
    ) -> Result<Option<EntryId>, TreeError> {
        ensure!(child != self.root, DetachRootSnafu);
        ensure!(self.node(parent)?.is_directory(), NotADirectorySnafu { id: parent });
        if self.node(child)?.parent.is_some() {
            self.detach(child)?;
        }

        let parent_node = self.node_mut(parent)?;
        let Entry::Directory { children } = &mut parent_node.entry else {
            return NotADirectorySnafu { id: parent }.fail();
        };
        let displaced = children
            .insert(name.to_string(), child)
            .filter(|previous| *previous != child);
        parent_node.metadata.modified = SystemTime::now();

        if let Some(previous) = displaced {
            let node = self.node_mut(previous)?;
            node.parent = None;
            node.name.clear();
        }

        let node = self.node_mut(child)?;
        node.parent = Some(parent);
        node.name = name.to_string();

        Ok(displaced)
    }

    /// Unlinks an entry from its parent. The subtree stays in the arena.
    pub fn detach(&mut self, id: EntryId) -> Result<(), TreeError> {
        ensure!(id != self.root, DetachRootSnafu);
        let node = self.node_mut(id)?;
        let Some(parent) = node.parent.take() else {
            return Ok(());
        };
        let name = std::mem::take(&mut node.name);

        let parent_node = self.node_mut(parent)?;
        if let Entry::Directory { children } = &mut parent_node.entry {
            children.remove(&name);
        }
        parent_node.metadata.modified = SystemTime::now();
        Ok(())
    }

    /// Unlinks an entry and drops it together with everything below it.
    /// Returns the number of entries dropped.
    pub fn purge(&mut self, id: EntryId) -> Result<usize, TreeError> {
        self.detach(id)?;

        let mut pending = vec![id];
        let mut dropped = 0;
        while let Some(current) = pending.pop() {
            let node = self.nodes.remove(&current).context(MissingEntrySnafu { id: current })?;
            if let Entry::Directory { children } = node.entry {
                pending.extend(children.into_iter().map(|(_, child)| child));
            }
            dropped += 1;
        }

        debug!("Purged {} entries below {}", dropped, id);
        Ok(dropped)
    }

    /// Structural copy of a subtree. Every copied entry gets a fresh id; file
    /// payloads are duplicated, metadata is new. The result is detached.
    pub fn deep_copy(&mut self, id: EntryId) -> Result<EntryId, TreeError> {
        // Snapshot first so copying a directory into its own subtree terminates.
        let entry = self.node(id)?.entry.clone();
        match entry {
            Entry::File { content } => {
                let copy = self.create_file();
                if let Some(content) = content {
                    self.set_content(copy, content)?;
                }
                Ok(copy)
            }
            Entry::Directory { children } => {
                let copy = self.create_directory();
                for (name, child) in children {
                    let child_copy = self.deep_copy(child)?;
                    self.attach(copy, &name, child_copy)?;
                }
                Ok(copy)
            }
        }
    }

    pub fn touch(&mut self, id: EntryId) -> Result<(), TreeError> {
        self.node_mut(id)?.metadata.modified = SystemTime::now();
        Ok(())
    }

    pub fn set_content(&mut self, id: EntryId, bytes: Vec<u8>) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        let Entry::File { content } = &mut node.entry else {
            return NotAFileSnafu { id }.fail();
        };
        node.metadata.size = Some(bytes.len() as u64);
        *content = Some(bytes);
        node.metadata.modified = SystemTime::now();
        Ok(())
    }

    /// True if `id` is `ancestor` itself or lies somewhere below it.
    pub fn contains(&self, ancestor: EntryId, id: EntryId) -> bool {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.get(candidate).and_then(|node| node.parent);
        }
        false
    }

    /// Canonical path of an entry, or `None` if it is not reachable from the root.
    pub fn path_of(&self, id: EntryId) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = id;
        while current != self.root {
            let node = self.get(current)?;
            segments.push(node.name.as_str());
            current = node.parent?;
        }
        segments.reverse();
        Some(format!("/{}", segments.join("/")))
    }

    /// Creates `template` under `parent` as `name`. Directories that already
    /// exist are merged into rather than replaced.
    pub fn materialize(
        &mut self,
        parent: EntryId,
        name: &str,
        template: &Template,
    ) -> Result<EntryId, TreeError> {
        let existing = self
            .child(parent, name)
            .filter(|existing| template.is_directory() && self.node(*existing).is_ok_and(Node::is_directory));

        let id = match existing {
            Some(id) => id,
            None => {
                let id = match template {
                    Template::File => self.create_file(),
                    Template::Directory { .. } => self.create_directory(),
                };
                if let Some(displaced) = self.attach(parent, name, id)? {
                    self.purge(displaced)?;
                }
                id
            }
        };

        if let Template::Directory { children } = template {
            for (child_name, child) in children {
                self.materialize(id, child_name, child)?;
            }
        }
        Ok(id)
    }
}

#[derive(Debug, Snafu)]
pub enum TreeError {
    #[snafu(display("Entry {id} does not exist in the tree"))]
    MissingEntry { id: EntryId },
    #[snafu(display("Entry {id} is not a directory"))]
    NotADirectory { id: EntryId },
    #[snafu(display("Entry {id} is not a file"))]
    NotAFile { id: EntryId },
    #[snafu(display("The root directory cannot be unlinked"))]
    DetachRoot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &Tree, dir: EntryId) -> Vec<String> {
        tree.children(dir).unwrap().keys().cloned().collect()
    }

    #[test]
    fn new_tree_has_empty_root_with_first_id() {
        let tree = Tree::new();
        assert_eq!(tree.root(), EntryId::from(FIRST_ENTRY_ID));
        assert!(tree.children(tree.root()).unwrap().is_empty());
        assert_eq!(tree.path_of(tree.root()).as_deref(), Some("/"));
    }

    #[test]
    fn ids_increase_in_creation_order() {
        let mut tree = Tree::new();
        let ids: Vec<_> = (0..10)
            .map(|i| if i % 2 == 0 { tree.create_directory() } else { tree.create_file() })
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn attach_links_both_directions() {
        let mut tree = Tree::new();
        let dir = tree.create_directory();
        tree.attach(tree.root(), "etc", dir).unwrap();

        let node = tree.get(dir).unwrap();
        assert_eq!(node.parent, Some(tree.root()));
        assert_eq!(node.name, "etc");
        assert_eq!(tree.child(tree.root(), "etc"), Some(dir));
        assert_eq!(tree.path_of(dir).as_deref(), Some("/etc"));
    }

    #[test]
    fn attach_into_file_fails() {
        let mut tree = Tree::new();
        let file = tree.create_file();
        let other = tree.create_file();
        tree.attach(tree.root(), "f", file).unwrap();

        let result = tree.attach(file, "g", other);
        assert!(matches!(result, Err(TreeError::NotADirectory { .. })));
    }

    #[test]
    fn attach_relinks_from_previous_parent() {
        let mut tree = Tree::new();
        let a = tree.create_directory();
        let b = tree.create_directory();
        let file = tree.create_file();
        tree.attach(tree.root(), "a", a).unwrap();
        tree.attach(tree.root(), "b", b).unwrap();
        tree.attach(a, "f", file).unwrap();

        tree.attach(b, "g", file).unwrap();
        assert!(names(&tree, a).is_empty());
        assert_eq!(names(&tree, b), vec!["g"]);
        assert_eq!(tree.path_of(file).as_deref(), Some("/b/g"));
    }

    #[test]
    fn attach_returns_displaced_entry() {
        let mut tree = Tree::new();
        let first = tree.create_file();
        let second = tree.create_file();
        tree.attach(tree.root(), "f", first).unwrap();

        let displaced = tree.attach(tree.root(), "f", second).unwrap();
        assert_eq!(displaced, Some(first));
        assert_eq!(tree.get(first).unwrap().parent, None);
        assert_eq!(tree.child(tree.root(), "f"), Some(second));
    }

    #[test]
    fn root_cannot_be_detached() {
        let mut tree = Tree::new();
        let root = tree.root();
        assert!(matches!(tree.detach(root), Err(TreeError::DetachRoot)));
        assert!(matches!(tree.purge(root), Err(TreeError::DetachRoot)));
    }

    #[test]
    fn purge_drops_whole_subtree() {
        let mut tree = Tree::new();
        let a = tree.create_directory();
        let b = tree.create_directory();
        let file = tree.create_file();
        tree.attach(tree.root(), "a", a).unwrap();
        tree.attach(a, "b", b).unwrap();
        tree.attach(b, "f", file).unwrap();

        assert_eq!(tree.purge(a).unwrap(), 3);
        assert_eq!(tree.entry_count(), 1);
        assert!(tree.get(file).is_none());
        assert!(names(&tree, tree.root()).is_empty());
    }

    #[test]
    fn deep_copy_allocates_fresh_ids_and_duplicates_content() {
        let mut tree = Tree::new();
        let dir = tree.create_directory();
        let file = tree.create_file();
        tree.attach(tree.root(), "d", dir).unwrap();
        tree.attach(dir, "f", file).unwrap();
        tree.set_content(file, b"hello".to_vec()).unwrap();

        let copy = tree.deep_copy(dir).unwrap();
        assert_ne!(copy, dir);
        let copied_file = tree.child(copy, "f").unwrap();
        assert_ne!(copied_file, file);
        assert_eq!(
            tree.get(copied_file).unwrap().entry,
            Entry::File {
                content: Some(b"hello".to_vec())
            }
        );
        assert_eq!(tree.get(copied_file).unwrap().metadata.size, Some(5));
        assert_eq!(tree.get(copy).unwrap().parent, None);
    }

    #[test]
    fn deep_copy_into_own_subtree_terminates() {
        let mut tree = Tree::new();
        let a = tree.create_directory();
        let b = tree.create_directory();
        tree.attach(tree.root(), "a", a).unwrap();
        tree.attach(a, "b", b).unwrap();

        let copy = tree.deep_copy(a).unwrap();
        tree.attach(b, "a", copy).unwrap();
        assert_eq!(tree.path_of(copy).as_deref(), Some("/a/b/a"));
        assert!(tree.child(copy, "b").is_some());
        assert!(tree.child(tree.child(copy, "b").unwrap(), "a").is_none());
    }

    #[test]
    fn set_content_on_directory_fails() {
        let mut tree = Tree::new();
        let root = tree.root();
        assert!(matches!(
            tree.set_content(root, vec![1]),
            Err(TreeError::NotAFile { .. })
        ));
    }

    #[test]
    fn contains_covers_self_and_descendants() {
        let mut tree = Tree::new();
        let a = tree.create_directory();
        let b = tree.create_directory();
        tree.attach(tree.root(), "a", a).unwrap();
        tree.attach(a, "b", b).unwrap();

        assert!(tree.contains(a, a));
        assert!(tree.contains(a, b));
        assert!(!tree.contains(b, a));
    }

    #[test]
    fn path_of_detached_entry_is_none() {
        let mut tree = Tree::new();
        let file = tree.create_file();
        assert_eq!(tree.path_of(file), None);
    }

    #[test]
    fn materialize_merges_existing_directories() {
        let mut tree = Tree::new();
        let mut first = Template::directory();
        first.try_insert_path("alice/notes.txt").unwrap();
        let mut second = Template::directory();
        second.try_insert_path("bob/").unwrap();

        let root = tree.root();
        let home = tree.materialize(root, "home", &first).unwrap();
        let again = tree.materialize(root, "home", &second).unwrap();

        assert_eq!(home, again);
        assert_eq!(names(&tree, home), vec!["alice", "bob"]);
        let alice = tree.child(home, "alice").unwrap();
        assert!(tree.get(tree.child(alice, "notes.txt").unwrap()).unwrap().is_file());
    }
}
