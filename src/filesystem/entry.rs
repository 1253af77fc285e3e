use std::time::SystemTime;

use derive_more::{Display, From, Into};
use hashlink::LinkedHashMap;

/// Id of the first entry ever created, which is always the root.
pub const FIRST_ENTRY_ID: u64 = 1001;

/// Process-unique identity of an entry. Doubles as the arena key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct EntryId(u64);

/// Monotonic id source owned by the tree. Ids are never handed out twice.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: FIRST_ENTRY_ID,
        }
    }
}

impl IdAllocator {
    pub fn allocate(&mut self) -> EntryId {
        let id = EntryId(self.next);
        self.next += 1;
        id
    }

    /// The id the next allocation will return.
    pub fn peek(&self) -> EntryId {
        EntryId(self.next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub created: SystemTime,
    pub modified: SystemTime,
    pub size: Option<u64>,
}

impl Metadata {
    pub fn now() -> Self {
        let now = SystemTime::now();
        Self {
            created: now,
            modified: now,
            size: None,
        }
    }
}

/// Payload of a node: either a directory with named children or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directory {
        children: LinkedHashMap<String, EntryId>,
    },
    File {
        content: Option<Vec<u8>>,
    },
}

impl Entry {
    pub fn empty_directory() -> Self {
        Entry::Directory {
            children: LinkedHashMap::new(),
        }
    }

    pub fn empty_file() -> Self {
        Entry::File { content: None }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Entry::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File { .. })
    }

    pub fn children(&self) -> Option<&LinkedHashMap<String, EntryId>> {
        match self {
            Entry::Directory { children } => Some(children),
            Entry::File { .. } => None,
        }
    }
}

/// A slot in the tree's arena.
///
/// `parent` and `name` mirror the key under which the node is stored in its
/// parent's children map; both are empty for the root and for detached nodes.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: EntryId,
    pub name: String,
    pub parent: Option<EntryId>,
    pub metadata: Metadata,
    pub entry: Entry,
}

impl Node {
    pub(super) fn detached(id: EntryId, entry: Entry) -> Self {
        Self {
            id,
            name: String::new(),
            parent: None,
            metadata: Metadata::now(),
            entry,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.entry.is_directory()
    }

    pub fn is_file(&self) -> bool {
        self.entry.is_file()
    }
}
