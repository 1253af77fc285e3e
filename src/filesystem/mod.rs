//! In-memory directory tree.
//!
//! Entries are kept in an arena keyed by id. Directories hold the ids of
//! their children and every entry records its parent, which keeps the tree
//! free of reference cycles and makes relinking a subtree cheap.

mod entry;
mod skeleton;
mod template;
mod tree;

pub use entry::{Entry, EntryId, FIRST_ENTRY_ID, IdAllocator, Metadata, Node};
pub use skeleton::skeleton;
pub use template::{CannotInsertIntoFileError, Template};
pub use tree::{Tree, TreeError};
