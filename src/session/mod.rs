//! Command layer: the working directory plus every mutating operation.
//!
//! Each command resolves its arguments, validates preconditions and then
//! mutates the tree or fails. Nothing is rolled back: `mkdir -p`, `rmdir -p`
//! and multi-path `rm` keep whatever they managed to do before a failure.

mod create;
mod dispatch;
mod error;
mod relocate;
mod remove;

use snafu::{OptionExt, ensure};
use tracing::{debug, warn};

pub use dispatch::CommandOutput;
pub use error::CommandError;
use error::{NotADirectorySnafu, NotFoundSnafu};

use crate::filesystem::{Metadata, Tree};
use crate::paths::{self, ResolvedNode, ROOT_PATH};

/// A working directory over an owned tree.
///
/// Commands run one at a time to completion. Share a session between threads
/// only behind a single lock around the whole value.
#[derive(Debug, Clone)]
pub struct Session {
    tree: Tree,
    current_path: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session over an empty tree, positioned at the root.
    pub fn new() -> Self {
        Self::with_tree(Tree::new())
    }

    pub fn with_tree(tree: Tree) -> Self {
        Self {
            tree,
            current_path: ROOT_PATH.to_string(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn pwd(&self) -> &str {
        &self.current_path
    }

    /// Changes the working directory. No argument, `~` and `/` go to the root.
    pub fn cd(&mut self, path: Option<&str>) -> Result<String, CommandError> {
        debug!("cd {:?}", path);
        let absolute = paths::to_absolute(&self.current_path, path, true);
        let node = self.lookup("cd", &absolute, &display_path(path, &absolute))?;
        ensure!(
            paths::is_directory(&self.tree, &node),
            NotADirectorySnafu {
                command: "cd",
                path: display_path(path, &absolute),
            }
        );

        self.current_path = node.path;
        Ok(self.current_path.clone())
    }

    /// Child names of a directory in insertion order. Defaults to the working
    /// directory.
    pub fn ls(&self, path: Option<&str>) -> Result<Vec<String>, CommandError> {
        debug!("ls {:?}", path);
        let absolute = self.absolute(path);
        let node = self.lookup("ls", &absolute, &display_path(path, &absolute))?;
        let children = self.tree.children(node.id).context(NotADirectorySnafu {
            command: "ls",
            path: display_path(path, &absolute),
        })?;
        Ok(children.keys().cloned().collect())
    }

    /// Resolves a path relative to the working directory.
    pub fn resolve(&self, path: &str) -> Result<ResolvedNode, CommandError> {
        let absolute = self.absolute(Some(path));
        self.lookup("resolve", &absolute, &display_path(Some(path), &absolute))
    }

    pub fn metadata(&self, path: &str) -> Result<&Metadata, CommandError> {
        let node = self.resolve(path)?;
        self.tree
            .get(node.id)
            .map(|node| &node.metadata)
            .context(NotFoundSnafu {
                command: "stat",
                path,
            })
    }

    fn absolute(&self, path: Option<&str>) -> String {
        paths::to_absolute(&self.current_path, path, false)
    }

    /// Resolves `absolute`; failures name the operand as `shown`.
    fn lookup(
        &self,
        command: &str,
        absolute: &str,
        shown: &str,
    ) -> Result<ResolvedNode, CommandError> {
        paths::resolve(&self.tree, absolute).context(NotFoundSnafu {
            command,
            path: shown,
        })
    }

    /// Resolves the directory that would hold `absolute`.
    fn parent_directory(
        &self,
        command: &str,
        absolute: &str,
        shown: &str,
    ) -> Result<ResolvedNode, CommandError> {
        let parent = self.lookup(command, &paths::parent_path(absolute), shown)?;
        ensure!(
            paths::is_directory(&self.tree, &parent),
            NotADirectorySnafu {
                command,
                path: shown,
            }
        );
        Ok(parent)
    }

    /// Moves the working directory up until it names an existing directory
    /// again. Needed after anything that unlinks entries.
    fn repair_current_path(&mut self) {
        let mut candidate = self.current_path.clone();
        while !paths::resolve(&self.tree, &candidate)
            .is_some_and(|node| paths::is_directory(&self.tree, &node))
        {
            candidate = paths::parent_path(&candidate);
        }

        if candidate != self.current_path {
            warn!(
                "Working directory {} no longer exists, falling back to {}",
                self.current_path, candidate
            );
            self.current_path = candidate;
        }
    }
}

/// What to show the user for a path: what they typed, if anything.
fn display_path(input: Option<&str>, absolute: &str) -> String {
    match input {
        Some(path) if !path.is_empty() => path.to_string(),
        _ => absolute.to_string(),
    }
}
