use snafu::{OptionExt, ResultExt, ensure};
use tracing::debug;

use super::Session;
use super::error::{
    AlreadyExistsSnafu, CommandError, MissingOperandSnafu, MoveIntoSelfSnafu, NotADirectorySnafu,
    RootNotModifiableSnafu, TreeSnafu,
};
use crate::filesystem::EntryId;
use crate::paths::{self, ResolvedNode};

/// Where a moved or copied entry will be linked.
struct Destination {
    parent: EntryId,
    name: String,
    path: String,
    replaced: Option<EntryId>,
}

impl Session {
    /// Relinks `source` at `dest`. The entry keeps its id; only its path
    /// changes. A directory destination receives the entry under its own name.
    pub fn mv(&mut self, source: &str, dest: &str) -> Result<(), CommandError> {
        debug!("mv {} {}", source, dest);
        let source = self.relocation_source("mv", source)?;
        let destination = self.destination("mv", &source, dest)?;
        if destination.replaced == Some(source.id) {
            return Ok(());
        }
        ensure!(
            !self.tree.contains(source.id, destination.parent),
            MoveIntoSelfSnafu {
                command: "mv",
                source_path: source.path.as_str(),
                dest: destination.path.as_str(),
            }
        );

        let current = paths::resolve(&self.tree, &self.current_path).map(|node| node.id);
        if let Some(replaced) = destination.replaced {
            self.tree.purge(replaced).context(TreeSnafu { command: "mv" })?;
        }
        self.tree
            .attach(destination.parent, &destination.name, source.id)
            .context(TreeSnafu { command: "mv" })?;
        debug!("Moved {} to {}", source.path, destination.path);

        // The working directory follows the entry it names.
        if let Some(path) = current.and_then(|id| self.tree.path_of(id)) {
            self.current_path = path;
        }
        self.repair_current_path();
        Ok(())
    }

    /// Links a deep copy of `source` at `dest`, leaving `source` untouched.
    /// Every copied entry gets a fresh id.
    pub fn cp(&mut self, source: &str, dest: &str) -> Result<(), CommandError> {
        debug!("cp {} {}", source, dest);
        let source = self.relocation_source("cp", source)?;
        let destination = self.destination("cp", &source, dest)?;
        ensure!(
            destination.replaced != Some(source.id),
            AlreadyExistsSnafu {
                command: "cp",
                path: destination.path.as_str(),
            }
        );

        let copy = self
            .tree
            .deep_copy(source.id)
            .context(TreeSnafu { command: "cp" })?;
        if let Some(replaced) = destination.replaced {
            self.tree.purge(replaced).context(TreeSnafu { command: "cp" })?;
        }
        self.tree
            .attach(destination.parent, &destination.name, copy)
            .context(TreeSnafu { command: "cp" })?;
        debug!("Copied {} to {} as {}", source.path, destination.path, copy);
        Ok(())
    }

    /// Several sources need an existing directory to land in.
    pub(super) fn ensure_target_directory(
        &self,
        command: &str,
        dest: &str,
    ) -> Result<(), CommandError> {
        let absolute = self.absolute(Some(dest));
        ensure!(
            paths::resolve(&self.tree, &absolute)
                .is_some_and(|node| paths::is_directory(&self.tree, &node)),
            NotADirectorySnafu {
                command,
                path: dest,
            }
        );
        Ok(())
    }

    fn relocation_source(&self, command: &str, source: &str) -> Result<ResolvedNode, CommandError> {
        ensure!(!source.is_empty(), MissingOperandSnafu { command });
        let absolute = self.absolute(Some(source));
        let node = self.lookup(command, &absolute, source)?;
        ensure!(!node.is_root, RootNotModifiableSnafu { command });
        Ok(node)
    }

    fn destination(
        &self,
        command: &str,
        source: &ResolvedNode,
        dest: &str,
    ) -> Result<Destination, CommandError> {
        ensure!(!dest.is_empty(), MissingOperandSnafu { command });
        let absolute = self.absolute(Some(dest));

        let (parent, name, path) = match paths::resolve(&self.tree, &absolute) {
            Some(existing) if paths::is_directory(&self.tree, &existing) => {
                let path = paths::normalize(&format!("{}/{}", existing.path, source.name));
                (existing.id, source.name.clone(), path)
            }
            _ => {
                let parent = self.parent_directory(command, &absolute, dest)?;
                let name = paths::file_name(&absolute)
                    .context(RootNotModifiableSnafu { command })?
                    .to_string();
                (parent.id, name, absolute)
            }
        };

        let replaced = self.tree.child(parent, &name);
        if let Some(existing) = replaced.filter(|existing| *existing != source.id) {
            let existing = self
                .tree
                .node(existing)
                .context(TreeSnafu { command })?;
            ensure!(
                !existing.is_directory(),
                AlreadyExistsSnafu {
                    command,
                    path: path.as_str(),
                }
            );
            ensure!(
                paths::is_file(&self.tree, source),
                NotADirectorySnafu {
                    command,
                    path: path.as_str(),
                }
            );
        }

        Ok(Destination {
            parent,
            name,
            path,
            replaced,
        })
    }
}
