use snafu::{OptionExt, ResultExt, ensure};
use tracing::debug;

use super::Session;
use super::error::{
    AlreadyExistsSnafu, CommandError, MissingOperandSnafu, NotADirectorySnafu,
    RootNotModifiableSnafu, TreeSnafu,
};
use crate::filesystem::EntryId;
use crate::paths;

impl Session {
    /// Creates an empty file, or refreshes the modified time of an existing
    /// entry.
    pub fn touch(&mut self, path: &str) -> Result<(), CommandError> {
        debug!("touch {}", path);
        ensure!(!path.is_empty(), MissingOperandSnafu { command: "touch" });
        let absolute = self.absolute(Some(path));

        if let Some(existing) = paths::resolve(&self.tree, &absolute) {
            return self
                .tree
                .touch(existing.id)
                .context(TreeSnafu { command: "touch" });
        }

        let parent = self.parent_directory("touch", &absolute, path)?;
        let name = paths::file_name(&absolute).context(RootNotModifiableSnafu { command: "touch" })?;
        let file = self.tree.create_file();
        self.tree
            .attach(parent.id, name, file)
            .context(TreeSnafu { command: "touch" })?;
        debug!("Created file {}", absolute);
        Ok(())
    }

    /// Creates a directory. With `recursive`, every missing ancestor is
    /// created first, root to leaf.
    pub fn mkdir(&mut self, path: &str, recursive: bool) -> Result<(), CommandError> {
        debug!("mkdir {} (recursive: {})", path, recursive);
        ensure!(!path.is_empty(), MissingOperandSnafu { command: "mkdir" });
        let absolute = self.absolute(Some(path));
        ensure!(
            paths::resolve(&self.tree, &absolute).is_none(),
            AlreadyExistsSnafu {
                command: "mkdir",
                path,
            }
        );

        if !recursive {
            let parent = self.parent_directory("mkdir", &absolute, path)?;
            return self.create_directory_under(parent.id, &absolute);
        }

        for prefix in paths::prefixes(&absolute) {
            match paths::resolve(&self.tree, &prefix) {
                Some(existing) => ensure!(
                    paths::is_directory(&self.tree, &existing),
                    NotADirectorySnafu {
                        command: "mkdir",
                        path: prefix,
                    }
                ),
                None => {
                    let parent = self.parent_directory("mkdir", &prefix, &prefix)?;
                    self.create_directory_under(parent.id, &prefix)?;
                }
            }
        }
        Ok(())
    }

    fn create_directory_under(&mut self, parent: EntryId, absolute: &str) -> Result<(), CommandError> {
        let name = paths::file_name(absolute).context(RootNotModifiableSnafu { command: "mkdir" })?;
        let directory = self.tree.create_directory();
        self.tree
            .attach(parent, name, directory)
            .context(TreeSnafu { command: "mkdir" })?;
        debug!("Created directory {}", absolute);
        Ok(())
    }
}
