use snafu::{ResultExt, ensure};
use tracing::debug;

use super::Session;
use super::error::{
    CommandError, DirectoryNotEmptySnafu, IsADirectorySnafu, MissingOperandSnafu,
    NotADirectorySnafu, RootNotModifiableSnafu, TreeSnafu,
};
use crate::paths;

impl Session {
    /// Removes an empty directory. With `recursive`, the emptied ancestors
    /// named in `path` are removed as well, deepest first.
    pub fn rmdir(&mut self, path: &str, recursive: bool) -> Result<(), CommandError> {
        debug!("rmdir {} (recursive: {})", path, recursive);
        ensure!(!path.is_empty(), MissingOperandSnafu { command: "rmdir" });

        let result = self.remove_directory_chain(path, recursive);
        self.repair_current_path();
        result
    }

    fn remove_directory_chain(&mut self, path: &str, recursive: bool) -> Result<(), CommandError> {
        let mut target = self.absolute(Some(path));
        ensure!(
            target != paths::ROOT_PATH,
            RootNotModifiableSnafu { command: "rmdir" }
        );

        // `-p` never climbs past the segments the operand itself names.
        let mut typed = paths::segments(path);
        let steps = if recursive { typed.len() } else { 1 };
        let mut shown = path.to_string();
        for _ in 0..steps {
            if target == paths::ROOT_PATH {
                break;
            }
            self.remove_empty_directory(&target, &shown)?;

            target = paths::parent_path(&target);
            typed.pop();
            shown = if path.starts_with('/') {
                format!("/{}", typed.join("/"))
            } else {
                typed.join("/")
            };
        }
        Ok(())
    }

    fn remove_empty_directory(&mut self, absolute: &str, shown: &str) -> Result<(), CommandError> {
        let node = self.lookup("rmdir", absolute, shown)?;
        ensure!(!node.is_root, RootNotModifiableSnafu { command: "rmdir" });
        ensure!(
            paths::is_directory(&self.tree, &node),
            NotADirectorySnafu {
                command: "rmdir",
                path: shown,
            }
        );
        ensure!(
            paths::is_empty(&self.tree, &node),
            DirectoryNotEmptySnafu {
                command: "rmdir",
                path: shown,
            }
        );

        self.tree.purge(node.id).context(TreeSnafu { command: "rmdir" })?;
        debug!("Removed directory {}", absolute);
        Ok(())
    }

    /// Removes every path independently. Directories need `recursive`.
    ///
    /// All paths are attempted even if some fail; a single failure is returned
    /// as is, several are wrapped in [`CommandError::Multiple`].
    pub fn rm<S: AsRef<str>>(&mut self, targets: &[S], recursive: bool) -> Result<(), CommandError> {
        ensure!(!targets.is_empty(), MissingOperandSnafu { command: "rm" });

        let mut errors: Vec<CommandError> = targets
            .iter()
            .filter_map(|target| self.rm_one(target.as_ref(), recursive).err())
            .collect();
        self.repair_current_path();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(CommandError::Multiple { errors }),
        }
    }

    fn rm_one(&mut self, path: &str, recursive: bool) -> Result<(), CommandError> {
        debug!("rm {} (recursive: {})", path, recursive);
        ensure!(!path.is_empty(), MissingOperandSnafu { command: "rm" });
        let absolute = self.absolute(Some(path));
        let node = self.lookup("rm", &absolute, path)?;
        ensure!(!node.is_root, RootNotModifiableSnafu { command: "rm" });
        ensure!(
            recursive || paths::is_file(&self.tree, &node),
            IsADirectorySnafu {
                command: "rm",
                path: node.name.as_str(),
            }
        );

        let dropped = self.tree.purge(node.id).context(TreeSnafu { command: "rm" })?;
        debug!("Removed {} ({} entries)", absolute, dropped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::session::{CommandError, Session};

    #[test]
    fn rmdir_removes_empty_directory() {
        let mut session = Session::new();
        session.mkdir("a/b", true).unwrap();
        session.rmdir("a/b", false).unwrap();
        assert!(session.ls(Some("a")).unwrap().is_empty());
        assert_eq!(session.ls(None).unwrap(), vec!["a"]);
    }

    #[test]
    fn rmdir_refuses_directory_with_file() {
        let mut session = Session::new();
        session.mkdir("a", false).unwrap();
        session.touch("a/f").unwrap();

        let result = session.rmdir("a", false);
        assert!(matches!(result, Err(CommandError::DirectoryNotEmpty { .. })));
        assert!(session.resolve("a").is_ok());
        assert!(session.resolve("a/f").is_ok());
    }

    #[test]
    fn rmdir_on_file_or_missing_path_fails() {
        let mut session = Session::new();
        session.touch("f").unwrap();
        assert!(matches!(
            session.rmdir("f", false),
            Err(CommandError::NotADirectory { .. })
        ));
        assert!(matches!(
            session.rmdir("g", false),
            Err(CommandError::NotFound { .. })
        ));
        assert!(matches!(
            session.rmdir("/", false),
            Err(CommandError::RootNotModifiable { .. })
        ));
    }

    #[test]
    fn rmdir_recursive_removes_chain_leaf_to_root() {
        let mut session = Session::new();
        session.mkdir("a/b/c", true).unwrap();
        session.rmdir("a/b/c", true).unwrap();
        assert!(session.ls(Some("/")).unwrap().is_empty());
    }

    #[test]
    fn rmdir_recursive_only_consumes_given_segments() {
        let mut session = Session::new();
        session.mkdir("top/a/b", true).unwrap();
        session.cd(Some("top")).unwrap();
        session.rmdir("a/b", true).unwrap();

        assert_eq!(session.pwd(), "/top");
        assert!(session.ls(None).unwrap().is_empty());
        assert_eq!(session.ls(Some("/")).unwrap(), vec!["top"]);
    }

    #[test]
    fn rmdir_recursive_stops_at_populated_ancestor() {
        let mut session = Session::new();
        session.mkdir("a/b/c", true).unwrap();
        session.touch("a/keep").unwrap();

        let result = session.rmdir("a/b/c", true);
        assert!(matches!(result, Err(CommandError::DirectoryNotEmpty { .. })));
        // removals before the failure stay done
        assert!(session.resolve("a/b").is_err());
        assert_eq!(session.ls(Some("a")).unwrap(), vec!["keep"]);
    }

    #[test]
    fn rmdir_resolves_parent_and_home_tokens() {
        let mut session = Session::new();
        session.mkdir("a/b", true).unwrap();
        session.touch("a/b/f").unwrap();
        session.cd(Some("a/b")).unwrap();

        assert!(matches!(
            session.rmdir("..", false),
            Err(CommandError::DirectoryNotEmpty { .. })
        ));
        assert!(matches!(
            session.rmdir("~", false),
            Err(CommandError::DirectoryNotEmpty { .. })
        ));

        session.rm(&["f"], false).unwrap();
        session.rmdir("~", false).unwrap();
        assert_eq!(session.pwd(), "/a");
        assert!(session.ls(None).unwrap().is_empty());

        assert!(matches!(
            session.rmdir("..", true),
            Err(CommandError::RootNotModifiable { .. })
        ));
        session.cd(None).unwrap();
        assert!(matches!(
            session.rmdir("~", false),
            Err(CommandError::RootNotModifiable { .. })
        ));
    }

    #[test]
    fn rmdir_recursive_reports_failing_ancestor_as_typed() {
        let mut session = Session::new();
        session.mkdir("a/b", true).unwrap();
        session.touch("a/keep").unwrap();

        let error = session.rmdir("a/b", true).unwrap_err();
        assert_eq!(
            error.to_string(),
            "rmdir: failed to remove 'a': Directory not empty"
        );
    }

    #[test]
    fn rm_file_and_directory() {
        let mut session = Session::new();
        session.mkdir("d", false).unwrap();
        session.touch("d/f").unwrap();

        session.rm(&["d/f"], false).unwrap();
        assert!(session.ls(Some("d")).unwrap().is_empty());

        let result = session.rm(&["d"], false);
        assert!(matches!(result, Err(CommandError::IsADirectory { .. })));
        session.rm(&["d"], true).unwrap();
        assert!(session.ls(None).unwrap().is_empty());
    }

    #[test]
    fn rm_processes_each_path_independently() {
        let mut session = Session::new();
        session.touch("a").unwrap();
        session.touch("c").unwrap();

        let result = session.rm(&["a", "missing", "c"], false);
        assert!(matches!(result, Err(CommandError::NotFound { .. })));
        assert!(session.ls(None).unwrap().is_empty());
    }

    #[test]
    fn rm_collects_several_failures() {
        let mut session = Session::new();
        session.mkdir("d", false).unwrap();

        let errors = session
            .rm(&["d", "missing"], false)
            .unwrap_err()
            .into_errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], CommandError::IsADirectory { .. }));
        assert!(matches!(errors[1], CommandError::NotFound { .. }));
    }

    #[test]
    fn rm_refuses_root() {
        let mut session = Session::new();
        assert!(matches!(
            session.rm(&["/"], true),
            Err(CommandError::RootNotModifiable { .. })
        ));
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut session = Session::new();
        session.touch("f").unwrap();
        let first = session.resolve("f").unwrap().id;
        session.rm(&["f"], false).unwrap();
        session.touch("f").unwrap();
        assert!(session.resolve("f").unwrap().id > first);
    }
}
