use std::path::{Component, Path, PathBuf};

/// Absolute, normalized rendering of a host path for messages. Falls back to
/// a lexical cleanup when the path cannot be canonicalized, e.g. because it
/// does not exist.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        if let Ok(canonical) = self.canonicalize() {
            return canonical.display().to_string();
        }

        let absolute = match std::env::current_dir() {
            Ok(current_dir) if self.is_relative() => current_dir.join(self),
            _ => self.to_path_buf(),
        };
        lexically_normalize(&absolute).display().to_string()
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        self.as_path().best_effort_path_display()
    }
}

fn lexically_normalize(path: &Path) -> PathBuf {
    path.components()
        .fold(Vec::new(), |mut kept, component| {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !matches!(kept.last(), None | Some(Component::RootDir)) {
                        kept.pop();
                    }
                }
                other => kept.push(other),
            }
            kept
        })
        .iter()
        .collect()
}
