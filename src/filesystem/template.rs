use hashlink::LinkedHashMap;
use snafu::Snafu;
use tracing::warn;

/// Nested description of entries to create, used to seed a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    File,
    Directory {
        children: LinkedHashMap<String, Template>,
    },
}

impl Template {
    pub fn directory() -> Self {
        Template::Directory {
            children: LinkedHashMap::new(),
        }
    }

    /// Builds a directory template from slash separated paths. A trailing
    /// slash marks the last component as a directory, otherwise it is a file.
    /// Paths that would descend below a file are skipped.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .fold(Self::directory(), |mut current, path| {
                if let Err(e) = current.try_insert_path(path.as_ref()) {
                    warn!("Failed to insert template path: {}", e.path);
                }
                current
            })
    }

    pub fn try_insert_path(&mut self, path: &str) -> Result<(), CannotInsertIntoFileError> {
        let is_directory = path.ends_with('/');
        let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
        let mut current = self;

        while let Some(name) = components.next() {
            let Template::Directory { children } = current else {
                return CannotInsertIntoFileSnafu { path }.fail();
            };
            let leaf = if components.peek().is_none() && !is_directory {
                Template::File
            } else {
                Template::directory()
            };
            current = children.entry(name.to_string()).or_insert(leaf);
        }

        Ok(())
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Template::Directory { .. })
    }

    pub fn children(&self) -> Option<&LinkedHashMap<String, Template>> {
        match self {
            Template::Directory { children } => Some(children),
            Template::File => None,
        }
    }

    /// Number of entries the template creates, excluding itself.
    pub fn entry_count(&self) -> usize {
        self.children()
            .map(|children| children.values().map(|child| 1 + child.entry_count()).sum())
            .unwrap_or(0)
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Cannot insert {path} below a file"))]
pub struct CannotInsertIntoFileError {
    path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intermediate_components_become_directories() {
        let template = Template::from_paths(["usr/local/bin/", "usr/bin/vim"]);
        let usr = template.children().unwrap().get("usr").unwrap();
        let children: Vec<_> = usr.children().unwrap().keys().cloned().collect();
        assert_eq!(children, vec!["local", "bin"]);
        let bin = usr.children().unwrap().get("bin").unwrap();
        assert_eq!(bin.children().unwrap().get("vim"), Some(&Template::File));
        assert_eq!(template.entry_count(), 5);
    }

    #[test]
    fn cannot_descend_below_file() {
        let mut template = Template::directory();
        template.try_insert_path("etc/passwd").unwrap();
        let result = template.try_insert_path("etc/passwd/shadow");
        assert!(result.is_err());
    }

    #[test]
    fn existing_directory_is_not_replaced_by_file() {
        let template = Template::from_paths(["var/log/", "var/log"]);
        let var = template.children().unwrap().get("var").unwrap();
        assert!(var.children().unwrap().get("log").unwrap().is_directory());
    }
}
