use compio::{fs::File, io::AsyncReadExt, io::BufReader};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{borrow::Cow, io::Cursor, path::Path};
use tracing::{debug, info, warn};

use crate::{
    ext::BestEffortPathExt,
    filesystem::{Template, Tree, TreeError, skeleton},
};

const HOME_DIRECTORY: &str = "home";

/// What a fresh tree starts with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedConfig {
    /// Entries created as `/home/<name>`, in order.
    pub home: LinkedHashMap<String, Template>,
    /// Create the illustrative root layout before the home entries.
    pub skeleton: bool,
}

impl SeedConfig {
    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Opening config file: {}", path.best_effort_path_display());
        let file = File::open(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;

        let cursor = Cursor::new(file);
        let mut reader = BufReader::new(cursor);
        let res = reader.read_to_string(String::new()).await;
        let n = res.0.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {n} bytes");
        res.1.as_str().try_into()
    }

    /// Adds an empty home directory unless one is already configured.
    /// Configured entries keep their template and position.
    pub fn add_home(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.home.contains_key(&name) {
            self.home.insert(name, Template::directory());
        }
    }

    /// Builds the seeded tree: skeleton first, then every home entry.
    pub fn build_tree(&self) -> Result<Tree, TreeError> {
        let mut tree = Tree::new();
        let root = tree.root();

        if self.skeleton {
            let layout = skeleton();
            for (name, template) in layout.children().into_iter().flatten() {
                tree.materialize(root, name, template)?;
            }
            info!("Created skeleton with {} entries", layout.entry_count());
        }

        if !self.home.is_empty() {
            let home = tree.materialize(root, HOME_DIRECTORY, &Template::directory())?;
            for (name, template) in &self.home {
                tree.materialize(home, name, template)?;
            }
            info!("Created {} home directories", self.home.len());
        }

        Ok(tree)
    }

    fn parse_home(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<LinkedHashMap<String, Template>, ConfigError> {
        let Some(home) = top_level.get(&key("home")) else {
            return Ok(LinkedHashMap::new());
        };
        if matches!(home, Yaml::Value(Scalar::Null)) {
            return Ok(LinkedHashMap::new());
        }

        let mut entries = LinkedHashMap::new();
        for (name, value) in home.as_mapping().context(HomeNotMapSnafu)? {
            let Some(name) = key_name(name) else {
                warn!("Skipping home entry with non-string name: {:?}", name);
                continue;
            };
            // An empty home entry is still a directory.
            let template = match value {
                Yaml::Value(Scalar::Null) => Template::directory(),
                other => template_from_yaml(name, other)?,
            };
            entries.insert(name.to_string(), template);
        }
        Ok(entries)
    }
}

impl TryFrom<&str> for SeedConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(contents) = documents.first() else {
            debug!("Config file is empty, using defaults");
            return Ok(SeedConfig::default());
        };

        let top_level = contents.as_mapping().context(TopLevelNotMapSnafu)?;
        let skeleton = match top_level.get(&key("skeleton")) {
            None | Some(Yaml::Value(Scalar::Null)) => false,
            Some(Yaml::Value(Scalar::Boolean(value))) => *value,
            Some(_) => return SkeletonNotBoolSnafu.fail(),
        };
        let home = Self::parse_home(top_level)?;

        Ok(SeedConfig { home, skeleton })
    }
}

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

fn key_name<'a>(node: &'a Yaml) -> Option<&'a str> {
    match node {
        Yaml::Value(Scalar::String(name)) => Some(name.as_ref()),
        _ => None,
    }
}

/// A mapping is a directory and null is a file. Anything else is rejected.
fn template_from_yaml(name: &str, node: &Yaml) -> Result<Template, ConfigError> {
    match node {
        Yaml::Value(Scalar::Null) => Ok(Template::File),
        Yaml::Mapping(entries) => {
            let mut children = LinkedHashMap::new();
            for (child_name, child) in entries {
                let Some(child_name) = key_name(child_name) else {
                    warn!("Skipping entry with non-string name below {}: {:?}", name, child_name);
                    continue;
                };
                children.insert(child_name.to_string(), template_from_yaml(child_name, child)?);
            }
            Ok(Template::Directory { children })
        }
        _ => InvalidTemplateSnafu { name }.fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    Read {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    Parse { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Home section should be a map"))]
    HomeNotMap,
    #[snafu(display("Skeleton should be true or false"))]
    SkeletonNotBool,
    #[snafu(display("Entry '{}' should be a map (directory) or empty (file)", name))]
    InvalidTemplate { name: String },
}
