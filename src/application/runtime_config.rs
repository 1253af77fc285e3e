use std::path::PathBuf;

use tracing::debug;
use treefs::{ConfigError, SeedConfig};

use crate::cli::Cli;

/// Settings for one run, after command line parsing.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub config_path: Option<PathBuf>,
    pub skeleton: bool,
    pub homes: Vec<String>,
    pub commands: Vec<String>,
}

impl RuntimeConfig {
    /// Loads the config file, if any, and layers the command line on top.
    pub async fn seed_config(&self) -> Result<SeedConfig, ConfigError> {
        let mut seed = match &self.config_path {
            Some(path) => SeedConfig::from_path(path).await?,
            None => SeedConfig::default(),
        };

        seed.skeleton |= self.skeleton;
        for name in &self.homes {
            seed.add_home(name.as_str());
        }
        debug!("Seed config: {:?}", seed);
        Ok(seed)
    }
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config_path: cli.config,
            skeleton: cli.skeleton,
            homes: cli.homes,
            commands: cli.commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use treefs::filesystem::Template;

    #[compio::test]
    async fn command_line_extends_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "home:\n  bob:\n    notes.txt: ~").unwrap();

        let runtime = RuntimeConfig {
            config_path: Some(file.path().to_path_buf()),
            skeleton: true,
            homes: vec!["alice".to_string(), "bob".to_string()],
            commands: vec![],
        };
        let seed = runtime.seed_config().await.unwrap();

        assert!(seed.skeleton);
        let names: Vec<_> = seed.home.keys().cloned().collect();
        assert_eq!(names, vec!["bob", "alice"]);
        assert_eq!(seed.home.get("bob").unwrap().entry_count(), 1);
        assert_eq!(seed.home.get("alice"), Some(&Template::directory()));
    }

    #[compio::test]
    async fn missing_config_file_is_an_error() {
        let runtime = RuntimeConfig {
            config_path: Some(PathBuf::from("missing-treefs.yaml")),
            ..RuntimeConfig::default()
        };
        assert!(matches!(
            runtime.seed_config().await,
            Err(ConfigError::Read { .. })
        ));
    }
}
