mod seed_config;

pub use seed_config::{ConfigError, SeedConfig};
