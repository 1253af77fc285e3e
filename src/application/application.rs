use std::io::BufRead;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};
use treefs::filesystem::TreeError;
use treefs::{ConfigError, Session};

use crate::application::RuntimeConfig;
use crate::application::render::Renderer;

const COMMENT_PREFIX: char = '#';

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let seed = app_config.seed_config().await.context(ConfigSnafu)?;
        let tree = seed.build_tree().context(SeedSnafu)?;
        info!("Seeded tree with {} entries", tree.entry_count());

        let mut session = Session::with_tree(tree);
        let renderer = Renderer::detect();

        if app_config.commands.is_empty() {
            debug!("Reading commands from standard input");
            // Blocking reads: commands run one at a time and nothing else is
            // scheduled on this runtime.
            run_lines(&mut session, &renderer, std::io::stdin().lock())?;
        } else {
            for line in &app_config.commands {
                run_line(&mut session, &renderer, line);
            }
        }

        Ok(())
    }
}

/// Runs every line of `reader` until end of input.
fn run_lines(
    session: &mut Session,
    renderer: &Renderer,
    reader: impl BufRead,
) -> Result<(), ApplicationError> {
    for line in reader.lines() {
        let line = line.context(InputSnafu)?;
        run_line(session, renderer, &line);
    }
    Ok(())
}

/// Runs one command line. Failures go to stderr and never stop the run.
fn run_line(session: &mut Session, renderer: &Renderer, line: &str) {
    if line.trim_start().starts_with(COMMENT_PREFIX) {
        return;
    }
    let argv: Vec<&str> = line.split_whitespace().collect();
    match session.execute(&argv) {
        Ok(output) => {
            if let Some(text) = renderer.output(&output) {
                println!("{text}");
            }
        }
        Err(error) => {
            for message in renderer.errors(error) {
                eprintln!("{message}");
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    Config { source: ConfigError },
    #[snafu(display("Failed to build the initial tree"))]
    Seed { source: TreeError },
    #[snafu(display("Failed to read commands from standard input"))]
    Input { source: std::io::Error },
}
