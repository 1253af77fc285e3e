use snafu::ensure;
use tracing::debug;

use super::Session;
use super::error::{CommandError, InvalidOptionSnafu, MissingOperandSnafu, UnknownCommandSnafu};

const NO_FLAGS: &[&str] = &[];
const PARENTS_FLAGS: &[&str] = &["-p"];
const RECURSIVE_FLAGS: &[&str] = &["-r", "-R", "--recursive"];

/// Ends flag parsing; every later token is an operand.
const END_OF_FLAGS: &str = "--";

/// Value produced by a command, ready to be rendered by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Path(String),
    Names(Vec<String>),
    Done,
}

/// Operands of a command plus whether one of its accepted flags was given.
#[derive(Debug, PartialEq, Eq)]
struct Arguments<'a> {
    flagged: bool,
    operands: Vec<&'a str>,
}

impl<'a> Arguments<'a> {
    fn parse<S: AsRef<str>>(
        command: &str,
        tokens: &'a [S],
        accepted: &[&str],
    ) -> Result<Self, CommandError> {
        let mut flagged = false;
        let mut operands = Vec::new();
        let mut flags_done = false;

        for token in tokens.iter().map(AsRef::as_ref) {
            if flags_done || token == "-" || !token.starts_with('-') {
                operands.push(token);
            } else if token == END_OF_FLAGS {
                flags_done = true;
            } else if accepted.contains(&token) {
                flagged = true;
            } else {
                return InvalidOptionSnafu {
                    command,
                    option: token.trim_start_matches('-'),
                }
                .fail();
            }
        }

        Ok(Self { flagged, operands })
    }

    fn require_operands(&self, command: &str, count: usize) -> Result<(), CommandError> {
        ensure!(self.operands.len() >= count, MissingOperandSnafu { command });
        Ok(())
    }
}

impl Session {
    /// Runs one already tokenized command line: `argv[0]` names the command,
    /// the rest are flags and operands. An empty line does nothing.
    pub fn execute<S: AsRef<str>>(&mut self, argv: &[S]) -> Result<CommandOutput, CommandError> {
        let Some((command, tokens)) = argv.split_first() else {
            return Ok(CommandOutput::Done);
        };
        let command = command.as_ref();
        debug!("Executing {} with {} arguments", command, tokens.len());

        match command {
            "pwd" => {
                Arguments::parse(command, tokens, NO_FLAGS)?;
                Ok(CommandOutput::Path(self.pwd().to_string()))
            }
            "cd" => {
                let args = Arguments::parse(command, tokens, NO_FLAGS)?;
                let path = self.cd(args.operands.first().copied())?;
                Ok(CommandOutput::Path(path))
            }
            "ls" => {
                let args = Arguments::parse(command, tokens, NO_FLAGS)?;
                let names = self.ls(args.operands.first().copied())?;
                Ok(CommandOutput::Names(names))
            }
            "touch" => {
                let args = Arguments::parse(command, tokens, NO_FLAGS)?;
                args.require_operands(command, 1)?;
                for path in &args.operands {
                    self.touch(path)?;
                }
                Ok(CommandOutput::Done)
            }
            "mkdir" => {
                let args = Arguments::parse(command, tokens, PARENTS_FLAGS)?;
                args.require_operands(command, 1)?;
                for path in &args.operands {
                    self.mkdir(path, args.flagged)?;
                }
                Ok(CommandOutput::Done)
            }
            "rmdir" => {
                let args = Arguments::parse(command, tokens, PARENTS_FLAGS)?;
                args.require_operands(command, 1)?;
                for path in &args.operands {
                    self.rmdir(path, args.flagged)?;
                }
                Ok(CommandOutput::Done)
            }
            "rm" => {
                let args = Arguments::parse(command, tokens, RECURSIVE_FLAGS)?;
                self.rm(&args.operands, args.flagged)?;
                Ok(CommandOutput::Done)
            }
            "mv" | "cp" => {
                // Copies are always deep, so the recursive flag is accepted and ignored.
                let accepted = if command == "cp" { RECURSIVE_FLAGS } else { NO_FLAGS };
                let args = Arguments::parse(command, tokens, accepted)?;
                args.require_operands(command, 2)?;
                let Some((dest, sources)) = args.operands.split_last() else {
                    return MissingOperandSnafu { command }.fail();
                };
                if sources.len() > 1 {
                    self.ensure_target_directory(command, dest)?;
                }
                for source in sources {
                    if command == "cp" {
                        self.cp(source, dest)?;
                    } else {
                        self.mv(source, dest)?;
                    }
                }
                Ok(CommandOutput::Done)
            }
            _ => UnknownCommandSnafu { command }.fail(),
        }
    }
}
