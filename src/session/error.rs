use snafu::Snafu;

use crate::filesystem::TreeError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommandError {
    #[snafu(display("{command}: cannot access '{path}': No such file or directory"))]
    NotFound { command: String, path: String },
    #[snafu(display("{command}: '{path}': Not a directory"))]
    NotADirectory { command: String, path: String },
    #[snafu(display("{command}: cannot remove '{path}': Is a directory"))]
    IsADirectory { command: String, path: String },
    #[snafu(display("{command}: cannot create '{path}': File exists"))]
    AlreadyExists { command: String, path: String },
    #[snafu(display("{command}: failed to remove '{path}': Directory not empty"))]
    DirectoryNotEmpty { command: String, path: String },
    #[snafu(display("{command}: invalid option -- '{option}'"))]
    InvalidOption { command: String, option: String },
    #[snafu(display("{command}: missing operand"))]
    MissingOperand { command: String },
    #[snafu(display("{command}: command not found"))]
    UnknownCommand { command: String },
    #[snafu(display("{command}: refusing to modify the root directory"))]
    RootNotModifiable { command: String },
    #[snafu(display("{command}: cannot move '{source_path}' to a subdirectory of itself, '{dest}'"))]
    MoveIntoSelf {
        command: String,
        source_path: String,
        dest: String,
    },
    #[snafu(display("{}", errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")))]
    Multiple { errors: Vec<CommandError> },
    #[snafu(display("{command}: inconsistent tree"))]
    Tree { command: String, source: TreeError },
}

impl CommandError {
    /// Flattens `Multiple` into its parts.
    pub fn into_errors(self) -> Vec<CommandError> {
        match self {
            CommandError::Multiple { errors } => errors,
            other => vec![other],
        }
    }
}
