use colored::Colorize;
use supports_color::Stream;
use treefs::{CommandError, CommandOutput};

/// Turns command results into terminal text, coloured where the stream
/// supports it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    color_stdout: bool,
    color_stderr: bool,
}

impl Renderer {
    pub fn detect() -> Self {
        Self {
            color_stdout: supports_color::on(Stream::Stdout).is_some(),
            color_stderr: supports_color::on(Stream::Stderr).is_some(),
        }
    }

    /// Text for stdout, or nothing if the command has nothing to show.
    pub fn output(&self, output: &CommandOutput) -> Option<String> {
        match output {
            CommandOutput::Path(path) if self.color_stdout => Some(path.cyan().to_string()),
            CommandOutput::Path(path) => Some(path.clone()),
            CommandOutput::Names(names) if names.is_empty() => None,
            CommandOutput::Names(names) => Some(names.join("\n")),
            CommandOutput::Done => None,
        }
    }

    /// One stderr line per failure.
    pub fn errors(&self, error: CommandError) -> Vec<String> {
        error
            .into_errors()
            .iter()
            .map(|error| match self.color_stderr {
                true => error.to_string().red().to_string(),
                false => error.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treefs::Session;

    #[test]
    fn plain_output_lists_one_name_per_line() {
        let renderer = Renderer::default();
        let names = CommandOutput::Names(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(renderer.output(&names).as_deref(), Some("a\nb"));
        assert_eq!(renderer.output(&CommandOutput::Names(vec![])), None);
        assert_eq!(renderer.output(&CommandOutput::Done), None);
        assert_eq!(
            renderer.output(&CommandOutput::Path("/a".to_string())).as_deref(),
            Some("/a")
        );
    }

    #[test]
    fn every_failure_gets_its_own_line() {
        let mut session = Session::new();
        session.execute(&["mkdir", "d"]).unwrap();
        let error = session.execute(&["rm", "d", "missing"]).unwrap_err();

        let lines = Renderer::default().errors(error);
        assert_eq!(
            lines,
            vec![
                "rm: cannot remove 'd': Is a directory",
                "rm: cannot access 'missing': No such file or directory",
            ]
        );
    }
}
