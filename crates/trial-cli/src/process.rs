//! Child processes with line-by-line output streaming

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipe {
    Stdout,
    Stderr,
}

/// One line of child output, without its trailing newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub pipe: Pipe,
    pub text: String,
}

/// A program invocation, fully resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.to_path_buf(),
            envs: Vec::new(),
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// A spawned child whose stdout and stderr are read line by line
pub struct Running {
    child: Child,
    lines: mpsc::Receiver<OutputLine>,
}

impl Running {
    /// Next line from either pipe; `None` once both pipes are closed
    pub async fn next_line(&mut self) -> Option<OutputLine> {
        self.lines.recv().await
    }

    /// Wait for the child to exit
    pub async fn wait(mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait().await?;
        tracing::debug!(status = %status, "child exited");
        Ok(status)
    }
}

/// Spawn `spec` with piped output. Must be called inside a tokio runtime.
pub fn spawn(spec: &CommandSpec) -> io::Result<Running> {
    tracing::debug!(command = %spec, cwd = %spec.cwd.display(), "spawning");

    let mut child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(&spec.cwd)
        .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let (tx, rx) = mpsc::channel(64);
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward(stdout, Pipe::Stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward(stderr, Pipe::Stderr, tx));
    }

    Ok(Running { child, lines: rx })
}

async fn forward<R>(reader: R, pipe: Pipe, tx: mpsc::Sender<OutputLine>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(text)) = lines.next_line().await {
        if tx.send(OutputLine { pipe, text }).await.is_err() {
            break;
        }
    }
}

/// Exit code of a finished child; signals count as 1
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_quotes_spaced_args() {
        let spec = CommandSpec::new(
            "node",
            vec!["dist/a.js".to_string(), "two words".to_string()],
            Path::new("."),
        );
        assert_eq!(spec.to_string(), "node dist/a.js \"two words\"");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_streams_both_pipes() {
        let spec = CommandSpec::new(
            "sh",
            vec![
                "-c".to_string(),
                "echo out; echo err 1>&2; exit 3".to_string(),
            ],
            Path::new("."),
        );
        let mut running = spawn(&spec).unwrap();

        let mut lines = Vec::new();
        while let Some(line) = running.next_line().await {
            lines.push(line);
        }
        let status = running.wait().await.unwrap();

        assert_eq!(exit_code(status), 3);
        assert!(lines.contains(&OutputLine {
            pipe: Pipe::Stdout,
            text: "out".to_string()
        }));
        assert!(lines.contains(&OutputLine {
            pipe: Pipe::Stderr,
            text: "err".to_string()
        }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_env_is_forwarded() {
        let spec = CommandSpec::new(
            "sh",
            vec!["-c".to_string(), "echo $TRIAL_REPORTER".to_string()],
            Path::new("."),
        )
        .env("TRIAL_REPORTER", "json");
        let mut running = spawn(&spec).unwrap();

        let line = running.next_line().await.unwrap();
        assert_eq!(line.text, "json");
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let spec = CommandSpec::new("trial-no-such-program", Vec::new(), Path::new("."));
        assert!(spawn(&spec).is_err());
    }
}
