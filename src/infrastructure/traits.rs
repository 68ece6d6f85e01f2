//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the export path
//! to be tested with mock implementations.

use std::io::{self, Write};
use std::process::{Output, Stdio};

use tracing::debug;

use crate::infrastructure::{InfraError, InfraResult};

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;

    /// Run a command, feeding `stdin` bytes to it.
    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &[u8]) -> io::Result<Output>;
}

/// Clipboard sink for exported images.
pub trait ClipboardWriter: Send + Sync {
    /// Place PNG bytes on the system clipboard.
    fn write_png(&self, png: &[u8]) -> InfraResult<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd).args(args).output()
    }

    fn run_with_stdin(&self, cmd: &str, args: &[&str], stdin: &[u8]) -> io::Result<Output> {
        let mut child = std::process::Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut child_stdin) = child.stdin.take() {
            child_stdin.write_all(stdin)?;
        }

        child.wait_with_output()
    }
}

/// Candidate clipboard tools probed in order when none is configured.
/// Each entry is (command, args) expecting image/png on stdin.
const CLIPBOARD_CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &["-t", "image/png"]),
    ("xclip", &["-selection", "clipboard", "-t", "image/png"]),
];

/// Clipboard writer that shells out to a platform clipboard tool.
pub struct CommandClipboard {
    runner: Box<dyn CommandRunner>,
    /// Explicit command from config, e.g. "wl-copy -t image/png"
    command: Option<String>,
}

impl CommandClipboard {
    pub fn new(runner: Box<dyn CommandRunner>, command: Option<String>) -> Self {
        Self { runner, command }
    }

    fn run_tool(&self, cmd: &str, args: &[&str], png: &[u8]) -> io::Result<Output> {
        debug!(cmd, ?args, "invoking clipboard tool");
        self.runner.run_with_stdin(cmd, args, png)
    }
}

impl ClipboardWriter for CommandClipboard {
    fn write_png(&self, png: &[u8]) -> InfraResult<()> {
        if let Some(command) = &self.command {
            let mut parts = command.split_whitespace();
            let cmd = parts.next().ok_or(InfraError::Clipboard {
                message: "empty clipboard command".into(),
                exit_code: None,
            })?;
            let args: Vec<&str> = parts.collect();
            let output = self
                .run_tool(cmd, &args, png)
                .map_err(|e| InfraError::Clipboard {
                    message: format!("{cmd}: {e}"),
                    exit_code: None,
                })?;
            return check_status(cmd, output);
        }

        for (cmd, args) in CLIPBOARD_CANDIDATES {
            match self.run_tool(cmd, args, png) {
                Ok(output) => return check_status(cmd, output),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(InfraError::Clipboard {
                        message: format!("{cmd}: {e}"),
                        exit_code: None,
                    })
                }
            }
        }
        Err(InfraError::NoClipboardTool {
            tried: CLIPBOARD_CANDIDATES
                .iter()
                .map(|(c, _)| *c)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

fn check_status(cmd: &str, output: Output) -> InfraResult<()> {
    if output.status.success() {
        Ok(())
    } else {
        Err(InfraError::Clipboard {
            message: format!(
                "{cmd} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            exit_code: output.status.code(),
        })
    }
}
