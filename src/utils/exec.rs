//! External command execution utilities.
//!
//! Provides a Builder-based API for running external tools with their
//! standard input and output streamed through caller-provided readers and
//! writers.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Stream a source file through a compiler
//! Cmd::new(binary)
//!     .args(["-sc", "--bare"])
//!     .cwd(root)
//!     .env_clear()
//!     .envs(environ)
//!     .stream(&mut source, &mut compiled)?;
//! ```

use crate::debug;
use std::{
    ffi::{OsStr, OsString},
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
    thread,
};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Failure to run an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open the {stream} pipe of `{program}`")]
    Pipe {
        program: String,
        stream: &'static str,
    },

    #[error("failed to {action} `{program}`")]
    Io {
        program: String,
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("command `{program}` failed with {status}")]
    Failed { program: String, status: ExitStatus },
}

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
    clear_env: bool,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Start the subprocess from an empty environment.
    ///
    /// Only variables added through [`Cmd::envs`] are visible to it.
    pub fn env_clear(mut self) -> Self {
        self.clear_env = true;
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs
                .push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Program followed by its arguments, for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command, feeding `input` to its stdin and copying its stdout
    /// into `output` as it is produced.
    ///
    /// The input is written from a scoped worker thread so a process that
    /// emits output before consuming all input cannot block on a full pipe.
    /// The worker closes stdin when the copy ends and is joined before the
    /// exit status is inspected. Stderr is inherited.
    pub fn stream<R, W>(self, input: &mut R, output: &mut W) -> Result<(), ExecError>
    where
        R: Read + Send + ?Sized,
        W: Write + ?Sized,
    {
        let name = self.program_name();
        debug!("exec"; "{}", self.command_line());

        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: name.clone(),
                source,
            })?;

        let Some(stdin) = child.stdin.take() else {
            reap(&mut child);
            return Err(ExecError::Pipe { program: name, stream: "stdin" });
        };
        let Some(mut stdout) = child.stdout.take() else {
            reap(&mut child);
            return Err(ExecError::Pipe { program: name, stream: "stdout" });
        };

        let (read, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || {
                let mut stdin = stdin;
                io::copy(input, &mut stdin)
            });

            let read = io::copy(&mut stdout, &mut *output).and_then(|_| output.flush());
            // Closing our end lets the child see EPIPE if we stopped early.
            drop(stdout);

            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (read, written)
        });

        let status = child.wait().map_err(|source| ExecError::Io {
            program: name.clone(),
            action: "wait for",
            source,
        })?;

        if !status.success() {
            return Err(ExecError::Failed { program: name, status });
        }

        read.map_err(|source| ExecError::Io {
            program: name.clone(),
            action: "read output of",
            source,
        })?;

        match written {
            // The tool may legitimately exit before reading everything.
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => Err(ExecError::Io {
                program: name,
                action: "write input to",
                source: err,
            }),
            _ => Ok(()),
        }
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if self.clear_env {
            cmd.env_clear();
        }
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)));

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Kill and wait for a child that will not be driven any further.
fn reap(child: &mut std::process::Child) {
    child.kill().ok();
    child.wait().ok();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_cmd_builder() {
        let cmd = Cmd::new("coffee")
            .arg("-sc")
            .args(["--bare", "--no-header"])
            .cwd("/tmp");

        assert_eq!(cmd.program, OsString::from("coffee"));
        assert_eq!(cmd.args.len(), 3);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(cmd.command_line(), "coffee -sc --bare --no-header");
    }

    #[test]
    fn test_empty_args_filtered() {
        let cmd = Cmd::new("coffee").arg("").args(["-sc", "", "--bare"]);
        assert_eq!(cmd.args.len(), 2);
    }

    #[test]
    fn test_spawn_missing_program() {
        let err = Cmd::new("/nonexistent/definitely-not-a-tool")
            .stream(&mut Cursor::new(b"x"), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_stream_through_cat() {
        let mut out = Vec::new();
        Cmd::new("cat")
            .stream(&mut Cursor::new(b"x = 1\n".to_vec()), &mut out)
            .unwrap();
        assert_eq!(out, b"x = 1\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_stream_large_input_does_not_block() {
        // Larger than any pipe buffer in both directions.
        let data: Vec<u8> = (0..4 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        let mut out = Vec::new();
        Cmd::new("cat")
            .stream(&mut Cursor::new(data.clone()), &mut out)
            .unwrap();
        assert_eq!(out.len(), data.len());
        assert!(out == data);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_without_reading_input() {
        let data = vec![b'x'; 4 * 1024 * 1024];
        let mut out = Vec::new();
        Cmd::new("/bin/sh")
            .args(["-c", "exit 0"])
            .stream(&mut Cursor::new(data), &mut out)
            .unwrap();
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let err = Cmd::new("/bin/sh")
            .args(["-c", "cat >/dev/null; exit 3"])
            .stream(&mut Cursor::new(b"x = 1".to_vec()), &mut Vec::new())
            .unwrap_err();
        match err {
            ExecError::Failed { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_cleared_environment() {
        let mut out = Vec::new();
        Cmd::new("/bin/sh")
            .args(["-c", "printf '%s|%s' \"$ONLY\" \"$HOME\""])
            .env_clear()
            .envs([("ONLY", "set")])
            .stream(&mut io::empty(), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "set|");
    }

    #[cfg(unix)]
    #[test]
    fn test_working_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut out = Vec::new();
        Cmd::new("/bin/sh")
            .args(["-c", "pwd -P"])
            .cwd(dir.path())
            .stream(&mut io::empty(), &mut out)
            .unwrap();
        let printed = PathBuf::from(String::from_utf8(out).unwrap().trim());
        assert_eq!(printed, dir.path().canonicalize().unwrap());
    }
}
