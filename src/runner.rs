//! External command execution.
//!
//! Children run to completion with their output buffered; the captured
//! stdout and stderr are then relayed to the caller's streams before any
//! failure is reported.

use std::io::{ErrorKind, Write};
use std::process::Stdio;

use crate::error::FermyonError;

/// Output and error streams a command writes through.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }

    /// Write text to the output stream.
    pub fn print(&mut self, text: &str) -> Result<(), FermyonError> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|source| FermyonError::Io {
                context: "writing to stdout".into(),
                source,
            })
    }
}

/// Everything a finished child produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Spawns external commands. Errors are reserved for children that could
/// not be started; exit status is reported through `Invocation::code`.
#[allow(async_fn_in_trait)] // trait is internal-only
pub trait Runner {
    async fn exec(&self, argv: &[String]) -> Result<Invocation, FermyonError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    async fn exec(&self, argv: &[String]) -> Result<Invocation, FermyonError> {
        let (program, args) = argv.split_first().ok_or_else(|| FermyonError::Validation {
            message: "cannot run an empty command".into(),
        })?;

        tracing::debug!(?argv, "running command");
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => FermyonError::CommandNotFound {
                    program: program.clone(),
                },
                _ => FermyonError::Spawn {
                    program: program.clone(),
                    source,
                },
            })?;

        tracing::debug!(
            program = %program,
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "command finished"
        );
        Ok(Invocation {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code(),
        })
    }
}

/// Run `argv`, relay its captured output, then fail if it did not exit 0.
pub async fn shell_out<R: Runner>(
    runner: &R,
    argv: &[String],
    streams: &mut Streams<'_>,
) -> Result<Invocation, FermyonError> {
    let invocation = runner.exec(argv).await?;
    relay(&invocation, streams)?;

    if !invocation.success() {
        let err = FermyonError::CommandFailed {
            program: argv.first().cloned().unwrap_or_default(),
            code: invocation.code,
        };
        tracing::debug!(error = %err, "command failed");
        return Err(err);
    }
    Ok(invocation)
}

fn relay(invocation: &Invocation, streams: &mut Streams<'_>) -> Result<(), FermyonError> {
    let io_err = |context: &str| {
        let context = context.to_string();
        move |source| FermyonError::Io { context, source }
    };
    streams
        .out
        .write_all(&invocation.stdout)
        .and_then(|()| streams.out.flush())
        .map_err(io_err("writing to stdout"))?;
    streams
        .err
        .write_all(&invocation.stderr)
        .and_then(|()| streams.err.flush())
        .map_err(io_err("writing to stderr"))?;
    Ok(())
}

/// Build an argument list from string literals and owned values alike.
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Records every argv and replays canned results in order. Once the
    /// script runs out, every call succeeds with empty output.
    #[derive(Default)]
    pub struct FakeRunner {
        pub calls: RefCell<Vec<Vec<String>>>,
        script: RefCell<VecDeque<Result<Invocation, FermyonError>>>,
    }

    impl FakeRunner {
        pub fn push_ok(&self, stdout: &str) {
            self.script.borrow_mut().push_back(Ok(Invocation {
                stdout: stdout.as_bytes().to_vec(),
                stderr: Vec::new(),
                code: Some(0),
            }));
        }

        pub fn push_exit(&self, code: i32, stderr: &str) {
            self.script.borrow_mut().push_back(Ok(Invocation {
                stdout: Vec::new(),
                stderr: stderr.as_bytes().to_vec(),
                code: Some(code),
            }));
        }

        pub fn push_err(&self, err: FermyonError) {
            self.script.borrow_mut().push_back(Err(err));
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }
    }

    impl Runner for FakeRunner {
        async fn exec(&self, argv: &[String]) -> Result<Invocation, FermyonError> {
            self.calls.borrow_mut().push(argv.to_vec());
            self.script.borrow_mut().pop_front().unwrap_or_else(|| {
                Ok(Invocation {
                    code: Some(0),
                    ..Invocation::default()
                })
            })
        }
    }
}
