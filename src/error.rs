use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FermyonError {
    #[error("must not run as the root")]
    #[diagnostic(help("run fermyon as your regular user; limactl manages the VM without root"))]
    RunAsRoot,

    #[error("cannot resolve the Lima directory: {message}")]
    #[diagnostic(help("set $HOME or $LIMA_HOME"))]
    ConfigRootUnresolved { message: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config from {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program}: executable file not found in $PATH")]
    CommandNotFound { program: String },

    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {}", exit_description(.code))]
    CommandFailed { program: String, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exited with status {c}"),
        None => "was terminated by a signal".to_string(),
    }
}

impl FermyonError {
    /// Process exit code for this error: the child's own code when one
    /// was propagated, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            FermyonError::CommandFailed { code: Some(c), .. } if *c != 0 => *c,
            _ => 1,
        }
    }
}
