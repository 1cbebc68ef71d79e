//! Precondition checks and routing from a parsed command line to its
//! handler.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::action::{self, ActionContext};
use crate::cli::{Cli, Command};
use crate::config::{self, Settings};
use crate::error::FermyonError;
use crate::logging::LogFileHandle;
use crate::paths;
use crate::runner::{Runner, Streams};
use crate::template::SPIN_TEMPLATE;

/// Process-wide facts captured once at startup.
#[derive(Debug, Clone)]
pub struct HostEnv {
    pub euid: u32,
    pub lima_home: Option<OsString>,
    /// `$HOME` only, never the passwd entry.
    pub home: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    /// Settings file consulted when `--config` is not given.
    pub default_config: Option<PathBuf>,
    /// Base directory for per-instance log files.
    pub data_dir: Option<PathBuf>,
    pub template: &'static [u8],
    /// Per-instance log file, attached for `up` and `down`.
    pub log_file: Option<LogFileHandle>,
}

impl HostEnv {
    pub fn capture(log_file: Option<LogFileHandle>) -> Self {
        Self::from_vars(|key| std::env::var_os(key), log_file)
    }

    /// Capture using `var` to look up environment variables.
    pub fn from_vars(
        var: impl Fn(&str) -> Option<OsString>,
        log_file: Option<LogFileHandle>,
    ) -> Self {
        // SAFETY: geteuid has no preconditions and cannot fail.
        let euid = unsafe { libc::geteuid() };
        Self {
            euid,
            lima_home: var("LIMA_HOME"),
            home: var("HOME").filter(|h| !h.is_empty()).map(PathBuf::from),
            cwd: std::env::current_dir().ok(),
            default_config: paths::default_config_path(),
            data_dir: dirs::data_local_dir(),
            template: SPIN_TEMPLATE,
            log_file,
        }
    }
}

/// Refuse root, then resolve the Lima directory.
pub fn preflight(env: &HostEnv) -> Result<PathBuf, FermyonError> {
    if env.euid == 0 {
        return Err(FermyonError::RunAsRoot);
    }
    let dir = paths::lima_dir(env.lima_home.as_ref(), env.home.as_deref(), env.cwd.as_deref())?;
    tracing::debug!(lima_dir = %dir.display(), "resolved Lima directory");
    Ok(dir)
}

/// Load settings and pick the instance a command acts on.
fn resolve_instance(
    cli: &Cli,
    env: &HostEnv,
    name: Option<&str>,
) -> Result<(Settings, String), FermyonError> {
    let settings = config::load_settings(cli.config.as_deref(), env.default_config.as_deref())?;
    let instance = settings.instance_for(name)?;
    tracing::debug!(command = cli.command.name(), instance = %instance, "dispatching");
    Ok((settings, instance))
}

/// Send the debug log for `instance` to its file, if file logging is set up.
fn attach_log_file(env: &HostEnv, instance: &str) {
    let (Some(log), Some(data_dir)) = (&env.log_file, &env.data_dir) else {
        return;
    };
    let path = paths::log_path(data_dir, instance);
    match log.activate(&path) {
        Ok(()) => tracing::debug!(path = %path.display(), "logging to file"),
        Err(e) => tracing::debug!(path = %path.display(), error = %e, "file logging unavailable"),
    }
}

/// Run preconditions and the selected handler.
pub async fn dispatch<R: Runner>(
    cli: &Cli,
    env: &HostEnv,
    runner: &R,
    streams: &mut Streams<'_>,
) -> Result<(), FermyonError> {
    let lima_dir = preflight(env)?;

    match &cli.command {
        // never depends on settings or the filesystem
        Command::Environment { .. } => action::environment::run(streams),
        Command::Up { name } => {
            let (settings, instance) = resolve_instance(cli, env, name.as_deref())?;
            attach_log_file(env, &instance);
            let ctx = ActionContext {
                lima_dir: &lima_dir,
                settings: &settings,
                template: env.template,
            };
            action::up::run(&ctx, &instance, runner, streams).await
        }
        Command::Down { name } => {
            let (settings, instance) = resolve_instance(cli, env, name.as_deref())?;
            attach_log_file(env, &instance);
            action::down::run(&settings, &instance, runner, streams).await
        }
        Command::Status { name } => {
            let (settings, instance) = resolve_instance(cli, env, name.as_deref())?;
            action::status::run(&settings, &instance, runner, streams).await
        }
    }
}
