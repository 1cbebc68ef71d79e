use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::FermyonError;

/// File name lima reads an instance's configuration from.
pub const TEMPLATE_FILE: &str = "lima.yaml";

/// Resolve the Lima directory: `$LIMA_HOME` when set, otherwise `~/.lima`.
///
/// A relative `$LIMA_HOME` is taken relative to `cwd`. An existing
/// directory has its symlinks resolved so the path matches what limactl
/// itself sees.
pub fn lima_dir(
    lima_home: Option<&OsString>,
    home: Option<&Path>,
    cwd: Option<&Path>,
) -> Result<PathBuf, FermyonError> {
    let dir = match lima_home.filter(|v| !v.is_empty()) {
        Some(v) => {
            let p = PathBuf::from(v);
            if p.is_absolute() {
                p
            } else {
                let cwd = cwd.ok_or_else(|| FermyonError::ConfigRootUnresolved {
                    message: format!(
                        "$LIMA_HOME is relative ({}) and the current directory is unknown",
                        p.display()
                    ),
                })?;
                cwd.join(p)
            }
        }
        None => {
            let home = home.ok_or_else(|| FermyonError::ConfigRootUnresolved {
                message: "$HOME is not defined".into(),
            })?;
            home.join(".lima")
        }
    };

    if !dir.exists() {
        return Ok(dir);
    }
    dir.canonicalize().map_err(|source| FermyonError::Io {
        context: format!("resolving {}", dir.display()),
        source,
    })
}

/// Per-instance Lima directory: `<lima>/<instance>/`
pub fn instance_dir(lima_dir: &Path, instance: &str) -> PathBuf {
    lima_dir.join(instance)
}

/// Path the embedded template is written to for an instance.
pub fn template_path(lima_dir: &Path, instance: &str) -> PathBuf {
    instance_dir(lima_dir, instance).join(TEMPLATE_FILE)
}

/// Default settings file: `~/.config/fermyon/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fermyon").join("config.toml"))
}

/// Per-instance log file: `<data>/fermyon/<instance>/fermyon.log`
pub fn log_path(data_dir: &Path, instance: &str) -> PathBuf {
    data_dir.join("fermyon").join(instance).join("fermyon.log")
}
