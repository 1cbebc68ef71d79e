use std::path::Path;

use facet::Facet;

use crate::error::FermyonError;

pub const DEFAULT_INSTANCE: &str = "spin";
pub const DEFAULT_SUPERVISOR: &str = "limactl";
pub const DEFAULT_HTTP_CLIENT: &str = "curl";

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Facet)]
pub struct SettingsFile {
    #[facet(default)]
    pub instance: Option<String>,
    #[facet(default)]
    pub supervisor: Option<String>,
    #[facet(default)]
    pub http_client: Option<String>,
}

/// Resolved settings used by the action handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Instance name used when a command is given none.
    pub instance: String,
    /// VM supervisor executable.
    pub supervisor: String,
    /// Executable used for the health check.
    pub http_client: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            instance: DEFAULT_INSTANCE.into(),
            supervisor: DEFAULT_SUPERVISOR.into(),
            http_client: DEFAULT_HTTP_CLIENT.into(),
        }
    }
}

impl Settings {
    /// Pick the instance for a command: the explicit argument if given,
    /// else the configured default.
    pub fn instance_for(&self, name: Option<&str>) -> Result<String, FermyonError> {
        match name {
            Some(n) => {
                validate_instance_name(n)?;
                Ok(n.to_string())
            }
            None => Ok(self.instance.clone()),
        }
    }
}

/// Load settings.
///
/// An explicit path must exist. The default path is optional; when it is
/// absent the built-in defaults apply.
pub fn load_settings(
    explicit: Option<&Path>,
    default_path: Option<&Path>,
) -> Result<Settings, FermyonError> {
    let path = match (explicit, default_path) {
        (Some(p), _) => p,
        (None, Some(p)) if p.exists() => p,
        _ => {
            tracing::debug!("no settings file, using defaults");
            return Ok(Settings::default());
        }
    };

    let contents = std::fs::read_to_string(path).map_err(|source| FermyonError::ConfigLoad {
        path: path.display().to_string(),
        source,
    })?;

    let settings = parse_settings(&contents).map_err(|e| match e {
        FermyonError::ConfigParse { message, .. } => FermyonError::ConfigParse {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })?;
    tracing::debug!(path = %path.display(), ?settings, "loaded settings");
    Ok(settings)
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings, FermyonError> {
    let file: SettingsFile =
        facet_toml::from_str(contents).map_err(|e| FermyonError::ConfigParse {
            path: String::new(),
            message: e.to_string(),
        })?;

    let defaults = Settings::default();
    let settings = Settings {
        instance: file.instance.unwrap_or(defaults.instance),
        supervisor: file.supervisor.unwrap_or(defaults.supervisor),
        http_client: file.http_client.unwrap_or(defaults.http_client),
    };
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<(), FermyonError> {
    validate_instance_name(&settings.instance)?;
    if settings.supervisor.trim().is_empty() {
        return Err(FermyonError::Validation {
            message: "supervisor must not be empty".into(),
        });
    }
    if settings.http_client.trim().is_empty() {
        return Err(FermyonError::Validation {
            message: "http_client must not be empty".into(),
        });
    }
    Ok(())
}

/// Instance names become directory names under the Lima directory, so
/// they are restricted to `[a-zA-Z0-9][a-zA-Z0-9._-]*`.
pub fn validate_instance_name(name: &str) -> Result<(), FermyonError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
    if !valid {
        return Err(FermyonError::Validation {
            message: format!("instance name must match [a-zA-Z0-9][a-zA-Z0-9._-]* (got '{name}')"),
        });
    }
    Ok(())
}
