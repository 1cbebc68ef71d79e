use std::path::{Path, PathBuf};

use crate::error::FermyonError;
use crate::paths;

/// Lima configuration for the development VM, baked in at build time.
pub const SPIN_TEMPLATE: &[u8] = include_bytes!("../templates/spin.yaml");

/// Write `template` into the instance directory, creating it if needed.
/// An existing file is replaced wholesale.
pub fn write_template(
    lima_dir: &Path,
    instance: &str,
    template: &[u8],
) -> Result<PathBuf, FermyonError> {
    let dir = paths::instance_dir(lima_dir, instance);
    std::fs::create_dir_all(&dir).map_err(|source| FermyonError::Io {
        context: format!("creating {}", dir.display()),
        source,
    })?;

    let file = paths::template_path(lima_dir, instance);
    std::fs::write(&file, template).map_err(|source| FermyonError::Io {
        context: format!("writing {}", file.display()),
        source,
    })?;
    tracing::debug!(path = %file.display(), bytes = template.len(), "wrote instance template");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_lima_yaml() {
        let text = std::str::from_utf8(SPIN_TEMPLATE).unwrap();
        assert!(text.contains("images:"));
        assert!(text.contains("nomad"));
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let lima = dir.path().join("nested").join(".lima");
        let file = write_template(&lima, "spin", b"cpus: 2\n").unwrap();
        assert_eq!(file, lima.join("spin").join("lima.yaml"));
        assert_eq!(std::fs::read(&file).unwrap(), b"cpus: 2\n");
    }

    #[test]
    fn overwrites_longer_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_template(dir.path(), "spin", b"a much longer previous document\n").unwrap();
        write_template(dir.path(), "spin", b"short\n").unwrap();
        assert_eq!(std::fs::read(&file).unwrap(), b"short\n");
    }

    #[test]
    fn reports_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join(".lima");
        std::fs::write(&blocker, "not a directory").unwrap();
        let err = write_template(&blocker, "spin", SPIN_TEMPLATE).unwrap_err();
        assert!(matches!(err, FermyonError::Io { .. }));
        assert!(err.to_string().starts_with("creating "));
    }
}
