use super::Configuration;
use crate::MetaloginError;
use anyhow::Context;
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Permission bits for a newly created destination: owner read/write only
pub const NEW_FILE_MODE: u32 = 0o600;

/// Encode a configuration as YAML text
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn encode(config: &Configuration) -> Result<String, MetaloginError> {
    Ok(serde_yaml::to_string(config)?)
}

/// Write encoded configuration bytes to a file.
///
/// An existing file keeps its permissions; a new file is created with [`NEW_FILE_MODE`] on Unix.
///
/// # Errors
///
/// Returns an error if:
/// - Unable to inspect the existing file
/// - Unable to create parent directories
/// - Unable to write to the file
pub fn write_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> anyhow::Result<()> {
    let path_ref = path.as_ref();

    let existing = match fs::metadata(path_ref) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(e).with_context(|| {
                format!("failed to get information about `{}`", path_ref.display())
            })
        },
    };

    // Ensure parent directory exists
    if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory `{}`", parent.display()))?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(NEW_FILE_MODE);
    }

    let mut file = options
        .open(path_ref)
        .with_context(|| format!("failed to open `{}` for writing", path_ref.display()))?;
    file.write_all(bytes)
        .with_context(|| format!("failed to write `{}`", path_ref.display()))?;

    match existing {
        Some(permissions) => {
            debug!("Preserved permissions of {}", path_ref.display());
            fs::set_permissions(path_ref, permissions).with_context(|| {
                format!("failed to restore permissions of `{}`", path_ref.display())
            })?;
        },
        None => debug!("Created {}", path_ref.display()),
    }

    Ok(())
}

/// Create a backup of a file with timestamp
///
/// # Errors
///
/// Returns an error if unable to copy the file
pub fn backup_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Option<String>> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Ok(None);
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = path_ref.with_file_name(format!(
        "{}.backup.{}",
        path_ref.file_name().and_then(|n| n.to_str()).unwrap_or("config"),
        timestamp
    ));

    fs::copy(path_ref, &backup_path).with_context(|| {
        format!("failed to copy `{}` to `{}`", path_ref.display(), backup_path.display())
    })?;

    Ok(Some(backup_path.to_string_lossy().to_string()))
}
