use super::Configuration;
use crate::MetaloginError;
use anyhow::Context;
use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;
use tracing::debug;

/// Decode a configuration from its YAML text.
///
/// Absent fields default to empty strings and empty collections; blank input decodes to
/// [`Configuration::empty`].
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 YAML matching the configuration schema
pub fn decode(bytes: &[u8]) -> Result<Configuration, MetaloginError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Configuration::empty());
    }

    Ok(serde_yaml::from_slice(bytes)?)
}

/// Read the destination configuration, treating a missing file as an empty configuration
///
/// # Errors
///
/// Returns an error if:
/// - Unable to read the file (when it exists)
/// - Unable to parse the YAML content
pub fn read_destination_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Configuration> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        debug!("{} does not exist, starting from an empty configuration", path_ref.display());
        return Ok(Configuration::empty());
    }

    let content = fs::read(path_ref)
        .with_context(|| format!("failed to read `{}`", path_ref.display()))?;

    let config = decode(&content)
        .with_context(|| format!("failed to unmarshal `{}`", path_ref.display()))?;

    debug!(
        "Destination holds {} cluster(s), {} user(s), {} context(s)",
        config.clusters.len(),
        config.users.len(),
        config.contexts.len()
    );

    Ok(config)
}

/// Read all bytes from an input stream
///
/// # Errors
///
/// Returns an error if reading fails or the stream produced zero bytes
pub fn read_input<R: Read>(mut input: R) -> Result<Vec<u8>, MetaloginError> {
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes)?;

    if bytes.is_empty() {
        return Err(MetaloginError::EmptyInput);
    }

    Ok(bytes)
}

/// Read the source configuration piped into standard input
///
/// # Errors
///
/// Returns an error if:
/// - Standard input is attached to a terminal rather than a pipe
/// - Reading from standard input fails or yields nothing
/// - Unable to parse the YAML content
pub fn read_source_config() -> anyhow::Result<Configuration> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Err(MetaloginError::NotPiped.into());
    }

    read_source_from(stdin.lock())
}

/// Read a source configuration from any byte stream
///
/// # Errors
///
/// Returns an error if the stream is empty, unreadable, or not a valid configuration
pub fn read_source_from<R: Read>(input: R) -> anyhow::Result<Configuration> {
    let bytes = read_input(input).context("failed to read configuration from the input stream")?;
    debug!("Read {} byte(s) of source configuration", bytes.len());

    decode(&bytes).context("failed to unmarshal configuration from the input stream")
}
