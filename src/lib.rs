#![allow(missing_docs)]

pub mod app_config;
pub mod cli;
pub mod config;
pub mod merge;

pub use config::Configuration;
pub use merge::{merge, merge_with_names, MergeError, MergeReport, SourceNames};

/// Shown when the source configuration is not piped in
pub const PIPE_USAGE: &str = "The program is intended to work with pipes.
Usage: ssh user@my-server \"cat ~/.kube/config\" | metalogin -c ~/.kube/config";

#[derive(Debug, thiserror::Error)]
pub enum MetaloginError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{}", PIPE_USAGE)]
    NotPiped,

    #[error("no configuration in the input stream")]
    EmptyInput,
}
