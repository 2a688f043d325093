//! Error types for the skillconv CLI.

use std::{
    env::VarError,
    io,
    path::PathBuf,
    process::{ExitCode, ExitStatus},
    result::Result as StdResult,
};

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for conversion operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {path}")]
    ConfigMissing {
        /// Path to the config file.
        path: PathBuf,
    },
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// The source tree root does not exist.
    #[error("Source directory not found: {path}")]
    SourceMissing {
        /// Missing source root.
        path: PathBuf,
    },
    /// The target tree root does not exist.
    #[error("Target directory not found: {path}")]
    TargetMissing {
        /// Missing target root.
        path: PathBuf,
    },
    /// A directory could not be listed.
    #[error("Failed to read directory {path}: {source}")]
    DirRead {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A recursive directory walk failed.
    #[error("Failed to walk {path}: {source}")]
    Walk {
        /// Root of the walk.
        path: PathBuf,
        /// Underlying walk error.
        source: walkdir::Error,
    },
    /// A document could not be read.
    #[error("Failed to read {path}: {source}")]
    FileRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A file could not be written or its directory created.
    #[error("Failed to write {path}: {source}")]
    FileWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A file could not be copied.
    #[error("Failed to copy {from} to {to}: {source}")]
    FileCopy {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The summary could not be serialized.
    #[error("Failed to serialize summary: {source}")]
    SummarySerialize {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
    /// A pager was specified but could not be parsed.
    #[error("Invalid pager command: {message}")]
    PagerParse {
        /// Error message describing the parse failure.
        message: String,
    },
    /// A pager command could not be spawned.
    #[error("Failed to run pager `{pager}`: {source}")]
    PagerSpawn {
        /// Pager command that failed to spawn.
        pager: String,
        /// Underlying spawn error.
        source: io::Error,
    },
    /// A pager process exited with a non-zero status.
    #[error("Pager `{pager}` exited with status {status}")]
    PagerStatus {
        /// Pager command that exited.
        pager: String,
        /// Exit status returned by the pager.
        status: ExitStatus,
    },
    /// Failed to write to a pager process.
    #[error("Failed to write to pager `{pager}`: {source}")]
    PagerWrite {
        /// Pager command that failed to receive input.
        pager: String,
        /// Underlying write error.
        source: io::Error,
    },
    /// Validation found invalid documents.
    #[error("Validation failed: {invalid} invalid document(s)")]
    ValidationFailed {
        /// Number of invalid documents.
        invalid: usize,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}
