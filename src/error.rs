/// Crate-level error types for twitter-direct diagnostics.
use std::path::PathBuf;

/// Errors raised around the transformer: reading documents, loading config,
/// writing results. The transformer itself never fails; a document it cannot
/// make sense of just yields fewer replacements.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The document file exists but is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    InvalidJson {
        /// File that failed to parse.
        path: PathBuf,
        /// The underlying parse error, with line and column.
        source: serde_json::Error,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Serializing a transformed document failed.
    #[error("json serialize: {0}")]
    Serialize(
        /// The wrapped serialization error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No built-in profile has the requested name.
    #[error("unknown profile: `{name}`")]
    UnknownProfile {
        /// Profile name that was requested.
        name: String,
    },
}
