//! Error types for configuration loading and artifact generation.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration that cannot be read or does not describe a valid key map.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// `default-code` is neither an extra enumerator nor a mapped code.
    #[error("default code `{0}` is not declared in `enums` or `map`")]
    UnknownDefaultCode(String),

    #[error("code `{0}` is declared more than once")]
    DuplicateCode(String),

    /// The name would shadow a parameter or local of the generated functions.
    #[error("field name `{0}` is reserved")]
    ReservedFieldName(String),

    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    #[error("key {key:?} sets field `{field}`, which is not declared in `fields`")]
    UndeclaredField { key: String, field: String },

    /// Field values are emitted verbatim and must be strings, numbers or booleans.
    #[error("{owner} gives field `{field}` an unsupported value {value}")]
    UnsupportedFieldValue {
        owner: String,
        field: String,
        value: serde_json::Value,
    },

    #[error("key {0:?} has no `key` name, required when `class-names.keys` is set")]
    MissingKeyName(String),

    #[error("key {0:?} contains a NUL byte")]
    NulInKey(String),
}

/// Failure to produce the generated artifacts.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
