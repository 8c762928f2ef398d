use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("context key '{key}' has no value — cannot resolve deployment environment")]
    ConfigurationMissing { key: String },

    #[error("context value for '{key}' is not {expected}")]
    ContextValueInvalid { key: String, expected: &'static str },

    #[error("environment record has no '{field}' field")]
    RecordFieldMissing { field: String },

    // ── Context file loading ──
    #[error("failed to load context from {path}")]
    ContextLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse context at {path}")]
    ContextParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("context file {path} must contain a top-level JSON object")]
    ContextNotObject { path: PathBuf },

    // ── Defaults file loading ──
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
