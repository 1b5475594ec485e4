use thiserror::Error;

/// Errors that can occur while looking up Mendeley references.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no Mendeley database configured or discoverable")]
    ConfigurationMissing,

    #[error("connection error: {message} (path: {path})")]
    Connection { message: String, path: String },

    #[error("database error: {message} (operation: {operation})")]
    Database { message: String, operation: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("launch error: {message} (path: {path})")]
    Launch { message: String, path: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `LookupError`.
pub type Result<T> = std::result::Result<T, LookupError>;
