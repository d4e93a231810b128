//! Error types for the gateway.

/// Errors raised while configuring the gateway or decoding a callback.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// An environment variable holds a value that can't be used.
    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    /// No catalog is registered under this game name.
    #[error("unknown game variant {0:?}")]
    UnknownGame(String),

    /// A button callback didn't carry the expected JSON.
    #[error("malformed interaction payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The HTTP client could not be built.
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
}
