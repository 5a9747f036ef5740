use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dotenv error: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unexpected_response(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    /// True when the inference server answered but its body did not match the
    /// expected shape.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::UnexpectedResponse(_))
    }
}
