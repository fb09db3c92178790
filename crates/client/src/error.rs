use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised while setting the client up.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("engine error: {0}")]
    Engine(#[from] engine::EngineError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client-side faults of a single request.
///
/// Server rejections are not faults: they come back as
/// [`engine::Outcome::Failure`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
