//! The module contains the errors the engine can return.
//!
//! Network failures never show up here: they are folded into
//! [`AsyncResource::Error`] by the runner. The errors are:
//!
//! - [`Worker`] returned when a background diff task could not be joined.
//! - [`Runtime`] returned when a runner is created outside a tokio runtime.
//! - [`InvalidPeriod`] returned when a month selector is out of range.
//! - [`InvalidConfig`] returned when a chart/timezone setting is unusable.
//!
//!  [`AsyncResource::Error`]: crate::AsyncResource::Error
//!  [`Worker`]: EngineError::Worker
//!  [`Runtime`]: EngineError::Runtime
//!  [`InvalidPeriod`]: EngineError::InvalidPeriod
//!  [`InvalidConfig`]: EngineError::InvalidConfig
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("background worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("no async runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Worker(a), Self::Worker(b)) => a.to_string() == b.to_string(),
            (Self::Runtime(a), Self::Runtime(b)) => a.to_string() == b.to_string(),
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (Self::InvalidConfig(a), Self::InvalidConfig(b)) => a == b,
            _ => false,
        }
    }
}
