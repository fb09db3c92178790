//! HTTP side of the tracker: a thin JSON transport, one generic
//! [`engine::Remote`] per REST collection and the layered configuration.
pub use crate::client::Client;
pub use crate::config::{AppConfig, load, load_from};
pub use crate::error::{AppError, ClientError, Result};
pub use crate::remote::{
    Accounts, Budgets, Endpoint, InvoiceItems, MediaUsages, RestRemote, Shops, facade,
};

mod client;
mod config;
mod error;
mod remote;
