pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ResendSender;
pub use config::{ConfigPolicy, RelayConfig, TomlConfig};
pub use crate::core::{DemoRequestHandler, InboundRequest, RequestBody};
pub use domain::{DemoRequest, EmailSender, OutboundEmail, SendReceipt};
pub use utils::error::{RelayError, Result};
