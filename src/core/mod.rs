pub mod compose;
pub mod handler;

pub use crate::domain::{DemoRequest, EmailSender, OutboundEmail, SendReceipt};
pub use crate::utils::error::Result;
pub use handler::{DemoRequestHandler, InboundRequest, RequestBody};
