// Domain layer: lead model and the email-sending port.

pub mod model;
pub mod ports;

pub use model::{DemoRequest, OutboundEmail, SendReceipt};
pub use ports::EmailSender;
