// Adapters layer: concrete implementations for external systems (email provider, HTTP hosts).

#[cfg(feature = "lambda")]
pub mod lambda;
pub mod resend;
#[cfg(feature = "cli")]
pub mod server;

pub use resend::ResendSender;
