use crate::domain::model::{OutboundEmail, SendReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 寄信能力，測試時可替換成假的實作
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt>;
}

