use crate::domain::model::OutboundMessage;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Delivers a composed message to every configured recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// False when the credential or the recipient list is empty.
    fn is_configured(&self) -> bool;

    /// Succeeds only if every recipient accepted the message.
    async fn notify(&self, message: &OutboundMessage) -> Result<()>;
}
