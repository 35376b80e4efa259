use crate::domain::model::{LeadSubmission, OutboundMessage};
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use std::sync::Arc;

/// Turns a raw lead body into a delivered notification.
#[derive(Clone)]
pub struct LeadRelay {
    notifier: Arc<dyn Notifier>,
}

impl LeadRelay {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn is_configured(&self) -> bool {
        self.notifier.is_configured()
    }

    /// Parse, validate, compose and dispatch. Parse and dispatch
    /// failures are not told apart by the caller-facing status.
    pub async fn submit(&self, raw: &[u8]) -> Result<()> {
        let lead = LeadSubmission::from_slice(raw)?;
        lead.validate()?;

        let message = OutboundMessage::from(&lead);
        self.notifier.notify(&message).await?;

        tracing::info!("Lead relayed to all recipients");
        Ok(())
    }
}
