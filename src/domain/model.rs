use crate::utils::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A lead captured by the site form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub name: String,
    pub contact: String,
    pub goal: String,
}

impl LeadSubmission {
    /// Parses a raw request body. An empty body is treated as `{}`.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let payload: Value = if raw.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(raw)?
        };

        Self::from_value(&payload)
    }

    /// Missing and non-string fields become empty strings. A `null`
    /// document has no fields to read and is rejected.
    pub fn from_value(payload: &Value) -> Result<Self> {
        if payload.is_null() {
            return Err(RelayError::Serialization(
                <serde_json::Error as serde::de::Error>::custom("lead payload is null"),
            ));
        }

        Ok(Self {
            name: string_field(payload, "name"),
            contact: string_field(payload, "contact"),
            goal: string_field(payload, "goal"),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.contact.is_empty() || self.goal.is_empty() {
            return Err(RelayError::InvalidPayload);
        }
        Ok(())
    }
}

fn string_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

/// Text delivered to every recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
}

impl From<&LeadSubmission> for OutboundMessage {
    fn from(lead: &LeadSubmission) -> Self {
        let text = [
            format!("Імʼя: {}", lead.name),
            format!("Контакт: {}", lead.contact),
            format!("Ціль: {}", lead.goal),
        ]
        .join("\n\n");

        Self { text }
    }
}

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}
