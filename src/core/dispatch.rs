use crate::config::RelayConfig;
use crate::domain::model::{OutboundMessage, SendMessageRequest};
use crate::domain::ports::Notifier;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{Client, StatusCode};

/// Sends each message to every configured chat through the Bot API.
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_ids: Vec<String>,
    ready: bool,
}

impl TelegramNotifier {
    pub fn new(config: &RelayConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &RelayConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_ids: config.chat_ids.clone(),
            ready: config.telegram_ready(),
        }
    }

    // Holds the token, never log it.
    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }

    async fn send_one(
        &self,
        url: &str,
        chat_id: &str,
        text: &str,
    ) -> std::result::Result<StatusCode, reqwest::Error> {
        let response = self
            .client
            .post(url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await?;

        Ok(response.status())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn is_configured(&self) -> bool {
        self.ready
    }

    async fn notify(&self, message: &OutboundMessage) -> Result<()> {
        if !self.is_configured() {
            return Err(RelayError::ConfigMissing);
        }

        let url = self.send_message_url();
        let total = self.chat_ids.len();
        tracing::debug!("Dispatching message to {} recipients", total);

        let outcomes = join_all(
            self.chat_ids
                .iter()
                .map(|chat_id| self.send_one(&url, chat_id, &message.text)),
        )
        .await;

        let mut failed = 0;
        for (chat_id, outcome) in self.chat_ids.iter().zip(outcomes) {
            match outcome {
                Ok(status) if status.is_success() => {
                    tracing::debug!("Delivered to chat {}", chat_id);
                }
                Ok(status) => {
                    failed += 1;
                    tracing::warn!("Chat {} rejected the message with status {}", chat_id, status);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Request for chat {} failed: {}", chat_id, e.without_url());
                }
            }
        }

        if failed > 0 {
            return Err(RelayError::DeliveryFailed { failed, total });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::{Duration, Instant};

    const TOKEN: &str = "123:abc";

    fn config(api_base: String, chat_ids: &[&str]) -> RelayConfig {
        RelayConfig {
            api_base,
            bot_token: TOKEN.to_string(),
            chat_ids: chat_ids.iter().map(|id| id.to_string()).collect(),
            ..RelayConfig::default()
        }
    }

    fn message(text: &str) -> OutboundMessage {
        OutboundMessage {
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_call_per_recipient() {
        let server = MockServer::start();

        let first = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:abc/sendMessage")
                .json_body(json!({"chat_id": "111", "text": "hello"}));
            then.status(200).json_body(json!({"ok": true}));
        });
        let second = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:abc/sendMessage")
                .json_body(json!({"chat_id": "-222", "text": "hello"}));
            then.status(200).json_body(json!({"ok": true}));
        });

        let notifier = TelegramNotifier::new(&config(server.base_url(), &["111", "-222"]));
        let result = notifier.notify(&message("hello")).await;

        assert!(result.is_ok());
        first.assert_hits(1);
        second.assert_hits(1);
    }

    #[tokio::test]
    async fn test_any_rejection_fails_the_dispatch() {
        let server = MockServer::start();

        let accepted = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:abc/sendMessage")
                .json_body(json!({"chat_id": "111", "text": "hello"}));
            then.status(200).json_body(json!({"ok": true}));
        });
        let rejected = server.mock(|when, then| {
            when.method(POST)
                .path("/bot123:abc/sendMessage")
                .json_body(json!({"chat_id": "222", "text": "hello"}));
            then.status(400)
                .json_body(json!({"ok": false, "description": "Bad Request: chat not found"}));
        });

        let notifier = TelegramNotifier::new(&config(server.base_url(), &["111", "222"]));
        let result = notifier.notify(&message("hello")).await;

        // The accepted recipient still got the message
        accepted.assert_hits(1);
        rejected.assert_hits(1);
        assert!(matches!(
            result,
            Err(RelayError::DeliveryFailed { failed: 1, total: 2 })
        ));
    }

    #[tokio::test]
    async fn test_recipients_are_called_concurrently() {
        let server = MockServer::start();
        let delay = Duration::from_millis(500);
        let chat_ids = ["1", "2", "3", "4"];

        let mocks: Vec<_> = chat_ids
            .iter()
            .map(|chat_id| {
                server.mock(|when, then| {
                    when.method(POST)
                        .path("/bot123:abc/sendMessage")
                        .json_body(json!({"chat_id": chat_id, "text": "hello"}));
                    then.status(200).delay(delay).json_body(json!({"ok": true}));
                })
            })
            .collect();

        let notifier = TelegramNotifier::new(&config(server.base_url(), &chat_ids));
        let started = Instant::now();
        let result = notifier.notify(&message("hello")).await;
        let elapsed = started.elapsed();

        assert!(result.is_ok());
        for mock in &mocks {
            mock.assert_hits(1);
        }
        // Sequential calls would take at least 4 x 500ms
        assert!(
            elapsed < delay * 2,
            "dispatch took {:?}, recipients were not called in parallel",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_transport_error_fails_the_dispatch() {
        let notifier =
            TelegramNotifier::new(&config("http://127.0.0.1:1".to_string(), &["111"]));
        let result = notifier.notify(&message("hello")).await;

        assert!(matches!(
            result,
            Err(RelayError::DeliveryFailed { failed: 1, total: 1 })
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_notifier_makes_no_calls() {
        let server = MockServer::start();
        let any_call = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let mut no_token = config(server.base_url(), &["111"]);
        no_token.bot_token.clear();
        let notifier = TelegramNotifier::new(&no_token);
        assert!(!notifier.is_configured());
        assert!(matches!(
            notifier.notify(&message("hello")).await,
            Err(RelayError::ConfigMissing)
        ));

        let notifier = TelegramNotifier::new(&config(server.base_url(), &[]));
        assert!(!notifier.is_configured());
        assert!(matches!(
            notifier.notify(&message("hello")).await,
            Err(RelayError::ConfigMissing)
        ));

        any_call.assert_hits(0);
    }

    #[test]
    fn test_trailing_slash_on_api_base() {
        let notifier =
            TelegramNotifier::new(&config("https://api.telegram.org/".to_string(), &["1"]));
        assert_eq!(
            notifier.send_message_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
