use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// A rendered notification, ready for the push provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PushError {
    #[error("Push token rejected: {0}")]
    InvalidToken(String),
    #[error("Push service unavailable: {0}")]
    Unavailable(String),
}

/// Delivery seam to the push provider. Returns the provider's message id.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<String, PushError>;
}

/// Transport that writes notifications to the log instead of a provider.
#[derive(Default)]
pub struct LogPushTransport {
    sent: AtomicU64,
}

#[async_trait]
impl PushTransport for LogPushTransport {
    async fn send(&self, token: &str, message: &PushMessage) -> Result<String, PushError> {
        if token.trim().is_empty() {
            return Err(PushError::InvalidToken("empty token".into()));
        }
        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        let kind = message.data.get("type").map(String::as_str).unwrap_or("unknown");
        info!(kind, title = %message.title, "Push notification sent");
        Ok(format!("push_{}", n))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every delivered message for later assertions.
    #[derive(Default)]
    pub struct RecordingTransport {
        sent: Mutex<Vec<(String, PushMessage)>>,
    }

    impl RecordingTransport {
        pub fn sent(&self) -> Vec<(String, PushMessage)> {
            self.sent.lock().unwrap().clone()
        }

        pub fn kinds(&self) -> Vec<String> {
            self.sent()
                .into_iter()
                .filter_map(|(_, m)| m.data.get("type").cloned())
                .collect()
        }
    }

    #[async_trait]
    impl PushTransport for RecordingTransport {
        async fn send(&self, token: &str, message: &PushMessage) -> Result<String, PushError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push((token.to_string(), message.clone()));
            Ok(format!("push_{}", sent.len()))
        }
    }

    /// Rejects every delivery.
    pub struct FailingTransport;

    #[async_trait]
    impl PushTransport for FailingTransport {
        async fn send(&self, _token: &str, _message: &PushMessage) -> Result<String, PushError> {
            Err(PushError::Unavailable("provider down".into()))
        }
    }
}
