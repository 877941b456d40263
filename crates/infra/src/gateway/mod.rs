use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// The payload handed to the delivery gateway. The metadata carries enough
/// structured context (event type, cycle name, day-offset) for the gateway
/// and the client app to route the notification; this process never
/// inspects it again.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub metadata: serde_json::Value,
}

/// Push delivery transport. Only the success flag of a send is ever
/// interpreted here.
#[async_trait::async_trait]
pub trait IPushGateway: Send + Sync {
    async fn send(&self, token: &str, message: &PushMessage) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct PushRequestBody<'a> {
    token: &'a str,
    title: &'a str,
    body: &'a str,
    metadata: &'a serde_json::Value,
}

/// Gateway client that POSTs each notification to the configured delivery
/// endpoint. A hanging gateway must not block the dispatch loop forever,
/// hence the request timeout.
pub struct HttpPushGateway {
    client: reqwest::Client,
    url: String,
    key: String,
}

impl HttpPushGateway {
    pub fn new(url: String, key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, url, key }
    }
}

#[async_trait::async_trait]
impl IPushGateway for HttpPushGateway {
    async fn send(&self, token: &str, message: &PushMessage) -> anyhow::Result<()> {
        let res = self
            .client
            .post(&self.url)
            .header("staffpilot-gateway-key", &self.key)
            .json(&PushRequestBody {
                token,
                title: &message.title,
                body: &message.body,
                metadata: &message.metadata,
            })
            .send()
            .await?;
        res.error_for_status()?;
        Ok(())
    }
}

/// Gateway double used when testing the dispatcher: records every delivered
/// message and can be flipped into a failing state to exercise the retry
/// paths.
pub struct RecordingPushGateway {
    sent: Mutex<Vec<(String, PushMessage)>>,
    failing: AtomicBool,
}

impl RecordingPushGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for RecordingPushGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPushGateway for RecordingPushGateway {
    async fn send(&self, token: &str, message: &PushMessage) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("gateway unavailable");
        }
        self.sent
            .lock()
            .unwrap()
            .push((token.to_string(), message.clone()));
        Ok(())
    }
}
