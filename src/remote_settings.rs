//! Remote Settings (Kinto) record-store client.
//!
//! Transformed messages are delivered to clients through a Kinto collection.
//! Publishing a CMS entry creates a record; unpublishing deletes it.

use crate::message::Message;

const DEFAULT_SERVER: &str = "https://kinto.dev.mozaws.net/v1";
const BUCKET: &str = "main";
const COLLECTION: &str = "whats-new-panel";

/// Error type for Remote Settings operations.
#[derive(Debug)]
pub enum RemoteSettingsError {
    Config(String),
    Http(reqwest::Error),
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for RemoteSettingsError {
    fn from(err: reqwest::Error) -> Self {
        RemoteSettingsError::Http(err)
    }
}

impl std::fmt::Display for RemoteSettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteSettingsError::Config(msg) => {
                write!(f, "Remote Settings configuration error: {}", msg)
            }
            RemoteSettingsError::Http(e) => write!(f, "Remote Settings request failed: {}", e),
            RemoteSettingsError::Status { status, body } => {
                write!(f, "Remote Settings responded with status {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for RemoteSettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteSettingsError::Http(e) => Some(e),
            _ => None,
        }
    }
}

/// Remote Settings access configuration, read from the environment.
#[derive(Clone)]
pub struct RemoteSettingsConfig {
    pub server_url: String,
    pub bucket: String,
    pub collection: String,
    pub user: String,
    pub password: String,
}

impl RemoteSettingsConfig {
    /// Read configuration from the environment.
    ///
    /// `KINTO_USER` and `KINTO_PASSWORD` are required; `KINTO_SERVER`
    /// defaults to the dev server the panel collection lives on.
    pub fn from_env() -> Result<Self, RemoteSettingsError> {
        Ok(Self {
            server_url: std::env::var("KINTO_SERVER")
                .unwrap_or_else(|_| DEFAULT_SERVER.to_string()),
            bucket: BUCKET.to_string(),
            collection: COLLECTION.to_string(),
            user: require_env("KINTO_USER")?,
            password: require_env("KINTO_PASSWORD")?,
        })
    }
}

fn require_env(name: &str) -> Result<String, RemoteSettingsError> {
    std::env::var(name).map_err(|_| RemoteSettingsError::Config(format!("{} is not set", name)))
}

/// Client for the panel message collection on a Kinto server.
#[derive(Clone)]
pub struct RemoteSettingsClient {
    http: reqwest::Client,
    config: RemoteSettingsConfig,
}

impl RemoteSettingsClient {
    pub fn new(config: RemoteSettingsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a record for a transformed message.
    pub async fn create_record(&self, message: &Message) -> Result<(), RemoteSettingsError> {
        let response = self
            .http
            .post(self.records_url())
            .basic_auth(&self.config.user, Some(&self.config.password))
            .json(&serde_json::json!({ "data": message }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteSettingsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Created Remote Settings record {}", message.id);
        Ok(())
    }

    /// Delete the record for an unpublished message by its id.
    pub async fn delete_record(&self, id: &str) -> Result<(), RemoteSettingsError> {
        let url = format!("{}/{}", self.records_url(), id);
        let response = self
            .http
            .delete(&url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteSettingsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Deleted Remote Settings record {}", id);
        Ok(())
    }

    fn records_url(&self) -> String {
        format!(
            "{}/buckets/{}/collections/{}/records",
            self.config.server_url, self.config.bucket, self.config.collection
        )
    }
}
