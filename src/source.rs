use std::future::Future;

use reqwest::Client;
use thiserror::Error;

use crate::models::Event;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("response is not an event list: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait EventSource {
    /// The full catalog. Failures are logged and come back as an empty list.
    fn fetch_all(&self) -> impl Future<Output = Vec<Event>>;
}

pub struct HttpEventSource {
    endpoint: String,
    client: Client,
}

impl HttpEventSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_fetch(&self) -> Result<Vec<Event>, FetchError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl EventSource for HttpEventSource {
    async fn fetch_all(&self) -> Vec<Event> {
        match self.try_fetch().await {
            Ok(events) => {
                tracing::info!(count = events.len(), endpoint = %self.endpoint, "fetched events");
                events
            }
            Err(err) => {
                tracing::error!(endpoint = %self.endpoint, "error fetching events: {err}");
                Vec::new()
            }
        }
    }
}

/// Serves a fixed catalog; stands in for the endpoint in offline runs and tests.
pub struct StaticEventSource {
    events: Vec<Event>,
}

impl StaticEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl EventSource for StaticEventSource {
    async fn fetch_all(&self) -> Vec<Event> {
        self.events.clone()
    }
}
