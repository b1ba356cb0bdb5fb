//! HTTP transport for sending query chunks to the ingestion API

use crate::config::Config;
use crate::errors::{CollectorError, Result};
use crate::record::QueryRecord;

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Endpoint answered with a 2xx status
    Delivered { status: u16 },

    /// Endpoint answered with a non-2xx status
    Rejected { status: u16, body: String },

    /// No response: connection error or timeout
    Unreachable(String),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered { status } => write!(f, "delivered ({})", status),
            DeliveryOutcome::Rejected { status, body } => {
                write!(f, "rejected with status {}: {}", status, body)
            }
            DeliveryOutcome::Unreachable(reason) => write!(f, "unreachable: {}", reason),
        }
    }
}

/// Destination for query chunks. One attempt per call, no retries.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, chunk: Vec<QueryRecord>) -> DeliveryOutcome;
}

/// HTTP transport posting JSON arrays of query records
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    queries_url: String,
    client_key: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(queries_url: String, client_key: String, http_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(http_timeout)
            .user_agent(format!("bind_query_collector/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CollectorError::Http)?;

        Ok(Self {
            client,
            queries_url,
            client_key,
            timeout: http_timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.queries_url(),
            config.client_key.clone(),
            config.http_timeout,
        )
    }

    pub fn queries_url(&self) -> &str {
        &self.queries_url
    }

    /// Turn the HTTP response into an outcome
    async fn handle_response(&self, response: Response) -> DeliveryOutcome {
        let status = response.status();

        if status.is_success() {
            return DeliveryOutcome::Delivered {
                status: status.as_u16(),
            };
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        DeliveryOutcome::Rejected {
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl Delivery for HttpTransport {
    async fn deliver(&self, chunk: Vec<QueryRecord>) -> DeliveryOutcome {
        debug!(
            "Sending chunk of {} records to {}",
            chunk.len(),
            self.queries_url
        );

        let request = self
            .client
            .post(&self.queries_url)
            .query(&[("key", self.client_key.as_str())])
            .json(&chunk);

        let outcome = match request.send().await {
            Ok(response) => self.handle_response(response).await,
            Err(e) if e.is_timeout() => {
                DeliveryOutcome::Unreachable(format!("request timed out after {:?}", self.timeout))
            }
            Err(e) => DeliveryOutcome::Unreachable(e.without_url().to_string()),
        };

        match &outcome {
            DeliveryOutcome::Delivered { status } => {
                info!("Delivered {} records (status {})", chunk.len(), status)
            }
            DeliveryOutcome::Rejected { status, body } => warn!(
                "Ingestion API rejected {} records with status {}: {}",
                chunk.len(),
                status,
                body
            ),
            DeliveryOutcome::Unreachable(reason) => error!(
                "Failed to send {} records: {}",
                chunk.len(),
                reason
            ),
        }

        outcome
    }
}
