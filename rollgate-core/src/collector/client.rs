//! HTTP delivery to the Rollbar item API
//!
//! One [`DeliveryClient`] is built at startup from validated configuration
//! and reused for every event. `reqwest::Client` pools connections per host
//! internally and is `Send + Sync`, so concurrent deliveries are safe
//! without extra locking.

use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use crate::config::RollbarConfig;
use crate::error::{Error, Result};

use super::item::CollectorItem;

/// Status and body of the collector's response, captured for diagnostics.
///
/// The response never influences control flow: a non-2xx status is still a
/// completed delivery attempt from this client's point of view.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client for the Rollbar item API
pub struct DeliveryClient {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl DeliveryClient {
    /// Create a new delivery client from configuration.
    ///
    /// Fails loudly on a missing token, an unparseable endpoint URL, or an
    /// unbuildable HTTP client; per-event failures later never do.
    pub fn new(config: &RollbarConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {:?}: {}", config.endpoint, e)))?;

        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        // Certificate verification is a per-deployment policy choice; the
        // scheme alone decides whether TLS is used at all.
        if !config.verify_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Serialize an item and perform exactly one delivery attempt.
    ///
    /// Returns a receipt with the response status and body; any
    /// serialization, connection or read failure comes back as an error for
    /// the caller to log. No retry happens at this layer.
    pub async fn deliver(&self, item: &CollectorItem) -> Result<DeliveryReceipt> {
        let payload = serde_json::to_vec(item)?;
        tracing::debug!(
            bytes = payload.len(),
            body = %String::from_utf8_lossy(&payload),
            "sending item to collector"
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await
            .map_err(|e| Error::Delivery(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Delivery(format!("failed to read response: {}", e)))?;

        tracing::debug!(status = %status, body = %body, "collector response");

        Ok(DeliveryReceipt { status, body })
    }

    /// The parsed endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}
