//! The per-event forwarding boundary
//!
//! The forwarder ties the item builder to the delivery client and absorbs
//! every per-event failure: a dropped delivery is warned about and counted,
//! never propagated. One bad event can never take down the pipeline or
//! affect the events after it.

use crate::config::RollbarConfig;
use crate::error::{Error, Result};
use crate::event::Event;

use super::client::DeliveryClient;
use super::item::ItemBuilder;

/// Forwards events to the collector, one delivery attempt per event.
pub struct Forwarder {
    builder: ItemBuilder,
    client: DeliveryClient,
    stats: ForwardStats,
}

/// Forwarding statistics
#[derive(Debug, Default, Clone)]
pub struct ForwardStats {
    /// Events handed to the forwarder
    pub events: usize,
    /// Delivery attempts that completed (any response status)
    pub delivered: usize,
    /// Delivery attempts that failed; those events are dropped
    pub failed: usize,
}

impl Forwarder {
    /// Create a forwarder from configuration.
    ///
    /// Configuration problems are fatal here, at initialization.
    pub fn new(config: &RollbarConfig) -> Result<Self> {
        let client = DeliveryClient::new(config)?;
        Ok(Self {
            builder: ItemBuilder::new(config),
            client,
            stats: ForwardStats::default(),
        })
    }

    /// Build and deliver the item for one event.
    ///
    /// Returns whether the delivery attempt completed. Failures are logged
    /// at warn level with the error and the event timestamp; the caller's
    /// next invocation proceeds normally either way.
    pub async fn forward(&mut self, event: &Event) -> bool {
        self.stats.events += 1;

        let item = self.builder.build(event);
        tracing::debug!(
            item = %serde_json::to_string(&item).unwrap_or_default(),
            "built collector item"
        );

        match self.client.deliver(&item).await {
            Ok(receipt) => {
                self.stats.delivered += 1;
                tracing::debug!(status = %receipt.status, "item delivered");
                true
            }
            Err(e) => {
                self.stats.failed += 1;
                tracing::warn!(
                    error = %e,
                    event_timestamp = event.timestamp().timestamp(),
                    "delivery failed, event dropped"
                );
                false
            }
        }
    }

    /// Get current forwarding statistics
    pub fn stats(&self) -> &ForwardStats {
        &self.stats
    }
}

/// Synchronous wrapper for [`Forwarder`]
///
/// Provides blocking methods for use in synchronous code.
pub struct SyncForwarder {
    inner: Forwarder,
    runtime: tokio::runtime::Runtime,
}

impl SyncForwarder {
    /// Create a new sync forwarder from configuration
    pub fn new(config: &RollbarConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Delivery(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            inner: Forwarder::new(config)?,
            runtime,
        })
    }

    /// Build and deliver the item for one event (blocking)
    pub fn forward(&mut self, event: &Event) -> bool {
        self.runtime.block_on(self.inner.forward(event))
    }

    /// Get current forwarding statistics
    pub fn stats(&self) -> &ForwardStats {
        self.inner.stats()
    }
}
