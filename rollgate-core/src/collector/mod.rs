//! Rollbar collector integration
//!
//! Two components, strictly sequential per event:
//!
//! - [`ItemBuilder`] — pure transformation of (configuration, event) into a
//!   fully-populated collector item; no I/O.
//! - [`DeliveryClient`] — serializes an item and performs exactly one HTTP
//!   POST to the item API.
//!
//! [`Forwarder`] composes the two and absorbs per-event failures, so that a
//! failed delivery is a logged, dropped event rather than a crashed pipeline.
//! There is no retry and no batching at this layer; delivery is
//! fire-and-forget per event.

mod client;
mod forwarder;
mod item;

pub use client::{DeliveryClient, DeliveryReceipt};
pub use forwarder::{ForwardStats, Forwarder, SyncForwarder};
pub use item::{CollectorItem, ItemBuilder, NOTIFIER_NAME};
