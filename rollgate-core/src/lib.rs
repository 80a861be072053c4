//! # rollgate-core
//!
//! Core library for rollgate - a log-event forwarder for the Rollbar
//! event-monitoring service.
//!
//! This library provides:
//! - A dynamic event model and `%{field}` format rendering
//! - The item builder that merges configuration defaults with per-event
//!   overrides into a collector item
//! - The HTTP delivery client and the failure-absorbing forwarder
//! - Configuration management and logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use rollgate_core::{Config, Forwarder};
//!
//! # async fn run() -> rollgate_core::Result<()> {
//! let config = Config::load()?;
//! let mut forwarder = Forwarder::new(&config.rollbar)?;
//!
//! let event = rollgate_core::Event::from_json(serde_json::json!({
//!     "message": "boom",
//!     "timestamp": 1700000000,
//! }))?;
//! forwarder.forward(&event).await;
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use collector::{CollectorItem, DeliveryClient, DeliveryReceipt, ForwardStats, Forwarder,
    ItemBuilder, SyncForwarder, NOTIFIER_NAME};
pub use config::{Config, Level, LoggingConfig, RollbarConfig};
pub use error::{Error, Result};
pub use event::Event;

// Public modules
pub mod collector;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod logging;
