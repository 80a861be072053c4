//! Item construction for the Rollbar item API
//!
//! Converts one [`Event`] plus the plugin configuration into the nested
//! item payload the collector expects.
//!
//! ## Precedence
//!
//! An event can carry a `rollbar` sub-mapping whose recognized keys override
//! the configured defaults (`level`, `format`, `access_token`, plus the
//! passthrough keys such as `person` or `fingerprint`). Two fields are not
//! overridable: `timestamp` always comes from the event's own timestamp, and
//! `environment` always comes from configuration.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::RollbarConfig;
use crate::event::Event;
use crate::format;

/// Notifier identifier reported inside every item.
pub const NOTIFIER_NAME: &str = "rollgate";

/// Keys lifted from an event's `rollbar` sub-mapping into `data`.
///
/// Anything else under `rollbar` is dropped.
const LIFTED_KEYS: [&str; 15] = [
    "access_token",
    "client",
    "context",
    "environment",
    "fingerprint",
    "format",
    "framework",
    "language",
    "level",
    "person",
    "platform",
    "request",
    "server",
    "title",
    "uuid",
];

/// One fully-populated item, ready for serialization.
///
/// `data` is built by explicit inserts only: a key that was never assigned
/// is absent from the payload, never a null or an empty container.
#[derive(Debug, Clone, Serialize)]
pub struct CollectorItem {
    pub access_token: String,
    pub data: Map<String, Value>,
}

/// Pure transformation from (configuration, event) to a [`CollectorItem`].
///
/// Stateless; safe to share across concurrent callers.
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    config: RollbarConfig,
}

impl ItemBuilder {
    pub fn new(config: &RollbarConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Build an item for one event.
    ///
    /// Infallible: malformed shapes (a `rollbar` field that is not a
    /// mapping, a non-string `format` override) degrade to the configured
    /// defaults. The caller's event is never mutated; the builder works on
    /// an independent deep copy of its field map.
    pub fn build(&self, event: &Event) -> CollectorItem {
        let mut fields = event.fields().clone();
        let mut data = Map::new();

        // Lift recognized override keys out of the `rollbar` sub-mapping,
        // then drop the mapping itself so it never reaches `custom`.
        if let Some(overrides) = fields.remove("rollbar") {
            if let Value::Object(mut overrides) = overrides {
                for key in LIFTED_KEYS {
                    if let Some(value) = overrides.remove(key) {
                        data.insert(key.to_string(), value);
                    }
                }
            }
        }

        // Whatever remains of the event is the operator-visible custom payload.
        let custom = Value::Object(fields);

        // The message body renders the first format that applies: the lifted
        // override, else the configured default.
        let template = match data.get("format") {
            Some(Value::String(template)) => template.clone(),
            _ => self.config.format.clone(),
        };
        let message_body = format::render(&template, event.fields());

        let mut message = Map::new();
        message.insert("body".to_string(), Value::String(message_body));
        let mut body = Map::new();
        body.insert("message".to_string(), Value::Object(message));
        body.insert("custom".to_string(), custom);
        data.insert("body".to_string(), Value::Object(body));

        // Single source of truth: the event's own timestamp, regardless of
        // anything the `rollbar` mapping carried (`timestamp` is not lifted).
        data.insert(
            "timestamp".to_string(),
            Value::from(event.timestamp().timestamp()),
        );

        // Level falls back to configuration; once set it stays set.
        data.entry("level")
            .or_insert_with(|| Value::String(self.config.level.to_string()));

        // Environment is not event-overridable; configuration wins.
        data.insert(
            "environment".to_string(),
            Value::String(self.config.environment.clone()),
        );

        let mut notifier = Map::new();
        notifier.insert("name".to_string(), Value::String(NOTIFIER_NAME.to_string()));
        notifier.insert(
            "version".to_string(),
            Value::String(env!("CARGO_PKG_VERSION").to_string()),
        );
        data.insert("notifier".to_string(), Value::Object(notifier));

        // Exactly one access token per item, always at the top level. A
        // lifted token only counts when it is a string.
        let access_token = match data.remove("access_token") {
            Some(Value::String(token)) => token,
            _ => self.config.token().to_string(),
        };

        CollectorItem { access_token, data }
    }
}
