//! The inbound event model
//!
//! Events arrive as arbitrary JSON objects. We keep them as a dynamic value
//! tree rather than a fixed struct so that whatever the item builder does not
//! claim can be passed through losslessly as the `custom` payload.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// One structured record submitted for forwarding.
///
/// The timestamp is mandatory and lives outside the field map: it has a
/// single source of truth and is never overridable through event data.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    timestamp: DateTime<Utc>,
    fields: Map<String, Value>,
}

impl Event {
    pub fn new(timestamp: DateTime<Utc>, fields: Map<String, Value>) -> Self {
        Self { timestamp, fields }
    }

    /// Parse one NDJSON record into an event.
    ///
    /// The record must be a JSON object. The timestamp is read from a
    /// `timestamp` or `@timestamp` field (epoch seconds or RFC 3339),
    /// falling back to the current time. The timestamp field itself stays
    /// in the field map so it reaches the `custom` payload untouched.
    pub fn from_json(value: Value) -> Result<Self> {
        let fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::Event(format!(
                    "expected a JSON object, got {}",
                    type_name(&other)
                )));
            }
        };

        let timestamp = fields
            .get("timestamp")
            .or_else(|| fields.get("@timestamp"))
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        Ok(Self { timestamp, fields })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Interpret a JSON value as a point in time.
///
/// Accepts epoch seconds (integer or float) and RFC 3339 strings.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            if let Some(secs) = n.as_i64() {
                Utc.timestamp_opt(secs, 0).single()
            } else {
                n.as_f64().and_then(|secs| {
                    Utc.timestamp_opt(secs as i64, ((secs.fract()) * 1e9) as u32)
                        .single()
                })
            }
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
