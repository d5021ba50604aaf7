//! Flattens finished spans into compact JSON records.
//!
//! Each span becomes one self-contained object so the trace file can be read
//! line by line (`jq`, `grep`) without reassembling batches:
//!
//! ```json
//! {"service":"fuel-tracker","trace_id":"…","span_id":"…","parent_span_id":"…",
//!  "name":"delete_car","start_unix_nano":1,"duration_us":42,"status":"ok",
//!  "attributes":{"car_id":3},"events":[{"name":"…","attributes":{}}]}
//! ```

use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde_json::{Map, Value as JsonValue};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Formats spans as JSON-lines records tagged with the service name.
pub struct SpanFormatter {
    service: String,
}

impl SpanFormatter {
    /// Reads `service.name` from the resource, falling back to `"unknown"`.
    pub fn new(resource: &Resource) -> Self {
        let service = resource
            .get(opentelemetry::Key::from_static_str("service.name"))
            .map_or_else(|| "unknown".to_string(), |v| v.as_str().into_owned());
        Self { service }
    }

    /// Formats one span as a single JSON object.
    pub fn format_span(&self, span: &SpanData) -> JsonValue {
        let parent = if span.parent_span_id == SpanId::INVALID {
            JsonValue::Null
        } else {
            JsonValue::String(format!("{:016x}", span.parent_span_id))
        };

        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or(Duration::ZERO);

        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| {
                serde_json::json!({
                    "name": event.name,
                    "time_unix_nano": unix_nanos(event.timestamp),
                    "attributes": attributes(&event.attributes),
                })
            })
            .collect();

        let (status, message) = match &span.status {
            Status::Unset => ("unset", None),
            Status::Ok => ("ok", None),
            Status::Error { description } => ("error", Some(description.to_string())),
        };

        let mut record = serde_json::json!({
            "service": self.service,
            "trace_id": format!("{:032x}", span.span_context.trace_id()),
            "span_id": format!("{:016x}", span.span_context.span_id()),
            "parent_span_id": parent,
            "name": span.name,
            "start_unix_nano": unix_nanos(span.start_time),
            "duration_us": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            "status": status,
            "attributes": attributes(&span.attributes),
            "events": events,
        });

        if let (Some(message), Some(obj)) = (message, record.as_object_mut()) {
            obj.insert("status_message".into(), JsonValue::String(message));
        }

        record
    }

    /// Formats a batch as newline-free JSON strings, one per span.
    pub fn format_lines(&self, batch: &[SpanData]) -> Vec<String> {
        batch
            .iter()
            .map(|span| self.format_span(span).to_string())
            .collect()
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_nanos()).ok())
        .unwrap_or(0)
}

fn attributes(kvs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = kvs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::String(s) => JsonValue::String(s.to_string()),
        // Arrays keep their display form.
        Value::Array(_) => JsonValue::String(value.to_string()),
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter")
            .field("service", &self.service)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_values_keep_json_types() {
        assert_eq!(attribute_value(&Value::I64(7)), serde_json::json!(7));
        assert_eq!(attribute_value(&Value::Bool(true)), serde_json::json!(true));
        assert_eq!(
            attribute_value(&Value::String("json".into())),
            serde_json::json!("json")
        );
        assert_eq!(attribute_value(&Value::F64(f64::NAN)), JsonValue::Null);
    }

    #[test]
    fn attributes_become_an_object() {
        let kvs = [KeyValue::new("car_id", 3_i64), KeyValue::new("backend", "json")];
        assert_eq!(
            attributes(&kvs),
            serde_json::json!({"car_id": 3, "backend": "json"})
        );
    }

    #[test]
    fn service_name_comes_from_resource() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "fuel-tracker")]);
        let formatter = SpanFormatter::new(&resource);
        assert_eq!(formatter.service, "fuel-tracker");
    }
}
