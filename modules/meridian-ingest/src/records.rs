use serde_json::Value;

use meridian_common::NewIngestedRecord;

pub const DEFAULT_TYPE: &str = "generic";
pub const SOURCE_API: &str = "api";
pub const SOURCE_BATCH: &str = "batch";

/// Normalize one caller-supplied record object. `type` and `source` default
/// when absent or non-string; `data` is stored verbatim, defaulting to an
/// empty object. The payload is never interpreted here; its semantics
/// belong to the producer.
pub fn normalize_record(value: &Value, default_source: &str) -> NewIngestedRecord {
    NewIngestedRecord {
        record_type: value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_TYPE)
            .to_string(),
        payload: value
            .get("data")
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default())),
        source: value
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or(default_source)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fully_specified_record_passes_through() {
        let record = normalize_record(&json!({"type": "t", "data": {"a": 1}, "source": "s"}), SOURCE_API);
        assert_eq!(record.record_type, "t");
        assert_eq!(record.payload, json!({"a": 1}));
        assert_eq!(record.source, "s");
    }

    #[test]
    fn empty_object_gets_all_defaults() {
        let record = normalize_record(&json!({}), SOURCE_API);
        assert_eq!(record.record_type, "generic");
        assert_eq!(record.payload, json!({}));
        assert_eq!(record.source, "api");
    }

    #[test]
    fn batch_path_defaults_source_to_batch() {
        let record = normalize_record(&json!({"type": "t"}), SOURCE_BATCH);
        assert_eq!(record.source, "batch");
    }

    #[test]
    fn non_object_payload_is_stored_verbatim() {
        let record = normalize_record(&json!({"data": [1, 2, 3]}), SOURCE_API);
        assert_eq!(record.payload, json!([1, 2, 3]));
    }

    #[test]
    fn region_is_not_taken_from_the_caller() {
        // A client-supplied region field is not a recognized record field;
        // the stored region always comes from the node's own config.
        let record = normalize_record(&json!({"region": "spoofed"}), SOURCE_API);
        assert_eq!(record.payload, json!({}));
    }
}
