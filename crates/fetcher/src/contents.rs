use crate::repair;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use nexus_protocol::{ActivityMetadata, ContentsEnvelope, FailureKind, FetchFailure, TopicManifest};

const ENCODING_BASE64: &str = "base64";

/// Decode a contents-API payload to UTF-8 text.
///
/// Only `"base64"` payloads are supported; anything else is recorded as an
/// `UnsupportedEncoding` failure instead of being silently skipped.
pub fn decode_text(url: &str, envelope: &ContentsEnvelope) -> Result<String, FetchFailure> {
    if envelope.encoding != ENCODING_BASE64 {
        return Err(FetchFailure::new(
            url,
            FailureKind::UnsupportedEncoding {
                encoding: envelope.encoding.clone(),
            },
            format!("unsupported content encoding '{}'", envelope.encoding),
        ));
    }

    // The contents API wraps base64 bodies with newlines.
    let compact: String = envelope
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|err| FetchFailure::new(url, FailureKind::Decode, err.to_string()))?;

    String::from_utf8(bytes)
        .map_err(|err| FetchFailure::new(url, FailureKind::Decode, err.to_string()))
}

/// Parse decoded topic-manifest text, applying the [`repair`] shim first.
pub fn parse_topic_manifest(url: &str, text: &str) -> Result<TopicManifest, FetchFailure> {
    let repaired = repair::strip_trailing_visible(text);
    serde_json::from_str(&repaired)
        .map_err(|err| FetchFailure::new(url, FailureKind::Parse, format!("JSON parsing error: {err}")))
}

/// Parse decoded per-activity metadata text. No repair is applied; the
/// producer defect only affects topic manifests.
pub fn parse_activity_metadata(url: &str, text: &str) -> Result<ActivityMetadata, FetchFailure> {
    serde_json::from_str(text)
        .map_err(|err| FetchFailure::new(url, FailureKind::Parse, format!("JSON parsing error: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn envelope(content: &str, encoding: &str) -> ContentsEnvelope {
        ContentsEnvelope {
            name: "dbp-cabinet.topic.metadata.json.ejs".into(),
            url: "https://api.github.com/repos/x/contents/assets/dbp-cabinet.topic.metadata.json.ejs?ref=main".into(),
            content: content.into(),
            encoding: encoding.into(),
        }
    }

    #[test]
    fn decodes_base64_with_embedded_newlines() {
        let body = r#"{"routing_name": "cabinet", "activities": []}"#;
        let mut encoded = BASE64.encode(body);
        encoded.insert(20, '\n');

        let text = decode_text("u", &envelope(&encoded, "base64")).expect("decoded");
        assert_eq!(text, body);
    }

    #[test]
    fn rejects_unsupported_encoding_as_failure_value() {
        let err = decode_text("u", &envelope("irrelevant", "utf-8")).expect_err("failure");
        assert_eq!(
            err.kind,
            FailureKind::UnsupportedEncoding {
                encoding: "utf-8".into()
            }
        );
        assert_eq!(err.url, "u");
    }

    #[test]
    fn invalid_base64_is_a_decode_failure() {
        let err = decode_text("u", &envelope("@@not-base64@@", "base64")).expect_err("failure");
        assert_eq!(err.kind, FailureKind::Decode);
    }

    #[test]
    fn topic_parse_applies_the_repair_shim() {
        let text = "{\"routing_name\": \"cabinet\",\n    \"visible\": true}";
        let manifest = parse_topic_manifest("u", text).expect("manifest");
        assert_eq!(manifest.routing_name, "cabinet");
    }

    #[test]
    fn parse_errors_become_failure_values() {
        let err = parse_topic_manifest("u", "{not json").expect_err("failure");
        assert_eq!(err.kind, FailureKind::Parse);
        assert!(err.message.starts_with("JSON parsing error:"));

        let err = parse_activity_metadata("u", "[1, 2").expect_err("failure");
        assert_eq!(err.kind, FailureKind::Parse);
    }

    #[test]
    fn activity_parse_fills_defaults() {
        let metadata = parse_activity_metadata(
            "u",
            r#"{"element": "dbp-activity", "module_src": "./a.js", "routing_name": "a"}"#,
        )
        .expect("metadata");

        assert_eq!(metadata.element.as_deref(), Some("dbp-activity"));
        assert!(metadata.required_roles.is_empty());
        assert!(metadata.visible.is_none());
    }
}
