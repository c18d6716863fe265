// JSON segment list
use super::{Segment, SegmentFormatter};
use serde::Serialize;

#[derive(Default)]
pub struct JsonFormatter {
    pub source: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    metadata: JsonMetadata,
    segments: &'a [Segment],
}

#[derive(Serialize)]
struct JsonMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    segment_count: usize,
}

impl SegmentFormatter for JsonFormatter {
    fn format(&self, segments: &[Segment]) -> String {
        let output = JsonOutput {
            metadata: JsonMetadata {
                source: self.source.clone(),
                model: self.model.clone(),
                language: self.language.clone(),
                segment_count: segments.len(),
            },
            segments,
        };

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format() {
        let segments = vec![Segment {
            time: "00:00:01,500".to_string(),
            text: "Hello, world!".to_string(),
        }];

        let formatter = JsonFormatter {
            source: Some("talk.mp3".to_string()),
            ..Default::default()
        };
        let output = formatter.format(&segments);

        assert!(output.contains("\"segment_count\": 1"));
        assert!(output.contains("\"source\": \"talk.mp3\""));
        assert!(output.contains("\"time\": \"00:00:01,500\""));
        assert!(!output.contains("\"model\""));

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let parsed: Vec<Segment> = serde_json::from_value(value["segments"].clone()).unwrap();
        assert_eq!(parsed, segments);
    }
}
