// Plain text segment list
use super::{Segment, SegmentFormatter};

pub struct TextFormatter;

impl SegmentFormatter for TextFormatter {
    fn format(&self, segments: &[Segment]) -> String {
        let width = segments.iter().map(|s| s.time.len()).max().unwrap_or(0);

        segments
            .iter()
            .map(|s| format!("{:<width$}  {}\n", s.time, s.text.trim_end_matches('\r')))
            .collect()
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
