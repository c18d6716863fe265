pub mod json;
pub mod srt;
pub mod text;

pub use srt::parse_srt;

use crate::config::OutputFormat;
use serde::{Deserialize, Serialize};

/// One display row: the cue's start timestamp and its first caption line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub time: String,
    pub text: String,
}

pub trait SegmentFormatter {
    fn format(&self, segments: &[Segment]) -> String;
    fn extension(&self) -> &'static str;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn SegmentFormatter> {
    match format {
        OutputFormat::Text => Box::new(text::TextFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter::default()),
    }
}
