// SRT subtitle parsing
use super::Segment;
use tracing::debug;

/// Substring that marks a time-range line.
const MARKER: &str = "-->";

/// Separator between the start and end timestamps.
const SEPARATOR: &str = " --> ";

/// Parse a raw SRT body into display segments.
///
/// Every time-range line that has a following line yields one [`Segment`]:
/// the start timestamp (trimmed, not validated) and the caption line right
/// after it, verbatim. The caption line is consumed along with its marker,
/// so only the first line of a multi-line caption is kept and that line is
/// never read as a marker itself.
///
/// Never fails. Input without any `-->` produces an empty list.
pub fn parse_srt(raw: &str) -> Vec<Segment> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.contains(MARKER) && i + 1 < lines.len() {
            let start = match line.split_once(SEPARATOR) {
                Some((start, _)) => start,
                None => line,
            };

            segments.push(Segment {
                time: start.trim().to_string(),
                text: lines[i + 1].to_string(),
            });

            i += 2;
        } else {
            i += 1;
        }
    }

    debug!("Parsed {} segments from {} lines", segments.len(), lines.len());

    segments
}
