pub mod config;
pub mod error;
pub mod input;
pub mod interactive;
pub mod pipeline;
pub mod subtitle;
pub mod transcribe;

pub use config::Config;
pub use error::{Result, SrtlistError};
pub use input::{MediaPayload, MediaSource};
pub use pipeline::{
    parse_file, print_summary, transcribe_source, transcribe_with, PipelineOptions,
    PipelineStats, TranscriptResult,
};
pub use subtitle::{parse_srt, Segment};
