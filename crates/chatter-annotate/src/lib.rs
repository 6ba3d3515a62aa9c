//! # chatter-annotate
//!
//! Client for the AI annotation collaborator: speech transcription for audio
//! messages and transcript + summary extraction for video messages, backed
//! by the Gemini `generateContent` REST API.
//!
//! The raw client surfaces typed errors; the `*_or_placeholder` wrappers
//! degrade every failure to placeholder text, which is what the messaging
//! layer wants (a failed annotation must never break a sent message).

mod error;
mod gemini;

pub use error::AnnotateError;
pub use gemini::{GeminiAnnotator, VideoAnalysis};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnnotateError>;
