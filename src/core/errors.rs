//! Error types
//!
//! Library code returns these typed errors; the binary wraps them in
//! `anyhow::Error` at the runner boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Misuse of the animator lifecycle or failure to bring up its thread
#[derive(Debug, Error)]
pub enum AnimatorError {
    /// Configuration that is only valid before the drive thread exists
    #[error("Animator already started")]
    AlreadyStarted,
    #[error("failed to spawn animation thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Malformed raw glyph point data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutlineError {
    #[error("contour starting at point {start} has {len} point(s) but no end-of-contour marker")]
    UnterminatedContour { start: usize, len: usize },
}

/// Failures while loading a glyph set
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid glyph set JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to load UFO: {0}")]
    Ufo(#[from] norad::error::FontLoadError),
    #[error("failed to write UFO: {0}")]
    UfoWrite(#[from] norad::error::FontWriteError),
    /// TrueType outlines are quadratic only
    #[error("glyph '{glyph}' contains cubic curve segments")]
    CubicOutline { glyph: String },
    #[error("unsupported font source: {}", .0.display())]
    UnsupportedSource(PathBuf),
}

/// Media stream setup failures
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid media stream: {0}")]
    InvalidStream(String),
    #[error("invalid media URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
