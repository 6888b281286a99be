//! Error types for the editing engine.

use thiserror::Error;

/// Errors produced by buffer, codec, render and project operations.
#[derive(Error, Debug)]
pub enum EditorError {
    /// An operation that needs a live buffer was invoked without one.
    #[error("no audio buffer loaded")]
    NoBufferLoaded,

    /// Paste was requested with nothing on the clipboard.
    #[error("clipboard is empty")]
    EmptyClipboard,

    /// Audio bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A project record is malformed or incomplete.
    #[error("project load error: {0}")]
    Load(String),

    /// The offline filter render failed or was rejected.
    #[error("render error: {0}")]
    Render(String),

    /// Selection bounds do not describe a non-empty region of the buffer.
    #[error("invalid selection: start={start} end={end}")]
    InvalidSelection {
        /// Start time in seconds.
        start: f64,
        /// End time in seconds.
        end: f64,
    },

    /// Clipboard audio was captured at a different rate than the live buffer.
    #[error("sample rate mismatch: clipboard {clipboard} Hz, live buffer {live} Hz")]
    SampleRateMismatch { clipboard: u32, live: u32 },

    /// Clipboard audio has a different channel layout than the live buffer.
    #[error("channel mismatch: clipboard has {clipboard}, live buffer has {live}")]
    ChannelMismatch { clipboard: usize, live: usize },

    /// A buffer could not be built from the given channel data.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EditorError>;
