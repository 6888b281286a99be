pub mod audio;
pub mod config;
pub mod error;
pub mod timefmt;

pub use audio::{EditCommand, EditSession, EditorEvent, Effect, SampleBuffer, Selection};
pub use config::EditorConfig;
pub use error::{EditorError, Result};
