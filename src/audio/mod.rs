pub mod analysis;
pub mod buffer;
pub mod codec;
pub mod effects;
pub mod filter;
pub mod project;
pub mod region;
pub mod render;
pub mod selection;
pub mod session;

pub use buffer::SampleBuffer;
pub use codec::{Decoder, WavDecoder, decode_wav, encode_wav, export_wav, import_wav};
pub use effects::Effect;
pub use filter::{FilterDescriptor, FilterKind};
pub use render::{BiquadRenderer, FilterRenderer};
pub use selection::{Clipboard, ClipboardEntry, Selection};
pub use session::EditSession;

#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    LoadFile(String),
    CreateSelection(f64, f64),
    ClearSelection,
    Cut,
    Copy,
    /// Insert the clipboard at this many seconds.
    Paste(f64),
    Trim,
    ApplyEffect(Effect),
    SetZoom(u8),
    SetCurrentTime(f64),
    /// Destination path.
    ExportWav(String),
    /// Destination path.
    SaveProject(String),
    /// Source path.
    LoadProject(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    BufferLoaded {
        channels: usize,
        sample_rate: u32,
        frames: usize,
    },
    SelectionChanged(Option<Selection>),
    /// Frames removed.
    Cut(usize),
    /// Frames now on the clipboard.
    Copied(usize),
    /// Frames inserted.
    Pasted(usize),
    /// Frames kept.
    Trimmed(usize),
    EffectApplied(&'static str),
    /// Render generation.
    RenderStarted(u64),
    RenderFinished(u64),
    RenderDiscarded(u64),
    /// Project format version.
    ProjectLoaded(String),
    /// Written path.
    WavExported(String),
    ProjectSaved(String),
    Error(String),
}
