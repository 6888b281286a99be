use crossbeam::channel::Sender;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::effects::{self, Effect, EffectPlan};
use super::project::{self, ProjectSnapshot};
use super::render::{FilterRenderer, RenderQueue, RenderResult};
use super::{
    Clipboard, Decoder, EditCommand, EditorEvent, SampleBuffer, Selection, WavDecoder, codec,
    region,
};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};

/// Pixels per second at zoom 0 and the extra range covered by zoom 100.
const MIN_PX_PER_SEC: f64 = 20.0;
const PX_PER_SEC_RANGE: f64 = 480.0;

/// One editor: the live buffer, the selection, the clipboard and the view
/// hints that go into project files.
///
/// Operations that need a buffer (or clipboard content) return `Ok(false)`
/// when it is missing instead of failing. Every edit builds its result
/// before touching `buffer`, so an error leaves the previous state intact.
pub struct EditSession {
    config: EditorConfig,
    buffer: Option<SampleBuffer>,
    selection: Option<Selection>,
    clipboard: Clipboard,
    zoom: u8,
    current_time: f64,
    renders: RenderQueue,
    event_sender: Option<Sender<EditorEvent>>,
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_renderer(config, Arc::new(super::BiquadRenderer))
    }

    pub fn with_renderer(config: EditorConfig, renderer: Arc<dyn FilterRenderer>) -> Self {
        let zoom = config.default_zoom.min(100);
        Self {
            config,
            buffer: None,
            selection: None,
            clipboard: Clipboard::new(),
            zoom,
            current_time: 0.0,
            renders: RenderQueue::new(renderer),
            event_sender: None,
        }
    }

    pub fn set_event_sender(&mut self, sender: Sender<EditorEvent>) {
        self.event_sender = Some(sender);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn buffer(&self) -> Option<&SampleBuffer> {
        self.buffer.as_ref()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn pixels_per_second(&self) -> f64 {
        MIN_PX_PER_SEC + (self.zoom as f64 / 100.0) * PX_PER_SEC_RANGE
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.buffer.as_ref().map(SampleBuffer::duration_seconds)
    }

    pub fn render_pending(&self) -> bool {
        self.renders.in_flight() > 0
    }

    // ---- loading -------------------------------------------------------

    /// Make `buffer` the live buffer. Selection and playhead are reset.
    pub fn load_buffer(&mut self, buffer: SampleBuffer) {
        self.send_event(EditorEvent::BufferLoaded {
            channels: buffer.num_channels(),
            sample_rate: buffer.sample_rate(),
            frames: buffer.len(),
        });
        tracing::info!(
            channels = buffer.num_channels(),
            sample_rate = buffer.sample_rate(),
            frames = buffer.len(),
            "Loaded audio buffer"
        );
        self.replace_buffer(buffer);
        self.current_time = 0.0;
        self.set_selection(None);
    }

    pub fn load_bytes(&mut self, bytes: &[u8], decoder: &dyn Decoder) -> Result<()> {
        let buffer = decoder.decode(bytes)?;
        self.load_buffer(buffer);
        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = std::fs::read(&path)?;
        tracing::info!(path = %path.as_ref().display(), "Opening audio file");
        self.load_bytes(&bytes, &WavDecoder)
    }

    // ---- selection and view -------------------------------------------

    /// Select `[start, end)`; bounds are ordered and clamped to the buffer.
    pub fn create_selection(&mut self, start: f64, end: f64) -> Result<bool> {
        let Some(duration) = self.duration() else {
            tracing::debug!("create_selection ignored: no buffer loaded");
            return Ok(false);
        };
        let selection = Selection::within(start, end, duration)?;
        self.set_selection(Some(selection));
        Ok(true)
    }

    pub fn clear_selection(&mut self) {
        self.set_selection(None);
    }

    pub fn set_current_time(&mut self, seconds: f64) {
        let duration = self.duration().unwrap_or(0.0);
        self.current_time = if seconds.is_finite() {
            seconds.clamp(0.0, duration)
        } else {
            0.0
        };
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.min(100);
    }

    // ---- region edits --------------------------------------------------

    pub fn copy(&mut self) -> Result<bool> {
        let Some((buffer, selection)) = self.buffer_and_selection("copy") else {
            return Ok(false);
        };
        let clip = region::copy(buffer, &selection);
        let frames = clip.len();
        self.clipboard.store(clip, &selection);
        tracing::debug!(frames, "Copied selection");
        self.send_event(EditorEvent::Copied(frames));
        Ok(true)
    }

    /// Copy, then remove the selection from the buffer. Clears the selection.
    pub fn cut(&mut self) -> Result<bool> {
        let Some((buffer, selection)) = self.buffer_and_selection("cut") else {
            return Ok(false);
        };
        let (remaining, removed) = region::cut(buffer, &selection);
        let frames = removed.len();
        self.clipboard.store(removed, &selection);
        self.replace_buffer(remaining);
        self.set_selection(None);
        tracing::debug!(frames, "Cut selection");
        self.send_event(EditorEvent::Cut(frames));
        Ok(true)
    }

    /// Insert the clipboard at `at_seconds`. Selection and clipboard are kept.
    pub fn paste(&mut self, at_seconds: f64) -> Result<bool> {
        let Some(buffer) = self.buffer.as_ref() else {
            tracing::debug!("paste ignored: no buffer loaded");
            return Ok(false);
        };
        let entry = match self.clipboard.entry() {
            Ok(entry) => entry,
            Err(EditorError::EmptyClipboard) => {
                tracing::debug!("paste ignored: clipboard is empty");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        let pasted = region::paste(buffer, &entry.buffer, at_seconds)?;
        let frames = entry.buffer.len();
        self.replace_buffer(pasted);
        tracing::debug!(frames, at_seconds, "Pasted clipboard");
        self.send_event(EditorEvent::Pasted(frames));
        Ok(true)
    }

    /// Keep only the selection. Clears the selection.
    pub fn trim(&mut self) -> Result<bool> {
        let Some((buffer, selection)) = self.buffer_and_selection("trim") else {
            return Ok(false);
        };
        let trimmed = region::trim(buffer, &selection);
        let frames = trimmed.len();
        self.replace_buffer(trimmed);
        self.set_selection(None);
        tracing::debug!(frames, "Trimmed to selection");
        self.send_event(EditorEvent::Trimmed(frames));
        Ok(true)
    }

    // ---- effects -------------------------------------------------------

    /// Apply `effect`. In-place effects finish before returning; filter
    /// effects start an offline render whose result is picked up by
    /// [`poll_renders`](Self::poll_renders) or
    /// [`wait_for_render`](Self::wait_for_render).
    pub fn apply_effect(&mut self, effect: Effect) -> Result<bool> {
        let Some(buffer) = self.buffer.as_mut() else {
            tracing::debug!(effect = effect.name(), "effect ignored: no buffer loaded");
            return Ok(false);
        };

        match effect.plan(&self.config.eq) {
            EffectPlan::InPlace => {
                effects::apply_in_place(buffer, &effect);
                // Anything rendering from the old content is now stale
                self.renders.invalidate();
                tracing::debug!(effect = effect.name(), "Applied effect");
                self.send_event(EditorEvent::EffectApplied(effect.name()));
            }
            EffectPlan::Offline(chain) => {
                let generation = self.renders.submit(buffer.clone(), chain)?;
                tracing::debug!(effect = effect.name(), generation, "Started render");
                self.send_event(EditorEvent::RenderStarted(generation));
            }
        }
        Ok(true)
    }

    pub fn fade_in(&mut self, seconds: f64) -> Result<bool> {
        self.apply_effect(Effect::FadeIn { seconds })
    }

    pub fn fade_out(&mut self, seconds: f64) -> Result<bool> {
        self.apply_effect(Effect::FadeOut { seconds })
    }

    pub fn amplify(&mut self, gain: f32) -> Result<bool> {
        self.apply_effect(Effect::Amplify { gain })
    }

    pub fn normalize(&mut self) -> Result<bool> {
        self.apply_effect(Effect::Normalize)
    }

    pub fn reverse(&mut self) -> Result<bool> {
        self.apply_effect(Effect::Reverse)
    }

    pub fn apply_eq(&mut self, bass_db: f64, mid_db: f64, treble_db: f64) -> Result<bool> {
        self.apply_effect(Effect::Equalize {
            bass_db,
            mid_db,
            treble_db,
        })
    }

    pub fn low_pass(&mut self, cutoff_hz: f64) -> Result<bool> {
        self.apply_effect(Effect::LowPass { cutoff_hz })
    }

    pub fn high_pass(&mut self, cutoff_hz: f64) -> Result<bool> {
        self.apply_effect(Effect::HighPass { cutoff_hz })
    }

    /// Apply any finished render without blocking. Returns `true` when the
    /// live buffer was replaced.
    pub fn poll_renders(&mut self) -> Result<bool> {
        let mut replaced = false;
        let mut failure = None;
        while let Some(result) = self.renders.try_recv() {
            match self.handle_render_result(result) {
                Ok(applied) => replaced |= applied,
                Err(e) => failure = Some(e),
            }
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(replaced),
        }
    }

    /// Block until every outstanding render has reported or `timeout`
    /// passes. Returns `true` when the live buffer was replaced.
    pub fn wait_for_render(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        let mut replaced = false;
        while self.renders.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let Some(result) = self.renders.recv_timeout(remaining) else {
                break;
            };
            replaced |= self.handle_render_result(result)?;
        }
        Ok(replaced)
    }

    fn handle_render_result(&mut self, result: RenderResult) -> Result<bool> {
        let generation = result.generation;
        if !self.renders.is_current(generation) {
            tracing::warn!(generation, "Discarding stale render result");
            self.send_event(EditorEvent::RenderDiscarded(generation));
            return Ok(false);
        }

        match result.outcome {
            Ok(rendered) => {
                self.buffer = Some(rendered);
                tracing::debug!(generation, "Render applied");
                self.send_event(EditorEvent::RenderFinished(generation));
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Render failed");
                self.send_event(EditorEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    // ---- export and projects ------------------------------------------

    /// Encode the live buffer. Only WAV output exists; other formats fall
    /// back to WAV.
    pub fn export(&self, format: &str) -> Result<Vec<u8>> {
        let buffer = self.buffer.as_ref().ok_or(EditorError::NoBufferLoaded)?;
        if !format.eq_ignore_ascii_case("wav") {
            tracing::warn!(format, "No encoder for format, exporting WAV instead");
        }
        codec::encode_wav(buffer)
    }

    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let buffer = self.buffer.as_ref().ok_or(EditorError::NoBufferLoaded)?;
        codec::export_wav(path, buffer)
    }

    pub fn save_project(&self) -> Result<Vec<u8>> {
        let buffer = self.buffer.as_ref().ok_or(EditorError::NoBufferLoaded)?;
        let snapshot = ProjectSnapshot {
            buffer,
            selection: self.selection,
            zoom: self.zoom,
            current_time: self.current_time,
        };
        project::save_project(&snapshot, &self.config.project_version)
    }

    /// Restore a saved project. On error the session is left unchanged.
    pub fn load_project(&mut self, bytes: &[u8]) -> Result<()> {
        let loaded = project::load_project(bytes)?;
        self.load_buffer(loaded.buffer);
        self.set_selection(loaded.selection);
        self.zoom = loaded.zoom;
        self.current_time = loaded.current_time;
        self.send_event(EditorEvent::ProjectLoaded(loaded.version));
        Ok(())
    }

    // ---- command dispatch ---------------------------------------------

    pub fn send_command(&mut self, command: EditCommand) -> Result<()> {
        let result = self.dispatch(command);
        if let Err(e) = &result {
            self.send_event(EditorEvent::Error(e.to_string()));
        }
        result
    }

    fn dispatch(&mut self, command: EditCommand) -> Result<()> {
        match command {
            EditCommand::LoadFile(path) => self.load_file(path)?,
            EditCommand::CreateSelection(start, end) => {
                self.create_selection(start, end)?;
            }
            EditCommand::ClearSelection => self.clear_selection(),
            EditCommand::Cut => {
                self.cut()?;
            }
            EditCommand::Copy => {
                self.copy()?;
            }
            EditCommand::Paste(at_seconds) => {
                self.paste(at_seconds)?;
            }
            EditCommand::Trim => {
                self.trim()?;
            }
            EditCommand::ApplyEffect(effect) => {
                self.apply_effect(effect)?;
            }
            EditCommand::SetZoom(zoom) => self.set_zoom(zoom),
            EditCommand::SetCurrentTime(seconds) => self.set_current_time(seconds),
            EditCommand::ExportWav(path) => {
                self.export_to_file(&path)?;
                self.send_event(EditorEvent::WavExported(path));
            }
            EditCommand::SaveProject(path) => {
                let bytes = self.save_project()?;
                std::fs::write(&path, bytes)?;
                self.send_event(EditorEvent::ProjectSaved(path));
            }
            EditCommand::LoadProject(path) => {
                let bytes = std::fs::read(&path)?;
                self.load_project(&bytes)?;
            }
        }
        Ok(())
    }

    // ---- internals -----------------------------------------------------

    fn buffer_and_selection(&self, operation: &str) -> Option<(&SampleBuffer, Selection)> {
        let Some(buffer) = self.buffer.as_ref() else {
            tracing::debug!(operation, "ignored: no buffer loaded");
            return None;
        };
        let Some(selection) = self.selection else {
            tracing::debug!(operation, "ignored: no selection");
            return None;
        };
        // The buffer may have shrunk since the selection was made
        Some((buffer, selection.clamp_to(buffer.duration_seconds())))
    }

    fn replace_buffer(&mut self, buffer: SampleBuffer) {
        self.current_time = self.current_time.min(buffer.duration_seconds());
        self.buffer = Some(buffer);
        self.renders.invalidate();
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        if self.selection != selection {
            self.selection = selection;
            self.send_event(EditorEvent::SelectionChanged(selection));
        }
    }

    fn send_event(&self, event: EditorEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.try_send(event);
        }
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FilterDescriptor;
    use crossbeam::channel;
    use std::thread;

    const WAIT: Duration = Duration::from_secs(10);

    struct FailingRenderer;

    impl FilterRenderer for FailingRenderer {
        fn render(&self, _: &SampleBuffer, _: &[FilterDescriptor]) -> Result<SampleBuffer> {
            Err(EditorError::Render("device lost".into()))
        }
    }

    struct PanickingRenderer;

    impl FilterRenderer for PanickingRenderer {
        fn render(&self, _: &SampleBuffer, _: &[FilterDescriptor]) -> Result<SampleBuffer> {
            panic!("filter state exploded");
        }
    }

    fn constant(value: f32, len: usize, rate: u32) -> SampleBuffer {
        SampleBuffer::new(vec![vec![value; len]], rate).unwrap()
    }

    fn session_with(buffer: SampleBuffer) -> EditSession {
        let mut session = EditSession::default();
        session.load_buffer(buffer);
        session
    }

    fn session_using(renderer: Arc<dyn FilterRenderer>, buffer: SampleBuffer) -> EditSession {
        let mut session = EditSession::with_renderer(EditorConfig::default(), renderer);
        session.load_buffer(buffer);
        session
    }

    fn count_events(events: &[EditorEvent], wanted: fn(&EditorEvent) -> bool) -> usize {
        events.iter().filter(|e| wanted(e)).count()
    }

    #[test]
    fn test_operations_without_buffer_are_silent_noops() {
        let mut session = EditSession::default();
        assert!(!session.copy().unwrap());
        assert!(!session.cut().unwrap());
        assert!(!session.paste(0.0).unwrap());
        assert!(!session.trim().unwrap());
        assert!(!session.normalize().unwrap());
        assert!(!session.apply_eq(1.0, 1.0, 1.0).unwrap());
        assert!(!session.create_selection(0.0, 1.0).unwrap());
        assert!(session.buffer().is_none());
        assert!(matches!(session.export("wav"), Err(EditorError::NoBufferLoaded)));
        assert!(matches!(session.save_project(), Err(EditorError::NoBufferLoaded)));
    }

    #[test]
    fn test_paste_with_empty_clipboard_is_noop() {
        let mut session = session_with(SampleBuffer::silent(1, 10, 10).unwrap());
        assert!(!session.paste(0.5).unwrap());
        assert_eq!(session.buffer().unwrap().len(), 10);
    }

    #[test]
    fn test_cut_clears_selection_and_paste_keeps_clipboard() {
        let mut session = session_with(SampleBuffer::silent(2, 100, 10).unwrap());
        session.create_selection(2.0, 5.0).unwrap();
        assert!(session.cut().unwrap());
        assert!(session.selection().is_none());
        assert_eq!(session.buffer().unwrap().len(), 70);

        assert!(session.paste(0.0).unwrap());
        assert!(session.paste(0.0).unwrap());
        assert_eq!(session.buffer().unwrap().len(), 130);
        assert!(!session.clipboard().is_empty());
    }

    #[test]
    fn test_selection_revalidated_after_shrink() {
        let mut session = session_with(SampleBuffer::silent(1, 100, 10).unwrap());
        session.create_selection(6.0, 9.0).unwrap();
        session.buffer = Some(SampleBuffer::silent(1, 70, 10).unwrap());

        assert!(session.copy().unwrap());
        assert_eq!(session.clipboard().get().unwrap().buffer.len(), 10);
    }

    #[test]
    fn test_mismatched_paste_leaves_buffer_intact() {
        let mut session = session_with(SampleBuffer::silent(1, 10, 10).unwrap());
        session.create_selection(0.0, 0.5).unwrap();
        session.copy().unwrap();

        session.load_buffer(SampleBuffer::silent(1, 40, 20).unwrap());
        assert!(matches!(
            session.paste(0.0),
            Err(EditorError::SampleRateMismatch { .. })
        ));
        assert_eq!(session.buffer().unwrap().len(), 40);
    }

    #[test]
    fn test_eq_replaces_buffer_after_render() {
        let mut session = session_with(constant(0.2, 4096, 44100));
        assert!(session.apply_eq(6.0, 0.0, 0.0).unwrap());
        assert!(session.render_pending());
        // Live buffer is untouched until the render lands
        let samples = session.buffer().unwrap().channel(0).unwrap();
        assert!(samples.iter().all(|&s| s == 0.2));

        assert!(session.wait_for_render(WAIT).unwrap());
        let out = session.buffer().unwrap();
        assert_eq!(out.len(), 4096);
        assert!(out.channel(0).unwrap()[4095] > 0.3);
    }

    #[test]
    fn test_only_latest_eq_render_wins() {
        let mut session = session_with(constant(0.1, 4096, 44100));
        let (sender, receiver) = channel::unbounded();
        session.set_event_sender(sender);

        session.apply_eq(12.0, 0.0, 0.0).unwrap();
        session.apply_eq(-12.0, 0.0, 0.0).unwrap();
        assert!(session.wait_for_render(WAIT).unwrap());

        // -12 dB low shelf settles DC at a quarter of the input
        let last = session.buffer().unwrap().channel(0).unwrap()[4095];
        assert!((last - 0.1 * 0.2512).abs() < 0.005, "{}", last);

        let events: Vec<EditorEvent> = receiver.try_iter().collect();
        let discarded = count_events(&events, |e| matches!(e, EditorEvent::RenderDiscarded(_)));
        let finished = count_events(&events, |e| matches!(e, EditorEvent::RenderFinished(_)));
        assert_eq!(discarded, 1);
        assert_eq!(finished, 1);
    }

    #[test]
    fn test_sync_edit_invalidates_pending_render() {
        let mut session = session_with(constant(0.5, 2048, 8000));
        session.apply_eq(6.0, 6.0, 6.0).unwrap();
        session.amplify(0.5).unwrap();
        assert!(!session.wait_for_render(WAIT).unwrap());

        let samples = session.buffer().unwrap().channel(0).unwrap();
        assert!(samples.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_render_failure_keeps_buffer_and_reports_error() {
        let original = constant(0.3, 512, 8000);
        let mut session = session_using(Arc::new(FailingRenderer), original.clone());
        let (sender, receiver) = channel::unbounded();
        session.set_event_sender(sender);

        assert!(session.apply_eq(3.0, 0.0, 0.0).unwrap());
        let waited = session.wait_for_render(WAIT);
        assert!(matches!(waited, Err(EditorError::Render(_))));
        assert_eq!(session.buffer(), Some(&original));
        assert!(!session.render_pending());

        assert!(session.low_pass(1000.0).unwrap());
        let mut polled = session.poll_renders();
        while matches!(polled, Ok(false)) && session.render_pending() {
            thread::sleep(Duration::from_millis(5));
            polled = session.poll_renders();
        }
        assert!(matches!(polled, Err(EditorError::Render(_))));
        assert_eq!(session.buffer(), Some(&original));

        let events: Vec<EditorEvent> = receiver.try_iter().collect();
        let errors = count_events(&events, |e| matches!(e, EditorEvent::Error(_)));
        assert_eq!(errors, 2);
    }

    #[test]
    fn test_renderer_panic_surfaces_as_render_error() {
        let original = constant(0.3, 64, 8000);
        let mut session = session_using(Arc::new(PanickingRenderer), original.clone());

        assert!(session.apply_eq(3.0, 0.0, 0.0).unwrap());
        let waited = session.wait_for_render(WAIT);
        assert!(matches!(waited, Err(EditorError::Render(_))));
        assert!(!session.render_pending());
        assert_eq!(session.buffer(), Some(&original));
    }

    #[test]
    fn test_zoom_and_playhead_are_clamped() {
        let mut session = session_with(SampleBuffer::silent(1, 20, 10).unwrap());
        assert_eq!(session.zoom(), 50);
        assert_eq!(session.pixels_per_second(), 260.0);
        session.set_zoom(200);
        assert_eq!(session.zoom(), 100);
        assert_eq!(session.pixels_per_second(), 500.0);

        session.set_current_time(5.0);
        assert_eq!(session.current_time(), 2.0);
        session.set_current_time(f64::NAN);
        assert_eq!(session.current_time(), 0.0);
    }

    #[test]
    fn test_export_falls_back_to_wav() {
        let session = session_with(SampleBuffer::silent(2, 10, 8000).unwrap());
        let wav = session.export("wav").unwrap();
        let mp3 = session.export("mp3").unwrap();
        assert_eq!(wav, mp3);
        assert_eq!(&wav[0..4], b"RIFF");
    }

    #[test]
    fn test_commands_dispatch_and_report_errors() {
        let (sender, receiver) = channel::unbounded();
        let mut session = EditSession::default();
        session.set_event_sender(sender);

        let missing = EditCommand::LoadFile("/nonexistent/file.wav".into());
        assert!(session.send_command(missing).is_err());
        assert!(matches!(receiver.try_recv(), Ok(EditorEvent::Error(_))));

        session.load_buffer(SampleBuffer::silent(1, 100, 10).unwrap());
        let select = EditCommand::CreateSelection(1.0, 2.0);
        session.send_command(select).unwrap();
        session.send_command(EditCommand::Trim).unwrap();
        assert_eq!(session.buffer().unwrap().len(), 10);
        let amplify = EditCommand::ApplyEffect(Effect::Amplify { gain: 2.0 });
        session.send_command(amplify).unwrap();

        let events: Vec<EditorEvent> = receiver.try_iter().collect();
        assert!(events.contains(&EditorEvent::Trimmed(10)));
        assert!(events.contains(&EditorEvent::EffectApplied("amplify")));
    }
}
