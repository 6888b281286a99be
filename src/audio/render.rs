// Offline filter rendering on worker threads.
//
// Every request gets its own thread and its own render context. Results
// come back over a channel tagged with the generation that was current when
// the request was made; the session applies only the newest one.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::SampleBuffer;
use super::filter::{FilterCascade, FilterDescriptor};
use crate::error::{EditorError, Result};

/// Renders a buffer through an ordered filter chain.
pub trait FilterRenderer: Send + Sync {
    fn render(&self, input: &SampleBuffer, chain: &[FilterDescriptor]) -> Result<SampleBuffer>;
}

/// In-process biquad renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct BiquadRenderer;

impl FilterRenderer for BiquadRenderer {
    fn render(&self, input: &SampleBuffer, chain: &[FilterDescriptor]) -> Result<SampleBuffer> {
        if let Some(bad) = chain.iter().find(|d| !is_renderable(d)) {
            return Err(EditorError::Render(format!("invalid filter parameters: {:?}", bad)));
        }
        Ok(FilterCascade::new(chain, input.sample_rate()).process(input))
    }
}

fn is_renderable(descriptor: &FilterDescriptor) -> bool {
    descriptor.frequency_hz.is_finite()
        && descriptor.frequency_hz > 0.0
        && descriptor.gain_db.is_finite()
}

#[derive(Debug)]
pub struct RenderResult {
    pub generation: u64,
    pub outcome: Result<SampleBuffer>,
}

pub struct RenderQueue {
    renderer: Arc<dyn FilterRenderer>,
    sender: Sender<RenderResult>,
    receiver: Receiver<RenderResult>,
    latest: u64,
    in_flight: usize,
}

impl RenderQueue {
    pub fn new(renderer: Arc<dyn FilterRenderer>) -> Self {
        let (sender, receiver) = channel::unbounded();
        Self {
            renderer,
            sender,
            receiver,
            latest: 0,
            in_flight: 0,
        }
    }

    /// Start rendering `input` on a worker thread. Returns the generation
    /// tag of the request, which becomes the only one [`is_current`].
    ///
    /// Every request reports back exactly once, even if the renderer panics.
    ///
    /// [`is_current`]: RenderQueue::is_current
    pub fn submit(&mut self, input: SampleBuffer, chain: Vec<FilterDescriptor>) -> Result<u64> {
        let generation = self.latest + 1;
        let renderer = Arc::clone(&self.renderer);
        let sender = self.sender.clone();

        thread::Builder::new()
            .name(format!("waveedit-render-{}", generation))
            .spawn(move || {
                let outcome = run_renderer(renderer.as_ref(), &input, &chain);
                // Receiver gone means the session was dropped
                let _ = sender.send(RenderResult {
                    generation,
                    outcome,
                });
            })
            .map_err(|e| EditorError::Render(format!("failed to start render thread: {}", e)))?;

        self.latest = generation;
        self.in_flight += 1;
        tracing::debug!(generation, "Render submitted");
        Ok(generation)
    }

    /// Make every outstanding request stale.
    pub fn invalidate(&mut self) {
        if self.in_flight > 0 {
            tracing::debug!(generation = self.latest, "Invalidating pending renders");
        }
        self.latest += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn try_recv(&mut self) -> Option<RenderResult> {
        let result = self.receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(result)
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<RenderResult> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(result)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new(Arc::new(BiquadRenderer))
    }
}

/// Run one render, turning a panic or a reshaped output into a render error.
fn run_renderer(
    renderer: &dyn FilterRenderer,
    input: &SampleBuffer,
    chain: &[FilterDescriptor],
) -> Result<SampleBuffer> {
    let output = panic::catch_unwind(AssertUnwindSafe(|| renderer.render(input, chain)))
        .unwrap_or_else(|payload| {
            let message = panic_message(&*payload);
            Err(EditorError::Render(format!("renderer panicked: {}", message)))
        })?;

    if output.num_channels() != input.num_channels()
        || output.len() != input.len()
        || output.sample_rate() != input.sample_rate()
    {
        return Err(EditorError::Render(format!(
            "renderer returned {}ch/{} samples/{} Hz for {}ch/{} samples/{} Hz input",
            output.num_channels(),
            output.len(),
            output.sample_rate(),
            input.num_channels(),
            input.len(),
            input.sample_rate()
        )));
    }
    Ok(output)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
