use crate::error::CitError;
use crate::statics;
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted by the load pipeline, in order. Rendering is up to the receiver.
#[derive(Debug)]
pub enum LoadEvent {
    Progress { percent: f32, status: &'static str },
    /// The city name is known; the UI may start its reveal animation.
    CityName(String),
    /// Terminal event. On success the editor has already installed the new session.
    Finished(Result<PathBuf, CitError>),
}

impl LoadEvent {
    pub fn progress(percent: f32, status: &'static str) -> Self {
        LoadEvent::Progress { percent, status }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, LoadEvent::Finished(_))
    }
}

/// Typewriter-style reveal of a name, one character per step.
/// Purely cosmetic; advanced by elapsed frame time.
#[derive(Debug, Clone, Default)]
pub struct Reveal {
    text: String,
    shown: usize,
    total: usize,
    pending: Duration,
}

impl Reveal {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            shown: 0,
            total: text.chars().count(),
            pending: Duration::ZERO,
        }
    }

    pub fn step() -> Duration {
        Duration::from_millis(statics::REVEAL_STEP_MS)
    }

    /// Add elapsed time; returns true when more characters became visible.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if self.is_done() {
            return false;
        }
        self.pending += elapsed;
        let step = Self::step();
        let before = self.shown;
        while self.pending >= step && self.shown < self.total {
            self.pending -= step;
            self.shown += 1;
        }
        self.shown != before
    }

    pub fn finish(&mut self) {
        self.shown = self.total;
        self.pending = Duration::ZERO;
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.total
    }

    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }

}
