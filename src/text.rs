//! Timed overlay text.

/// Transient on-screen message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDisplay {
    /// Message.
    pub text: String,
    /// When it appeared.
    pub start_ms: u64,
    /// How long it stays.
    pub duration_ms: u64,
}

impl TextDisplay {
    /// Message shown from `start_ms` for `duration_ms`.
    pub fn new(text: impl Into<String>, start_ms: u64, duration_ms: u64) -> Self {
        TextDisplay {
            text: text.into(),
            start_ms,
            duration_ms,
        }
    }

    /// Still inside its display window.
    pub fn is_visible(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) < self.duration_ms
    }
}

/// The single message slot; a new message replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct TextOverlay {
    current: Option<TextDisplay>,
}

impl TextOverlay {
    /// Replace the current message.
    pub fn show(&mut self, display: TextDisplay) {
        self.current = Some(display);
    }

    /// Visible text, dropping the message once it has expired.
    pub fn visible(&mut self, now_ms: u64) -> Option<&str> {
        if self.current.as_ref().is_some_and(|d| !d.is_visible(now_ms)) {
            self.current = None;
        }
        self.current.as_ref().map(|d| d.text.as_str())
    }
}
