//! Collaborators the runtime calls out to but never looks inside.

use serde_json::Value as JsonValue;

use crate::animation::FrameHandle;
use crate::error::AssetError;

/// Per-event assets: animation frames and dialogue documents.
pub trait AssetStore {
    /// Load the frame textures for an event, in playback order.
    fn load_event_frames(&mut self, event_id: i64) -> Result<Vec<FrameHandle>, AssetError>;

    /// Release frames previously returned by `load_event_frames`.
    fn release_frames(&mut self, frames: Vec<FrameHandle>);

    /// The dialogue document for an event, or `None` if the event has none.
    fn dialogue_document(&mut self, event_id: i64) -> Result<Option<JsonValue>, AssetError>;
}

/// Fire-and-forget named sound cues.
pub trait AudioSink {
    /// Play a cue once. Unknown cues are ignored.
    fn play(&mut self, cue: &str);
}

/// Both collaborators behind one handle, as the game loop needs them.
pub trait Host: AssetStore + AudioSink {}

impl<T: AssetStore + AudioSink> Host for T {}
