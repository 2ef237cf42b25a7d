//! Event animations and the handles of the frames they play.

use macroquad::prelude::Vec2;

/// Opaque handle to a frame texture owned by the asset host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// A one-shot sprite animation attached to a scripted event.
///
/// `frozen` means the last frame was reached and is being held; `finished`
/// is a terminal state only outside logic sets, after which the instance is
/// eligible for teardown.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationInstance {
    /// Event that owns the animation.
    pub event_id: i64,
    /// Top-left corner in world space.
    pub position: Vec2,
    frames: Vec<FrameHandle>,
    current: usize,
    /// Time each frame is shown.
    pub frame_ms: u64,
    last_advance_ms: u64,
    /// Advancing through frames.
    pub active: bool,
    /// Holding the last frame.
    pub frozen: bool,
    /// Done; waiting to be torn down.
    pub finished: bool,
}

impl AnimationInstance {
    /// Inactive instance starting on frame 0.
    pub fn new(
        event_id: i64,
        position: Vec2,
        frames: Vec<FrameHandle>,
        frame_ms: u64,
        now_ms: u64,
    ) -> Self {
        AnimationInstance {
            event_id,
            position,
            frames,
            current: 0,
            frame_ms,
            last_advance_ms: now_ms,
            active: false,
            frozen: false,
            finished: false,
        }
    }

    /// Start playback. No effect once active or finished.
    pub fn activate(&mut self, now_ms: u64) {
        if !self.active && !self.finished {
            self.active = true;
            self.last_advance_ms = now_ms;
        }
    }

    /// Mark the animation done so the tick tears it down.
    pub fn finish(&mut self) {
        self.finished = true;
        self.active = false;
    }

    /// Index of the frame on screen.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Handle of the frame on screen.
    pub fn current_frame(&self) -> Option<FrameHandle> {
        self.frames.get(self.current).copied()
    }

    /// Give the frame handles back for release.
    pub fn into_frames(self) -> Vec<FrameHandle> {
        self.frames
    }

    /// Advance at most one frame if a full frame duration has elapsed.
    pub fn tick(&mut self, now_ms: u64) {
        if !self.active || self.frozen || self.finished {
            return;
        }
        let last = self.frames.len().saturating_sub(1);
        if self.current >= last {
            self.current = last;
            self.frozen = true;
            return;
        }
        if now_ms.saturating_sub(self.last_advance_ms) >= self.frame_ms {
            self.last_advance_ms = now_ms;
            self.current += 1;
            if self.current >= last {
                self.frozen = true;
            }
        }
    }
}

/// Advance every live instance in the world.
pub fn tick_all(animations: &mut [AnimationInstance], now_ms: u64) {
    for anim in animations {
        anim.tick(now_ms);
    }
}
