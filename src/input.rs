//! Logical input actions and per-frame edge detection.

/// Logical actions the runtime understands. The frontend maps keys onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Walk left.
    Left,
    /// Walk right.
    Right,
    /// Move a selection up.
    Up,
    /// Move a selection down.
    Down,
    /// Jump, when enabled.
    Jump,
    /// Use the zone under the player.
    Interact,
    /// Buy or pick an option.
    Confirm,
    /// Leave the shop.
    Cancel,
    /// Count a mini-game tap.
    Tap,
}

const ACTION_COUNT: usize = 9;

impl Action {
    /// Every action, in index order.
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Interact,
        Action::Confirm,
        Action::Cancel,
        Action::Tap,
    ];

    const fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
            Action::Jump => 4,
            Action::Interact => 5,
            Action::Confirm => 6,
            Action::Cancel => 7,
            Action::Tap => 8,
        }
    }
}

/// Which actions are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    down: [bool; ACTION_COUNT],
}

impl InputSnapshot {
    /// Nothing held.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with_action_down(mut self, action: Action, is_down: bool) -> Self {
        self.set(action, is_down);
        self
    }

    /// Mark an action held or released.
    pub fn set(&mut self, action: Action, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    /// Whether the action is held.
    pub fn is_down(&self, action: Action) -> bool {
        self.down[action.index()]
    }
}

/// Per-action edge detection against the previous frame.
///
/// An action fires once when it goes down and must be released before it
/// fires again. Each action is tracked independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputEdges {
    previous: InputSnapshot,
    current: InputSnapshot,
}

impl InputEdges {
    /// Roll the snapshot forward; call once per frame before any query.
    pub fn advance(&mut self, snapshot: InputSnapshot) {
        self.previous = self.current;
        self.current = snapshot;
    }

    /// Held this frame.
    pub fn held(&self, action: Action) -> bool {
        self.current.is_down(action)
    }

    /// Went down this frame.
    pub fn pressed(&self, action: Action) -> bool {
        self.current.is_down(action) && !self.previous.is_down(action)
    }
}
