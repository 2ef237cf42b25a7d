use macroquad::prelude::{is_key_down, KeyCode};
use tileworld::{Action, InputSnapshot};

fn keys_for(action: Action) -> &'static [KeyCode] {
    match action {
        Action::Left => &[KeyCode::Left, KeyCode::A],
        Action::Right => &[KeyCode::Right, KeyCode::D],
        Action::Up => &[KeyCode::Up, KeyCode::W],
        Action::Down => &[KeyCode::Down, KeyCode::S],
        Action::Jump => &[KeyCode::Space],
        Action::Interact => &[KeyCode::E],
        Action::Confirm => &[KeyCode::Enter],
        Action::Cancel => &[KeyCode::Escape],
        Action::Tap => &[KeyCode::Space],
    }
}

/// Current keyboard state as logical actions.
pub fn poll() -> InputSnapshot {
    let mut snapshot = InputSnapshot::empty();
    for action in Action::ALL {
        let down = keys_for(action).iter().any(|k| is_key_down(*k));
        snapshot.set(action, down);
    }
    snapshot
}
