// tests/game_flow.rs

use std::collections::HashMap;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use tileworld::{
    build_world, Action, AssetError, AssetStore, AudioSink, EngineConfig, FrameHandle, Game,
    InputSnapshot, Mode, TickOutcome,
};

/// Records every call the game makes to its collaborators.
#[derive(Default)]
struct FakeHost {
    frame_counts: HashMap<i64, usize>,
    dialogues: HashMap<i64, Value>,
    next_handle: u32,
    played: Vec<String>,
    released: Vec<FrameHandle>,
}

impl AssetStore for FakeHost {
    fn load_event_frames(&mut self, event_id: i64) -> Result<Vec<FrameHandle>, AssetError> {
        let count = self.frame_counts.get(&event_id).copied().unwrap_or(0);
        let start = self.next_handle;
        self.next_handle += count as u32;
        Ok((start..self.next_handle).map(FrameHandle).collect())
    }

    fn release_frames(&mut self, frames: Vec<FrameHandle>) {
        self.released.extend(frames);
    }

    fn dialogue_document(&mut self, event_id: i64) -> Result<Option<Value>, AssetError> {
        Ok(self.dialogues.get(&event_id).cloned())
    }
}

impl AudioSink for FakeHost {
    fn play(&mut self, cue: &str) {
        self.played.push(cue.to_string());
    }
}

/// One 20x1 map with a long floor under the spawn point plus `objects`.
fn map_with(objects: Vec<Value>) -> Value {
    let bytes: Vec<u8> = std::iter::repeat(1u32)
        .take(20)
        .flat_map(|c| c.to_le_bytes())
        .collect();
    let mut all = vec![json!({ "name": "floor", "x": 0, "y": 160, "width": 400, "height": 10 })];
    all.extend(objects);
    json!({
        "width": 20, "height": 1, "tilewidth": 24, "tileheight": 24,
        "layers": [
            { "type": "tilelayer", "data": STANDARD.encode(bytes) },
            { "type": "objectgroup", "objects": all }
        ]
    })
}

/// A 40x40 zone that overlaps the player's spawn once scaled.
fn zone_at_spawn(name: &str, properties: Value) -> Value {
    json!({ "name": name, "x": 20, "y": 120, "width": 40, "height": 40, "properties": properties })
}

struct Harness {
    game: Game,
    host: FakeHost,
    now: u64,
}

impl Harness {
    fn new(objects: Vec<Value>, host: FakeHost) -> Self {
        let cfg = EngineConfig::default();
        let world = build_world(vec![(PathBuf::from("level.json"), map_with(objects))], &cfg);
        Harness {
            game: Game::new(world, cfg),
            host,
            now: 1_000,
        }
    }

    fn tick(&mut self, held: &[Action]) -> TickOutcome {
        self.tick_after(16, held)
    }

    fn tick_after(&mut self, ms: u64, held: &[Action]) -> TickOutcome {
        self.now += ms;
        let snapshot = held
            .iter()
            .fold(InputSnapshot::empty(), |s, a| s.with_action_down(*a, true));
        self.game
            .tick(snapshot, self.now, 0.016, &mut self.host)
            .expect("fake host never fails")
    }

    /// Press and release an action over two frames.
    fn press(&mut self, action: Action) -> TickOutcome {
        let outcome = self.tick(&[action]);
        self.tick(&[]);
        outcome
    }
}

fn cat_dialogue(final_next: i64) -> Value {
    json!({
        "start": 0,
        "nodes": [
            { "id": 0, "name": "Cat", "text": ["Hi"],
              "options": [ { "text": "More", "next": 1 }, { "text": "Bye", "next": -1 } ] },
            { "id": 1, "name": "Cat", "text": ["Meow"], "sound": "purr",
              "options": [ { "text": "Ok", "next": final_next } ] }
        ]
    })
}

#[test]
fn elevator_moves_player_to_its_partner() {
    let mut h = Harness::new(
        vec![
            zone_at_spawn("elevator", json!([{ "name": "Sound", "value": "ding" }])),
            json!({ "name": "elevator", "x": 200, "y": 120, "width": 40, "height": 40 }),
        ],
        FakeHost::default(),
    );
    for _ in 0..10 {
        h.tick(&[]);
    }
    let before = h.game.player.position;

    h.press(Action::Interact);

    let last = h.game.world.last_interaction.as_ref().expect("teleport recorded");
    assert_eq!(last.name, "elevator");
    assert_eq!(last.position, before);
    assert_eq!(h.game.player.position.x, 600.0);
    assert_eq!(h.host.played, vec!["ding".to_string()]);
    assert_eq!(h.game.mode(), Mode::Free);
}

#[test]
fn shop_buys_until_stock_runs_out_then_closes() {
    let mut h = Harness::new(
        vec![zone_at_spawn("vendingMachine", json!([{ "name": "coffee", "value": 2 }]))],
        FakeHost::default(),
    );

    h.press(Action::Interact);
    assert_eq!(h.game.mode(), Mode::Shop);

    h.press(Action::Confirm);
    h.press(Action::Confirm);
    assert_eq!(h.game.player.gold, 1000);
    assert_eq!(h.game.world.shop_items()[0].stock, 0);

    h.press(Action::Confirm);
    assert_eq!(h.game.player.gold, 1000);

    h.press(Action::Cancel);
    assert_eq!(h.game.mode(), Mode::Free);
    assert_eq!(h.host.played, vec!["purchase", "purchase", "denied", "shop_close"]);
}

#[test]
fn held_confirm_buys_only_once() {
    let mut h = Harness::new(
        vec![zone_at_spawn("shop", json!([{ "name": "coffee", "value": 5 }]))],
        FakeHost::default(),
    );
    h.press(Action::Interact);
    for _ in 0..5 {
        h.tick(&[Action::Confirm]);
    }
    assert_eq!(h.game.player.gold, 2000);
}

#[test]
fn event_dialogue_ends_and_releases_the_animation() {
    let mut host = FakeHost::default();
    host.frame_counts.insert(5, 3);
    host.dialogues.insert(5, cat_dialogue(-1));
    let mut h = Harness::new(
        vec![zone_at_spawn("event", json!([{ "name": "eventID", "value": 5 }]))],
        host,
    );

    h.press(Action::Interact);
    assert_eq!(h.game.mode(), Mode::Dialogue);
    assert!(h.game.world.animations()[0].active);

    // Confirm before the text is revealed does nothing.
    h.press(Action::Confirm);
    assert_eq!(h.game.dialogue.cursor().map(|c| c.node), Some(0));

    h.tick_after(200, &[]);
    h.press(Action::Confirm);
    assert_eq!(h.game.dialogue.cursor().map(|c| c.node), Some(1));

    h.tick_after(200, &[]);
    h.press(Action::Confirm);
    assert_eq!(h.game.mode(), Mode::Free);
    assert!(h.game.world.dialogue.is_empty());
    assert!(h.game.world.animations().is_empty());
    assert_eq!(h.host.released.len(), 3);
    assert_eq!(h.host.played, vec!["purr".to_string()]);
}

#[test]
fn quit_option_stops_the_loop() {
    let mut host = FakeHost::default();
    host.dialogues.insert(5, cat_dialogue(-2));
    let mut h = Harness::new(
        vec![zone_at_spawn("event", json!([{ "name": "eventID", "value": 5 }]))],
        host,
    );

    h.press(Action::Interact);
    h.tick_after(200, &[]);
    h.press(Action::Confirm);
    h.tick_after(200, &[]);
    assert_eq!(h.tick(&[Action::Confirm]), TickOutcome::Quit);
}

#[test]
fn minigame_round_rewards_then_talks() {
    let mut host = FakeHost::default();
    host.frame_counts.insert(1, 2);
    host.dialogues.insert(1, cat_dialogue(-1));
    let mut h = Harness::new(
        vec![zone_at_spawn("event", json!([{ "name": "eventID", "value": 1 }]))],
        host,
    );

    h.tick(&[Action::Interact]);
    let started = h.now;
    assert_eq!(h.game.mode(), Mode::MiniGame);
    assert!(!h.game.world.animations()[0].active);

    for _ in 0..12 {
        h.tick(&[Action::Tap]);
        h.tick(&[]);
    }
    assert_eq!(h.game.minigame.taps(), 12);

    let remaining = started + 5_000 - h.now;
    h.tick_after(remaining, &[]);

    assert_eq!(h.game.mode(), Mode::Dialogue);
    assert!(h.game.world.animations()[0].active);
    let now = h.now;
    assert_eq!(
        h.game.overlay.visible(now),
        Some("Dash: 12 taps, 2 per second!")
    );
}

#[test]
fn second_modal_is_refused_while_shop_is_open() {
    let mut host = FakeHost::default();
    host.dialogues.insert(5, cat_dialogue(-1));
    let mut h = Harness::new(
        vec![
            zone_at_spawn("shop", json!([{ "name": "coffee", "value": 1 }])),
            zone_at_spawn("event", json!([{ "name": "eventID", "value": 5 }])),
        ],
        host,
    );

    h.press(Action::Interact);
    assert_eq!(h.game.mode(), Mode::Shop);
    assert!(!h.game.dialogue.is_active());
    assert!(!h.game.minigame.is_active());
    assert!(h.game.world.dialogue.is_empty());
    assert!(h.game.world.animations().is_empty());
}

#[test]
fn refused_event_leaves_the_running_round_alone() {
    let mut host = FakeHost::default();
    host.frame_counts.insert(1, 2);
    host.frame_counts.insert(5, 4);
    host.dialogues.insert(1, cat_dialogue(-1));
    host.dialogues.insert(5, cat_dialogue(-1));
    let mut h = Harness::new(
        vec![
            zone_at_spawn("event", json!([{ "name": "eventID", "value": 1 }])),
            zone_at_spawn("event", json!([{ "name": "eventID", "value": 5 }])),
        ],
        host,
    );

    h.tick(&[Action::Interact]);
    let started = h.now;
    assert_eq!(h.game.mode(), Mode::MiniGame);
    assert_eq!(h.host.next_handle, 2);
    assert_eq!(h.game.world.dialogue.event_id, Some(1));

    let remaining = started + 5_000 - h.now;
    h.tick_after(remaining, &[]);
    assert_eq!(h.game.mode(), Mode::Dialogue);
    assert_eq!(h.game.world.dialogue.event_id, Some(1));
    let ids: Vec<i64> = h.game.world.animations().iter().map(|a| a.event_id).collect();
    assert_eq!(ids, vec![1]);

    h.tick_after(200, &[]);
    h.press(Action::Confirm);
    h.tick_after(200, &[]);
    h.press(Action::Confirm);

    assert_eq!(h.game.mode(), Mode::Free);
    assert!(h.game.world.animations().is_empty());
    assert_eq!(h.host.released, vec![FrameHandle(0), FrameHandle(1)]);
}

#[test]
fn player_rests_on_the_floor_without_input() {
    let mut h = Harness::new(Vec::new(), FakeHost::default());
    for _ in 0..30 {
        h.tick(&[]);
    }
    assert_eq!(h.game.player.position.y, 480.0 - 72.0);
    assert_eq!(h.game.player.velocity_y, 0);
}

#[test]
fn free_text_shows_for_a_while() {
    let mut h = Harness::new(
        vec![zone_at_spawn("notice", json!([{ "name": "Text", "value": "Closed today" }]))],
        FakeHost::default(),
    );
    h.press(Action::Interact);
    let now = h.now;
    assert_eq!(h.game.overlay.visible(now), Some("Closed today"));
    assert_eq!(h.game.overlay.visible(now + 5_000), None);
}
