//! Runtime tunables.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Every tunable of the runtime. Missing fields in a config file fall back to
/// the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Pixel multiplier applied to maps, objects and animations.
    pub render_scale: f32,
    /// Most collision platforms kept.
    pub max_platforms: usize,
    /// Most interaction zones kept.
    pub max_zones: usize,
    /// Most shop items kept.
    pub max_shop_items: usize,
    /// Most live animations.
    pub max_animations: usize,
    /// Added to vertical velocity every frame.
    pub gravity: i32,
    /// Initial upward velocity of a jump (negative is up).
    pub jump_velocity: i32,
    /// Whether the jump action does anything.
    pub jump_enabled: bool,
    /// Horizontal speed in pixels per second.
    pub walk_speed: f32,
    /// Camera follow rate.
    pub camera_speed: f32,
    /// Viewport width in pixels.
    pub viewport_width: i32,
    /// Viewport height in pixels.
    pub viewport_height: i32,
    /// Player collision width.
    pub player_width: i32,
    /// Player collision height.
    pub player_height: i32,
    /// Where the player starts, in world pixels.
    pub player_spawn: (f32, f32),
    /// Gold the player starts with.
    pub starting_gold: u32,
    /// Time between revealed dialogue characters.
    pub reveal_interval_ms: u64,
    /// How long free text stays on screen.
    pub text_display_ms: u64,
    /// Length of a mini-game round.
    pub minigame_duration_ms: u64,
    /// A pulse starts every this many taps.
    pub minigame_pulse_every: u32,
    /// Length of a pulse.
    pub minigame_pulse_ms: u64,
    /// How long the round result stays on screen.
    pub minigame_summary_ms: u64,
    /// Event id that runs the mini-game instead of the dialogue.
    pub minigame_event_id: i64,
    /// Events whose animations play after a mini-game round.
    pub reward_event_ids: Vec<i64>,
    /// Time each animation frame is shown.
    pub animation_frame_ms: u64,
    /// Target frame time for the frame limiter.
    pub frame_budget_ms: u64,
    /// Tileset image width; replaced by the texture width when one is loaded.
    pub tileset_width: u32,
    /// Price of each shop item by name.
    pub prices: HashMap<String, u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let prices = [("coffee", 1000), ("sandwich", 2500), ("ramen", 1500), ("milk", 800)]
            .into_iter()
            .map(|(name, price)| (name.to_string(), price))
            .collect();
        Self {
            render_scale: 3.0,
            max_platforms: 100,
            max_zones: 100,
            max_shop_items: 10,
            max_animations: 10,
            gravity: 1,
            jump_velocity: -15,
            jump_enabled: false,
            walk_speed: 300.0,
            camera_speed: 5.0,
            viewport_width: 800,
            viewport_height: 600,
            player_width: 72,
            player_height: 72,
            player_spawn: (100.0, 400.0),
            starting_gold: 3000,
            reveal_interval_ms: 25,
            text_display_ms: 3000,
            minigame_duration_ms: 5000,
            minigame_pulse_every: 10,
            minigame_pulse_ms: 165,
            minigame_summary_ms: 2000,
            minigame_event_id: 1,
            reward_event_ids: vec![1, 2],
            animation_frame_ms: 100,
            frame_budget_ms: 16,
            tileset_width: 120,
            prices,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let txt = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        serde_json::from_str(&txt)
            .with_context(|| format!("Parsing config file {}", path.display()))
    }

    /// Price of an item, if it has one.
    pub fn price_of(&self, item: &str) -> Option<u32> {
        self.prices.get(item).copied()
    }
}
