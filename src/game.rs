//! The per-frame tick.
//!
//! Order each frame: input edges, free-roam movement/physics/camera and the
//! interact scan (only when no modal controller is open), the one open modal
//! controller, then animations. At most one of shop, dialogue and mini-game
//! is ever open; a request to open a second one while another is open is
//! refused.

use std::time::Duration;

use macroquad::prelude::Vec2;
use tracing::{info, warn};

use crate::animation::{self, AnimationInstance};
use crate::config::EngineConfig;
use crate::dialogue::{DialogueController, DialogueOutcome, DialogueTable};
use crate::error::AssetError;
use crate::host::Host;
use crate::input::{Action, InputEdges, InputSnapshot};
use crate::interaction::{self, ZoneAction};
use crate::minigame::MiniGame;
use crate::physics::{self, Camera, Player};
use crate::shop::{Shop, CUE_CLOSE};
use crate::text::{TextDisplay, TextOverlay};
use crate::world::{LastInteraction, World};

/// Who owns input this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Walking around; interact scans zones.
    Free,
    /// Shop open.
    Shop,
    /// Dialogue running.
    Dialogue,
    /// Mini-game round running.
    MiniGame,
}

/// Whether the main loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Run another frame.
    Continue,
    /// Stop the session.
    Quit,
}

/// Everything one session owns.
pub struct Game {
    /// Tunables.
    pub config: EngineConfig,
    /// Maps, collision and event state.
    pub world: World,
    /// The avatar.
    pub player: Player,
    /// Horizontal follow camera.
    pub camera: Camera,
    /// Input edges for this frame.
    pub input: InputEdges,
    /// Shop controller.
    pub shop: Shop,
    /// Dialogue controller.
    pub dialogue: DialogueController,
    /// Mini-game controller.
    pub minigame: MiniGame,
    /// On-screen text slot.
    pub overlay: TextOverlay,
}

impl Game {
    /// Spawn the player and leave every controller closed.
    pub fn new(world: World, config: EngineConfig) -> Self {
        Game {
            player: Player::new(&config),
            camera: Camera::new(config.viewport_width, config.viewport_height),
            input: InputEdges::default(),
            shop: Shop::default(),
            dialogue: DialogueController::new(config.reveal_interval_ms),
            minigame: MiniGame::new(&config),
            overlay: TextOverlay::default(),
            world,
            config,
        }
    }

    /// Derived from the controllers: shop, then mini-game, then dialogue.
    pub fn mode(&self) -> Mode {
        if self.shop.is_visible() {
            Mode::Shop
        } else if self.minigame.is_active() {
            Mode::MiniGame
        } else if self.dialogue.is_active() {
            Mode::Dialogue
        } else {
            Mode::Free
        }
    }

    /// Advance one frame. Errors are asset failures and are fatal.
    pub fn tick<H: Host>(
        &mut self,
        snapshot: InputSnapshot,
        now_ms: u64,
        dt: f32,
        host: &mut H,
    ) -> Result<TickOutcome, AssetError> {
        self.input.advance(snapshot);

        if self.mode() == Mode::Free {
            self.update_free(now_ms, dt, host)?;
        } else {
            self.player.moving = false;
        }

        match self.mode() {
            Mode::Shop => self.update_shop(host),
            Mode::MiniGame => self.update_minigame(now_ms),
            Mode::Dialogue => {
                if self.update_dialogue(now_ms, host) == TickOutcome::Quit {
                    return Ok(TickOutcome::Quit);
                }
            }
            Mode::Free => {}
        }

        self.player.walk.tick(now_ms, self.player.moving);
        animation::tick_all(self.world.animations_mut(), now_ms);
        let finished = self.world.take_finished_frames();
        if !finished.is_empty() {
            host.release_frames(finished);
        }
        Ok(TickOutcome::Continue)
    }

    fn update_free<H: Host>(&mut self, now_ms: u64, dt: f32, host: &mut H) -> Result<(), AssetError> {
        let cfg = &self.config;
        self.player.walk(
            self.input.held(Action::Left),
            self.input.held(Action::Right),
            dt,
            cfg.walk_speed,
        );
        if cfg.jump_enabled && self.input.pressed(Action::Jump) {
            self.player.jump(cfg.jump_velocity);
        }
        physics::update(&mut self.player, &mut self.camera, self.world.platforms(), cfg, dt);

        if self.input.pressed(Action::Interact) {
            self.interact(now_ms, host)?;
        }
        Ok(())
    }

    /// Run the zone scan at the player's world position and apply its effects.
    pub fn interact<H: Host>(&mut self, now_ms: u64, host: &mut H) -> Result<(), AssetError> {
        let actions = interaction::scan(self.world.zones(), &self.player.world_rect());
        for action in actions {
            match action {
                ZoneAction::Teleport { from, to, name, sound } => {
                    info!(name = %name, from_x = from.x, to_x = to.x, to_y = to.y, "teleported");
                    self.player.position = to;
                    self.world.last_interaction = Some(LastInteraction { position: from, name });
                    if let Some(cue) = sound {
                        host.play(&cue);
                    }
                }
                ZoneAction::ShowText(text) => {
                    self.overlay
                        .show(TextDisplay::new(text, now_ms, self.config.text_display_ms));
                }
                ZoneAction::OpenShop => match self.mode() {
                    Mode::Free | Mode::Shop => {
                        self.shop.open();
                    }
                    other => warn!(requested = "shop", open = ?other, "modal_busy"),
                },
                ZoneAction::Event { event_id, position } => {
                    self.trigger_event(event_id, position, now_ms, host)?;
                }
            }
        }
        Ok(())
    }

    /// Reset the event's animation and dialogue, then start whatever the
    /// event drives. Re-triggering an event always resets it.
    ///
    /// Refused without touching the world while a modal controller is open.
    pub fn trigger_event<H: Host>(
        &mut self,
        event_id: i64,
        position: Vec2,
        now_ms: u64,
        host: &mut H,
    ) -> Result<(), AssetError> {
        let mode = self.mode();
        if mode != Mode::Free {
            warn!(event_id, open = ?mode, "modal_busy");
            return Ok(());
        }
        info!(event_id, "event_triggered");

        let frames = host.load_event_frames(event_id)?;
        let instance =
            AnimationInstance::new(event_id, position, frames, self.config.animation_frame_ms, now_ms);
        match self.world.reset_animation(instance) {
            Ok(old) if !old.is_empty() => host.release_frames(old),
            Ok(_) => {}
            Err((error, frames)) => {
                warn!(event_id, error = %error, "animation_dropped");
                host.release_frames(frames);
            }
        }

        self.world.dialogue = match host.dialogue_document(event_id)? {
            Some(doc) => DialogueTable::from_document(event_id, &doc).unwrap_or_else(|error| {
                warn!(event_id, error = %error, "dialogue_skipped");
                DialogueTable::default()
            }),
            None => DialogueTable::default(),
        };

        if event_id == self.config.minigame_event_id {
            self.minigame.start(now_ms);
        } else {
            if let Some(anim) = self.world.animation_mut(event_id) {
                anim.activate(now_ms);
            }
            self.dialogue.start(&self.world.dialogue, now_ms);
        }
        Ok(())
    }

    fn update_shop<H: Host>(&mut self, host: &mut H) {
        let count = self.world.shop_items().len();
        if self.input.pressed(Action::Up) {
            self.shop.navigate(-1, count);
        }
        if self.input.pressed(Action::Down) {
            self.shop.navigate(1, count);
        }
        if self.input.pressed(Action::Confirm) {
            let outcome = self.shop.confirm(
                self.world.shop_items_mut(),
                &mut self.player.gold,
                &self.config.prices,
            );
            host.play(outcome.cue());
        }
        if self.input.pressed(Action::Cancel) && self.shop.close() {
            host.play(CUE_CLOSE);
        }
    }

    fn update_minigame(&mut self, now_ms: u64) {
        if let Some(result) = self.minigame.update(now_ms) {
            self.overlay.show(TextDisplay::new(
                result.summary(),
                now_ms,
                self.config.minigame_summary_ms,
            ));
            let rewards = &self.config.reward_event_ids;
            for anim in self.world.animations_mut() {
                if rewards.contains(&anim.event_id) {
                    anim.activate(now_ms);
                    info!(event_id = anim.event_id, "reward_animation_activated");
                }
            }
            self.dialogue.start(&self.world.dialogue, now_ms);
            return;
        }
        if self.input.pressed(Action::Tap) {
            self.minigame.tap(now_ms);
        }
    }

    fn update_dialogue<H: Host>(&mut self, now_ms: u64, host: &mut H) -> TickOutcome {
        let table = &self.world.dialogue;
        self.dialogue.update(table, now_ms);
        if self.input.pressed(Action::Up) {
            self.dialogue.navigate(table, -1);
        }
        if self.input.pressed(Action::Down) {
            self.dialogue.navigate(table, 1);
        }
        if !self.input.pressed(Action::Confirm) {
            return TickOutcome::Continue;
        }
        match self.dialogue.confirm(table, now_ms) {
            DialogueOutcome::Ended { exit_sound } => {
                if let Some(cue) = exit_sound {
                    host.play(&cue);
                }
                self.end_event();
                TickOutcome::Continue
            }
            DialogueOutcome::Quit => TickOutcome::Quit,
            DialogueOutcome::Advanced(_) | DialogueOutcome::Ignored => TickOutcome::Continue,
        }
    }

    /// Finish the event linked to the current dialogue and empty the table.
    /// Its frames are released at the end of the tick.
    fn end_event(&mut self) {
        if let Some(event_id) = self.world.dialogue.event_id {
            if let Some(anim) = self.world.animation_mut(event_id) {
                anim.finish();
            }
        }
        self.world.dialogue.clear();
    }
}

/// Sleep-based frame cap.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    budget: Duration,
}

impl FrameLimiter {
    /// Limiter targeting `budget_ms` per frame.
    pub fn new(budget_ms: u64) -> Self {
        FrameLimiter {
            budget: Duration::from_millis(budget_ms),
        }
    }

    /// Time left to sleep after a frame that took `elapsed`.
    pub fn leftover(&self, elapsed: Duration) -> Option<Duration> {
        self.budget.checked_sub(elapsed).filter(|d| !d.is_zero())
    }
}
