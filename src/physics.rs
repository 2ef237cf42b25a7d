//! Player movement, gravity, collision and the follow camera.

use macroquad::prelude::{vec2, Vec2};

use crate::config::EngineConfig;
use crate::geom::{Rect, WorldRect};

const WALK_FRAMES: u32 = 8;
const WALK_FRAME_MS: u64 = 70;
const IDLE_FRAME_MS: u64 = 500;
const SPRITE_CELL: i32 = 24;

/// 8-frame walk/idle cycle for the player sprite sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkCycle {
    /// Frame index, 0 to 7.
    pub frame: u32,
    last_ms: u64,
}

impl WalkCycle {
    /// Advance one frame when the walk or idle delay has passed.
    pub fn tick(&mut self, now_ms: u64, moving: bool) {
        let delay = if moving { WALK_FRAME_MS } else { IDLE_FRAME_MS };
        if now_ms > self.last_ms + delay {
            self.frame = (self.frame + 1) % WALK_FRAMES;
            self.last_ms = now_ms;
        }
    }

    /// Cell of the 24x24 sheet: row 0 idles, rows 1 and 2 walk left and right.
    pub fn source_rect(&self, direction: i32, moving: bool) -> Rect {
        let frame = self.frame as i32;
        let (x, y) = if moving {
            let row = if direction < 0 { SPRITE_CELL } else { SPRITE_CELL * 2 };
            (frame * SPRITE_CELL, row)
        } else {
            let base = if direction < 0 { 0 } else { SPRITE_CELL * 2 };
            (base + (frame % 2) * SPRITE_CELL, 0)
        };
        Rect::new(x, y, SPRITE_CELL, SPRITE_CELL)
    }
}

/// The avatar. `position` is continuous world space; the render rectangle is
/// derived from it each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left in world space.
    pub position: Vec2,
    /// Vertical speed; positive is down.
    pub velocity_y: i32,
    /// `-1` facing left, `1` facing right.
    pub direction: i32,
    /// Walked this frame.
    pub moving: bool,
    /// In the air after a jump.
    pub jumping: bool,
    /// Collision width.
    pub width: i32,
    /// Collision height.
    pub height: i32,
    /// Money for the shop.
    pub gold: u32,
    /// Sprite animation state.
    pub walk: WalkCycle,
}

impl Player {
    /// Player at the spawn point, facing right.
    pub fn new(cfg: &EngineConfig) -> Self {
        Player {
            position: vec2(cfg.player_spawn.0, cfg.player_spawn.1),
            velocity_y: 0,
            direction: 1,
            moving: false,
            jumping: false,
            width: cfg.player_width,
            height: cfg.player_height,
            gold: cfg.starting_gold,
            walk: WalkCycle::default(),
        }
    }

    /// Collision box in world space.
    pub fn world_rect(&self) -> WorldRect {
        WorldRect::new(
            self.position.x,
            self.position.y,
            self.width as f32,
            self.height as f32,
        )
    }

    /// Collision box relative to the camera.
    pub fn screen_rect(&self, camera: Vec2) -> Rect {
        self.world_rect().to_screen(camera)
    }

    /// Held left/right input; left wins when both are held.
    pub fn walk(&mut self, left: bool, right: bool, dt: f32, speed: f32) {
        let step = speed * dt;
        if left {
            self.position.x -= step;
            self.direction = -1;
            self.moving = true;
        } else if right {
            self.position.x += step;
            self.direction = 1;
            self.moving = true;
        } else {
            self.moving = false;
        }
    }

    /// Start a jump unless already airborne.
    pub fn jump(&mut self, velocity: i32) {
        if !self.jumping {
            self.velocity_y = velocity;
            self.jumping = true;
        }
    }
}

/// Horizontal-only camera with exponential follow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Smoothed horizontal position.
    pub x: f32,
    /// Viewport; `x` is the truncated offset.
    pub rect: Rect,
}

impl Camera {
    /// Camera at the world origin.
    pub fn new(viewport_w: i32, viewport_h: i32) -> Self {
        Camera {
            x: 0.0,
            rect: Rect::new(0, 0, viewport_w, viewport_h),
        }
    }

    /// Integer offset used for all camera-relative math this frame.
    pub fn offset(&self) -> Vec2 {
        vec2(self.rect.x as f32, self.rect.y as f32)
    }

    /// Ease toward centring the player. Clamped at the left edge only.
    pub fn follow(&mut self, player: &Player, dt: f32, speed: f32) {
        let centre = (self.rect.w / 2 - player.width / 2) as f32;
        self.x += (player.position.x - self.x - centre) * speed * dt;
        if self.x < 0.0 {
            self.x = 0.0;
        }
        self.rect.x = self.x as i32;
    }
}

/// One gravity step followed by the two collision passes.
///
/// The vertical pass lands the player on the first platform hit while
/// falling; the horizontal pass then pushes it out of the first platform it
/// still overlaps. Each pass stops at its first hit.
pub fn step(player: &mut Player, camera: &Camera, platforms: &[WorldRect], gravity: i32) {
    player.velocity_y += gravity;
    player.position.y += player.velocity_y as f32;

    let cam = camera.offset();
    let pr = player.screen_rect(cam);
    for platform in platforms {
        let plat = platform.to_screen(cam);
        if !pr.has_intersection(&plat) {
            continue;
        }
        if player.velocity_y > 0 {
            if pr.x < plat.x {
                player.position.x = (plat.x - pr.w) as f32 + cam.x;
            }
            if pr.right() > plat.right() {
                player.position.x = (plat.right() - pr.w) as f32 + cam.x;
            }
            player.position.y = (plat.y - pr.h) as f32 + cam.y;
            player.velocity_y = 0;
            player.jumping = false;
        }
        break;
    }

    let pr = player.screen_rect(cam);
    for platform in platforms {
        let plat = platform.to_screen(cam);
        if !pr.has_intersection(&plat) {
            continue;
        }
        if pr.x < plat.x {
            player.position.x = (plat.x - pr.w) as f32 + cam.x;
        } else {
            player.position.x = plat.right() as f32 + cam.x;
        }
        break;
    }
}

/// Movement, gravity, collision and camera for one free-roam tick.
pub fn update(
    player: &mut Player,
    camera: &mut Camera,
    platforms: &[WorldRect],
    cfg: &EngineConfig,
    dt: f32,
) {
    step(player, camera, platforms, cfg.gravity);
    camera.follow(player, dt, cfg.camera_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(&EngineConfig::default());
        p.position = vec2(x, y);
        p
    }

    #[test]
    fn falling_player_lands_on_platform_top() {
        let floor = WorldRect::new(0.0, 450.0, 800.0, 75.0);
        let mut player = player_at(100.0, 385.0);
        player.velocity_y = 3;
        player.jumping = true;
        let camera = Camera::new(800, 600);

        step(&mut player, &camera, &[floor], 1);

        let rect = player.screen_rect(camera.offset());
        assert_eq!(rect.bottom(), 450);
        assert_eq!(player.velocity_y, 0);
        assert!(!player.jumping);
        assert_eq!(player.position.x, 100.0);
    }

    #[test]
    fn resting_player_stays_put_across_ticks() {
        let floor = WorldRect::new(0.0, 450.0, 800.0, 75.0);
        let mut player = player_at(200.0, 378.0);
        let camera = Camera::new(800, 600);
        for _ in 0..10 {
            step(&mut player, &camera, &[floor], 1);
        }
        assert_eq!(player.position, vec2(200.0, 378.0));
    }

    #[test]
    fn landing_across_right_edge_nudges_back_onto_platform() {
        let floor = WorldRect::new(0.0, 450.0, 300.0, 75.0);
        let mut player = player_at(260.0, 380.0);
        let camera = Camera::new(800, 600);
        step(&mut player, &camera, &[floor], 1);
        assert_eq!(player.position, vec2(228.0, 378.0));
    }

    #[test]
    fn horizontal_pass_pushes_to_nearer_side() {
        let wall = WorldRect::new(300.0, 0.0, 60.0, 600.0);
        let camera = Camera::new(800, 600);

        let mut from_left = player_at(250.0, 100.0);
        from_left.velocity_y = -5;
        step(&mut from_left, &camera, &[wall], 1);
        assert_eq!(from_left.position.x, 228.0);

        let mut from_right = player_at(340.0, 100.0);
        from_right.velocity_y = -5;
        step(&mut from_right, &camera, &[wall], 1);
        assert_eq!(from_right.position.x, 360.0);
    }

    #[test]
    fn collision_respects_camera_offset() {
        let floor = WorldRect::new(1000.0, 450.0, 400.0, 75.0);
        let mut camera = Camera::new(800, 600);
        camera.x = 700.0;
        camera.rect.x = 700;
        let mut player = player_at(1100.0, 380.0);
        step(&mut player, &camera, &[floor], 1);
        assert_eq!(player.position.y, 378.0);
        assert_eq!(player.position.x, 1100.0);
    }

    #[test]
    fn camera_eases_toward_player_and_clamps_left() {
        let mut camera = Camera::new(800, 600);
        let player = player_at(1364.0, 0.0);
        camera.follow(&player, 0.1, 5.0);
        // target offset is 1364 - 364 = 1000; half of the gap per 0.1s at speed 5
        assert_eq!(camera.x, 500.0);
        assert_eq!(camera.rect.x, 500);

        let near_origin = player_at(10.0, 0.0);
        camera.follow(&near_origin, 1.0, 5.0);
        assert_eq!(camera.x, 0.0);
    }

    #[test]
    fn walking_sets_direction_and_moving() {
        let mut player = player_at(100.0, 0.0);
        player.walk(true, false, 0.5, 300.0);
        assert_eq!((player.position.x, player.direction, player.moving), (-50.0, -1, true));
        player.walk(false, true, 0.1, 300.0);
        assert_eq!((player.position.x, player.direction), (-20.0, 1));
        player.walk(false, false, 0.1, 300.0);
        assert!(!player.moving);
    }

    #[test]
    fn jump_only_from_ground() {
        let mut player = player_at(0.0, 0.0);
        player.jump(-15);
        player.velocity_y = -3;
        player.jump(-15);
        assert_eq!(player.velocity_y, -3);
    }

    #[test]
    fn walk_cycle_uses_moving_and_idle_delays() {
        let mut cycle = WalkCycle::default();
        cycle.tick(71, true);
        assert_eq!(cycle.frame, 1);
        cycle.tick(400, false);
        assert_eq!(cycle.frame, 1);
        cycle.tick(572, false);
        assert_eq!(cycle.frame, 2);
        assert_eq!(cycle.source_rect(1, true), Rect::new(48, 48, 24, 24));
        assert_eq!(cycle.source_rect(-1, false), Rect::new(0, 0, 24, 24));
        assert_eq!(cycle.source_rect(1, false), Rect::new(48, 0, 24, 24));
    }
}
