use macroquad::prelude::*;
use tileworld::{Game, Mirror, Mode};

use super::assets::DiskAssets;

const TEXT_SIZE: u16 = 24;
const PULSE_SIZE: u16 = 32;
const PANEL: Color = Color::new(0.0, 0.0, 0.0, 0.75);

fn to_mq(r: tileworld::Rect) -> Rect {
    Rect::new(r.x as f32, r.y as f32, r.w as f32, r.h as f32)
}

fn label(assets: &DiskAssets, text: &str, x: f32, y: f32, size: u16, color: Color) {
    draw_text_ex(
        text,
        x,
        y,
        TextParams {
            font: Some(&assets.font),
            font_size: size,
            color,
            ..Default::default()
        },
    );
}

/// Draw one frame of the game. Takes `&mut` only to expire the overlay text.
pub fn draw(game: &mut Game, assets: &DiskAssets, now_ms: u64) {
    clear_background(BLACK);
    let camera = game.camera.offset();
    let scale = game.config.render_scale;

    for placed in game.world.maps() {
        let per_row = placed.map.tiles_per_row(game.config.tileset_width);
        for (col, row, id) in placed.map.cells() {
            let Some(src) = placed.map.source_rect(id, per_row) else {
                continue;
            };
            let dest = placed.dest_rect(col, row, scale, camera);
            if dest.right() < 0 || dest.x > screen_width() as i32 {
                continue;
            }
            let t = id.transform();
            draw_texture_ex(
                &assets.tileset,
                dest.x as f32,
                dest.y as f32,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(dest.w as f32, dest.h as f32)),
                    source: Some(to_mq(src)),
                    rotation: t.angle.to_radians(),
                    flip_x: t.mirror == Mirror::Horizontal,
                    flip_y: t.mirror == Mirror::Vertical,
                    pivot: None,
                },
            );
        }
    }

    for anim in game.world.animations() {
        if !anim.active || anim.finished {
            continue;
        }
        let Some(tex) = anim.current_frame().and_then(|h| assets.frame(h)) else {
            continue;
        };
        let pos = anim.position - camera;
        draw_texture_ex(
            tex,
            pos.x,
            pos.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(tex.size() * scale),
                ..Default::default()
            },
        );
    }

    let player = &game.player;
    let dest = player.screen_rect(camera);
    draw_texture_ex(
        &assets.player,
        dest.x as f32,
        dest.y as f32,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(dest.w as f32, dest.h as f32)),
            source: Some(to_mq(player.walk.source_rect(player.direction, player.moving))),
            ..Default::default()
        },
    );

    match game.mode() {
        Mode::Shop => draw_shop(game, assets),
        Mode::Dialogue => draw_dialogue(game, assets),
        Mode::MiniGame => draw_minigame(game, assets, now_ms),
        Mode::Free => {}
    }

    if let Some(text) = game.overlay.visible(now_ms) {
        label(assets, text, 100.0, 100.0, TEXT_SIZE, WHITE);
    }
}

fn draw_shop(game: &Game, assets: &DiskAssets) {
    draw_rectangle(80.0, 140.0, 400.0, 300.0, PANEL);
    label(assets, &format!("Gold: {}", game.player.gold), 100.0, 170.0, TEXT_SIZE, GOLD);
    for (i, item) in game.world.shop_items().iter().enumerate() {
        let color = if i == game.shop.selected() { YELLOW } else { WHITE };
        let price = game
            .config
            .price_of(&item.name)
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let line = format!("{}  {}  ({} left)", item.name, price, item.stock);
        label(assets, &line, 100.0, 210.0 + i as f32 * 30.0, TEXT_SIZE, color);
    }
}

fn draw_dialogue(game: &Game, assets: &DiskAssets) {
    let table = &game.world.dialogue;
    let Some(cursor) = game.dialogue.cursor() else {
        return;
    };
    let top = screen_height() - 200.0;
    draw_rectangle(20.0, top, screen_width() - 40.0, 180.0, PANEL);
    if let Some(node) = table.get(cursor.node) {
        label(assets, &node.name, 40.0, top + 30.0, TEXT_SIZE, SKYBLUE);
    }
    let lines = game.dialogue.visible_lines(table);
    for (i, line) in lines.iter().enumerate() {
        label(assets, line, 40.0, top + 60.0 + i as f32 * 26.0, TEXT_SIZE, WHITE);
    }
    if !cursor.choosing {
        return;
    }
    let Some(node) = table.get(cursor.node) else {
        return;
    };
    let x = screen_width() / 2.0 + 40.0;
    for (i, option) in node.options.iter().enumerate() {
        let color = if i == cursor.selected { YELLOW } else { LIGHTGRAY };
        label(assets, &option.text, x, top + 60.0 + i as f32 * 26.0, TEXT_SIZE, color);
    }
}

fn draw_minigame(game: &Game, assets: &DiskAssets, now_ms: u64) {
    let taps = game.minigame.taps().to_string();
    let secs = game.minigame.remaining_ms(now_ms) as f32 / 1000.0;
    let (size, color) = if game.minigame.is_pulsing(now_ms) {
        (PULSE_SIZE, YELLOW)
    } else {
        (TEXT_SIZE, WHITE)
    };
    label(assets, &taps, screen_width() / 2.0, 200.0, size, color);
    label(assets, &format!("{secs:.1}s"), screen_width() / 2.0, 240.0, TEXT_SIZE, WHITE);
}
