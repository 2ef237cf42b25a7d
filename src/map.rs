//! Decoded tile maps and their placement in the world.

use macroquad::prelude::{vec2, Vec2};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::codec::{decode_tile_buffer, TileId};
use crate::error::MapError;
use crate::geom::Rect;

/// One decoded map: a grid of raw tile ids plus the document it came from.
#[derive(Debug, Clone)]
pub struct TileMap {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Tile width in source pixels.
    pub tile_w: u32,
    /// Tile height in source pixels.
    pub tile_h: u32,
    tiles: Vec<TileId>,
    document: JsonValue,
}

/// A positive dimension that fits a `u32`.
fn dimension(doc: &JsonValue, key: &'static str) -> Result<u32, MapError> {
    doc.get(key)
        .and_then(JsonValue::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or(MapError::InvalidDimension(key))
}

impl TileMap {
    /// Decode the first `tilelayer` of a map document.
    pub fn from_document(document: JsonValue) -> Result<Self, MapError> {
        let width = dimension(&document, "width")? as usize;
        let height = dimension(&document, "height")? as usize;
        let tile_w = dimension(&document, "tilewidth")?;
        let tile_h = dimension(&document, "tileheight")?;
        let cell_count = width
            .checked_mul(height)
            .ok_or(MapError::InvalidDimension("width"))?;

        let layers = document
            .get("layers")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| MapError::InvalidMap("missing layers array".to_string()))?;

        let layer = layers
            .iter()
            .find(|l| l.get("type").and_then(JsonValue::as_str) == Some("tilelayer"))
            .ok_or(MapError::NoTileLayer)?;

        let data = layer
            .get("data")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| MapError::InvalidTileData("data is not base64 text".to_string()))?;

        let tiles = decode_tile_buffer(data).map_err(|e| MapError::InvalidTileData(e.to_string()))?;
        if tiles.len() != cell_count {
            return Err(MapError::InvalidTileData(format!(
                "expected {} cells for a {}x{} map, decoded {}",
                cell_count,
                width,
                height,
                tiles.len()
            )));
        }
        debug!(width, height, tile_w, tile_h, "tile_layer_decoded");

        Ok(Self {
            width,
            height,
            tile_w,
            tile_h,
            tiles,
            document,
        })
    }

    /// The source document, for fields the runtime has not extracted.
    pub fn document(&self) -> &JsonValue {
        &self.document
    }

    /// Raw id at a cell, `None` outside the grid.
    pub fn tile(&self, col: usize, row: usize) -> Option<TileId> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get(row * self.width + col).copied()
    }

    /// Non-empty cells as `(col, row, id)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileId)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, id)| !id.is_empty())
            .map(move |(idx, id)| (idx % width, idx / width, *id))
    }

    /// Tileset columns for a tileset image of the given pixel width.
    /// Must be recomputed whenever the tileset image changes.
    pub fn tiles_per_row(&self, tileset_width: u32) -> u32 {
        tileset_width.checked_div(self.tile_w).unwrap_or(0).max(1)
    }

    /// Source rectangle of a cell inside the tileset image.
    pub fn source_rect(&self, id: TileId, tiles_per_row: u32) -> Option<Rect> {
        let index = id.tile_index()?;
        let per_row = tiles_per_row.max(1);
        let x = (index % per_row).checked_mul(self.tile_w)?;
        let y = (index / per_row).checked_mul(self.tile_h)?;
        Some(Rect::new(
            i32::try_from(x).ok()?,
            i32::try_from(y).ok()?,
            i32::try_from(self.tile_w).ok()?,
            i32::try_from(self.tile_h).ok()?,
        ))
    }

    /// Scaled width of the whole map in world pixels.
    pub fn pixel_width(&self, scale: f32) -> f32 {
        self.width as f32 * self.tile_w as f32 * scale
    }
}

/// A map placed in the continuous world at a fixed offset.
#[derive(Debug, Clone)]
pub struct PlacedMap {
    /// The decoded map.
    pub map: TileMap,
    /// World position of its top-left corner.
    pub offset: Vec2,
}

impl PlacedMap {
    /// Screen-space destination of a cell for the given camera.
    pub fn dest_rect(&self, col: usize, row: usize, scale: f32, camera: Vec2) -> Rect {
        let w = self.map.tile_w as f32 * scale;
        let h = self.map.tile_h as f32 * scale;
        let world = vec2(col as f32 * w, row as f32 * h) + self.offset;
        Rect::new(
            (world.x - camera.x) as i32,
            (world.y - camera.y) as i32,
            w as i32,
            h as i32,
        )
    }
}
