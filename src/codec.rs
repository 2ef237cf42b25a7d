//! Tile layer payload decoding.
//!
//! Tiled stores each cell as a little-endian `u32` global tile id whose top
//! three bits are flip flags. The base64 text of a tile layer decodes to a
//! flat buffer of those words, row-major.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CodecError;

/// Horizontal flip flag.
pub const FLIP_H: u32 = 0x8000_0000; // bit 31
/// Vertical flip flag.
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
/// Diagonal (anti-diagonal transpose) flag.
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
/// Mask for the tile id without flags.
pub const GID_MASK: u32 = 0x1FFF_FFFF; // low 29 bits

/// Raw 32-bit cell value, flags included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

impl TileId {
    /// Tile id with the flag bits cleared.
    #[inline] pub fn clean(self) -> u32 { self.0 & GID_MASK }
    /// Horizontal flip bit.
    #[inline] pub fn flip_h(self) -> bool { (self.0 & FLIP_H) != 0 }
    /// Vertical flip bit.
    #[inline] pub fn flip_v(self) -> bool { (self.0 & FLIP_V) != 0 }
    /// Diagonal flip bit.
    #[inline] pub fn flip_d(self) -> bool { (self.0 & FLIP_D) != 0 }
    /// Id 0 draws nothing.
    #[inline] pub fn is_empty(self) -> bool { self.clean() == 0 }

    /// Zero-based tileset index, or `None` for an empty cell.
    #[inline]
    pub fn tile_index(self) -> Option<u32> {
        self.clean().checked_sub(1)
    }

    /// How to draw this cell.
    pub fn transform(self) -> TileTransform {
        TileTransform::from_flags(self.flip_h(), self.flip_v(), self.flip_d())
    }
}

/// Mirror axis applied when blitting a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    /// No mirroring.
    None,
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
}

/// Rotation (degrees, clockwise) plus mirror used to draw a flipped tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileTransform {
    /// Clockwise rotation in degrees.
    pub angle: f32,
    /// Mirror applied after rotation.
    pub mirror: Mirror,
}

impl TileTransform {
    /// Draw the tile as stored.
    pub const IDENTITY: TileTransform = TileTransform {
        angle: 0.0,
        mirror: Mirror::None,
    };

    /// Fixed table for the eight flag combinations.
    ///
    /// The diagonal flip is applied before rotation, so the table cannot be
    /// derived by composing the three flags independently. Note that a lone
    /// diagonal flag maps to -90 degrees plus a horizontal mirror.
    pub fn from_flags(flip_h: bool, flip_v: bool, flip_d: bool) -> Self {
        let (angle, mirror) = match (flip_h, flip_v, flip_d) {
            (false, false, false) => (0.0, Mirror::None),
            (true, false, false) => (0.0, Mirror::Horizontal),
            (false, true, false) => (0.0, Mirror::Vertical),
            (true, true, false) => (180.0, Mirror::None),
            (false, false, true) => (-90.0, Mirror::Horizontal),
            (true, false, true) => (90.0, Mirror::None),
            (false, true, true) => (-90.0, Mirror::None),
            (true, true, true) => (90.0, Mirror::Horizontal),
        };
        TileTransform { angle, mirror }
    }
}

/// Decode standard-alphabet base64 text.
///
/// ASCII whitespace is ignored. The remaining text must be a multiple of four
/// characters with canonical padding.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() || compact.len() % 4 != 0 {
        return Err(CodecError::Length(compact.len()));
    }
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Decode a tile layer payload into one id per cell. Empty cells come back
/// as `TileId(0)` with their flag bits dropped.
pub fn decode_tile_buffer(text: &str) -> Result<Vec<TileId>, CodecError> {
    let bytes = decode_base64(text)?;
    if bytes.len() % 4 != 0 {
        return Err(CodecError::Truncated(bytes.len()));
    }
    Ok((0..bytes.len() / 4)
        .map(|i| tile_at(&bytes, i).unwrap_or(TileId(0)))
        .collect())
}

/// Read the cell at `index` from a decoded byte buffer.
///
/// Returns `None` when the cell is empty (stored id 0) or out of range.
pub fn tile_at(buffer: &[u8], index: usize) -> Option<TileId> {
    let start = index.checked_mul(4)?;
    let word = buffer.get(start..start + 4)?;
    let id = TileId(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
