//! Assembling a [`World`](crate::world::World) from a directory of maps.

use crate::config::EngineConfig;
use crate::error::MapError;
use crate::loader::json_loader::load_map_dir;
use crate::map::{PlacedMap, TileMap};
use crate::objects::extract_objects;
use crate::world::{Capacity, World};
use macroquad::prelude::vec2;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Build a world from map documents, placing each map to the right of the
/// previous one. Maps whose tile layer cannot be decoded are left out.
pub fn build_world(documents: Vec<(PathBuf, JsonValue)>, cfg: &EngineConfig) -> World {
    let mut world = World::new(Capacity::from_config(cfg));
    let mut offset_x = 0.0;

    for (path, doc) in documents {
        let map = match TileMap::from_document(doc) {
            Ok(map) => map,
            Err(error) => {
                warn!(path = %path.display(), error = %error, "map_skipped");
                continue;
            }
        };
        let offset = vec2(offset_x, 0.0);
        let report = extract_objects(map.document(), offset, cfg.render_scale, &mut world);
        info!(
            path = %path.display(),
            platforms = report.platforms,
            zones = report.zones,
            shop_items = report.shop_items,
            skipped = report.skipped,
            "map_loaded"
        );
        offset_x += map.pixel_width(cfg.render_scale);
        world.add_map(PlacedMap { map, offset });
    }
    world
}

/// Read every map in `dir` and build the world from them.
pub fn load_world(dir: &Path, cfg: &EngineConfig) -> Result<World, MapError> {
    let docs = load_map_dir(dir)?;
    Ok(build_world(docs, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde_json::json;

    fn map(width: u64, floor_x: u32) -> JsonValue {
        let cells = vec![1u32; width as usize];
        let bytes: Vec<u8> = cells.iter().flat_map(|c| c.to_le_bytes()).collect();
        json!({
            "width": width, "height": 1, "tilewidth": 24, "tileheight": 24,
            "layers": [
                { "type": "tilelayer", "data": STANDARD.encode(bytes) },
                { "type": "objectgroup", "objects": [
                    { "name": "floor", "x": floor_x, "y": 0, "width": 24, "height": 24 } ] }
            ]
        })
    }

    #[test]
    fn maps_are_placed_side_by_side() {
        let docs = vec![
            (PathBuf::from("a.json"), map(10, 0)),
            (PathBuf::from("b.json"), map(4, 24)),
        ];
        let world = build_world(docs, &EngineConfig::default());
        assert_eq!(world.maps().len(), 2);
        assert_eq!(world.maps()[1].offset.x, 720.0);
        assert_eq!(world.platforms()[0].x, 0.0);
        assert_eq!(world.platforms()[1].x, 720.0 + 72.0);
    }

    #[test]
    fn undecodable_maps_contribute_nothing() {
        let mut broken = map(2, 0);
        broken["layers"][0]["data"] = json!("???");
        let docs = vec![
            (PathBuf::from("broken.json"), broken),
            (PathBuf::from("ok.json"), map(2, 0)),
        ];
        let world = build_world(docs, &EngineConfig::default());
        assert_eq!(world.maps().len(), 1);
        assert_eq!(world.maps()[0].offset.x, 0.0);
        assert_eq!(world.platforms().len(), 1);
    }
}
