//! Turning Tiled object groups into platforms, zones and shop items.

use macroquad::prelude::Vec2;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::geom::WorldRect;
use crate::interaction::InteractionZone;
use crate::shop::ShopItem;
use crate::world::World;

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default)]
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    name: String,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

/// Largest scaled coordinate or size accepted, so screen rects stay well
/// inside `i32`.
const MAX_WORLD_COORD: f32 = 1.0e8;

fn geometry_in_range(r: &WorldRect) -> bool {
    [r.x, r.y, r.w, r.h]
        .iter()
        .all(|v| v.is_finite() && v.abs() <= MAX_WORLD_COORD)
        && r.w >= 0.0
        && r.h >= 0.0
}

/// What one map contributed to the world.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractReport {
    /// Platforms added.
    pub platforms: usize,
    /// Zones added.
    pub zones: usize,
    /// Shop items added.
    pub shop_items: usize,
    /// Objects with a name on no list.
    pub ignored: usize,
    /// Objects that were malformed or did not fit.
    pub skipped: usize,
}

#[derive(Default)]
struct ObjectProps {
    text: Option<String>,
    sound: Option<String>,
    event_id: Option<i64>,
}

fn read_properties(
    object: &str,
    props: Vec<JsonProperty>,
    world: &mut World,
    report: &mut ExtractReport,
) -> ObjectProps {
    let mut out = ObjectProps::default();
    for prop in props {
        match (prop.name.as_str(), &prop.value) {
            ("Text", JsonValue::String(s)) => out.text = Some(s.clone()),
            ("Sound", JsonValue::String(s)) => out.sound = Some(s.clone()),
            ("eventID", JsonValue::Number(n)) => {
                out.event_id = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
            }
            (name, JsonValue::Number(n)) => {
                let Some(stock) = n.as_u64().and_then(|v| u32::try_from(v).ok()) else {
                    warn!(object, property = name, "shop_item_stock_invalid");
                    report.skipped += 1;
                    continue;
                };
                match world.add_shop_item(ShopItem::new(name, stock)) {
                    Ok(()) => report.shop_items += 1,
                    Err(_) => report.skipped += 1,
                }
            }
            (name, _) => debug!(object, property = name, "property_ignored"),
        }
    }
    out
}

/// Walk every object group in a map document and add its platforms, zones
/// and shop items to the world.
///
/// Coordinates are scaled by `scale` and then shifted by `offset`, so maps
/// loaded one after another sit side by side. Malformed objects and entries
/// past capacity are logged and skipped.
pub fn extract_objects(
    document: &JsonValue,
    offset: Vec2,
    scale: f32,
    world: &mut World,
) -> ExtractReport {
    let mut report = ExtractReport::default();
    let Some(layers) = document.get("layers").and_then(JsonValue::as_array) else {
        warn!("map_without_layers");
        return report;
    };

    let groups = layers
        .iter()
        .filter(|l| l.get("type").and_then(JsonValue::as_str) == Some("objectgroup"));
    for group in groups {
        let Some(objects) = group.get("objects").and_then(JsonValue::as_array) else {
            warn!(layer = ?group.get("name"), "object_group_without_objects");
            continue;
        };
        for raw in objects {
            let obj = match JsonObject::deserialize(raw) {
                Ok(obj) => obj,
                Err(e) => {
                    warn!(error = %e, "object_malformed");
                    report.skipped += 1;
                    continue;
                }
            };
            let (Some(x), Some(y), Some(w), Some(h)) = (obj.x, obj.y, obj.width, obj.height) else {
                warn!(name = %obj.name, "object_missing_geometry");
                report.skipped += 1;
                continue;
            };
            let rect = WorldRect::new(
                x as f32 * scale + offset.x,
                y as f32 * scale + offset.y,
                w as f32 * scale,
                h as f32 * scale,
            );
            if !geometry_in_range(&rect) {
                warn!(name = %obj.name, x, y, width = w, height = h, "object_geometry_out_of_range");
                report.skipped += 1;
                continue;
            }
            let props = read_properties(&obj.name, obj.properties, world, &mut report);

            if matches!(obj.name.as_str(), "floor" | "wall") {
                match world.add_platform(rect) {
                    Ok(()) => report.platforms += 1,
                    Err(_) => report.skipped += 1,
                }
                continue;
            }

            let Some(mut zone) = InteractionZone::new(&obj.name, rect) else {
                debug!(name = %obj.name, "object_ignored");
                report.ignored += 1;
                continue;
            };
            if let Some(text) = props.text {
                zone.set_text(text);
            }
            zone.sound = props.sound;
            zone.event_id = props.event_id;
            match world.add_zone(zone) {
                Ok(()) => report.zones += 1,
                Err(_) => report.skipped += 1,
            }
        }
    }
    report
}
