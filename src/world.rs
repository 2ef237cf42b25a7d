//! The world store shared by every controller.

use macroquad::prelude::Vec2;
use tracing::{info, warn};

use crate::animation::{AnimationInstance, FrameHandle};
use crate::config::EngineConfig;
use crate::dialogue::DialogueTable;
use crate::error::CapacityError;
use crate::geom::WorldRect;
use crate::interaction::InteractionZone;
use crate::map::PlacedMap;
use crate::shop::ShopItem;

/// Ceilings for the world's collections. Entries past a ceiling are
/// rejected, never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Most platforms.
    pub platforms: usize,
    /// Most interaction zones.
    pub zones: usize,
    /// Most shop items.
    pub shop_items: usize,
    /// Most live animations.
    pub animations: usize,
}

impl Capacity {
    /// Ceilings taken from the config.
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Capacity {
            platforms: cfg.max_platforms,
            zones: cfg.max_zones,
            shop_items: cfg.max_shop_items,
            animations: cfg.max_animations,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Capacity::from_config(&EngineConfig::default())
    }
}

/// Where the player stood before the most recent teleport.
///
/// Recorded for a return trip that nothing consumes yet.
#[derive(Debug, Clone, PartialEq)]
pub struct LastInteraction {
    /// Player position before the jump.
    pub position: Vec2,
    /// Zone name used.
    pub name: String,
}

/// The shared store every controller operates on.
#[derive(Debug, Default)]
pub struct World {
    capacity: Capacity,
    maps: Vec<PlacedMap>,
    platforms: Vec<WorldRect>,
    zones: Vec<InteractionZone>,
    shop_items: Vec<ShopItem>,
    animations: Vec<AnimationInstance>,
    /// Dialogue of the event that ran last.
    pub dialogue: DialogueTable,
    /// The most recent teleport.
    pub last_interaction: Option<LastInteraction>,
}

fn push_bounded<T>(
    vec: &mut Vec<T>,
    item: T,
    limit: usize,
    kind: &'static str,
) -> Result<(), CapacityError> {
    if vec.len() >= limit {
        warn!(kind, limit, "capacity_reached");
        return Err(CapacityError { kind, limit });
    }
    vec.push(item);
    Ok(())
}

impl World {
    /// Empty world with the given ceilings.
    pub fn new(capacity: Capacity) -> Self {
        World {
            capacity,
            ..Default::default()
        }
    }

    /// Add a placed map. Maps are not capacity bounded.
    pub fn add_map(&mut self, map: PlacedMap) {
        info!(
            width = map.map.width,
            height = map.map.height,
            offset_x = map.offset.x,
            "map_added"
        );
        self.maps.push(map);
    }

    /// Maps in placement order.
    pub fn maps(&self) -> &[PlacedMap] {
        &self.maps
    }

    /// Add a collision platform.
    pub fn add_platform(&mut self, rect: WorldRect) -> Result<(), CapacityError> {
        push_bounded(&mut self.platforms, rect, self.capacity.platforms, "platform")?;
        info!(x = rect.x, y = rect.y, w = rect.w, h = rect.h, "platform_added");
        Ok(())
    }

    /// Collision platforms.
    pub fn platforms(&self) -> &[WorldRect] {
        &self.platforms
    }

    /// Add an interaction zone.
    pub fn add_zone(&mut self, zone: InteractionZone) -> Result<(), CapacityError> {
        let name = zone.name.clone();
        let rect = zone.rect;
        push_bounded(&mut self.zones, zone, self.capacity.zones, "interaction")?;
        info!(name = %name, x = rect.x, y = rect.y, w = rect.w, h = rect.h, "interaction_added");
        Ok(())
    }

    /// Interaction zones in load order.
    pub fn zones(&self) -> &[InteractionZone] {
        &self.zones
    }

    /// Add a shop item.
    pub fn add_shop_item(&mut self, item: ShopItem) -> Result<(), CapacityError> {
        let name = item.name.clone();
        let stock = item.stock;
        push_bounded(&mut self.shop_items, item, self.capacity.shop_items, "shop_item")?;
        info!(name = %name, stock, "shop_item_added");
        Ok(())
    }

    /// Shop items in load order.
    pub fn shop_items(&self) -> &[ShopItem] {
        &self.shop_items
    }

    /// Shop items, for stock updates.
    pub fn shop_items_mut(&mut self) -> &mut [ShopItem] {
        &mut self.shop_items
    }

    /// Live animations.
    pub fn animations(&self) -> &[AnimationInstance] {
        &self.animations
    }

    /// Live animations, for ticking.
    pub fn animations_mut(&mut self) -> &mut [AnimationInstance] {
        &mut self.animations
    }

    /// Animation of an event, if one is live.
    pub fn animation_mut(&mut self, event_id: i64) -> Option<&mut AnimationInstance> {
        self.animations.iter_mut().find(|a| a.event_id == event_id)
    }

    /// Replace any instance for `event_id` with a fresh one.
    ///
    /// Returns the frames of the torn-down instance so the caller can release
    /// them. On a capacity error the new frames are handed back instead.
    pub fn reset_animation(
        &mut self,
        instance: AnimationInstance,
    ) -> Result<Vec<FrameHandle>, (CapacityError, Vec<FrameHandle>)> {
        let released = match self.animations.iter().position(|a| a.event_id == instance.event_id) {
            Some(idx) => self.animations.remove(idx).into_frames(),
            None => Vec::new(),
        };
        if self.animations.len() >= self.capacity.animations {
            let limit = self.capacity.animations;
            warn!(kind = "animation", limit, "capacity_reached");
            let mut frames = released;
            frames.extend(instance.into_frames());
            return Err((CapacityError { kind: "animation", limit }, frames));
        }
        self.animations.push(instance);
        Ok(released)
    }

    /// Remove finished instances, returning their frames for release.
    pub fn take_finished_frames(&mut self) -> Vec<FrameHandle> {
        let mut released = Vec::new();
        let mut kept = Vec::with_capacity(self.animations.len());
        for anim in self.animations.drain(..) {
            if anim.finished {
                released.extend(anim.into_frames());
            } else {
                kept.push(anim);
            }
        }
        self.animations = kept;
        released
    }
}
