//! Interaction zones and the scan that decides what an interact press does.

use macroquad::prelude::Vec2;
use tracing::{debug, warn};

use crate::geom::WorldRect;

/// What a zone does when the player interacts inside it.
///
/// Derived once from the zone name at load time; a name maps to exactly one
/// category because the mapping is a single `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneCategory {
    /// Moves the player to the same-named zone.
    Teleport,
    /// Shows the zone text.
    FreeText,
    /// Opens the shop.
    Shop,
    /// Runs a scripted event.
    Event,
}

impl ZoneCategory {
    /// Category for an object name, `None` if the name is on no list.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normalDoor" | "roofExit" | "elevator" | "stairs" => Some(ZoneCategory::Teleport),
            "notice" | "fridge" | "computer" | "window" => Some(ZoneCategory::FreeText),
            "shop" | "vendingMachine" => Some(ZoneCategory::Shop),
            "event" => Some(ZoneCategory::Event),
            _ => None,
        }
    }
}

/// A rectangular trigger area in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionZone {
    /// Object name from the map.
    pub name: String,
    /// Behaviour chosen from the name.
    pub category: ZoneCategory,
    /// Trigger area in world space.
    pub rect: WorldRect,
    text: Option<String>,
    /// Event run by an `event` zone.
    pub event_id: Option<i64>,
    /// Cue played on teleport.
    pub sound: Option<String>,
}

impl InteractionZone {
    /// `None` when the name is not on any allow-list.
    pub fn new(name: &str, rect: WorldRect) -> Option<Self> {
        let category = ZoneCategory::from_name(name)?;
        Some(InteractionZone {
            name: name.to_string(),
            category,
            rect,
            text: None,
            event_id: None,
            sound: None,
        })
    }

    /// Display text, if the map gave one.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Replace the display text; the previous value is dropped.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

/// One effect produced by an interact press.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneAction {
    /// Move the player to the partner zone.
    Teleport {
        /// Player position before the move.
        from: Vec2,
        /// Top-left of the partner zone.
        to: Vec2,
        /// Zone name.
        name: String,
        /// Cue to play.
        sound: Option<String>,
    },
    /// Put text in the overlay.
    ShowText(String),
    /// Open the shop.
    OpenShop,
    /// Run an event.
    Event {
        /// Event to run.
        event_id: i64,
        /// Top-left of the zone, where the animation is drawn.
        position: Vec2,
    },
}

/// Collect the effects of interacting at `player` (world space), in zone order.
///
/// Every overlapping zone contributes, except that the first teleport with a
/// partner ends the scan.
pub fn scan(zones: &[InteractionZone], player: &WorldRect) -> Vec<ZoneAction> {
    let mut actions = Vec::new();
    for (idx, zone) in zones.iter().enumerate() {
        if !zone.rect.overlaps(player) {
            continue;
        }
        debug!(name = %zone.name, category = ?zone.category, "zone_hit");
        match zone.category {
            ZoneCategory::Teleport => {
                let partner = zones
                    .iter()
                    .enumerate()
                    .find(|(other, z)| *other != idx && z.name == zone.name);
                match partner {
                    Some((_, target)) => {
                        actions.push(ZoneAction::Teleport {
                            from: player.position(),
                            to: target.rect.position(),
                            name: zone.name.clone(),
                            sound: zone.sound.clone(),
                        });
                        return actions;
                    }
                    None => warn!(name = %zone.name, "teleport_without_partner"),
                }
            }
            ZoneCategory::FreeText => {
                if let Some(text) = zone.text() {
                    actions.push(ZoneAction::ShowText(text.to_string()));
                }
            }
            ZoneCategory::Shop => actions.push(ZoneAction::OpenShop),
            ZoneCategory::Event => match zone.event_id {
                Some(event_id) => actions.push(ZoneAction::Event {
                    event_id,
                    position: zone.rect.position(),
                }),
                None => warn!(name = %zone.name, "event_zone_without_id"),
            },
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, x: f32, y: f32) -> InteractionZone {
        InteractionZone::new(name, WorldRect::new(x, y, 48.0, 96.0)).unwrap()
    }

    fn player_at(x: f32, y: f32) -> WorldRect {
        WorldRect::new(x, y, 72.0, 72.0)
    }

    #[test]
    fn names_map_to_single_categories() {
        assert_eq!(ZoneCategory::from_name("elevator"), Some(ZoneCategory::Teleport));
        assert_eq!(ZoneCategory::from_name("fridge"), Some(ZoneCategory::FreeText));
        assert_eq!(ZoneCategory::from_name("shop"), Some(ZoneCategory::Shop));
        assert_eq!(ZoneCategory::from_name("event"), Some(ZoneCategory::Event));
        assert_eq!(ZoneCategory::from_name("floor"), None);
        assert!(InteractionZone::new("tree", WorldRect::default()).is_none());
    }

    #[test]
    fn elevator_pair_teleports_to_the_other_end() {
        let zones = vec![zone("elevator", 100.0, 300.0), zone("elevator", 2000.0, 900.0)];

        let at_a = scan(&zones, &player_at(90.0, 320.0));
        assert_eq!(
            at_a,
            vec![ZoneAction::Teleport {
                from: Vec2::new(90.0, 320.0),
                to: Vec2::new(2000.0, 900.0),
                name: "elevator".to_string(),
                sound: None,
            }]
        );

        let at_b = scan(&zones, &player_at(2010.0, 910.0));
        match &at_b[..] {
            [ZoneAction::Teleport { to, .. }] => assert_eq!(*to, Vec2::new(100.0, 300.0)),
            other => panic!("expected teleport, got {other:?}"),
        }
    }

    #[test]
    fn lone_teleport_zone_never_targets_itself() {
        let zones = vec![zone("roofExit", 0.0, 0.0)];
        assert!(scan(&zones, &player_at(10.0, 10.0)).is_empty());
    }

    #[test]
    fn teleport_stops_later_zones_but_not_earlier_ones() {
        let mut notice = zone("notice", 0.0, 0.0);
        notice.set_text("Closed today");
        let zones = vec![
            notice,
            zone("normalDoor", 0.0, 0.0),
            zone("shop", 0.0, 0.0),
            zone("normalDoor", 500.0, 0.0),
        ];
        let actions = scan(&zones, &player_at(5.0, 5.0));
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], ZoneAction::ShowText("Closed today".to_string()));
        assert!(matches!(actions[1], ZoneAction::Teleport { .. }));
    }

    #[test]
    fn overlapping_non_teleport_zones_all_fire() {
        let mut fridge = zone("fridge", 0.0, 0.0);
        fridge.set_text("old");
        fridge.set_text("Empty fridge");
        let mut event = zone("event", 10.0, 0.0);
        event.event_id = Some(3);
        let zones = vec![fridge, zone("shop", 0.0, 0.0), event, zone("event", 0.0, 0.0)];

        let actions = scan(&zones, &player_at(5.0, 5.0));
        assert_eq!(
            actions,
            vec![
                ZoneAction::ShowText("Empty fridge".to_string()),
                ZoneAction::OpenShop,
                ZoneAction::Event { event_id: 3, position: Vec2::new(10.0, 0.0) },
            ]
        );
    }

    #[test]
    fn text_zone_without_text_does_nothing() {
        let zones = vec![zone("computer", 0.0, 0.0)];
        assert!(scan(&zones, &player_at(0.0, 0.0)).is_empty());
    }

    #[test]
    fn distant_zones_are_ignored() {
        let zones = vec![zone("shop", 1000.0, 1000.0)];
        assert!(scan(&zones, &player_at(0.0, 0.0)).is_empty());
    }
}
