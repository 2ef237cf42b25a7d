#![warn(missing_docs)]

//! Tiled JSON world runtime for a small macroquad platformer.
//!
//! Maps become platforms and interaction zones; a single-threaded tick drives
//! physics, the interact scan and one modal controller at a time (shop,
//! dialogue or mini-game). Drawing, audio and asset files stay behind the
//! traits in [`host`].

pub mod animation;
pub mod codec;
pub mod config;
pub mod dialogue;
mod error;
pub mod game;
pub mod geom;
pub mod host;
pub mod input;
pub mod interaction;
/// Map file access and world assembly.
pub mod loader {
    pub mod json_loader;
    pub mod world_loader;
}
pub mod map;
pub mod minigame;
pub mod objects;
pub mod physics;
pub mod shop;
pub mod text;
pub mod world;

pub use animation::{AnimationInstance, FrameHandle};
pub use codec::{Mirror, TileId, TileTransform};
pub use config::EngineConfig;
pub use dialogue::{DialogueController, DialogueOutcome, DialogueTable, NextNode};
pub use error::{AssetError, CapacityError, CodecError, DialogueError, MapError};
pub use game::{FrameLimiter, Game, Mode, TickOutcome};
pub use geom::{Rect, WorldRect};
pub use host::{AssetStore, AudioSink, Host};
pub use input::{Action, InputEdges, InputSnapshot};
pub use interaction::{InteractionZone, ZoneAction, ZoneCategory};
pub use loader::world_loader::{build_world, load_world};
pub use map::{PlacedMap, TileMap};
pub use world::{Capacity, LastInteraction, World};
