//! tilestep: movement, tile collision and sprite animation core for tile-based side-scrollers

pub mod types;
pub mod error;
pub mod api;
pub mod tilemap;
pub mod geometry;
pub mod narrowphase;
pub mod probe;
pub mod animation;
pub mod controller;
pub mod player;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::{CoreError, GeometryWarning};
pub use crate::tilemap::{DeclaredShape, MapObject, TileCell, TileMap, TileSet, TileTemplate};
pub use crate::geometry::StaticGeometryIndex;
pub use crate::probe::{AlphaRegion, PixelCollisionProbe};
pub use crate::animation::{AnimatedSprite, AnimationClock, AnimationConfig, AnimationTable};
pub use crate::controller::MovementController;
pub use crate::player::Player;
