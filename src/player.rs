use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use log::info;

use crate::animation::AnimatedSprite;
use crate::api::SpriteView;
use crate::controller::MovementController;
use crate::error::CoreError;
use crate::geometry::StaticGeometryIndex;
use crate::tilemap::TileMap;
use crate::types::*;

/// The player-controlled sprite: kinematics, animation and the level it walks.
pub struct Player {
    controller: MovementController,
    sprite: AnimatedSprite,
    level: Arc<StaticGeometryIndex>,
}

impl Player {
    /// Role of the map object marking where the player appears.
    pub const SPAWN_ROLE: &'static str = "Player";

    /// Place the player on `map`'s spawn point.
    pub fn spawn(
        map: &TileMap,
        level: Arc<StaticGeometryIndex>,
        sprite: AnimatedSprite,
        cfg: PhysicsConfig,
    ) -> Result<Self, CoreError> {
        let at = map.spawn_point(Self::SPAWN_ROLE)?;
        info!("player spawned at ({}, {})", at.x, at.y);
        Ok(Self::at(at, level, sprite, cfg))
    }

    pub fn at(position: Vec2, level: Arc<StaticGeometryIndex>, sprite: AnimatedSprite, cfg: PhysicsConfig) -> Self {
        Self { controller: MovementController::new(cfg, position), sprite, level }
    }

    /// One simulation tick: move first, then advance the animation clock.
    pub fn update(&mut self, elapsed: Duration) -> Result<Snapshot, CoreError> {
        let snap = self.controller.update(&self.level, &self.sprite, elapsed.as_secs_f32());
        self.sprite.update(elapsed)?;
        Ok(snap)
    }

    /// Input-driven nudge; see [`MovementController::move_by`].
    pub fn move_by(&mut self, delta: Vec2) -> bool {
        self.controller.move_by(&self.level, &self.sprite, delta)
    }

    pub fn set_animation(&mut self, key: Option<&str>) -> Result<(), CoreError> {
        self.sprite.set_animation(key)
    }

    pub fn controller(&self) -> &MovementController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MovementController {
        &mut self.controller
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        &self.sprite
    }

    pub fn level(&self) -> &Arc<StaticGeometryIndex> {
        &self.level
    }

    /// Texture sub-rectangle of the current frame.
    pub fn source_rect(&self) -> Rect {
        self.sprite.bounds()
    }

    /// Where the renderer should draw the current frame, in map pixels.
    pub fn draw_rect(&self) -> Rect {
        let frame = self.sprite.bounds();
        MovementController::sprite_box(self.controller.position(), frame.w, frame.h)
    }
}
