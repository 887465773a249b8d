use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use tilestep::*;

fn main() {
    // 4x2 cells of 50px: floor strips along the bottom row, a crate at the right end
    let tiles = TileSet::new()
        .with_template(0, TileTemplate::new(vec![DeclaredShape::rect(0.0, 44.0, 50.0, 6.0)]))
        .with_template(1, TileTemplate::new(vec![DeclaredShape::rect(10.0, 14.0, 40.0, 36.0)]))
        .with_template(2, TileTemplate::new(vec![DeclaredShape::ellipse(0.0, 0.0, 20.0, 20.0)]));
    let gids = [0, 3, 0, 0, 1, 1, 1, 2];
    let map = TileMap::from_raw_gids(4, 2, 50, 50, &gids)
        .expect("valid map")
        .with_objects(vec![MapObject::new("Player", 60.0, 62.0)]);
    let level = Arc::new(StaticGeometryIndex::build(&map, &tiles));
    for w in level.warnings() {
        println!("warning: {w}");
    }

    let mut table = AnimationTable::new(16, 32, Duration::from_millis(100)).expect("frame size");
    table.add("idle", 0, 1).expect("unique key");
    table.add("walk", 1, 3).expect("unique key");
    let sheet = RgbaImage::from_pixel(64, 32, Rgba([90, 160, 220, 255]));
    let sprite = AnimatedSprite::with_animations(sheet, table);

    let mut player = Player::spawn(&map, level, sprite, PhysicsConfig::default()).expect("spawn point");
    player.set_animation(Some("walk")).expect("walk animation");
    player.controller_mut().set_velocity(Vec2::new(80.0, 0.0));
    player.controller_mut().set_observer(|r: &CollisionReport| {
        if let Some(c) = r.contact {
            println!("  contact in cell {} at pixel ({}, {})", c.cell, c.pixel.x, c.pixel.y);
        }
    });

    for tick in 0..60 {
        let snap = player.update(Duration::from_millis(16)).expect("known animation");
        if tick % 6 == 0 || snap.outcome.collided() {
            println!(
                "tick {tick:2}: pos=({:.1},{:.1}) vel=({:.1},{:.1}) {:?} ground={} frame={:?} {:?}",
                snap.position.x,
                snap.position.y,
                snap.velocity.x,
                snap.velocity.y,
                snap.facing,
                snap.on_ground,
                player.source_rect(),
                snap.outcome
            );
        }
    }
}
