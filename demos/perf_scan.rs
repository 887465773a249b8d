use std::time::Instant;

use glam::Vec2;
use image::{Rgba, RgbaImage};
use tilestep::*;

fn main() {
    // 256x256 map of 16px tiles, ~25% floor strips in a checkerboard-ish pattern
    let (w, h) = (256u32, 256u32);
    let mut cells = vec![TileCell::EMPTY; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            if (x ^ y) & 0x3 == 0 {
                cells[(y * w + x) as usize] = TileCell::new(1);
            }
        }
    }
    let tiles = TileSet::new()
        .with_template(0, TileTemplate::new(vec![DeclaredShape::rect(0.0, 12.0, 16.0, 4.0)]));
    let map = TileMap::new(w, h, 16, 16, cells).expect("valid map");

    let t0 = Instant::now();
    let level = StaticGeometryIndex::build(&map, &tiles);
    println!(
        "build: cells={} shapes={} secs={:.4}",
        level.cell_count(),
        level.shape_count(),
        t0.elapsed().as_secs_f64()
    );

    let sprite = AnimatedSprite::new(RgbaImage::from_pixel(16, 32, Rgba([255, 255, 255, 255])));
    let n_steps = 200_000;
    let t1 = Instant::now();
    let mut rejected = 0usize;
    let mut probes = 0usize;
    for i in 0..n_steps {
        let a = (i as f32 * 0.01).sin();
        let start = Vec2::new(100.0 + (i % 3000) as f32, 100.0 + (i % 1700) as f32);
        let mut c = MovementController::new(PhysicsConfig::default(), start);
        c.set_velocity(Vec2::new(120.0 * a, 200.0));
        if c.update(&level, &sprite, 1.0 / 60.0).outcome.collided() {
            rejected += 1;
        }
        probes += c.last_stats().probes;
    }
    let dt = t1.elapsed().as_secs_f64();
    println!(
        "update: steps={} secs={:.3} throughput={:.0} steps/s collided={} probes={}",
        n_steps,
        dt,
        n_steps as f64 / dt,
        rejected,
        probes
    );
}
