use glam::{IVec2, Vec2};
use log::{debug, trace};

use crate::api::{CollisionObserver, NarrowphaseApi, SpriteView};
use crate::geometry::StaticGeometryIndex;
use crate::narrowphase::Narrowphase;
use crate::probe::{AlphaRegion, PixelCollisionProbe};
use crate::types::*;

/// Result of one broad + narrow phase pass.
struct Scan {
    contact: Option<Contact>,
    on_ground: bool,
    head_blocked: bool,
    report: CollisionReport,
}

/// Integrates one sprite's motion against static tile geometry.
///
/// The controller owns the kinematic state only; the geometry index and the
/// sprite are borrowed for each step.
pub struct MovementController {
    cfg: PhysicsConfig,
    state: Kinematics,
    last_stats: StepStats,
    observer: Option<Box<dyn CollisionObserver>>,
}

impl MovementController {
    /// Controller at rest at `position`, accelerated by `cfg.gravity`.
    pub fn new(cfg: PhysicsConfig, position: Vec2) -> Self {
        let state = Kinematics {
            position,
            acceleration: cfg.gravity,
            ..Default::default()
        };
        Self { cfg, state, last_stats: StepStats::default(), observer: None }
    }

    pub fn cfg(&self) -> &PhysicsConfig {
        &self.cfg
    }

    pub fn cfg_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.cfg
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.state
    }

    pub fn position(&self) -> Vec2 { self.state.position }
    pub fn velocity(&self) -> Vec2 { self.state.velocity }
    pub fn facing(&self) -> Facing { self.state.facing }

    pub fn set_position(&mut self, position: Vec2) {
        self.state.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.state.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.state.acceleration = acceleration;
    }

    /// Install a hook that receives every update's collision report.
    pub fn set_observer(&mut self, observer: impl CollisionObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Counters from the last `update`/`move_by`.
    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    pub fn snapshot(&self, outcome: MoveOutcome) -> Snapshot {
        let s = &self.state;
        Snapshot {
            position: s.position,
            velocity: s.velocity,
            facing: s.facing,
            on_ground: s.on_ground,
            can_climb_up: s.can_climb_up,
            can_climb_down: s.can_climb_down,
            outcome,
        }
    }

    /// Sprite box for a `w x h` frame anchored at `position` (horizontal
    /// centre of the top edge).
    pub fn sprite_box(position: Vec2, w: i32, h: i32) -> Rect {
        let anchor = position.floor().as_ivec2();
        Rect::new(anchor.x.saturating_sub(w / 2), anchor.y, w, h)
    }

    /// Advance the sprite by `elapsed` seconds.
    ///
    /// A contact while airborne rejects the move; a contact while grounded
    /// reflects the velocity and moves by the reflected amount instead.
    pub fn update(&mut self, level: &StaticGeometryIndex, sprite: &dyn SpriteView, elapsed: f32) -> Snapshot {
        if elapsed.is_nan() || elapsed <= 0.0 {
            return self.snapshot(MoveOutcome::Idle);
        }

        let mut delta = self.state.velocity * elapsed;
        let proposed = self.state.position + delta;
        self.turn_towards(delta.x);

        let scan = Self::scan(level, sprite, proposed, self.state.position);
        self.apply_flags(&scan);

        let mut outcome = MoveOutcome::Moved;
        if let Some(contact) = scan.contact {
            let normal = contact.impact.normalize_or_zero();
            self.state.velocity = -normal * self.cfg.elasticity * self.state.velocity;
            if !self.state.on_ground {
                debug!(
                    "move to ({:.1}, {:.1}) rejected: contact {:?} in cell {}",
                    proposed.x, proposed.y, contact.pixel, contact.cell
                );
                self.finish(scan.report);
                return self.snapshot(MoveOutcome::Rejected { impact: contact.impact });
            }
            delta = self.state.velocity * elapsed;
            outcome = MoveOutcome::Deflected { impact: contact.impact };
        }

        if delta.y > 0.0 && self.state.on_ground {
            delta.y = 0.0;
        }
        self.state.position += delta;

        if !self.state.on_ground {
            self.state.velocity.y += self.state.acceleration.y * elapsed;
        }
        self.state.velocity.x += self.state.acceleration.x * elapsed;

        self.finish(scan.report);
        self.snapshot(outcome)
    }

    /// Displace the sprite by `delta` without touching its velocity.
    /// Returns `false` and stays put when the displaced sprite would touch
    /// opaque pixels against static geometry.
    pub fn move_by(&mut self, level: &StaticGeometryIndex, sprite: &dyn SpriteView, delta: Vec2) -> bool {
        let proposed = self.state.position + delta;
        self.turn_towards(delta.x);
        let scan = Self::scan(level, sprite, proposed, self.state.position);
        self.apply_flags(&scan);
        let moved = scan.contact.is_none();
        if moved {
            self.state.position = proposed;
        }
        self.finish(scan.report);
        moved
    }

    fn turn_towards(&mut self, dx: f32) {
        match self.state.facing {
            Facing::Right if dx < 0.0 => self.state.facing = Facing::Left,
            Facing::Left if dx > 0.0 => self.state.facing = Facing::Right,
            _ => {}
        }
    }

    fn apply_flags(&mut self, scan: &Scan) {
        self.state.on_ground = scan.on_ground;
        self.state.can_climb_down = !scan.on_ground;
        self.state.can_climb_up = !scan.head_blocked;
    }

    fn finish(&mut self, report: CollisionReport) {
        self.last_stats = report.stats;
        trace!("scan stats {:?}", report.stats);
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&report);
        }
    }

    /// Test the sprite box at `proposed` against every shape in the cells it
    /// spans (plus the rows just above and below it), row-major. The first
    /// intersection with an opaque sprite pixel is the contact.
    ///
    /// The foot and head points belong to the current position, so their
    /// cells are checked too when the proposed box has left them.
    fn scan(level: &StaticGeometryIndex, sprite: &dyn SpriteView, proposed: Vec2, current: Vec2) -> Scan {
        let frame = sprite.bounds();
        let sprite_box = Self::sprite_box(proposed, frame.w, frame.h);
        let area = Rect::new(sprite_box.x, sprite_box.y.saturating_sub(1), sprite_box.w, sprite_box.h.saturating_add(2));
        let pixels = AlphaRegion::new(sprite.texture(), frame);

        let anchor = current.floor().as_ivec2();
        let foot = IVec2::new(anchor.x, anchor.y.saturating_add(frame.h));
        let head = IVec2::new(anchor.x, anchor.y.saturating_sub(1));
        let mut scanned = Vec::new();

        let mut scan = Scan {
            contact: None,
            on_ground: false,
            head_blocked: false,
            report: CollisionReport { sprite_box, ..Default::default() },
        };
        let report = &mut scan.report;

        for cell in level.cells_overlapping(area) {
            scanned.push(cell);
            report.stats.cells_scanned += 1;
            for shape in level.shapes_in(cell) {
                let bounds = shape.bounds;
                report.stats.shapes_tested += 1;
                report.tested.push(bounds);
                scan.on_ground |= Narrowphase::contains_point(bounds, foot);
                scan.head_blocked |= Narrowphase::contains_point(bounds, head);

                let Some(hit) = Narrowphase::overlap_rect_rect(sprite_box, bounds) else {
                    continue;
                };
                report.stats.intersections += 1;
                report.intersections.push(hit);
                if scan.contact.is_some() {
                    continue;
                }
                report.stats.probes += 1;
                let local = Narrowphase::to_local(hit, sprite_box.origin());
                if let Some(pixel) = PixelCollisionProbe::probe(&pixels, local) {
                    let impact = Vec2::new(pixel.x as f32, pixel.y as f32 - frame.h as f32 / 2.0);
                    scan.contact = Some(Contact { cell, shape: bounds, pixel, impact });
                }
            }
        }

        for cell in [level.cell_at(foot), level.cell_at(head)].into_iter().flatten() {
            if scanned.contains(&cell) {
                continue;
            }
            scanned.push(cell);
            report.stats.cells_scanned += 1;
            for shape in level.shapes_in(cell) {
                report.stats.shapes_tested += 1;
                report.tested.push(shape.bounds);
                scan.on_ground |= Narrowphase::contains_point(shape.bounds, foot);
                scan.head_blocked |= Narrowphase::contains_point(shape.bounds, head);
            }
        }
        report.contact = scan.contact;
        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::{DeclaredShape, TileCell, TileMap, TileSet, TileTemplate};
    use crate::animation::AnimatedSprite;
    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::rc::Rc;

    const DT: f32 = 0.1;

    // gid 1 = floor strip at the bottom, gid 2 = solid block, gid 3 = ceiling strip at the top
    fn tiles() -> TileSet {
        TileSet::new()
            .with_template(0, TileTemplate::new(vec![DeclaredShape::rect(0.0, 44.0, 50.0, 6.0)]))
            .with_template(1, TileTemplate::new(vec![DeclaredShape::rect(0.0, 0.0, 50.0, 50.0)]))
            .with_template(2, TileTemplate::new(vec![DeclaredShape::rect(0.0, 0.0, 50.0, 6.0)]))
    }

    fn level(gids: &[u32]) -> StaticGeometryIndex {
        grid(gids.len() as u32, 1, gids)
    }

    fn grid(width: u32, height: u32, gids: &[u32]) -> StaticGeometryIndex {
        let map = TileMap::new(width, height, 50, 50, gids.iter().map(|g| TileCell::new(*g)).collect()).unwrap();
        StaticGeometryIndex::build(&map, &tiles())
    }

    /// 16x32 sprite, opaque everywhere.
    fn solid_sprite() -> AnimatedSprite {
        AnimatedSprite::new(RgbaImage::from_pixel(16, 32, Rgba([200, 200, 200, 255])))
    }

    /// 16x32 sprite whose right half is fully transparent.
    fn half_sprite() -> AnimatedSprite {
        let mut img = RgbaImage::from_pixel(16, 32, Rgba([0, 0, 0, 0]));
        for y in 0..32 {
            for x in 0..8 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        AnimatedSprite::new(img)
    }

    fn controller(x: f32, y: f32, vel: Vec2, acc: Vec2) -> MovementController {
        let mut c = MovementController::new(PhysicsConfig::default(), Vec2::new(x, y));
        c.set_velocity(vel);
        c.set_acceleration(acc);
        c
    }

    #[test]
    fn test_sprite_box_centered_on_x() {
        assert_eq!(MovementController::sprite_box(Vec2::new(40.7, 12.2), 16, 32), Rect::new(32, 12, 16, 32));
        assert_eq!(MovementController::sprite_box(Vec2::new(-0.5, -3.0), 16, 32), Rect::new(-9, -3, 16, 32));
    }

    #[test]
    fn test_update_zero_is_idempotent() {
        let lvl = level(&[2, 0]);
        let sprite = solid_sprite();
        // Overlapping the block and moving: a real step would collide
        let mut c = controller(45.0, 10.0, Vec2::new(30.0, -5.0), Vec2::new(0.0, 400.0));
        let before = *c.kinematics();
        for _ in 0..5 {
            let snap = c.update(&lvl, &sprite, 0.0);
            assert_eq!(snap.outcome, MoveOutcome::Idle);
        }
        assert_eq!(*c.kinematics(), before);
    }

    #[test]
    fn test_resting_on_floor_stays_put() {
        let lvl = level(&[1, 0]);
        let sprite = solid_sprite();
        // floor top is y = 44, sprite is 32 tall
        let mut c = controller(25.0, 12.0, Vec2::ZERO, Vec2::new(0.0, 400.0));
        let snap = c.update(&lvl, &sprite, 1.0 / 60.0);
        assert!(snap.on_ground);
        assert!(!snap.can_climb_down);
        assert_eq!(snap.position, Vec2::new(25.0, 12.0));
        // grounded: no gravity accumulation
        assert_eq!(snap.velocity, Vec2::ZERO);
        for _ in 0..30 {
            c.update(&lvl, &sprite, 1.0 / 60.0);
        }
        assert_eq!(c.position(), Vec2::new(25.0, 12.0));
        assert!(c.kinematics().on_ground);
    }

    #[test]
    fn test_grounded_residual_fall_is_clamped() {
        let lvl = level(&[1, 0]);
        let sprite = solid_sprite();
        let mut c = controller(25.0, 12.0, Vec2::new(0.0, 3.0), Vec2::new(0.0, 400.0));
        c.update(&lvl, &sprite, DT);
        let snap = c.update(&lvl, &sprite, DT);
        assert!(snap.on_ground);
        assert_eq!(snap.position.y, 12.0);
        assert_eq!(snap.velocity.y, 3.0);
    }

    #[test]
    fn test_airborne_move_into_wall_rejected() {
        // cell 0 open, cell 1 solid from x = 50
        let lvl = level(&[0, 2]);
        let sprite = solid_sprite();
        let mut c = controller(40.0, 10.0, Vec2::new(100.0, 0.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        let MoveOutcome::Rejected { impact } = snap.outcome else {
            panic!("expected rejection, got {:?}", snap.outcome);
        };
        // first opaque pixel is the leading column, top row of the overlap
        assert_eq!(impact, Vec2::new(8.0, -16.0));
        assert_eq!(snap.position, Vec2::new(40.0, 10.0));
        assert!(snap.velocity.x < 0.0);
        assert!((snap.velocity.x + 25.0 * 8.0 / 320f32.sqrt()).abs() < 1e-4);
        assert_eq!(snap.velocity.y, 0.0);
        assert!(MovementController::sprite_box(snap.position, 16, 32).right() <= 50);
    }

    #[test]
    fn test_grounded_move_into_wall_deflects() {
        // floor under the sprite, block to its right
        let lvl = level(&[1, 2]);
        let sprite = solid_sprite();
        let mut c = controller(40.0, 12.0, Vec2::new(100.0, 0.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        assert!(matches!(snap.outcome, MoveOutcome::Deflected { .. }));
        assert!(snap.on_ground);
        assert!(snap.velocity.x < 0.0);
        // slid back along the reflected velocity instead of entering the wall
        assert!((snap.position.x - (40.0 + snap.velocity.x * DT)).abs() < 1e-4);
        assert!(snap.position.x < 40.0);
        assert_eq!(snap.position.y, 12.0);
    }

    #[test]
    fn test_transparent_overlap_does_not_block() {
        let lvl = level(&[0, 2]);
        let sprite = half_sprite();
        let mut c = controller(40.0, 10.0, Vec2::new(100.0, 0.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        assert_eq!(snap.outcome, MoveOutcome::Moved);
        assert_eq!(snap.position, Vec2::new(50.0, 10.0));
        assert_eq!(c.last_stats().intersections, 1);
        assert_eq!(c.last_stats().probes, 1);
    }

    #[test]
    fn test_off_map_is_open_space() {
        let lvl = level(&[0, 0]);
        let sprite = solid_sprite();
        let map = TileMap::new(2, 1, 50, 50, vec![TileCell::EMPTY; 2]).unwrap();
        let mut c = controller(5.0, 10.0, Vec2::new(-100.0, 0.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        assert_eq!(snap.outcome, MoveOutcome::Moved);
        assert_eq!(snap.position, Vec2::new(-5.0, 10.0));
        assert_eq!(map.tile_index_of(-5, 10), None);

        // Entirely off the map: nothing scanned, nothing blocks
        let mut c = controller(-200.0, -80.0, Vec2::new(-50.0, -50.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        assert_eq!(snap.outcome, MoveOutcome::Moved);
        assert_eq!(c.last_stats().cells_scanned, 0);
        assert_eq!(snap.position, Vec2::new(-205.0, -85.0));
    }

    #[test]
    fn test_off_map_edge_is_not_a_wall() {
        // geometry only inside the map; walking past the right edge is allowed
        let lvl = level(&[1]);
        let sprite = solid_sprite();
        let mut c = controller(45.0, 12.0, Vec2::new(100.0, 0.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        assert_eq!(snap.outcome, MoveOutcome::Moved);
        assert_eq!(snap.position.x, 55.0);
    }

    #[test]
    fn test_gravity_accumulates_while_airborne() {
        let lvl = level(&[0, 0]);
        let sprite = solid_sprite();
        let mut c = controller(25.0, 0.0, Vec2::new(10.0, 0.0), Vec2::new(2.0, 300.0));
        let snap = c.update(&lvl, &sprite, DT);
        assert!(!snap.on_ground);
        assert!(snap.can_climb_down);
        assert_eq!(snap.position, Vec2::new(26.0, 0.0));
        assert!((snap.velocity.y - 30.0).abs() < 1e-4);
        assert!((snap.velocity.x - 10.2).abs() < 1e-4);
        let snap = c.update(&lvl, &sprite, DT);
        assert!((snap.position.y - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_facing_tracks_horizontal_motion() {
        let lvl = level(&[0, 0]);
        let sprite = solid_sprite();
        let mut c = controller(50.0, 0.0, Vec2::new(-10.0, 0.0), Vec2::ZERO);
        assert_eq!(c.facing(), Facing::Right);
        assert_eq!(c.update(&lvl, &sprite, DT).facing, Facing::Left);
        c.set_velocity(Vec2::new(0.0, 20.0));
        assert_eq!(c.update(&lvl, &sprite, DT).facing, Facing::Left);
        c.set_velocity(Vec2::new(5.0, 0.0));
        assert_eq!(c.update(&lvl, &sprite, DT).facing, Facing::Right);
    }

    #[test]
    fn test_ceiling_blocks_climbing_up() {
        let lvl = level(&[3]);
        let sprite = solid_sprite();
        // head probe at y = 5 sits inside the ceiling strip 0..6
        let mut c = controller(25.0, 6.0, Vec2::ZERO, Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        assert!(!snap.can_climb_up);
        assert_eq!(snap.outcome, MoveOutcome::Moved);
        let mut c = controller(25.0, 7.0, Vec2::ZERO, Vec2::ZERO);
        assert!(c.update(&lvl, &sprite, DT).can_climb_up);
    }

    #[test]
    fn test_elasticity_is_configurable() {
        let lvl = level(&[0, 2]);
        let sprite = solid_sprite();
        let mut soft = controller(40.0, 10.0, Vec2::new(100.0, 0.0), Vec2::ZERO);
        let mut bouncy = controller(40.0, 10.0, Vec2::new(100.0, 0.0), Vec2::ZERO);
        bouncy.cfg_mut().elasticity = 0.5;
        let a = soft.update(&lvl, &sprite, DT).velocity.x;
        let b = bouncy.update(&lvl, &sprite, DT).velocity.x;
        assert!((b - 2.0 * a).abs() < 1e-4);
    }

    #[test]
    fn test_first_contact_in_row_major_order() {
        // two solid blocks side by side; the sprite straddles both
        let lvl = level(&[2, 2]);
        let sprite = solid_sprite();
        let mut c = controller(50.0, 45.0, Vec2::new(0.0, -100.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, DT);
        assert!(matches!(snap.outcome, MoveOutcome::Rejected { .. }));
        assert_eq!(c.last_stats().intersections, 2);
        // the second intersection is not probed once a contact is known
        assert_eq!(c.last_stats().probes, 1);
    }

    #[test]
    fn test_observer_receives_reports() {
        let lvl = level(&[0, 2]);
        let sprite = solid_sprite();
        let seen: Rc<RefCell<Vec<CollisionReport>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut c = controller(40.0, 10.0, Vec2::new(100.0, 0.0), Vec2::ZERO);
        c.set_observer(move |r: &CollisionReport| sink.borrow_mut().push(r.clone()));
        c.update(&lvl, &sprite, DT);
        c.clear_observer();
        c.update(&lvl, &sprite, DT);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let r = &seen[0];
        assert_eq!(r.sprite_box, Rect::new(42, 10, 16, 32));
        assert_eq!(r.tested, vec![Rect::new(50, 0, 50, 50)]);
        assert_eq!(r.intersections, vec![Rect::new(50, 10, 8, 32)]);
        let contact = r.contact.unwrap();
        assert_eq!(contact.cell, 1);
        assert_eq!(contact.pixel, IVec2::new(8, 0));
    }

    #[test]
    fn test_move_by_refuses_blocked_displacement() {
        let lvl = level(&[0, 2]);
        let sprite = solid_sprite();
        let mut c = controller(40.0, 10.0, Vec2::ZERO, Vec2::ZERO);
        assert!(c.move_by(&lvl, &sprite, Vec2::new(-5.0, 0.0)));
        assert_eq!(c.position(), Vec2::new(35.0, 10.0));
        assert_eq!(c.facing(), Facing::Left);
        assert!(!c.move_by(&lvl, &sprite, Vec2::new(20.0, 0.0)));
        assert_eq!(c.position(), Vec2::new(35.0, 10.0));
        assert_eq!(c.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_nan_step_is_idle() {
        let lvl = level(&[1, 0]);
        let sprite = solid_sprite();
        let mut c = controller(25.0, 12.0, Vec2::new(30.0, 0.0), Vec2::new(0.0, 400.0));
        let before = *c.kinematics();
        assert_eq!(c.update(&lvl, &sprite, f32::NAN).outcome, MoveOutcome::Idle);
        assert_eq!(c.update(&lvl, &sprite, -DT).outcome, MoveOutcome::Idle);
        assert_eq!(*c.kinematics(), before);
    }

    #[test]
    fn test_walking_across_cells_keeps_ground_and_speed() {
        let lvl = level(&[1, 1, 1, 1]);
        let sprite = solid_sprite();
        // 10px per step: the first step leaves cell 0 entirely
        let mut c = controller(49.0, 12.0, Vec2::new(200.0, 0.0), Vec2::new(0.0, 400.0));
        for step in 1..=12 {
            let snap = c.update(&lvl, &sprite, 0.05);
            assert_eq!(snap.outcome, MoveOutcome::Moved, "step {step}");
            assert!(snap.on_ground, "step {step}");
            assert_eq!(snap.velocity, Vec2::new(200.0, 0.0), "step {step}");
            assert_eq!(snap.position, Vec2::new(49.0 + 10.0 * step as f32, 12.0));
        }
    }

    #[test]
    fn test_walking_left_across_cells_keeps_ground() {
        let lvl = level(&[1, 1]);
        let sprite = solid_sprite();
        let mut c = controller(51.0, 12.0, Vec2::new(-200.0, 0.0), Vec2::new(0.0, 400.0));
        let snap = c.update(&lvl, &sprite, 0.05);
        assert!(snap.on_ground);
        assert_eq!(snap.position, Vec2::new(41.0, 12.0));
        assert_eq!(snap.velocity, Vec2::new(-200.0, 0.0));
    }

    #[test]
    fn test_falling_across_row_keeps_head_flag() {
        // column of two cells: a ledge strip at the bottom of the top cell, open below
        let lvl = grid(1, 2, &[1, 0]);
        let sprite = solid_sprite();
        // head point (25, 49) is inside the ledge; the proposed box sits in row 1 only
        let mut c = controller(25.0, 50.0, Vec2::new(0.0, 200.0), Vec2::ZERO);
        let snap = c.update(&lvl, &sprite, 0.05);
        assert_eq!(snap.outcome, MoveOutcome::Moved);
        assert_eq!(snap.position, Vec2::new(25.0, 60.0));
        assert!(!snap.can_climb_up);
        assert!(!snap.on_ground);
        assert_eq!(c.last_stats().cells_scanned, 2);

        // next step: the ledge is out of reach
        let snap = c.update(&lvl, &sprite, 0.05);
        assert!(snap.can_climb_up);
    }

    #[test]
    fn test_far_off_map_positions_do_not_overflow() {
        let lvl = level(&[1, 2]);
        let sprite = solid_sprite();
        for start in [Vec2::new(3.0e9, 0.0), Vec2::new(-3.0e9, -3.0e9), Vec2::new(0.0, 3.0e9)] {
            let mut c = controller(start.x, start.y, Vec2::new(1.0, 0.0), Vec2::ZERO);
            let snap = c.update(&lvl, &sprite, DT);
            assert_eq!(snap.outcome, MoveOutcome::Moved);
            assert!(!snap.on_ground);
            assert_eq!(c.last_stats().cells_scanned, 0);
            assert!(c.move_by(&lvl, &sprite, Vec2::new(-1.0e9, 0.0)));
        }
    }

    #[test]
    fn test_cfg_accessors() {
        let mut c = controller(0.0, 0.0, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(c.cfg().elasticity, PhysicsConfig::DEFAULT_ELASTICITY);
        c.cfg_mut().elasticity = 0.8;
        assert_eq!(c.cfg().elasticity, 0.8);
    }
}
