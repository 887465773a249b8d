use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Integer pixel rectangle (top-left origin, y grows downward).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn left(&self) -> i32 { self.x }
    pub fn top(&self) -> i32 { self.y }
    /// Exclusive right edge, saturating at `i32::MAX`.
    pub fn right(&self) -> i32 { self.x.saturating_add(self.w) }
    /// Exclusive bottom edge, saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 { self.y.saturating_add(self.h) }

    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Overlapping region, `None` when the rectangles only touch or are apart.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.left().max(other.left());
        let y0 = self.top().max(other.top());
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive.
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Shift the origin by `offset`, keeping the size.
    pub fn translate(&self, offset: IVec2) -> Rect {
        Rect::new(self.x.saturating_add(offset.x), self.y.saturating_add(offset.y), self.w, self.h)
    }
}

/// Declared collision shape kinds. Only rectangles take part in collision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Polygon,
}

/// Static collision shape in world (map-pixel) coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub bounds: Rect,
}

impl Shape {
    pub fn rectangle(bounds: Rect) -> Self {
        Self { kind: ShapeKind::Rectangle, bounds }
    }
}

/// Horizontal orientation of a sprite.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Mutable kinematic state of one sprite.
///
/// `position` is the horizontal centre of the sprite's top edge, matching the
/// draw origin used by the renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
    pub can_climb_up: bool,
    pub can_climb_down: bool,
}

/// How the last update treated the proposed move.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    /// `elapsed <= 0`, nothing happened.
    Idle,
    /// No contact; the proposed move was committed.
    Moved,
    /// Contact while grounded; the move was recomputed from the reflected velocity.
    Deflected { impact: Vec2 },
    /// Contact while airborne; position unchanged.
    Rejected { impact: Vec2 },
}

impl MoveOutcome {
    pub fn collided(&self) -> bool {
        matches!(self, MoveOutcome::Deflected { .. } | MoveOutcome::Rejected { .. })
    }
}

/// Read-only view handed to rendering/input collaborators after each update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
    pub can_climb_up: bool,
    pub can_climb_down: bool,
    pub outcome: MoveOutcome,
}

/// Physics parameters supplied at controller construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Damping applied to the reflected velocity after an impact.
    pub elasticity: f32,
    /// Initial acceleration given to spawned sprites (gravity on `y`).
    pub gravity: Vec2,
}

impl PhysicsConfig {
    pub const DEFAULT_ELASTICITY: f32 = 0.25;
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            elasticity: Self::DEFAULT_ELASTICITY,
            gravity: Vec2::new(0.0, 400.0),
        }
    }
}

/// Counters for the last update's broad/narrow phase.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub cells_scanned: usize,
    pub shapes_tested: usize,
    pub intersections: usize,
    pub probes: usize,
}

/// Authoritative contact found during an update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// Map cell the colliding shape belongs to.
    pub cell: usize,
    /// Colliding shape in world coordinates.
    pub shape: Rect,
    /// First opaque pixel, in the sprite frame's local coordinates.
    pub pixel: IVec2,
    /// `(pixel.x, pixel.y - height / 2)`, before normalisation.
    pub impact: Vec2,
}

/// Everything an overlay renderer needs to show what one update tested.
#[derive(Clone, Debug, Default)]
pub struct CollisionReport {
    /// Sprite box at the proposed position.
    pub sprite_box: Rect,
    /// Every static rectangle tested against the box.
    pub tested: Vec<Rect>,
    /// Every non-empty intersection, in world coordinates.
    pub intersections: Vec<Rect>,
    pub contact: Option<Contact>,
    pub stats: StepStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection_overlap_and_touch() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 8, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 8, 5, 2)));
        // Edge contact is not an overlap
        let c = Rect::new(10, 0, 4, 4);
        assert!(a.intersection(&c).is_none());
    }

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(0, 44, 50, 6);
        assert!(r.contains(IVec2::new(0, 44)));
        assert!(r.contains(IVec2::new(49, 49)));
        assert!(!r.contains(IVec2::new(50, 44)));
        assert!(!r.contains(IVec2::new(10, 50)));
        assert!(!r.contains(IVec2::new(10, 43)));
    }

    #[test]
    fn test_rect_edges_saturate_far_from_origin() {
        let r = Rect::new(i32::MAX - 4, i32::MAX - 1, 16, 32);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MAX);
        assert!(r.intersection(&Rect::new(0, 0, 50, 50)).is_none());
        assert_eq!(r.translate(IVec2::new(10, 0)).x, i32::MAX);
    }

    #[test]
    fn test_physics_config_partial_json_uses_defaults() {
        let cfg: PhysicsConfig = serde_json::from_str(r#"{ "elasticity": 0.5 }"#).unwrap();
        assert_eq!(cfg.elasticity, 0.5);
        assert_eq!(cfg.gravity, PhysicsConfig::default().gravity);
    }
}
