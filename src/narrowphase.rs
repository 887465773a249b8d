use glam::IVec2;

use crate::api::NarrowphaseApi;
use crate::types::*;

/// Narrowphase rectangle tests.
pub struct Narrowphase;

impl NarrowphaseApi for Narrowphase {
    fn overlap_rect_rect(a: Rect, b: Rect) -> Option<Rect> {
        if a.is_empty() || b.is_empty() {
            return None;
        }
        a.intersection(&b)
    }

    fn contains_point(rect: Rect, p: IVec2) -> bool {
        !rect.is_empty() && rect.contains(p)
    }

    fn to_local(world: Rect, frame_origin: IVec2) -> Rect {
        Rect::new(
            world.x.saturating_sub(frame_origin.x),
            world.y.saturating_sub(frame_origin.y),
            world.w,
            world.h,
        )
    }
}
