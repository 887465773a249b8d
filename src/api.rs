use glam::IVec2;
use image::RgbaImage;

use crate::types::*;

/// Random read access to decoded RGBA pixel data.
pub trait PixelSource {
    /// Pixel dimensions `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Alpha channel at `(x, y)`, `None` outside the buffer.
    fn alpha(&self, x: u32, y: u32) -> Option<u8>;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn alpha(&self, x: u32, y: u32) -> Option<u8> {
        self.get_pixel_checked(x, y).map(|p| p[3])
    }
}

/// Capability every collidable sprite kind provides.
pub trait SpriteView {
    /// Texture the sprite samples from.
    fn texture(&self) -> &dyn PixelSource;

    /// Sub-rectangle of the texture shown for the current frame.
    fn bounds(&self) -> Rect;
}

/// Receives what each update tested, e.g. for a debug overlay.
pub trait CollisionObserver {
    fn observe(&mut self, report: &CollisionReport);
}

impl<F: FnMut(&CollisionReport)> CollisionObserver for F {
    fn observe(&mut self, report: &CollisionReport) {
        self(report)
    }
}

/// Rectangle primitives used by the narrow phase.
pub trait NarrowphaseApi {
    fn overlap_rect_rect(a: Rect, b: Rect) -> Option<Rect>;
    fn contains_point(rect: Rect, p: IVec2) -> bool;
    /// Re-express a world rectangle relative to a frame whose top-left is `frame_origin`.
    fn to_local(world: Rect, frame_origin: IVec2) -> Rect;
}
