use glam::IVec2;

use crate::api::PixelSource;
use crate::types::Rect;

/// Alpha view of one animation frame: a texture plus the frame's sub-rectangle.
#[derive(Copy, Clone)]
pub struct AlphaRegion<'a> {
    texture: &'a dyn PixelSource,
    frame: Rect,
}

impl<'a> AlphaRegion<'a> {
    pub fn new(texture: &'a dyn PixelSource, frame: Rect) -> Self {
        Self { texture, frame }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Alpha at frame-local `(x, y)`; pixels outside the frame or texture read as transparent.
    pub fn alpha(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.frame.w || y >= self.frame.h {
            return 0;
        }
        let (tx, ty) = (self.frame.x + x, self.frame.y + y);
        if tx < 0 || ty < 0 {
            return 0;
        }
        self.texture.alpha(tx as u32, ty as u32).unwrap_or(0)
    }
}

/// Per-pixel refinement of a rectangle overlap.
pub struct PixelCollisionProbe;

impl PixelCollisionProbe {
    /// First non-transparent pixel of `region` (frame-local), scanning row-major
    /// from the top-left. `None` when the whole region is transparent.
    pub fn probe(pixels: &AlphaRegion<'_>, region: Rect) -> Option<IVec2> {
        let bounds = Rect::new(0, 0, pixels.frame.w, pixels.frame.h);
        let clipped = region.intersection(&bounds)?;
        for y in clipped.top()..clipped.bottom() {
            for x in clipped.left()..clipped.right() {
                if pixels.alpha(x, y) != 0 {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }
}
