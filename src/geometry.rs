use glam::IVec2;
use log::warn;

use crate::error::GeometryWarning;
use crate::tilemap::{TileMap, TileSet};
use crate::types::*;

/// Per-cell slice into the shared shape arena.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Span {
    start: u32,
    len: u32,
}

/// Inclusive range of map cells, possibly reaching off the map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// World-space collision rectangles for every map cell, built once per map.
///
/// Shapes live in one flat arena; each cell owns a contiguous span of it in
/// declaration order.
#[derive(Clone, Debug)]
pub struct StaticGeometryIndex {
    width: u32,
    height: u32,
    tile_width: i32,
    tile_height: i32,
    shapes: Vec<Shape>,
    spans: Vec<Span>,
    warnings: Vec<GeometryWarning>,
}

/// Mirror a tile-local rectangle inside a `tile_width x tile_height` tile.
pub fn flip_rect(rect: Rect, tile_width: i32, tile_height: i32, flip_h: bool, flip_v: bool) -> Rect {
    let mut out = rect;
    if flip_h {
        out.x = tile_width - rect.x - rect.w;
    }
    if flip_v {
        out.y = tile_height - rect.y - rect.h;
    }
    out
}

impl StaticGeometryIndex {
    /// Resolve every cell's template into world rectangles.
    ///
    /// Non-rectangular or degenerate declarations are logged, recorded in
    /// [`warnings`](Self::warnings) and left out of the geometry.
    pub fn build(map: &TileMap, tiles: &TileSet) -> Self {
        let (tw, th) = (map.tile_width(), map.tile_height());
        let mut shapes = Vec::new();
        let mut spans = Vec::with_capacity(map.cells().len());
        let mut warnings = Vec::new();

        for (index, cell) in map.cells().iter().enumerate() {
            let start = shapes.len() as u32;
            let template = cell.tile_id().and_then(|id| Some((id, tiles.template(id)?)));
            if let Some((tile_id, template)) = template {
                let column = (index % map.width() as usize) as i32;
                let row = (index / map.width() as usize) as i32;
                let cell_origin = IVec2::new(column * tw, row * th);
                for declared in &template.shapes {
                    match declared.to_rect() {
                        Some(local) => {
                            let local = flip_rect(local, tw, th, cell.flip_h, cell.flip_v);
                            shapes.push(Shape::rectangle(local.translate(cell_origin)));
                        }
                        None => {
                            let w = GeometryWarning {
                                cell: index,
                                tile_id,
                                kind: declared.kind,
                                width: declared.width,
                                height: declared.height,
                            };
                            warn!("{w}");
                            warnings.push(w);
                        }
                    }
                }
            }
            spans.push(Span { start, len: shapes.len() as u32 - start });
        }

        Self {
            width: map.width(),
            height: map.height(),
            tile_width: tw,
            tile_height: th,
            shapes,
            spans,
            warnings,
        }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn tile_width(&self) -> i32 { self.tile_width }
    pub fn tile_height(&self) -> i32 { self.tile_height }
    pub fn cell_count(&self) -> usize { self.spans.len() }
    pub fn shape_count(&self) -> usize { self.shapes.len() }

    /// Shapes dropped at build time.
    pub fn warnings(&self) -> &[GeometryWarning] {
        &self.warnings
    }

    /// Shapes of one cell; empty for open cells and indices past the map.
    pub fn shapes_in(&self, cell: usize) -> &[Shape] {
        match self.spans.get(cell) {
            Some(span) => {
                let start = span.start as usize;
                &self.shapes[start..start + span.len as usize]
            }
            None => &[],
        }
    }

    pub fn cell_index(&self, column: i32, row: i32) -> Option<usize> {
        if column < 0 || row < 0 || column as u32 >= self.width || row as u32 >= self.height {
            return None;
        }
        Some(column as usize + row as usize * self.width as usize)
    }

    /// Cells spanned by `area`, unclipped.
    pub fn cell_range(&self, area: Rect) -> CellRange {
        let last_x = area.x.saturating_add(area.w.max(1) - 1);
        let last_y = area.y.saturating_add(area.h.max(1) - 1);
        CellRange {
            left: area.x.div_euclid(self.tile_width),
            right: last_x.div_euclid(self.tile_width),
            top: area.y.div_euclid(self.tile_height),
            bottom: last_y.div_euclid(self.tile_height),
        }
    }

    /// Cell holding the map pixel `p`, `None` off the map.
    pub fn cell_at(&self, p: IVec2) -> Option<usize> {
        self.cell_index(p.x.div_euclid(self.tile_width), p.y.div_euclid(self.tile_height))
    }

    /// On-map cells spanned by `area`, row-major: top row first, left column first.
    /// Off-map cells are skipped.
    pub fn cells_overlapping(&self, area: Rect) -> impl Iterator<Item = usize> + '_ {
        let range = self.cell_range(area);
        let (columns, rows) = (self.width as i32, self.height as i32);
        let (left, right) = (range.left.max(0), range.right.min(columns - 1));
        let (top, bottom) = (range.top.max(0), range.bottom.min(rows - 1));
        (top..=bottom).flat_map(move |row| (left..=right).filter_map(move |column| self.cell_index(column, row)))
    }
}
