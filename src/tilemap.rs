//! Input model supplied by the asset-loading layer: the cell grid, its
//! spawn objects and the per-tile collision templates.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::*;

/// Tiled stores flip flags in the top bits of a gid.
pub const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
pub const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
pub const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;
const GID_MASK: u32 = !(FLIPPED_HORIZONTALLY | FLIPPED_VERTICALLY | FLIPPED_DIAGONALLY);

/// One map cell. `gid == 0` is empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCell {
    pub gid: u32,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

impl TileCell {
    pub const EMPTY: TileCell = TileCell { gid: 0, flip_h: false, flip_v: false };

    pub fn new(gid: u32) -> Self {
        Self { gid, flip_h: false, flip_v: false }
    }

    /// Decode a raw Tiled gid. The diagonal flag is dropped.
    pub fn from_raw_gid(raw: u32) -> Self {
        Self {
            gid: raw & GID_MASK,
            flip_h: raw & FLIPPED_HORIZONTALLY != 0,
            flip_v: raw & FLIPPED_VERTICALLY != 0,
        }
    }

    pub fn flipped(mut self, flip_h: bool, flip_v: bool) -> Self {
        self.flip_h = flip_h;
        self.flip_v = flip_v;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.gid == 0
    }

    /// Key into the tile set (`gid - 1`), `None` for empty cells.
    pub fn tile_id(&self) -> Option<u32> {
        self.gid.checked_sub(1)
    }
}

/// Named point placed on the map's object layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub role: String,
    pub x: f32,
    pub y: f32,
}

impl MapObject {
    pub fn new(role: impl Into<String>, x: f32, y: f32) -> Self {
        Self { role: role.into(), x, y }
    }
}

/// Grid of `width * height` cells; cell index = `column + row * width`.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: u32,
    height: u32,
    tile_width: i32,
    tile_height: i32,
    cells: Vec<TileCell>,
    objects: Vec<MapObject>,
}

impl TileMap {
    pub fn new(
        width: u32,
        height: u32,
        tile_width: i32,
        tile_height: i32,
        cells: Vec<TileCell>,
    ) -> Result<Self, CoreError> {
        if tile_width <= 0 || tile_height <= 0 {
            return Err(CoreError::InvalidTileSize { width: tile_width, height: tile_height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(CoreError::CellCount { width, height, expected, actual: cells.len() });
        }
        Ok(Self { width, height, tile_width, tile_height, cells, objects: Vec::new() })
    }

    /// Build from raw Tiled gids (flip bits included).
    pub fn from_raw_gids(
        width: u32,
        height: u32,
        tile_width: i32,
        tile_height: i32,
        gids: &[u32],
    ) -> Result<Self, CoreError> {
        let cells = gids.iter().copied().map(TileCell::from_raw_gid).collect();
        Self::new(width, height, tile_width, tile_height, cells)
    }

    pub fn with_objects(mut self, objects: Vec<MapObject>) -> Self {
        self.objects = objects;
        self
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn tile_width(&self) -> i32 { self.tile_width }
    pub fn tile_height(&self) -> i32 { self.tile_height }
    pub fn cells(&self) -> &[TileCell] { &self.cells }
    pub fn objects(&self) -> &[MapObject] { &self.objects }

    pub fn cell(&self, index: usize) -> Option<&TileCell> {
        self.cells.get(index)
    }

    /// Index of the cell at `(column, row)`, `None` off the map.
    pub fn cell_index(&self, column: i32, row: i32) -> Option<usize> {
        if column < 0 || row < 0 || column as u32 >= self.width || row as u32 >= self.height {
            return None;
        }
        Some(column as usize + row as usize * self.width as usize)
    }

    /// Index of the cell under the map-pixel point `(x, y)`, `None` off the map.
    pub fn tile_index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        self.cell_index(x / self.tile_width, y / self.tile_height)
    }

    /// Position of the first object whose role matches.
    pub fn spawn_point(&self, role: &str) -> Result<Vec2, CoreError> {
        self.objects
            .iter()
            .find(|o| o.role == role)
            .map(|o| Vec2::new(o.x, o.y))
            .ok_or_else(|| CoreError::MissingSpawn(role.to_owned()))
    }

    /// Short human-readable description for debug tooling.
    pub fn tile_description(&self, index: Option<usize>) -> String {
        match index.and_then(|i| self.cells.get(i)) {
            Some(cell) => format!("id = {}", cell.gid),
            None => "Off the map".to_owned(),
        }
    }
}

/// Collision shape as declared on a tile, in tile-local pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeclaredShape {
    pub kind: ShapeKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DeclaredShape {
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { kind: ShapeKind::Rectangle, x, y, width, height }
    }

    pub fn ellipse(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { kind: ShapeKind::Ellipse, x, y, width, height }
    }

    /// Polygons carry only their anchor point here; vertices are never read.
    pub fn polygon(x: f32, y: f32) -> Self {
        Self { kind: ShapeKind::Polygon, x, y, width: 0.0, height: 0.0 }
    }

    /// Rounded pixel rectangle, `None` unless this is a rectangle with
    /// strictly positive size.
    pub fn to_rect(&self) -> Option<Rect> {
        if self.kind != ShapeKind::Rectangle || self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let r = Rect::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.width.round() as i32,
            self.height.round() as i32,
        );
        (!r.is_empty()).then_some(r)
    }
}

/// Collision shapes shared by every cell using one tile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TileTemplate {
    pub shapes: Vec<DeclaredShape>,
}

impl TileTemplate {
    pub fn new(shapes: Vec<DeclaredShape>) -> Self {
        Self { shapes }
    }
}

/// Templates keyed by tile-set local identifier (`gid - 1`).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TileSet {
    templates: HashMap<u32, TileTemplate>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tile_id: u32, template: TileTemplate) -> Option<TileTemplate> {
        self.templates.insert(tile_id, template)
    }

    pub fn with_template(mut self, tile_id: u32, template: TileTemplate) -> Self {
        self.insert(tile_id, template);
        self
    }

    pub fn template(&self, tile_id: u32) -> Option<&TileTemplate> {
        self.templates.get(&tile_id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_3x2() -> TileMap {
        let cells = vec![TileCell::new(1); 6];
        TileMap::new(3, 2, 50, 50, cells)
            .unwrap()
            .with_objects(vec![MapObject::new("Door", 5.0, 5.0), MapObject::new("Player", 75.0, 20.0)])
    }

    #[test]
    fn test_cell_count_mismatch() {
        let err = TileMap::new(3, 2, 50, 50, vec![TileCell::EMPTY; 5]).unwrap_err();
        assert_eq!(
            err,
            CoreError::CellCount { width: 3, height: 2, expected: 6, actual: 5 }
        );
    }

    #[test]
    fn test_invalid_tile_size() {
        assert!(matches!(
            TileMap::new(1, 1, 0, 50, vec![TileCell::EMPTY]),
            Err(CoreError::InvalidTileSize { .. })
        ));
    }

    #[test]
    fn test_tile_index_of_edges() {
        let m = map_3x2();
        assert_eq!(m.tile_index_of(0, 0), Some(0));
        assert_eq!(m.tile_index_of(149, 99), Some(5));
        assert_eq!(m.tile_index_of(60, 10), Some(1));
        assert_eq!(m.tile_index_of(150, 0), None);
        assert_eq!(m.tile_index_of(0, 100), None);
        assert_eq!(m.tile_index_of(-1, 10), None);
        assert_eq!(m.tile_index_of(10, -1), None);
    }

    #[test]
    fn test_spawn_point_lookup() {
        let m = map_3x2();
        assert_eq!(m.spawn_point("Player").unwrap(), Vec2::new(75.0, 20.0));
        assert_eq!(
            m.spawn_point("Enemy").unwrap_err(),
            CoreError::MissingSpawn("Enemy".into())
        );
    }

    #[test]
    fn test_tile_description() {
        let m = map_3x2();
        assert_eq!(m.tile_description(m.tile_index_of(10, 10)), "id = 1");
        assert_eq!(m.tile_description(m.tile_index_of(-5, 10)), "Off the map");
    }

    #[test]
    fn test_from_raw_gid_flags() {
        let c = TileCell::from_raw_gid(FLIPPED_HORIZONTALLY | FLIPPED_DIAGONALLY | 7);
        assert_eq!(c.gid, 7);
        assert!(c.flip_h);
        assert!(!c.flip_v);
        assert_eq!(c.tile_id(), Some(6));
        assert_eq!(TileCell::from_raw_gid(0).tile_id(), None);
    }

    #[test]
    fn test_declared_shape_to_rect() {
        assert_eq!(
            DeclaredShape::rect(0.4, 43.6, 50.0, 6.2).to_rect(),
            Some(Rect::new(0, 44, 50, 6))
        );
        assert!(DeclaredShape::rect(0.0, 0.0, 0.0, 6.0).to_rect().is_none());
        assert!(DeclaredShape::ellipse(0.0, 0.0, 10.0, 10.0).to_rect().is_none());
        assert!(DeclaredShape::polygon(3.0, 3.0).to_rect().is_none());
    }

    #[test]
    fn test_tile_set_from_json() {
        let json = r#"{ "templates": { "0": { "shapes": [
            { "kind": "Rectangle", "x": 0.0, "y": 44.0, "width": 50.0, "height": 6.0 }
        ] } } }"#;
        let set: TileSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.template(0).unwrap().shapes[0].to_rect(), Some(Rect::new(0, 44, 50, 6)));
    }
}
