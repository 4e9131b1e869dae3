use super::kinds::is_physics_kind;
use super::store::Tilemap;
use super::types::{GridTile, Rect, WorldPos};

/// The 3x3 block around a cell, center included.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 9] = [
    (0, 0),
    (0, 1),
    (0, -1),
    (1, 0),
    (1, 1),
    (1, -1),
    (-1, 0),
    (-1, 1),
    (-1, -1),
];

impl Tilemap {
    /// Grid tiles in the 3x3 neighborhood of the cell containing `pos`, any
    /// kind, in `NEIGHBOR_OFFSETS` order. Empty cells contribute nothing.
    pub fn tiles_around(&self, pos: WorldPos) -> Vec<&GridTile> {
        let center = self.world_to_grid(pos);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|offset| center.checked_offset(*offset))
            .filter_map(|cell| self.grid_tile(cell))
            .collect()
    }

    /// Collision boxes for the solid tiles around `pos`. Bodies move less than
    /// one cell per step, so this neighborhood is the whole broad phase.
    pub fn physics_rects_around(&self, pos: WorldPos) -> Vec<Rect> {
        self.tiles_around(pos)
            .into_iter()
            .filter(|tile| is_physics_kind(&tile.kind))
            .map(|tile| self.cell_rect(tile.pos))
            .collect()
    }
}
