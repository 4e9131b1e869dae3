use super::kinds::is_auto_tile_kind;
use super::store::Tilemap;
use super::types::GridPos;

/// Axis neighbors probed for auto-tiling. Diagonals never count.
pub const AUTO_TILE_PROBES: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Same-kind neighbor pattern (sorted by `(dx, dy)`) to variant. `(0, 1)` is
/// the cell below, `(0, -1)` the cell above.
pub const AUTO_TILE_RULES: [(&[(i32, i32)], u32); 9] = [
    (&[(0, 1), (1, 0)], 0),
    (&[(-1, 0), (0, 1), (1, 0)], 1),
    (&[(-1, 0), (0, 1)], 2),
    (&[(-1, 0), (0, -1), (0, 1)], 3),
    (&[(-1, 0), (0, -1)], 4),
    (&[(-1, 0), (0, -1), (1, 0)], 5),
    (&[(0, -1), (1, 0)], 6),
    (&[(0, -1), (0, 1), (1, 0)], 7),
    (&[(-1, 0), (0, -1), (0, 1), (1, 0)], 8),
];

/// Variant for a sorted neighbor pattern, or `None` when the pattern has no
/// rule (isolated tiles, single neighbors, straight runs).
pub fn auto_tile_variant(sorted_neighbors: &[(i32, i32)]) -> Option<u32> {
    AUTO_TILE_RULES
        .iter()
        .find(|(pattern, _)| *pattern == sorted_neighbors)
        .map(|(_, variant)| *variant)
}

impl Tilemap {
    /// Recomputes the variant of every auto-tile-eligible grid tile from its
    /// same-kind axis neighbors. Tiles whose pattern has no rule keep their
    /// variant. Returns how many tiles changed.
    pub fn auto_tile(&mut self) -> usize {
        let updates = self
            .grid_tiles()
            .filter(|tile| is_auto_tile_kind(&tile.kind))
            .filter_map(|tile| {
                let neighbors = self.same_kind_neighbors(tile.pos, &tile.kind);
                let variant = auto_tile_variant(&neighbors)?;
                (variant != tile.variant).then_some((tile.pos, variant))
            })
            .collect::<Vec<_>>();

        for (pos, variant) in &updates {
            if let Some(tile) = self.grid_tile_mut(*pos) {
                tile.variant = *variant;
            }
        }
        updates.len()
    }

    fn same_kind_neighbors(&self, pos: GridPos, kind: &str) -> Vec<(i32, i32)> {
        let mut neighbors = AUTO_TILE_PROBES
            .iter()
            .copied()
            .filter(|offset| {
                pos.checked_offset(*offset)
                    .and_then(|cell| self.grid_tile(cell))
                    .is_some_and(|neighbor| neighbor.kind == kind)
            })
            .collect::<Vec<_>>();
        neighbors.sort_unstable();
        neighbors
    }
}
