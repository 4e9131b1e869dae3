use std::collections::HashMap;

use thiserror::Error;

use crate::assets::AssetProvider;

use super::kinds::is_physics_kind;
use super::types::{GridPos, GridTile, Rect, WorldPos, WorldTile};

pub const DEFAULT_TILE_SIZE: u32 = 16;

/// Sparse tile storage: grid-snapped tiles keyed by cell, plus free-form
/// off-grid tiles in insertion order.
///
/// `tile_size` is fixed for the lifetime of a map; every spatial query divides
/// or multiplies by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tilemap {
    tile_size: u32,
    grid: HashMap<GridPos, GridTile>,
    off_grid: Vec<WorldTile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("tile size must be positive")]
    ZeroTileSize,
}

impl Default for Tilemap {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            grid: HashMap::new(),
            off_grid: Vec::new(),
        }
    }
}

impl Tilemap {
    pub fn new(tile_size: u32) -> Result<Self, TilemapError> {
        if tile_size == 0 {
            return Err(TilemapError::ZeroTileSize);
        }
        Ok(Self {
            tile_size,
            ..Self::default()
        })
    }

    pub(crate) fn from_parts(
        tile_size: u32,
        grid: HashMap<GridPos, GridTile>,
        off_grid: Vec<WorldTile>,
    ) -> Result<Self, TilemapError> {
        if tile_size == 0 {
            return Err(TilemapError::ZeroTileSize);
        }
        Ok(Self {
            tile_size,
            grid,
            off_grid,
        })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn world_to_grid(&self, pos: WorldPos) -> GridPos {
        GridPos::from_world(pos, self.tile_size)
    }

    pub fn grid_to_world(&self, pos: GridPos) -> WorldPos {
        pos.to_world(self.tile_size)
    }

    /// World-space box covering one grid cell.
    pub fn cell_rect(&self, pos: GridPos) -> Rect {
        let origin = self.grid_to_world(pos);
        let size = f64::from(self.tile_size);
        Rect::new(origin.x, origin.y, size, size)
    }

    /// Places a tile, silently replacing whatever occupied the cell. The
    /// replaced tile is returned.
    pub fn place(
        &mut self,
        kind: impl Into<String>,
        variant: u32,
        pos: GridPos,
    ) -> Option<GridTile> {
        self.grid.insert(
            pos,
            GridTile {
                kind: kind.into(),
                variant,
                pos,
            },
        )
    }

    pub fn place_off_grid(&mut self, kind: impl Into<String>, variant: u32, pos: WorldPos) {
        self.off_grid.push(WorldTile {
            kind: kind.into(),
            variant,
            pos,
        });
    }

    /// Removing an empty cell is a no-op.
    pub fn remove(&mut self, pos: GridPos) -> Option<GridTile> {
        self.grid.remove(&pos)
    }

    /// Removes every off-grid tile whose rendered image box contains `point`.
    /// Tiles without a known image cannot be hit. Returns the number removed.
    pub fn remove_off_grid<A>(&mut self, point: WorldPos, assets: &A) -> usize
    where
        A: AssetProvider + ?Sized,
    {
        let before = self.off_grid.len();
        self.off_grid.retain(|tile| {
            let Some((width, height)) = assets.image_size(&tile.kind, tile.variant) else {
                return true;
            };
            let bounds = Rect::new(tile.pos.x, tile.pos.y, f64::from(width), f64::from(height));
            !bounds.contains_point(point)
        });
        before - self.off_grid.len()
    }

    /// The tile in the cell containing `pos`, if it is solid.
    pub fn solid_check(&self, pos: WorldPos) -> Option<&GridTile> {
        self.grid
            .get(&self.world_to_grid(pos))
            .filter(|tile| is_physics_kind(&tile.kind))
    }

    pub fn grid_tile(&self, pos: GridPos) -> Option<&GridTile> {
        self.grid.get(&pos)
    }

    pub(crate) fn grid_tile_mut(&mut self, pos: GridPos) -> Option<&mut GridTile> {
        self.grid.get_mut(&pos)
    }

    /// Grid tiles in unspecified order.
    pub fn grid_tiles(&self) -> impl Iterator<Item = &GridTile> {
        self.grid.values()
    }

    pub fn off_grid_tiles(&self) -> &[WorldTile] {
        &self.off_grid
    }

    pub(crate) fn off_grid_tiles_mut(&mut self) -> &mut Vec<WorldTile> {
        &mut self.off_grid
    }

    pub fn grid_len(&self) -> usize {
        self.grid.len()
    }

    pub fn off_grid_len(&self) -> usize {
        self.off_grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.off_grid.is_empty()
    }

    /// Inclusive min/max cell over all grid tiles.
    pub fn grid_bounds(&self) -> Option<(GridPos, GridPos)> {
        let mut cells = self.grid.keys();
        let first = *cells.next()?;
        Some(cells.fold((first, first), |(min, max), cell| {
            (
                GridPos::new(min.x.min(cell.x), min.y.min(cell.y)),
                GridPos::new(max.x.max(cell.x), max.y.max(cell.y)),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{TileAssets, TileImage};

    fn decor_assets() -> TileAssets {
        let mut assets = TileAssets::new();
        assets.insert(
            "large_decor",
            vec![
                TileImage::solid(10, 10, [0, 0, 0, 255]),
                TileImage::solid(20, 8, [0, 0, 0, 255]),
            ],
        );
        assets
    }

    /// Minimal LCG so the replay test is deterministic without extra crates.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            self.0 >> 33
        }

        fn range(&mut self, low: i32, high: i32) -> i32 {
            low + (self.next() % (high - low + 1) as u64) as i32
        }
    }

    #[test]
    fn new_rejects_zero_tile_size() {
        assert_eq!(Tilemap::new(0), Err(TilemapError::ZeroTileSize));
        assert_eq!(Tilemap::new(8).expect("tilemap").tile_size(), 8);
        assert_eq!(Tilemap::default().tile_size(), DEFAULT_TILE_SIZE);
    }

    #[test]
    fn place_overwrites_and_returns_previous() {
        let mut tilemap = Tilemap::default();
        assert!(tilemap.place("grass", 0, GridPos::new(2, 3)).is_none());
        let replaced = tilemap
            .place("stone", 4, GridPos::new(2, 3))
            .expect("replaced tile");
        assert_eq!(replaced.kind, "grass");
        assert_eq!(tilemap.grid_len(), 1);
        let tile = tilemap.grid_tile(GridPos::new(2, 3)).expect("tile");
        assert_eq!((tile.kind.as_str(), tile.variant), ("stone", 4));
        assert_eq!(tile.pos, GridPos::new(2, 3));
    }

    #[test]
    fn remove_missing_cell_is_noop() {
        let mut tilemap = Tilemap::default();
        tilemap.place("grass", 0, GridPos::new(0, 0));
        assert!(tilemap.remove(GridPos::new(5, 5)).is_none());
        assert!(tilemap.remove(GridPos::new(0, 0)).is_some());
        assert!(tilemap.remove(GridPos::new(0, 0)).is_none());
        assert!(tilemap.is_empty());
    }

    #[test]
    fn place_remove_replay_matches_reference_map() {
        let mut rng = Lcg(0x5eed);
        let mut tilemap = Tilemap::default();
        let mut reference = HashMap::<(i32, i32), (String, u32)>::new();
        let kinds = ["grass", "stone", "decor"];

        for _ in 0..2_000 {
            let cell = (rng.range(-6, 6), rng.range(-6, 6));
            if rng.next() % 3 == 0 {
                tilemap.remove(cell.into());
                reference.remove(&cell);
            } else {
                let kind = kinds[(rng.next() % kinds.len() as u64) as usize];
                let variant = (rng.next() % 9) as u32;
                tilemap.place(kind, variant, cell.into());
                reference.insert(cell, (kind.to_string(), variant));
            }
        }

        assert_eq!(tilemap.grid_len(), reference.len());
        for ((x, y), (kind, variant)) in &reference {
            let tile = tilemap.grid_tile(GridPos::new(*x, *y)).expect("tile");
            assert_eq!(&tile.kind, kind);
            assert_eq!(tile.variant, *variant);
            assert_eq!(tile.pos, GridPos::new(*x, *y));
        }
    }

    #[test]
    fn solid_check_only_returns_physics_tiles() {
        let mut tilemap = Tilemap::default();
        tilemap.place("stone", 1, GridPos::new(1, 1));
        tilemap.place("decor", 0, GridPos::new(2, 1));

        let hit = tilemap
            .solid_check(WorldPos::new(20.0, 31.0))
            .expect("stone is solid");
        assert_eq!(hit.kind, "stone");
        assert!(tilemap.solid_check(WorldPos::new(40.0, 20.0)).is_none());
        assert!(tilemap.solid_check(WorldPos::new(100.0, 100.0)).is_none());
    }

    #[test]
    fn solid_check_handles_negative_positions() {
        let mut tilemap = Tilemap::default();
        tilemap.place("grass", 0, GridPos::new(-1, -1));
        assert!(tilemap.solid_check(WorldPos::new(-0.1, -15.0)).is_some());
        assert!(tilemap.solid_check(WorldPos::new(0.1, -15.0)).is_none());
    }

    #[test]
    fn remove_off_grid_hits_every_overlapping_tile() {
        let assets = decor_assets();
        let mut tilemap = Tilemap::default();
        tilemap.place_off_grid("large_decor", 0, WorldPos::new(0.0, 0.0));
        tilemap.place_off_grid("large_decor", 0, WorldPos::new(0.0, 0.0));
        tilemap.place_off_grid("large_decor", 1, WorldPos::new(5.0, 5.0));
        tilemap.place_off_grid("large_decor", 0, WorldPos::new(50.0, 50.0));

        let removed = tilemap.remove_off_grid(WorldPos::new(6.0, 6.0), &assets);

        assert_eq!(removed, 3);
        assert_eq!(tilemap.off_grid_len(), 1);
        assert_eq!(tilemap.off_grid_tiles()[0].pos, WorldPos::new(50.0, 50.0));
    }

    #[test]
    fn remove_off_grid_ignores_tiles_without_assets() {
        let assets = decor_assets();
        let mut tilemap = Tilemap::default();
        tilemap.place_off_grid("unknown", 0, WorldPos::new(0.0, 0.0));
        tilemap.place_off_grid("large_decor", 7, WorldPos::new(0.0, 0.0));

        assert_eq!(tilemap.remove_off_grid(WorldPos::new(1.0, 1.0), &assets), 0);
        assert_eq!(tilemap.off_grid_len(), 2);
    }

    #[test]
    fn remove_off_grid_misses_point_on_far_edge() {
        let assets = decor_assets();
        let mut tilemap = Tilemap::default();
        tilemap.place_off_grid("large_decor", 0, WorldPos::new(0.0, 0.0));

        assert_eq!(
            tilemap.remove_off_grid(WorldPos::new(10.0, 5.0), &assets),
            0
        );
    }

    #[test]
    fn grid_bounds_spans_all_cells() {
        let mut tilemap = Tilemap::default();
        assert!(tilemap.grid_bounds().is_none());
        tilemap.place("grass", 0, GridPos::new(-3, 4));
        tilemap.place("grass", 0, GridPos::new(5, -1));
        tilemap.place("grass", 0, GridPos::new(0, 9));
        assert_eq!(
            tilemap.grid_bounds(),
            Some((GridPos::new(-3, -1), GridPos::new(5, 9)))
        );
    }
}
