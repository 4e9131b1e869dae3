use super::store::Tilemap;
use super::types::{GridPos, WorldTile};

/// Whether extracted tiles stay in the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Leave matches in place (decor used as an effect anchor).
    Keep,
    /// Take matches out of the map (spawner markers).
    Remove,
}

impl Tilemap {
    /// Returns copies of every tile whose `(kind, variant)` is in `id_pairs`, in
    /// world coordinates: off-grid matches first in collection order, then grid
    /// matches ordered by row and column with positions scaled by `tile_size`.
    pub fn extract(&mut self, id_pairs: &[(&str, u32)], mode: ExtractMode) -> Vec<WorldTile> {
        let is_match = |kind: &str, variant: u32| {
            id_pairs
                .iter()
                .any(|(id_kind, id_variant)| *id_kind == kind && *id_variant == variant)
        };
        let mut matches = Vec::new();

        match mode {
            ExtractMode::Keep => matches.extend(
                self.off_grid_tiles()
                    .iter()
                    .filter(|tile| is_match(&tile.kind, tile.variant))
                    .cloned(),
            ),
            ExtractMode::Remove => self.off_grid_tiles_mut().retain(|tile| {
                if is_match(&tile.kind, tile.variant) {
                    matches.push(tile.clone());
                    false
                } else {
                    true
                }
            }),
        }

        let mut cells = self
            .grid_tiles()
            .filter(|tile| is_match(&tile.kind, tile.variant))
            .map(|tile| tile.pos)
            .collect::<Vec<GridPos>>();
        cells.sort_unstable_by_key(|cell| (cell.y, cell.x));

        for cell in cells {
            let tile = match mode {
                ExtractMode::Keep => self.grid_tile(cell).cloned(),
                ExtractMode::Remove => self.remove(cell),
            };
            if let Some(tile) = tile {
                matches.push(WorldTile {
                    pos: self.grid_to_world(tile.pos),
                    kind: tile.kind,
                    variant: tile.variant,
                });
            }
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::WorldPos;

    fn spawner_map() -> Tilemap {
        let mut tilemap = Tilemap::default();
        tilemap.place("spawners", 1, GridPos::new(4, 2));
        tilemap.place("spawners", 0, GridPos::new(1, 2));
        tilemap.place("spawners", 1, GridPos::new(-3, 0));
        tilemap.place("grass", 0, GridPos::new(1, 3));
        tilemap.place_off_grid("large_decor", 2, WorldPos::new(100.0, 50.0));
        tilemap.place_off_grid("decor", 1, WorldPos::new(7.5, 3.0));
        tilemap
    }

    #[test]
    fn off_grid_match_is_returned_unchanged_and_removed() {
        let mut tilemap = Tilemap::default();
        tilemap.place_off_grid("large_decor", 2, WorldPos::new(100.0, 50.0));

        let extracted = tilemap.extract(&[("large_decor", 2)], ExtractMode::Remove);

        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].pos, WorldPos::new(100.0, 50.0));
        assert_eq!(extracted[0].kind, "large_decor");
        assert_eq!(tilemap.off_grid_len(), 0);
    }

    #[test]
    fn grid_matches_are_converted_to_world_space() {
        let mut tilemap = spawner_map();

        let extracted = tilemap.extract(&[("spawners", 0), ("spawners", 1)], ExtractMode::Remove);

        let positions = extracted.iter().map(|tile| tile.pos).collect::<Vec<_>>();
        assert_eq!(
            positions,
            vec![
                WorldPos::new(-48.0, 0.0),
                WorldPos::new(16.0, 32.0),
                WorldPos::new(64.0, 32.0),
            ]
        );
        assert_eq!(extracted[1].variant, 0);
    }

    #[test]
    fn keep_never_changes_the_map() {
        let mut tilemap = spawner_map();
        let before = tilemap.clone();

        let extracted = tilemap.extract(
            &[("spawners", 1), ("large_decor", 2), ("grass", 0)],
            ExtractMode::Keep,
        );

        assert_eq!(extracted.len(), 4);
        assert_eq!(extracted[0].kind, "large_decor");
        assert_eq!(tilemap, before);
    }

    #[test]
    fn remove_drops_exactly_the_matches() {
        let mut tilemap = spawner_map();
        let grid_before = tilemap.grid_len();
        let off_grid_before = tilemap.off_grid_len();

        let extracted = tilemap.extract(&[("spawners", 1), ("decor", 1)], ExtractMode::Remove);

        assert_eq!(extracted.len(), 3);
        assert_eq!(
            grid_before + off_grid_before - extracted.len(),
            tilemap.grid_len() + tilemap.off_grid_len()
        );
        assert!(tilemap.grid_tile(GridPos::new(1, 2)).is_some());
        assert!(tilemap.grid_tile(GridPos::new(1, 3)).is_some());
        assert_eq!(tilemap.off_grid_tiles()[0].kind, "large_decor");
    }

    #[test]
    fn empty_id_set_matches_nothing() {
        let mut tilemap = spawner_map();
        let before = tilemap.clone();

        assert!(tilemap.extract(&[], ExtractMode::Remove).is_empty());
        assert_eq!(tilemap, before);
    }

    #[test]
    fn extracted_copies_are_independent() {
        let mut tilemap = spawner_map();

        let mut extracted = tilemap.extract(&[("grass", 0)], ExtractMode::Keep);
        extracted[0].variant = 9;
        extracted[0].kind.push_str("_changed");

        let tile = tilemap.grid_tile(GridPos::new(1, 3)).expect("tile");
        assert_eq!((tile.kind.as_str(), tile.variant), ("grass", 0));
    }
}
