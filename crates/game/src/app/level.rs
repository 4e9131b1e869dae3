use std::path::Path;

use ninja_engine::{ExtractMode, MapFileError, Rect, Tilemap, WorldPos};
use tracing::info;

/// Large decor variant 2 is a tree; leaves drift from under its canopy.
pub(crate) const LEAF_TREE: (&str, u32) = ("large_decor", 2);
pub(crate) const PLAYER_SPAWNER: (&str, u32) = ("spawners", 0);
pub(crate) const ENEMY_SPAWNER: (&str, u32) = ("spawners", 1);

pub(crate) const DEFAULT_PLAYER_START: WorldPos = WorldPos { x: 50.0, y: 50.0 };
/// How far below the lowest tile the player may fall before the level restarts.
pub(crate) const FALL_LIMIT_PX: f64 = 400.0;

const CANOPY_OFFSET: (f64, f64) = (4.0, 4.0);
const CANOPY_SIZE: (f64, f64) = (23.0, 13.0);

/// A map with its spawner markers pulled out, ready to seed a run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Level {
    pub(crate) tilemap: Tilemap,
    pub(crate) leaf_spawners: Vec<Rect>,
    pub(crate) player_start: WorldPos,
    pub(crate) enemy_starts: Vec<WorldPos>,
    pub(crate) kill_y: f64,
}

impl Level {
    pub(crate) fn load(path: &Path) -> Result<Self, MapFileError> {
        let tilemap = Tilemap::load_or(path, Tilemap::default())?;
        let level = Self::from_tilemap(tilemap);
        info!(
            path = %path.display(),
            enemies = level.enemy_starts.len(),
            leaf_spawners = level.leaf_spawners.len(),
            kill_y = level.kill_y,
            "level_loaded"
        );
        Ok(level)
    }

    pub(crate) fn from_tilemap(mut tilemap: Tilemap) -> Self {
        let leaf_spawners = tilemap
            .extract(&[LEAF_TREE], ExtractMode::Keep)
            .into_iter()
            .map(|tree| {
                Rect::new(
                    tree.pos.x + CANOPY_OFFSET.0,
                    tree.pos.y + CANOPY_OFFSET.1,
                    CANOPY_SIZE.0,
                    CANOPY_SIZE.1,
                )
            })
            .collect();

        let mut player_start = DEFAULT_PLAYER_START;
        let mut enemy_starts = Vec::new();
        for spawner in tilemap.extract(&[PLAYER_SPAWNER, ENEMY_SPAWNER], ExtractMode::Remove) {
            if spawner.variant == PLAYER_SPAWNER.1 {
                player_start = spawner.pos;
            } else {
                enemy_starts.push(spawner.pos);
            }
        }

        let lowest_edge = match tilemap.grid_bounds() {
            Some((_, max)) => tilemap.cell_rect(max).bottom(),
            None => player_start.y,
        };

        Self {
            tilemap,
            leaf_spawners,
            player_start,
            enemy_starts,
            kill_y: lowest_edge + FALL_LIMIT_PX,
        }
    }
}
