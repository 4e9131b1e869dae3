mod auto_tile;
mod extract;
mod kinds;
mod neighbors;
mod persistence;
mod store;
mod types;

pub use auto_tile::{auto_tile_variant, AUTO_TILE_PROBES, AUTO_TILE_RULES};
pub use extract::ExtractMode;
pub use kinds::{
    is_auto_tile_kind, is_physics_kind, validate_tile_kind, TileKindError, AUTO_TILE_TYPES,
    PHYSICS_TILES,
};
pub use neighbors::NEIGHBOR_OFFSETS;
pub use persistence::{format_grid_key, parse_grid_key, MapFileError};
pub use store::{Tilemap, TilemapError, DEFAULT_TILE_SIZE};
pub use types::{GridPos, GridTile, Rect, WorldPos, WorldTile};
