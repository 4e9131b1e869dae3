use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::atomic_io::write_text_atomic;

use super::store::{Tilemap, TilemapError};
use super::types::{GridPos, GridTile, WorldPos, WorldTile};

#[derive(Debug, Error)]
pub enum MapFileError {
    #[error("map file not found: {path}")]
    NotFound { path: PathBuf },
    #[error("failed to read map file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write map file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode map json: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse map json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid grid key '{key}', expected \"<x>;<y>\"")]
    InvalidKey { key: String },
    #[error("grid key '{key}' does not match tile pos [{x}, {y}]")]
    KeyPositionMismatch { key: String, x: i32, y: i32 },
    #[error("tile_size must be positive")]
    ZeroTileSize,
}

impl MapFileError {
    /// A missing file means "start from an empty map", not a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<TilemapError> for MapFileError {
    fn from(error: TilemapError) -> Self {
        match error {
            TilemapError::ZeroTileSize => Self::ZeroTileSize,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MapFile {
    tile_map: BTreeMap<String, SavedGridTile>,
    tile_size: u32,
    off_grid: Vec<SavedWorldTile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedGridTile {
    #[serde(rename = "type")]
    kind: String,
    variant: u32,
    pos: [i32; 2],
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedWorldTile {
    #[serde(rename = "type")]
    kind: String,
    variant: u32,
    pos: [f64; 2],
}

pub fn format_grid_key(pos: GridPos) -> String {
    format!("{};{}", pos.x, pos.y)
}

/// Accepts only the exact form `format_grid_key` writes: no sign other than
/// `-`, no leading zeros, no `-0`.
pub fn parse_grid_key(key: &str) -> Option<GridPos> {
    let (x, y) = key.split_once(';')?;
    Some(GridPos::new(parse_key_coord(x)?, parse_key_coord(y)?))
}

fn parse_key_coord(raw: &str) -> Option<i32> {
    let value = raw.parse::<i32>().ok()?;
    (value.to_string() == raw).then_some(value)
}

impl Tilemap {
    pub fn to_json_string(&self) -> Result<String, MapFileError> {
        let tile_map = self
            .grid_tiles()
            .map(|tile| {
                (
                    format_grid_key(tile.pos),
                    SavedGridTile {
                        kind: tile.kind.clone(),
                        variant: tile.variant,
                        pos: [tile.pos.x, tile.pos.y],
                    },
                )
            })
            .collect();
        let off_grid = self
            .off_grid_tiles()
            .iter()
            .map(|tile| SavedWorldTile {
                kind: tile.kind.clone(),
                variant: tile.variant,
                pos: [tile.pos.x, tile.pos.y],
            })
            .collect();
        let file = MapFile {
            tile_map,
            tile_size: self.tile_size(),
            off_grid,
        };
        serde_json::to_string_pretty(&file).map_err(MapFileError::Encode)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, MapFileError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let file = serde_path_to_error::deserialize::<_, MapFile>(&mut deserializer).map_err(
            |error| {
                let json_path = error.path().to_string();
                MapFileError::Parse {
                    json_path,
                    source: error.into_inner(),
                }
            },
        )?;

        let mut grid = HashMap::with_capacity(file.tile_map.len());
        for (key, saved) in file.tile_map {
            let Some(pos) = parse_grid_key(&key) else {
                return Err(MapFileError::InvalidKey { key });
            };
            let [x, y] = saved.pos;
            if pos != GridPos::new(x, y) {
                return Err(MapFileError::KeyPositionMismatch { key, x, y });
            }
            grid.insert(
                pos,
                GridTile {
                    kind: saved.kind,
                    variant: saved.variant,
                    pos,
                },
            );
        }
        let off_grid = file
            .off_grid
            .into_iter()
            .map(|saved| WorldTile {
                kind: saved.kind,
                variant: saved.variant,
                pos: WorldPos::new(saved.pos[0], saved.pos[1]),
            })
            .collect();

        Ok(Self::from_parts(file.tile_size, grid, off_grid)?)
    }

    /// Writes the whole map to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), MapFileError> {
        let json = self.to_json_string()?;
        write_text_atomic(path, &json).map_err(|source| MapFileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            grid_tiles = self.grid_len(),
            off_grid_tiles = self.off_grid_len(),
            "map_saved"
        );
        Ok(())
    }

    /// Replaces the entire map state with the contents of `path`. On error the
    /// map is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<(), MapFileError> {
        let raw = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                MapFileError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                MapFileError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        *self = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            tile_size = self.tile_size(),
            grid_tiles = self.grid_len(),
            off_grid_tiles = self.off_grid_len(),
            "map_loaded"
        );
        Ok(())
    }

    /// Loads `path`, falling back to `empty` when the file does not exist.
    /// Every other failure is returned.
    pub fn load_or(path: &Path, empty: Tilemap) -> Result<Self, MapFileError> {
        let mut tilemap = empty;
        match tilemap.load(path) {
            Ok(()) => Ok(tilemap),
            Err(error) if error.is_not_found() => {
                info!(path = %path.display(), "map_missing_starting_empty");
                Ok(tilemap)
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn mixed_map() -> Tilemap {
        let mut tilemap = Tilemap::default();
        tilemap.place("grass", 1, GridPos::new(0, 0));
        tilemap.place("stone", 8, GridPos::new(-4, 12));
        tilemap.place("spawners", 0, GridPos::new(3, -1));
        tilemap.place_off_grid("large_decor", 2, WorldPos::new(100.0, 50.0));
        tilemap.place_off_grid("decor", 0, WorldPos::new(-3.25, 7.5));
        tilemap.place_off_grid("decor", 0, WorldPos::new(-3.25, 7.5));
        tilemap
    }

    #[test]
    fn grid_keys_round_trip_negative_coordinates() {
        let pos = GridPos::new(-12, 7);
        assert_eq!(format_grid_key(pos), "-12;7");
        assert_eq!(parse_grid_key("-12;7"), Some(pos));
        assert_eq!(parse_grid_key("0;-2147483648"), Some(GridPos::new(0, i32::MIN)));
    }

    #[test]
    fn parse_grid_key_rejects_malformed_keys() {
        for key in [
            "", "1", "1;", ";2", "1;2;3", "a;b", "1,2", "1.5;2", "+1;0", "01;0", "1;-00", "-0;0",
            " 1;0",
        ] {
            assert_eq!(parse_grid_key(key), None, "key={key}");
        }
    }

    #[test]
    fn save_then_load_round_trips_mixed_map() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("maps").join("0.json");
        let original = mixed_map();

        original.save(&path).expect("save");
        let mut loaded = Tilemap::default();
        loaded.load(&path).expect("load");

        assert_eq!(loaded, original);
    }

    #[test]
    fn save_then_load_round_trips_empty_map() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("empty.json");
        let original = Tilemap::new(8).expect("tilemap");

        original.save(&path).expect("save");
        let mut loaded = mixed_map();
        loaded.load(&path).expect("load");

        assert_eq!(loaded, original);
        assert_eq!(loaded.tile_size(), 8);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("map.json");
        mixed_map().save(&path).expect("first save");

        Tilemap::default().save(&path).expect("second save");

        let mut loaded = mixed_map();
        loaded.load(&path).expect("load");
        assert!(loaded.is_empty());
    }

    #[test]
    fn saved_json_uses_persisted_field_names() {
        let json = mixed_map().to_json_string().expect("json");
        let value: Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["tile_size"], json!(16));
        assert_eq!(
            value["tile_map"]["-4;12"],
            json!({"type": "stone", "variant": 8, "pos": [-4, 12]})
        );
        assert_eq!(
            value["off_grid"][0],
            json!({"type": "large_decor", "variant": 2, "pos": [100.0, 50.0]})
        );
        assert_eq!(value.as_object().expect("object").len(), 3);
    }

    #[test]
    fn loads_integer_off_grid_positions() {
        let raw = json!({
            "tile_map": {"2;3": {"type": "grass", "variant": 0, "pos": [2, 3]}},
            "tile_size": 16,
            "off_grid": [{"type": "decor", "variant": 1, "pos": [40, 12]}]
        })
        .to_string();

        let tilemap = Tilemap::from_json_str(&raw).expect("decode");

        assert_eq!(tilemap.off_grid_tiles()[0].pos, WorldPos::new(40.0, 12.0));
        assert_eq!(
            tilemap.grid_tile(GridPos::new(2, 3)).expect("tile").kind,
            "grass"
        );
    }

    #[test]
    fn load_missing_file_is_not_found_and_leaves_map_untouched() {
        let dir = TempDir::new().expect("tempdir");
        let mut tilemap = mixed_map();

        let error = tilemap
            .load(&dir.path().join("missing.json"))
            .expect_err("missing file");

        assert!(error.is_not_found());
        assert_eq!(tilemap, mixed_map());
    }

    #[test]
    fn load_or_falls_back_only_for_missing_files() {
        let dir = TempDir::new().expect("tempdir");
        let missing = dir.path().join("missing.json");
        let fallback = Tilemap::new(32).expect("tilemap");

        let loaded = Tilemap::load_or(&missing, fallback.clone()).expect("fallback");
        assert_eq!(loaded, fallback);

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{").expect("write");
        assert!(Tilemap::load_or(&broken, fallback).is_err());
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = json!({
            "tile_map": {"0;0": {"type": "grass", "variant": -1, "pos": [0, 0]}},
            "tile_size": 16,
            "off_grid": []
        })
        .to_string();

        let error = Tilemap::from_json_str(&raw).expect_err("negative variant");

        match error {
            MapFileError::Parse { json_path, .. } => {
                assert_eq!(json_path, "tile_map.0;0.variant");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_missing_fields_and_bad_keys() {
        let missing_off_grid = json!({"tile_map": {}, "tile_size": 16}).to_string();
        assert!(matches!(
            Tilemap::from_json_str(&missing_off_grid),
            Err(MapFileError::Parse { .. })
        ));

        let bad_key = json!({
            "tile_map": {"zero": {"type": "grass", "variant": 0, "pos": [0, 0]}},
            "tile_size": 16,
            "off_grid": []
        })
        .to_string();
        assert!(matches!(
            Tilemap::from_json_str(&bad_key),
            Err(MapFileError::InvalidKey { .. })
        ));

        let padded_duplicate = json!({
            "tile_map": {
                "1;0": {"type": "grass", "variant": 0, "pos": [1, 0]},
                "01;0": {"type": "stone", "variant": 0, "pos": [1, 0]}
            },
            "tile_size": 16,
            "off_grid": []
        })
        .to_string();
        assert!(matches!(
            Tilemap::from_json_str(&padded_duplicate),
            Err(MapFileError::InvalidKey { key }) if key == "01;0"
        ));

        let mismatched = json!({
            "tile_map": {"1;1": {"type": "grass", "variant": 0, "pos": [0, 1]}},
            "tile_size": 16,
            "off_grid": []
        })
        .to_string();
        assert!(matches!(
            Tilemap::from_json_str(&mismatched),
            Err(MapFileError::KeyPositionMismatch { x: 0, y: 1, .. })
        ));
    }

    #[test]
    fn rejects_zero_tile_size() {
        let raw = json!({"tile_map": {}, "tile_size": 0, "off_grid": []}).to_string();
        assert!(matches!(
            Tilemap::from_json_str(&raw),
            Err(MapFileError::ZeroTileSize)
        ));
    }
}
