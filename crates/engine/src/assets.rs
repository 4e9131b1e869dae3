use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{info, warn};

use crate::tilemap::validate_tile_kind;

/// Tile kinds the editor palette and the game load by default.
pub const DEFAULT_TILE_KINDS: &[&str] = &["decor", "grass", "large_decor", "stone", "spawners"];

/// Decoded RGBA8 image for one (kind, variant).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TileImage {
    /// Returns `None` when `rgba` does not hold exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut color = [0; 4];
        color.copy_from_slice(&self.rgba[offset..offset + 4]);
        Some(color)
    }
}

/// Per-(kind, variant) image lookup used by rendering and off-grid hit tests.
pub trait AssetProvider {
    fn image(&self, kind: &str, variant: u32) -> Option<&TileImage>;

    fn image_size(&self, kind: &str, variant: u32) -> Option<(u32, u32)> {
        self.image(kind, variant)
            .map(|image| (image.width(), image.height()))
    }

    fn variant_count(&self, kind: &str) -> usize;

    /// Kinds with at least one image, in a stable order.
    fn kinds(&self) -> Vec<&str>;
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to list tile directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open tile image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode tile image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TileAssets {
    images: BTreeMap<String, Vec<TileImage>>,
}

impl TileAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: impl Into<String>, variants: Vec<TileImage>) {
        self.images.insert(kind.into(), variants);
    }

    /// Loads `<tiles_dir>/<kind>/*.png` for each kind. Variants are numbered by
    /// sorted file name. Bad kind names, missing directories and undecodable
    /// images are logged and skipped.
    pub fn load(tiles_dir: &Path, kinds: &[&str]) -> Self {
        let mut assets = Self::new();
        for kind in kinds {
            if let Err(error) = validate_tile_kind(kind) {
                warn!(kind, error = %error, "tile_kind_invalid_skipped");
                continue;
            }
            let kind_dir = tiles_dir.join(kind);
            let paths = match list_png_files(&kind_dir) {
                Ok(paths) => paths,
                Err(error) => {
                    warn!(kind, error = %error, "tile_kind_dir_unreadable_skipped");
                    continue;
                }
            };

            let mut variants = Vec::with_capacity(paths.len());
            for path in paths {
                match load_tile_image(&path) {
                    Ok(image) => variants.push(image),
                    Err(error) => warn!(kind, error = %error, "tile_image_load_failed_skipped"),
                }
            }
            if variants.is_empty() {
                warn!(kind, path = %kind_dir.display(), "tile_kind_has_no_images");
                continue;
            }
            info!(kind, variants = variants.len(), "tile_kind_loaded");
            assets.insert(*kind, variants);
        }
        assets
    }
}

impl AssetProvider for TileAssets {
    fn image(&self, kind: &str, variant: u32) -> Option<&TileImage> {
        self.images.get(kind)?.get(variant as usize)
    }

    fn variant_count(&self, kind: &str) -> usize {
        self.images.get(kind).map_or(0, Vec::len)
    }

    fn kinds(&self) -> Vec<&str> {
        self.images.keys().map(String::as_str).collect()
    }
}

pub fn load_tile_image(path: &Path) -> Result<TileImage, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(TileImage {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn list_png_files(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let read_dir_error = |source| AssetError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
