use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod assets;
mod atomic_io;
pub mod tilemap;

pub use app::{
    render_tilemap, run_app, visible_cell_range, AppError, EdgeKey, InputAction, InputSnapshot,
    LoopConfig, LoopMetricsSnapshot, RenderTarget, Session, SessionCommand, SLOW_FRAME_ENV_VAR,
};
pub use assets::{AssetError, AssetProvider, TileAssets, TileImage, DEFAULT_TILE_KINDS};
pub use tilemap::{
    ExtractMode, GridPos, GridTile, MapFileError, Rect, Tilemap, TilemapError, WorldPos,
    WorldTile, DEFAULT_TILE_SIZE,
};

pub const ROOT_ENV_VAR: &str = "NINJA_ROOT";
pub const DEFAULT_MAP_FILE_NAME: &str = "map.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
    pub tiles_dir: PathBuf,
    pub default_map_path: PathBuf,
}

impl AppPaths {
    fn from_root(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        let tiles_dir = assets_dir.join("tiles");
        let default_map_path = root.join(DEFAULT_MAP_FILE_NAME);
        Self {
            root,
            assets_dir,
            tiles_dir,
            default_map_path,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("--root does not point to a directory: {path}")]
    InvalidRootOverride { path: PathBuf },
    #[error(
        "NINJA_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly or pass --root, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/ninja\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

/// Resolves the project root: an explicit `--root` wins, then `NINJA_ROOT`,
/// then the first ancestor of the executable that looks like the repo.
pub fn resolve_app_paths(root_override: Option<&Path>) -> Result<AppPaths, StartupError> {
    let root = match root_override {
        Some(path) => {
            let normalized = normalize_path(path);
            if !normalized.is_dir() {
                return Err(StartupError::InvalidRootOverride { path: normalized });
            }
            normalized
        }
        None => resolve_root()?,
    };
    Ok(AppPaths::from_root(root))
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            find_repo_root(&exe_dir).ok_or_else(|| StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn find_repo_root(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|candidate| is_repo_marker(candidate))
        .map(normalize_path)
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
