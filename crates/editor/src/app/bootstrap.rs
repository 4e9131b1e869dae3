use std::path::PathBuf;

use ninja_engine::{
    resolve_app_paths, AssetProvider, LoopConfig, MapFileError, StartupError, TileAssets, Tilemap,
    TilemapError, DEFAULT_TILE_KINDS, DEFAULT_TILE_SIZE,
};
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::session::EditorSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditorArgs {
    pub(crate) root: Option<PathBuf>,
    pub(crate) map: Option<PathBuf>,
    /// Only used when the map file does not exist yet.
    pub(crate) tile_size: u32,
}

impl Default for EditorArgs {
    fn default() -> Self {
        Self {
            root: None,
            map: None,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliAction {
    Run(EditorArgs),
    Help,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("invalid tile size: {0}")]
    TileSize(#[from] TilemapError),
    #[error("failed to load map: {0}")]
    Map(#[from] MapFileError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) session: EditorSession,
}

pub(crate) fn parse_args(args: &[String]) -> Result<CliAction, String> {
    let mut parsed = EditorArgs::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "--root" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --root".to_string())?;
                parsed.root = Some(PathBuf::from(value));
                index += 2;
            }
            "--map" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --map".to_string())?;
                parsed.map = Some(PathBuf::from(value));
                index += 2;
            }
            "--tile-size" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --tile-size".to_string())?;
                parsed.tile_size = value
                    .parse::<u32>()
                    .ok()
                    .filter(|size| *size > 0)
                    .ok_or_else(|| {
                        format!("invalid --tile-size value '{value}' (expected positive integer)")
                    })?;
                index += 2;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(CliAction::Run(parsed))
}

pub(crate) fn usage_text() -> String {
    [
        "usage: ninja_editor [--root <dir>] [--map <path>] [--tile-size <n>]",
        "",
        "  --root <dir>       project root (default: NINJA_ROOT or the repo holding the binary)",
        "  --map <path>       map file to edit and save (defaults to <root>/map.json)",
        "  --tile-size <n>    cell size in pixels for a new map (default 16)",
        "",
        "controls: wasd scroll, left paint, right erase, wheel kind, shift+wheel variant,",
        "          g grid snap, t auto-tile, o save, esc quit",
    ]
    .join("\n")
}

pub(crate) fn build_app(args: EditorArgs) -> Result<AppWiring, BootstrapError> {
    let paths = resolve_app_paths(args.root.as_deref())?;
    let map_path = args.map.unwrap_or_else(|| paths.default_map_path.clone());
    info!(
        root = %paths.root.display(),
        tiles_dir = %paths.tiles_dir.display(),
        map = %map_path.display(),
        "startup"
    );

    let tilemap = Tilemap::load_or(&map_path, Tilemap::new(args.tile_size)?)?;
    let assets = TileAssets::load(&paths.tiles_dir, DEFAULT_TILE_KINDS);
    if assets.kinds().is_empty() {
        warn!(tiles_dir = %paths.tiles_dir.display(), "no_tile_assets_loaded");
    }

    Ok(AppWiring {
        config: LoopConfig {
            window_title: "editor".to_string(),
            ..LoopConfig::default()
        },
        session: EditorSession::new(tilemap, assets, map_path),
    })
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
