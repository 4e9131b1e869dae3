use std::path::PathBuf;

use ninja_engine::{
    resolve_app_paths, LoopConfig, MapFileError, Session, StartupError, TileAssets,
    DEFAULT_TILE_KINDS,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::session::PlatformerSession;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct GameArgs {
    pub(crate) root: Option<PathBuf>,
    pub(crate) map: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliAction {
    Run(GameArgs),
    Help,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load level: {0}")]
    Level(#[from] MapFileError),
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) session: Box<dyn Session>,
}

pub(crate) fn parse_args(args: &[String]) -> Result<CliAction, String> {
    let mut parsed = GameArgs::default();
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
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(CliAction::Run(parsed))
}

pub(crate) fn usage_text() -> String {
    [
        "usage: ninja_game [--root <dir>] [--map <path>]",
        "",
        "  --root <dir>   project root (defaults to NINJA_ROOT or the repo containing the binary)",
        "  --map <path>   map file to play (defaults to <root>/map.json)",
        "",
        "controls: left/right move, up jumps, x dashes, esc quits",
    ]
    .join("\n")
}

pub(crate) fn build_app(args: GameArgs) -> Result<AppWiring, BootstrapError> {
    let paths = resolve_app_paths(args.root.as_deref())?;
    let map_path = args.map.unwrap_or_else(|| paths.default_map_path.clone());
    info!(
        root = %paths.root.display(),
        tiles_dir = %paths.tiles_dir.display(),
        map = %map_path.display(),
        "startup"
    );

    let config = LoopConfig {
        window_title: "ninja game".to_string(),
        ..LoopConfig::default()
    };
    let assets = TileAssets::load(&paths.tiles_dir, DEFAULT_TILE_KINDS);
    let session = PlatformerSession::load(
        &map_path,
        assets,
        (config.display_width, config.display_height),
    )?;

    Ok(AppWiring {
        config,
        session: Box::new(session),
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
