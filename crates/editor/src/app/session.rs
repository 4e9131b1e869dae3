use std::path::PathBuf;

use ninja_engine::{
    render_tilemap, AssetProvider, EdgeKey, InputAction, InputSnapshot, LoopMetricsSnapshot,
    RenderTarget, Session, SessionCommand, TileAssets, Tilemap, WorldPos,
};
use tracing::{error, info};

use super::palette::Palette;

const BACKGROUND_COLOR: [u8; 4] = [0, 200, 200, 255];
const SCROLL_SPEED_PX: i32 = 2;
const PREVIEW_OPACITY: u8 = 100;
const BRUSH_SWATCH_POS: (i32, i32) = (5, 5);

pub(crate) struct EditorSession {
    tilemap: Tilemap,
    assets: TileAssets,
    palette: Palette,
    map_path: PathBuf,
    scroll: (i32, i32),
    on_grid: bool,
    cursor_px: Option<(i32, i32)>,
}

impl EditorSession {
    pub(crate) fn new(tilemap: Tilemap, assets: TileAssets, map_path: PathBuf) -> Self {
        let palette = Palette::from_assets(&assets);
        Self {
            tilemap,
            assets,
            palette,
            map_path,
            scroll: (0, 0),
            on_grid: true,
            cursor_px: None,
        }
    }

    pub(crate) fn tilemap_tile_size(&self) -> u32 {
        self.tilemap.tile_size()
    }

    fn cursor_world(&self) -> Option<WorldPos> {
        let (x, y) = self.cursor_px?;
        Some(WorldPos::new(
            f64::from(x + self.scroll.0),
            f64::from(y + self.scroll.1),
        ))
    }

    fn apply_scroll_wheel(&mut self, input: &InputSnapshot) {
        // Wheel up selects the previous entry.
        let delta = -input.scroll_steps();
        if delta == 0 {
            return;
        }
        if input.shift_down() {
            let count = self
                .palette
                .current()
                .map_or(0, |(kind, _)| self.assets.variant_count(kind));
            self.palette.cycle_variant(delta, count);
        } else {
            self.palette.cycle_group(delta);
        }
    }

    fn apply_key_commands(&mut self, input: &InputSnapshot) {
        if input.pressed(EdgeKey::ToggleGrid) {
            self.on_grid = !self.on_grid;
            info!(on_grid = self.on_grid, "grid_snap_toggled");
        }
        if input.pressed(EdgeKey::AutoTile) {
            let updated = self.tilemap.auto_tile();
            info!(updated, "auto_tile_applied");
        }
        if input.pressed(EdgeKey::Save) {
            if let Err(err) = self.tilemap.save(&self.map_path) {
                error!(error = %err, "map_save_failed");
            }
        }
    }

    fn apply_mouse(&mut self, input: &InputSnapshot) {
        let Some(world) = self.cursor_world() else {
            return;
        };
        let cell = self.tilemap.world_to_grid(world);

        if let Some((kind, variant)) = self.palette.current() {
            if self.on_grid && input.left_mouse_down() {
                self.tilemap.place(kind, variant, cell);
            } else if !self.on_grid && input.left_click_pressed() {
                self.tilemap.place_off_grid(kind, variant, world);
            }
        }

        if input.right_mouse_down() {
            self.tilemap.remove(cell);
            self.tilemap.remove_off_grid(world, &self.assets);
        }
    }

    fn preview_origin(&self, cursor: (i32, i32)) -> (i32, i32) {
        if !self.on_grid {
            return cursor;
        }
        let Some(world) = self.cursor_world() else {
            return cursor;
        };
        let corner = self.tilemap.grid_to_world(self.tilemap.world_to_grid(world));
        (
            corner.x as i32 - self.scroll.0,
            corner.y as i32 - self.scroll.1,
        )
    }
}

impl Session for EditorSession {
    fn update(&mut self, input: &InputSnapshot) -> SessionCommand {
        if input.quit_requested() {
            return SessionCommand::Quit;
        }

        let axis = |positive: InputAction, negative: InputAction| {
            i32::from(input.is_down(positive)) - i32::from(input.is_down(negative))
        };
        self.scroll.0 += axis(InputAction::MoveRight, InputAction::MoveLeft) * SCROLL_SPEED_PX;
        self.scroll.1 += axis(InputAction::MoveDown, InputAction::MoveUp) * SCROLL_SPEED_PX;
        self.cursor_px = input.cursor_position_px();

        self.apply_scroll_wheel(input);
        self.apply_key_commands(input);
        self.apply_mouse(input);
        SessionCommand::Continue
    }

    fn render(&mut self, target: &mut RenderTarget<'_>) {
        target.clear(BACKGROUND_COLOR);
        render_tilemap(&self.tilemap, &self.assets, target, self.scroll);

        let Some((kind, variant)) = self.palette.current() else {
            return;
        };
        let Some(image) = self.assets.image(kind, variant) else {
            return;
        };
        if let Some(cursor) = self.cursor_px {
            let (x, y) = self.preview_origin(cursor);
            target.blit(image, x, y, PREVIEW_OPACITY);
        }
        target.blit(image, BRUSH_SWATCH_POS.0, BRUSH_SWATCH_POS.1, u8::MAX);
    }

    fn title(&self, metrics: &LoopMetricsSnapshot) -> Option<String> {
        let brush = match self.palette.current() {
            Some((kind, variant)) => format!("{kind} {variant}"),
            None => "no tiles".to_string(),
        };
        let mode = if self.on_grid { "grid" } else { "free" };
        Some(format!("editor | {brush} | {mode} | {:.0} fps", metrics.fps))
    }

    fn shutdown(&mut self) {
        info!(
            grid_tiles = self.tilemap.grid_len(),
            off_grid_tiles = self.tilemap.off_grid_len(),
            "editor_session_shutdown"
        );
    }
}
