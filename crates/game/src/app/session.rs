use std::path::Path;

use ninja_engine::{
    render_tilemap, EdgeKey, InputAction, InputSnapshot, LoopMetricsSnapshot, MapFileError, Rect,
    RenderTarget, Session, SessionCommand, TileAssets,
};
use tracing::{debug, info};

use super::enemy::Enemy;
use super::level::Level;
use super::physics::Player;

const SKY_COLOR: [u8; 4] = [14, 32, 46, 255];
const PLAYER_COLOR: [u8; 4] = [230, 230, 240, 255];
const ENEMY_COLOR: [u8; 4] = [200, 60, 70, 255];
/// Outline for tree canopies that shed leaves.
const CANOPY_COLOR: [u8; 4] = [120, 190, 90, 255];
/// Fraction of the remaining distance the camera covers each tick.
const CAMERA_EASE_DIVISOR: f64 = 30.0;

pub(crate) struct PlatformerSession {
    assets: TileAssets,
    initial_level: Level,
    level: Level,
    player: Player,
    enemies: Vec<Enemy>,
    scroll: (f64, f64),
    display_size: (u32, u32),
    restarts: u32,
}

impl PlatformerSession {
    pub(crate) fn load(
        map_path: &Path,
        assets: TileAssets,
        display_size: (u32, u32),
    ) -> Result<Self, MapFileError> {
        let level = Level::load(map_path)?;
        Ok(Self::from_level(level, assets, display_size))
    }

    pub(crate) fn from_level(level: Level, assets: TileAssets, display_size: (u32, u32)) -> Self {
        let player = Player::new(level.player_start);
        let enemies = level.enemy_starts.iter().copied().map(Enemy::new).collect();
        Self {
            assets,
            initial_level: level.clone(),
            level,
            player,
            enemies,
            scroll: (0.0, 0.0),
            display_size,
            restarts: 0,
        }
    }

    pub(crate) fn restarts(&self) -> u32 {
        self.restarts
    }

    fn restart(&mut self) {
        self.level = self.initial_level.clone();
        self.player = Player::new(self.level.player_start);
        self.enemies = self
            .level
            .enemy_starts
            .iter()
            .copied()
            .map(Enemy::new)
            .collect();
        self.scroll = (0.0, 0.0);
        self.restarts = self.restarts.saturating_add(1);
        info!(restarts = self.restarts, "level_restarted");
    }

    fn ease_camera(&mut self) {
        let center = self.player.body.rect().center();
        let half_width = f64::from(self.display_size.0) / 2.0;
        let half_height = f64::from(self.display_size.1) / 2.0;
        self.scroll.0 += (center.x - half_width - self.scroll.0) / CAMERA_EASE_DIVISOR;
        self.scroll.1 += (center.y - half_height - self.scroll.1) / CAMERA_EASE_DIVISOR;
    }

    /// Camera scroll truncated to whole pixels for drawing.
    fn render_offset(&self) -> (i32, i32) {
        (self.scroll.0 as i32, self.scroll.1 as i32)
    }
}

impl Session for PlatformerSession {
    fn update(&mut self, input: &InputSnapshot) -> SessionCommand {
        if input.quit_requested() {
            return SessionCommand::Quit;
        }

        let movement_x = f64::from(u8::from(input.is_down(InputAction::MoveRight)))
            - f64::from(u8::from(input.is_down(InputAction::MoveLeft)));
        if input.pressed(EdgeKey::Jump) && self.player.jump() {
            debug!(air_time = self.player.air_time(), "player_jumped");
        }
        if input.pressed(EdgeKey::Dash) && self.player.dash() {
            debug!("player_dashed");
        }

        for enemy in &mut self.enemies {
            enemy.update(&self.level.tilemap);
        }
        let kill_y = self.level.kill_y;
        self.enemies.retain(|enemy| enemy.body.pos.y <= kill_y);

        self.player.update(&self.level.tilemap, movement_x);
        self.ease_camera();

        if self.player.body.pos.y > kill_y {
            self.restart();
        }
        SessionCommand::Continue
    }

    fn render(&mut self, target: &mut RenderTarget<'_>) {
        let offset = self.render_offset();
        target.clear(SKY_COLOR);
        render_tilemap(&self.level.tilemap, &self.assets, target, offset);
        for canopy in &self.level.leaf_spawners {
            target.stroke_rect(
                canopy.x.floor() as i32 - offset.0,
                canopy.y.floor() as i32 - offset.1,
                canopy.width as u32,
                canopy.height as u32,
                CANOPY_COLOR,
            );
        }
        for enemy in &self.enemies {
            draw_body(target, enemy.body.rect(), offset, ENEMY_COLOR);
        }
        draw_body(target, self.player.body.rect(), offset, PLAYER_COLOR);
    }

    fn title(&self, metrics: &LoopMetricsSnapshot) -> Option<String> {
        Some(format!(
            "ninja game | enemies {} | {:.0} fps",
            self.enemies.len(),
            metrics.fps
        ))
    }

    fn shutdown(&mut self) {
        info!(restarts = self.restarts, "game_session_shutdown");
    }
}

fn draw_body(target: &mut RenderTarget<'_>, rect: Rect, offset: (i32, i32), color: [u8; 4]) {
    target.fill_rect(
        rect.x.floor() as i32 - offset.0,
        rect.y.floor() as i32 - offset.1,
        rect.width as u32,
        rect.height as u32,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ninja_engine::{GridPos, Tilemap, WorldPos};
    use tempfile::TempDir;

    const DISPLAY: (u32, u32) = (320, 240);

    fn arena() -> Tilemap {
        let mut tilemap = Tilemap::default();
        for x in 0..10 {
            tilemap.place("stone", 0, GridPos::new(x, 5));
        }
        tilemap.place("spawners", 0, GridPos::new(2, 3));
        tilemap.place("spawners", 1, GridPos::new(6, 4));
        tilemap
    }

    fn session_for(tilemap: Tilemap) -> PlatformerSession {
        PlatformerSession::from_level(Level::from_tilemap(tilemap), TileAssets::new(), DISPLAY)
    }

    fn idle_ticks(session: &mut PlatformerSession, ticks: usize) {
        for _ in 0..ticks {
            assert_eq!(
                session.update(&InputSnapshot::empty()),
                SessionCommand::Continue
            );
        }
    }

    #[test]
    fn load_seeds_player_and_enemies_from_saved_map() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("map.json");
        arena().save(&path).expect("save");

        let session = PlatformerSession::load(&path, TileAssets::new(), DISPLAY).expect("load");

        assert_eq!(session.player.body.pos, WorldPos::new(32.0, 48.0));
        assert_eq!(session.enemies.len(), 1);
        assert!(session.level.tilemap.grid_tile(GridPos::new(2, 3)).is_none());
    }

    #[test]
    fn player_lands_on_floor() {
        let mut session = session_for(arena());
        idle_ticks(&mut session, 120);

        assert_eq!(session.player.body.pos.y, 65.0);
        assert_eq!(session.player.air_time(), 0);
    }

    #[test]
    fn held_right_moves_player_right() {
        let mut session = session_for(arena());
        idle_ticks(&mut session, 60);
        let start_x = session.player.body.pos.x;

        let input = InputSnapshot::empty().with_action(InputAction::MoveRight);
        for _ in 0..10 {
            session.update(&input);
        }

        assert_eq!(session.player.body.pos.x, start_x + 10.0);
        assert!(!session.player.facing_left);
    }

    #[test]
    fn jump_edge_lifts_player() {
        let mut session = session_for(arena());
        idle_ticks(&mut session, 60);

        session.update(&InputSnapshot::empty().with_pressed(EdgeKey::Jump));

        assert!(session.player.body.pos.y < 65.0);
    }

    #[test]
    fn camera_eases_a_thirtieth_toward_player() {
        let mut session = session_for(arena());
        session.update(&InputSnapshot::empty());

        let center = session.player.body.rect().center();
        assert!((session.scroll.0 - (center.x - 160.0) / 30.0).abs() < 1e-9);
        assert!((session.scroll.1 - (center.y - 120.0) / 30.0).abs() < 1e-9);
    }

    #[test]
    fn falling_off_the_map_restarts_level() {
        let mut tilemap = Tilemap::default();
        tilemap.place("stone", 0, GridPos::new(0, 0));
        tilemap.place("spawners", 0, GridPos::new(5, 0));
        tilemap.place("spawners", 1, GridPos::new(8, 0));
        let mut session = session_for(tilemap);

        idle_ticks(&mut session, 200);

        assert!(session.restarts() >= 1);
        assert!(session.player.body.pos.y <= session.level.kill_y);
        assert_eq!(session.level, session.initial_level);
    }

    #[test]
    fn enemies_that_fall_away_are_dropped() {
        let mut tilemap = arena();
        tilemap.place("spawners", 1, GridPos::new(20, 0));
        let mut session = session_for(tilemap);
        assert_eq!(session.enemies.len(), 2);

        idle_ticks(&mut session, 150);

        assert_eq!(session.enemies.len(), 1);
    }

    #[test]
    fn escape_quits() {
        let mut session = session_for(arena());
        let command = session.update(&InputSnapshot::empty().with_quit_requested());
        assert_eq!(command, SessionCommand::Quit);
    }

    #[test]
    fn render_draws_player_over_background() {
        let mut session = session_for(arena());
        let mut frame = vec![0; 320 * 240 * 4];
        let mut target = RenderTarget::new(&mut frame, 320, 240).expect("target");

        session.render(&mut target);

        assert_eq!(target.pixel(33, 50), Some(PLAYER_COLOR));
        assert_eq!(target.pixel(300, 10), Some(SKY_COLOR));
    }

    #[test]
    fn render_outlines_tree_canopies() {
        let mut tilemap = arena();
        tilemap.place_off_grid("large_decor", 2, WorldPos::new(200.0, 20.0));
        let mut session = session_for(tilemap);
        let mut frame = vec![0; 320 * 240 * 4];
        let mut target = RenderTarget::new(&mut frame, 320, 240).expect("target");

        session.render(&mut target);

        assert_eq!(target.pixel(204, 24), Some(CANOPY_COLOR));
        assert_eq!(target.pixel(226, 36), Some(CANOPY_COLOR));
        assert_eq!(target.pixel(210, 30), Some(SKY_COLOR));
    }

    #[test]
    fn title_reports_enemies_and_fps() {
        let session = session_for(arena());
        let metrics = LoopMetricsSnapshot {
            fps: 59.6,
            ..LoopMetricsSnapshot::default()
        };
        assert_eq!(
            session.title(&metrics).as_deref(),
            Some("ninja game | enemies 1 | 60 fps")
        );
    }
}
