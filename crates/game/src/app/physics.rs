use ninja_engine::{Rect, Tilemap, WorldPos};

pub(crate) const GRAVITY: f64 = 0.1;
pub(crate) const MAX_FALL_SPEED: f64 = 5.0;
pub(crate) const JUMP_VELOCITY: f64 = -3.0;
pub(crate) const MAX_JUMPS: u32 = 2;
pub(crate) const PLAYER_SIZE: (f64, f64) = (8.0, 15.0);

const HORIZONTAL_DRAG: f64 = 0.1;
const DASH_TICKS: i32 = 60;
const DASH_BURST_TICKS: i32 = 50;
const DASH_SPEED: f64 = 8.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Collisions {
    pub(crate) up: bool,
    pub(crate) down: bool,
    pub(crate) left: bool,
    pub(crate) right: bool,
}

/// Axis-aligned body resolved against the solid tiles around its position,
/// one axis at a time. Gravity is applied before moving so a resting body
/// touches the ground on every tick.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Body {
    pub(crate) pos: WorldPos,
    pub(crate) size: (f64, f64),
    pub(crate) velocity: (f64, f64),
    collisions: Collisions,
}

impl Body {
    pub(crate) fn new(pos: WorldPos, size: (f64, f64)) -> Self {
        Self {
            pos,
            size,
            velocity: (0.0, 0.0),
            collisions: Collisions::default(),
        }
    }

    pub(crate) fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.0, self.size.1)
    }

    pub(crate) fn collisions(&self) -> Collisions {
        self.collisions
    }

    pub(crate) fn step(&mut self, tilemap: &Tilemap, movement: (f64, f64)) -> Collisions {
        self.collisions = Collisions::default();
        self.velocity.1 = (self.velocity.1 + GRAVITY).min(MAX_FALL_SPEED);
        let frame_movement = (movement.0 + self.velocity.0, movement.1 + self.velocity.1);

        self.pos.x += frame_movement.0;
        for tile_rect in tilemap.physics_rects_around(self.pos) {
            if !self.rect().intersects(&tile_rect) {
                continue;
            }
            if frame_movement.0 > 0.0 {
                self.pos.x = tile_rect.left() - self.size.0;
                self.collisions.right = true;
            } else if frame_movement.0 < 0.0 {
                self.pos.x = tile_rect.right();
                self.collisions.left = true;
            }
        }

        self.pos.y += frame_movement.1;
        for tile_rect in tilemap.physics_rects_around(self.pos) {
            if !self.rect().intersects(&tile_rect) {
                continue;
            }
            if frame_movement.1 > 0.0 {
                self.pos.y = tile_rect.top() - self.size.1;
                self.collisions.down = true;
            } else if frame_movement.1 < 0.0 {
                self.pos.y = tile_rect.bottom();
                self.collisions.up = true;
            }
        }

        if self.collisions.down || self.collisions.up {
            self.velocity.1 = 0.0;
        }
        self.collisions
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Player {
    pub(crate) body: Body,
    pub(crate) facing_left: bool,
    jumps_left: u32,
    air_time: u32,
    dashing: i32,
}

impl Player {
    pub(crate) fn new(pos: WorldPos) -> Self {
        Self {
            body: Body::new(pos, PLAYER_SIZE),
            facing_left: false,
            jumps_left: MAX_JUMPS,
            air_time: 0,
            dashing: 0,
        }
    }

    pub(crate) fn air_time(&self) -> u32 {
        self.air_time
    }

    pub(crate) fn update(&mut self, tilemap: &Tilemap, movement_x: f64) {
        if movement_x > 0.0 {
            self.facing_left = false;
        } else if movement_x < 0.0 {
            self.facing_left = true;
        }

        let collisions = self.body.step(tilemap, (movement_x, 0.0));
        self.air_time = self.air_time.saturating_add(1);
        if collisions.down {
            self.air_time = 0;
            self.jumps_left = MAX_JUMPS;
        }

        self.dashing -= self.dashing.signum();
        if self.dashing.abs() > DASH_BURST_TICKS {
            self.body.velocity.0 = f64::from(self.dashing.signum()) * DASH_SPEED;
            if self.dashing.abs() == DASH_BURST_TICKS + 1 {
                self.body.velocity.0 *= 0.1;
            }
        }

        let vx = self.body.velocity.0;
        self.body.velocity.0 = if vx > 0.0 {
            (vx - HORIZONTAL_DRAG).max(0.0)
        } else {
            (vx + HORIZONTAL_DRAG).min(0.0)
        };
    }

    /// Returns whether a jump was spent.
    pub(crate) fn jump(&mut self) -> bool {
        if self.jumps_left == 0 {
            return false;
        }
        self.jumps_left -= 1;
        self.body.velocity.1 = JUMP_VELOCITY;
        self.air_time = 5;
        true
    }

    /// Starts a dash unless one is already running. Returns whether it started.
    pub(crate) fn dash(&mut self) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.facing_left {
            -DASH_TICKS
        } else {
            DASH_TICKS
        };
        true
    }
}
