use ninja_engine::{Tilemap, WorldPos};

use super::physics::Body;

pub(crate) const ENEMY_SIZE: (f64, f64) = (8.0, 15.0);
const PATROL_SPEED: f64 = 0.5;
/// Horizontal reach of the ledge probe from the body center.
const LEDGE_PROBE_REACH: f64 = 7.0;
/// Vertical offset of the ledge probe from the body top; lands inside the
/// cell under the feet.
const LEDGE_PROBE_DEPTH: f64 = 23.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Enemy {
    pub(crate) body: Body,
    pub(crate) facing_left: bool,
}

impl Enemy {
    pub(crate) fn new(pos: WorldPos) -> Self {
        Self {
            body: Body::new(pos, ENEMY_SIZE),
            facing_left: false,
        }
    }

    /// Walks toward `facing_left`, turning around instead of stepping off a
    /// ledge or after bumping into a wall.
    pub(crate) fn update(&mut self, tilemap: &Tilemap) {
        let reach = if self.facing_left {
            -LEDGE_PROBE_REACH
        } else {
            LEDGE_PROBE_REACH
        };
        let probe = WorldPos::new(
            self.body.rect().center().x + reach,
            self.body.pos.y + LEDGE_PROBE_DEPTH,
        );

        let mut movement_x = 0.0;
        if tilemap.solid_check(probe).is_some() {
            let collisions = self.body.collisions();
            if collisions.left || collisions.right {
                self.facing_left = !self.facing_left;
            } else {
                movement_x = if self.facing_left {
                    -PATROL_SPEED
                } else {
                    PATROL_SPEED
                };
            }
        } else {
            self.facing_left = !self.facing_left;
        }

        self.body.step(tilemap, (movement_x, 0.0));
    }
}
