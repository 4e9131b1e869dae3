/// Integer cell coordinate, independent of pixel size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a world-space point. Floors toward negative infinity, so
    /// `-0.5` lands in cell `-1`.
    pub fn from_world(world: WorldPos, tile_size: u32) -> Self {
        let size = f64::from(tile_size);
        Self {
            x: (world.x / size).floor() as i32,
            y: (world.y / size).floor() as i32,
        }
    }

    /// World position of the cell's top-left corner.
    pub fn to_world(self, tile_size: u32) -> WorldPos {
        let size = f64::from(tile_size);
        WorldPos {
            x: f64::from(self.x) * size,
            y: f64::from(self.y) * size,
        }
    }

    pub fn checked_offset(self, (dx, dy): (i32, i32)) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Continuous position in pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldPos {
    pub x: f64,
    pub y: f64,
}

impl WorldPos {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(f64, f64)> for WorldPos {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A tile snapped to the grid. `pos` always equals the cell it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridTile {
    pub kind: String,
    pub variant: u32,
    pub pos: GridPos,
}

/// A tile in continuous space: off-grid decor, or an extracted tile already
/// converted to world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldTile {
    pub kind: String,
    pub variant: u32,
    pub pos: WorldPos,
}

/// Axis-aligned rectangle in world pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> WorldPos {
        WorldPos {
            x: self.x + self.width * 0.5,
            y: self.y + self.height * 0.5,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not.
    pub fn contains_point(&self, point: WorldPos) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}
