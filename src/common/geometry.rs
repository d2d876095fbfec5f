use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the (logically unbounded) grid. `y` grows to the north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(self, direction: Direction) -> Self {
        Self {
            x: self.x + direction.dx(),
            y: self.y + direction.dy(),
        }
    }

    pub fn subtract(self, direction: Direction) -> Self {
        Self {
            x: self.x - direction.dx(),
            y: self.y - direction.dy(),
        }
    }

    /// Squared euclidean distance. Computed in i64 so far-apart cells never overflow.
    pub fn distance_squared_to(self, other: Cell) -> i64 {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        dx * dx + dy * dy
    }

    /// Number of king moves between two cells.
    pub fn chebyshev_distance_to(self, other: Cell) -> i64 {
        let dx = (i64::from(other.x) - i64::from(self.x)).abs();
        let dy = (i64::from(other.y) - i64::from(self.y)).abs();
        dx.max(dy)
    }

    pub fn is_adjacent_to(self, other: Cell) -> bool {
        self != other && self.chebyshev_distance_to(other) == 1
    }

    /// Compass direction that best approximates the heading towards `other`.
    ///
    /// Sectors are 45° wide and centred on the compass points; the sector boundary
    /// tan(67.5°) ≈ 2.414 is evaluated in integer arithmetic.
    pub fn direction_to(self, other: Cell) -> Direction {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        let (adx, ady) = (dx.abs(), dy.abs());

        if adx * 1000 >= ady * 2414 {
            match dx {
                d if d > 0 => Direction::East,
                d if d < 0 => Direction::West,
                _ => Direction::Center,
            }
        } else if ady * 1000 >= adx * 2414 {
            if dy > 0 {
                Direction::North
            } else {
                Direction::South
            }
        } else if dy > 0 {
            if dx > 0 {
                Direction::NorthEast
            } else {
                Direction::NorthWest
            }
        } else if dx > 0 {
            Direction::SouthEast
        } else {
            Direction::SouthWest
        }
    }

    /// All eight neighbours, clockwise from north.
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        Direction::COMPASS.into_iter().map(move |d| self.add(d))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Returns the cell of `cells` closest to `target`; ties go to the earliest entry.
pub fn closest_cell<I>(cells: I, target: Cell) -> Option<Cell>
where
    I: IntoIterator<Item = Cell>,
{
    cells
        .into_iter()
        .fold(None, |best: Option<(Cell, i64)>, cell| {
            let distance = cell.distance_squared_to(target);
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((cell, distance)),
            }
        })
        .map(|(cell, _)| cell)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Center,
}

impl Direction {
    /// The eight movement directions in clockwise order.
    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const fn dx(self) -> i32 {
        match self {
            Direction::NorthEast | Direction::East | Direction::SouthEast => 1,
            Direction::SouthWest | Direction::West | Direction::NorthWest => -1,
            Direction::North | Direction::South | Direction::Center => 0,
        }
    }

    pub const fn dy(self) -> i32 {
        match self {
            Direction::NorthWest | Direction::North | Direction::NorthEast => 1,
            Direction::SouthWest | Direction::South | Direction::SouthEast => -1,
            Direction::West | Direction::East | Direction::Center => 0,
        }
    }

    fn compass_index(self) -> Option<usize> {
        Self::COMPASS.iter().position(|d| *d == self)
    }

    /// 45° clockwise. `Center` stays put.
    pub fn rotate_right(self) -> Self {
        match self.compass_index() {
            Some(i) => Self::COMPASS[(i + 1) % 8],
            None => Direction::Center,
        }
    }

    /// 45° counter-clockwise. `Center` stays put.
    pub fn rotate_left(self) -> Self {
        match self.compass_index() {
            Some(i) => Self::COMPASS[(i + 7) % 8],
            None => Direction::Center,
        }
    }

    pub fn opposite(self) -> Self {
        match self.compass_index() {
            Some(i) => Self::COMPASS[(i + 4) % 8],
            None => Direction::Center,
        }
    }

    /// The unit step leading from `from` to the adjacent cell `to`.
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        Self::COMPASS
            .into_iter()
            .find(|d| d.dx() == dx && d.dy() == dy)
    }
}
