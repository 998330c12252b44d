use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::ops::{Add, Sub};

/// Integer position in the unbounded world grid.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotates this point around `origin` by `steps` quarter turns.
    ///
    /// Positive steps turn clockwise (screen coordinates, y grows downwards), negative steps
    /// counter-clockwise. Each step swaps the axes of the delta and then negates one of them.
    pub fn rotate_around(self, origin: Point, steps: i32) -> Point {
        let mut delta = self - origin;
        let sign = steps.signum();

        for _ in 0..steps.unsigned_abs() {
            delta = Point::new(delta.y, delta.x);
            if sign == 1 {
                delta.x = -delta.x;
            } else {
                delta.y = -delta.y;
            }
        }

        delta + origin
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight compass directions, in orientation-index order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
    ];

    /// Maps any orientation index onto a direction (wrapping modulo 8).
    pub fn from_index(index: usize) -> Direction {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit step taken when moving one tile in this direction.
    pub fn delta(self) -> Point {
        match self {
            Direction::NorthWest => Point::new(-1, -1),
            Direction::North => Point::new(0, -1),
            Direction::NorthEast => Point::new(1, -1),
            Direction::East => Point::new(1, 0),
            Direction::SouthEast => Point::new(1, 1),
            Direction::South => Point::new(0, 1),
            Direction::SouthWest => Point::new(-1, 1),
            Direction::West => Point::new(-1, 0),
        }
    }

    /// Turns by `diff` eighths; positive is clockwise.
    pub fn turn(self, diff: i32) -> Direction {
        let len = Self::ALL.len() as i32;
        let index = (self.index() as i32 + diff).rem_euclid(len);
        Self::ALL[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_point_around_origin() {
        let p = Point::new(2, -1);
        assert_eq!(p.rotate_around(Point::ORIGIN, 1), Point::new(1, 2));
        assert_eq!(p.rotate_around(Point::ORIGIN, -1), Point::new(-1, -2));
        assert_eq!(p.rotate_around(Point::ORIGIN, 2), Point::new(-2, 1));
        assert_eq!(p.rotate_around(Point::ORIGIN, -2), Point::new(-2, 1));
        assert_eq!(p.rotate_around(Point::ORIGIN, 0), p);
    }

    #[test]
    fn rotate_point_around_nonzero_origin() {
        let origin = Point::new(2, 2);
        assert_eq!(Point::new(0, 0).rotate_around(origin, 1), Point::new(4, 0));
        assert_eq!(Point::new(1, 2).rotate_around(origin, 1), Point::new(2, 1));
    }

    #[test]
    fn four_quarter_turns_is_identity() {
        let origin = Point::new(-3, 5);
        for p in [Point::new(7, -2), Point::new(0, 0), Point::new(-3, 5)] {
            assert_eq!(p.rotate_around(origin, 4), p);
            assert_eq!(p.rotate_around(origin, -4), p);
            assert_eq!(p.rotate_around(origin, 1).rotate_around(origin, -1), p);
        }
    }

    #[test]
    fn direction_turn_wraps() {
        assert_eq!(Direction::NorthWest.turn(-1), Direction::West);
        assert_eq!(Direction::West.turn(1), Direction::NorthWest);
        assert_eq!(Direction::North.turn(2), Direction::East);
        assert_eq!(Direction::from_index(9), Direction::North);
        assert_eq!(Direction::SouthEast.delta(), Point::new(1, 1));
    }
}
