//! Footprints: sparse rectangular cell grids anchored at an origin cell.
//!
//! A [`Footprint`] describes the shape of an occupant. Its `origin` is the cell that lands on
//! the occupant's logical position; every other cell is placed relative to it.
//!
//! ```
//! use tileport::geometry::{Footprint, Point};
//!
//! let arrow = Footprint::from_template("\nxoo\n", Point::new(0, 0), |ch| Some(ch));
//! let down = arrow.rotate(1);
//!
//! assert_eq!((down.width(), down.height()), (1, 3));
//! assert_eq!(down.get(0, 0), Some(&'x'));
//! assert_eq!(down.rotate(3), arrow);
//! ```

use crate::geometry::Point;
use crate::render::RenderDatum;
use serde::{Deserialize, Serialize};

/// Payload stored in an occupant footprint cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Type tag taken from the template character
    pub kind: char,
    /// What the cell looks like on screen
    pub datum: RenderDatum,
}

/// Deserialized footprints are checked to hold exactly `width * height` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FootprintData<T>")]
pub struct Footprint<T> {
    width: usize,
    height: usize,
    /// Row-major cells, `width * height` long
    cells: Vec<Option<T>>,
    origin: Point,
}

/// Unchecked wire form of a [`Footprint`].
#[derive(Deserialize)]
struct FootprintData<T> {
    width: usize,
    height: usize,
    cells: Vec<Option<T>>,
    origin: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FootprintError {
    #[error("a {width}x{height} footprint cannot hold {cells} cells")]
    CellCount { width: usize, height: usize, cells: usize },
}

impl<T> TryFrom<FootprintData<T>> for Footprint<T> {
    type Error = FootprintError;

    fn try_from(data: FootprintData<T>) -> Result<Self, Self::Error> {
        if data.width.checked_mul(data.height) != Some(data.cells.len()) {
            return Err(FootprintError::CellCount {
                width: data.width,
                height: data.height,
                cells: data.cells.len(),
            });
        }

        Ok(Self {
            width: data.width,
            height: data.height,
            cells: data.cells,
            origin: data.origin,
        })
    }
}

impl<T> Footprint<T> {
    /// Creates an empty footprint of the given size.
    pub fn new(width: usize, height: usize, origin: Point) -> Self {
        Self {
            width,
            height,
            cells: (0..width * height).map(|_| None).collect(),
            origin,
        }
    }

    /// Builds a footprint from (possibly ragged) rows. Short rows are padded with empty cells.
    pub fn from_rows(rows: Vec<Vec<Option<T>>>, origin: Point) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let pad = width - row.len();
            cells.extend(row);
            cells.extend((0..pad).map(|_| None));
        }

        Self { width, height, cells, origin }
    }

    /// Builds a footprint from a multi-line text template.
    ///
    /// Leading and trailing newlines are ignored, a space is always an empty cell and every
    /// other character is handed to `cell` to produce the payload.
    pub fn from_template(template: &str, origin: Point, mut cell: impl FnMut(char) -> Option<T>) -> Self {
        let rows = template
            .trim_matches('\n')
            .split('\n')
            .map(|line| {
                line.chars()
                    .map(|ch| if ch == ' ' { None } else { cell(ch) })
                    .collect()
            })
            .collect();

        Self::from_rows(rows, origin)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Grid coordinate of the anchor cell.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the payload at grid coordinate `(x, y)`, if any.
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        let index = self.index(x, y)?;
        self.cells[index].as_ref()
    }

    pub fn set(&mut self, x: i32, y: i32, value: Option<T>) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = value;
        }
    }

    /// Occupied cells in row-major (y, then x) order, in grid coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            let cell = cell.as_ref()?;
            let x = (index % self.width) as i32;
            let y = (index / self.width) as i32;
            Some((Point::new(x, y), cell))
        })
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

impl<T: Clone> Footprint<T> {
    /// Returns a copy rotated around its origin by `steps` quarter turns (positive is clockwise).
    ///
    /// The result is re-normalized so its top-left cell is `(0, 0)`; the origin moves along so
    /// it still marks the same cell.
    pub fn rotate(&self, steps: i32) -> Footprint<T> {
        if self.width == 0 || self.height == 0 {
            return self.clone();
        }

        let mut min = Point::new(i32::MAX, i32::MAX);
        let mut max = Point::new(i32::MIN, i32::MIN);
        let mut rotated = Vec::with_capacity(self.cells.len());

        for (index, cell) in self.cells.iter().enumerate() {
            let at = Point::new((index % self.width) as i32, (index / self.width) as i32);
            let to = at.rotate_around(self.origin, steps);
            min = Point::new(min.x.min(to.x), min.y.min(to.y));
            max = Point::new(max.x.max(to.x), max.y.max(to.y));
            rotated.push((to, cell));
        }

        let width = (max.x - min.x + 1) as usize;
        let height = (max.y - min.y + 1) as usize;
        let mut result = Footprint::new(width, height, self.origin - min);

        for (to, cell) in rotated {
            let at = to - min;
            result.set(at.x, at.y, cell.clone());
        }

        result
    }

    /// Derives `count` orientation variants from a set of base footprints.
    ///
    /// With `k` bases, variant `i` is base `i` itself for `i < k`, and otherwise base `i % k`
    /// rotated by `(i - i % k) / k` quarter turns. Two bases (diagonal and straight) give the
    /// usual eight-direction set.
    pub fn orientations(bases: &[Footprint<T>], count: usize) -> Vec<Footprint<T>> {
        if bases.is_empty() {
            return Vec::new();
        }

        let k = bases.len();
        (0..count)
            .map(|i| {
                let base = &bases[i % k];
                if i < k {
                    base.clone()
                } else {
                    base.rotate(((i - i % k) / k) as i32)
                }
            })
            .collect()
    }
}
