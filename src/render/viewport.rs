//! Viewport definition for tile composition.
//!
//! A [`Viewport`] is the bounded window of world tiles that is forwarded to the sink. It is
//! defined by its top-left `offset` in world coordinates and its `tile_count` extent; the
//! center, left-top and right-bottom corners are derived from those two.
//!
//! # Examples
//!
//! Centering a window over the world origin:
//! ```
//! use tileport::geometry::Point;
//! use tileport::render::{TileExtent, Viewport};
//!
//! let vp = Viewport::new(Point::new(0, 0), TileExtent::new(5, 3));
//! assert_eq!(vp.left_top(), Point::new(-2, -1));
//! assert_eq!(vp.right_bottom(), Point::new(3, 2));
//! assert_eq!(vp.center(), Point::new(0, 0));
//! ```
//!
//! Mapping world points into the window:
//! ```
//! use tileport::geometry::Point;
//! use tileport::render::{LocalPoint, TileExtent, Viewport};
//!
//! let vp = Viewport::new(Point::new(10, 10), TileExtent::new(3, 3));
//! assert_eq!(vp.to_local(Point::new(9, 9)), Some(LocalPoint::new(0, 0)));
//! assert_eq!(vp.to_local(Point::new(12, 10)), None);
//! ```

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Size of the viewport in tiles.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileExtent {
    pub width: u16,
    pub height: u16,
}

impl TileExtent {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A tile position inside the viewport, relative to its top-left corner.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: u16,
    pub y: u16,
}

impl LocalPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Reconfiguration request for the compositor's viewport.
///
/// Supplying `tile_count` resizes (and always repaints everything); supplying only `center`
/// moves the window without resizing it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ViewportConfig {
    pub tile_count: Option<TileExtent>,
    pub center: Option<Point>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// World coordinate of the top-left tile.
    offset: Point,
    tile_count: TileExtent,
}

impl Viewport {
    /// Creates a viewport of `tile_count` tiles centered on `center`.
    pub fn new(center: Point, tile_count: TileExtent) -> Self {
        let mut vp = Self { offset: Point::ORIGIN, tile_count };
        vp.set_center(center);
        vp
    }

    pub fn tile_count(&self) -> TileExtent {
        self.tile_count
    }

    fn half(&self) -> Point {
        Point::new((self.tile_count.width >> 1) as i32, (self.tile_count.height >> 1) as i32)
    }

    pub fn center(&self) -> Point {
        self.offset + self.half()
    }

    pub fn set_center(&mut self, center: Point) {
        self.offset = center - self.half();
    }

    /// Changes the extent while keeping the current center.
    pub fn resize(&mut self, tile_count: TileExtent) {
        let center = self.center();
        self.tile_count = tile_count;
        self.set_center(center);
    }

    /// First (inclusive) world tile of the window.
    pub fn left_top(&self) -> Point {
        self.offset
    }

    /// Last (exclusive) world tile of the window.
    pub fn right_bottom(&self) -> Point {
        self.offset + Point::new(self.tile_count.width as i32, self.tile_count.height as i32)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.to_local(point).is_some()
    }

    /// Maps a world point into viewport-local coordinates, or `None` when it is off-screen.
    pub fn to_local(&self, point: Point) -> Option<LocalPoint> {
        let local = point - self.offset;
        if local.x < 0 || local.y < 0 {
            return None;
        }
        if local.x >= self.tile_count.width as i32 || local.y >= self.tile_count.height as i32 {
            return None;
        }
        Some(LocalPoint::new(local.x as u16, local.y as u16))
    }

    pub fn to_world(&self, local: LocalPoint) -> Point {
        self.offset + Point::new(local.x as i32, local.y as i32)
    }

    /// Every world point in the window, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let lt = self.left_top();
        let rb = self.right_bottom();
        (lt.y..rb.y).flat_map(move |y| (lt.x..rb.x).map(move |x| Point::new(x, y)))
    }
}
