//! Pending tile draws.
//!
//! A [`TileList`] collects [`TileCommand`]s between two flushes. Drawing the same cell twice
//! keeps only the latest datum, while the position of the first draw is kept so flushes replay
//! cells in the order they were first touched.
//!
//! # Example
//!
//! ```rust
//! use tileport::render::{LocalPoint, RenderDatum, TileList};
//!
//! let mut list = TileList::new();
//! list.add_command(LocalPoint::new(1, 1), RenderDatum::new(0, 0, 4));
//! list.add_command(LocalPoint::new(0, 0), RenderDatum::new(0, 0, 5));
//! list.add_command(LocalPoint::new(1, 1), RenderDatum::new(0, 0, 6));
//!
//! assert_eq!(list.len(), 2);
//! assert_eq!(list.items().next().unwrap().datum.bg, 6);
//! ```

use std::collections::HashMap;
use crate::render::{LocalPoint, RenderDatum};

/// A single tile draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCommand {
    /// Viewport-local cell
    pub at: LocalPoint,
    /// What to show there
    pub datum: RenderDatum,
}

#[derive(Debug, Clone, Default)]
pub struct TileList {
    /// Commands in first-touched order
    items: Vec<TileCommand>,
    /// Position of each cell in `items`
    index: HashMap<LocalPoint, usize>,
}

impl TileList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a draw, replacing any pending draw for the same cell.
    pub fn add_command(&mut self, at: LocalPoint, datum: RenderDatum) {
        match self.index.get(&at) {
            Some(&i) => self.items[i].datum = datum,
            None => {
                self.index.insert(at, self.items.len());
                self.items.push(TileCommand { at, datum });
            }
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &TileCommand> {
        self.items.iter()
    }

    /// Empties the list, handing out the pending commands.
    pub fn drain(&mut self) -> impl Iterator<Item = TileCommand> + '_ {
        self.index.clear();
        self.items.drain(..)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
