//! Occupants: anything that can be composed into the tile grid.
//!
//! The compositor and the world collections only ever talk to the [`Occupant`] capability;
//! concrete kinds ([`Entity`], [`Background`], or host types) are never inspected.

mod background;
mod entity;

pub use background::Background;
pub use entity::{Entity, Placement};

use crate::geometry::Point;
use crate::render::{RenderDatum, Viewport, WeakCompositor};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// A unique identifier for an occupant, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupantId(Uuid);

impl OccupantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OccupantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OccupantId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for OccupantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability of everything the compositor can layer.
pub trait Occupant: Send + Sync {
    fn id(&self) -> OccupantId;

    /// Render datum at `point` for the current placement, or `None` when not covered.
    fn query(&self, point: Point) -> Option<RenderDatum>;

    /// Calls `visit` once for every covered point of the current placement.
    ///
    /// `window` is the compositor's current viewport; occupants without a shape of their own
    /// (backgrounds) cover exactly that window.
    fn footprint(&self, window: &Viewport, visit: &mut dyn FnMut(Point, RenderDatum));

    /// Registration hook. The compositor hands over a weak reference on insertion and `None`
    /// on removal; occupants that mutate use it to report themselves dirty.
    fn attach(&self, _target: Option<WeakCompositor>) {}
}

/// Point-occupancy query against a collection of occupants.
pub trait OccupancyQuery {
    /// Is this occupant part of the collection?
    fn contains(&self, id: OccupantId) -> bool;

    /// Does any member cover `point`?
    fn is_occupied(&self, point: Point) -> bool;
}
