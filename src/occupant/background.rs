use crate::geometry::Point;
use crate::occupant::{Occupant, OccupantId};
use crate::render::{RenderDatum, Viewport};

type Fill = dyn Fn(Point) -> RenderDatum + Send + Sync;

/// Occupant covering every point of the world.
///
/// Placed on the bottom layer it guarantees that every viewport point resolves to something.
/// Its footprint is exactly the current viewport window.
pub struct Background {
    id: OccupantId,
    fill: Box<Fill>,
}

impl Background {
    pub fn new(fill: impl Fn(Point) -> RenderDatum + Send + Sync + 'static) -> Self {
        Self {
            id: OccupantId::new(),
            fill: Box::new(fill),
        }
    }

    /// Background of a single uniform datum.
    pub fn solid(datum: RenderDatum) -> Self {
        Self::new(move |_| datum)
    }
}

impl std::fmt::Debug for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Background").field("id", &self.id).finish()
    }
}

impl Occupant for Background {
    fn id(&self) -> OccupantId {
        self.id
    }

    fn query(&self, point: Point) -> Option<RenderDatum> {
        Some((self.fill)(point))
    }

    fn footprint(&self, window: &Viewport, visit: &mut dyn FnMut(Point, RenderDatum)) {
        for point in window.points() {
            visit(point, (self.fill)(point));
        }
    }
}
