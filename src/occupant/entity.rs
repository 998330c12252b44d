use crate::errors::EngineError;
use crate::geometry::{Cell, Footprint, Point};
use crate::occupant::{OccupancyQuery, Occupant, OccupantId};
use crate::render::{RenderDatum, Viewport, WeakCompositor};
use std::sync::{PoisonError, RwLock};

/// Where an entity sits: its anchor position and which footprint variant is active.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Placement {
    pub position: Point,
    pub orientation: usize,
}

impl Placement {
    pub fn new(position: Point, orientation: usize) -> Self {
        Self { position, orientation }
    }
}

/// An occupant with one footprint per orientation.
///
/// Placement lives behind a lock so that an entity can be shared between the compositor (which
/// reads it while repainting) and the actor moving it. Every mutation reports the entity dirty
/// to the compositor it is registered with, if any.
pub struct Entity {
    id: OccupantId,
    variants: Vec<Footprint<Cell>>,
    placement: RwLock<Placement>,
    /// Compositor this entity is registered with
    target: RwLock<Option<WeakCompositor>>,
    /// Moving recenters the viewport on the entity instead of repainting its footprint
    centering: bool,
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("variants", &self.variants.len())
            .field("placement", &self.placement())
            .field("centering", &self.centering)
            .finish()
    }
}

impl Entity {
    /// Creates an entity at the world origin, facing orientation `0`.
    pub fn new(variants: Vec<Footprint<Cell>>) -> Self {
        Self {
            id: OccupantId::new(),
            variants,
            placement: RwLock::new(Placement::default()),
            target: RwLock::new(None),
            centering: false,
        }
    }

    /// Sets the initial placement without notifying anyone.
    pub fn with_placement(self, placement: Placement) -> Self {
        *self.placement.write().unwrap_or_else(PoisonError::into_inner) = placement;
        self
    }

    /// Makes the viewport follow this entity.
    pub fn centering(mut self) -> Self {
        self.centering = true;
        self
    }

    pub fn placement(&self) -> Placement {
        *self.placement.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn position(&self) -> Point {
        self.placement().position
    }

    pub fn orientation(&self) -> usize {
        self.placement().orientation
    }

    /// Number of orientation variants.
    pub fn orientations(&self) -> usize {
        self.variants.len()
    }

    /// Footprint used for `orientation` (wrapping around the available variants).
    pub fn variant(&self, orientation: usize) -> Option<&Footprint<Cell>> {
        if self.variants.is_empty() {
            return None;
        }
        self.variants.get(orientation % self.variants.len())
    }

    /// Render datum at `point` if the entity were placed at `placement`.
    pub fn query_at(&self, point: Point, placement: Placement) -> Option<RenderDatum> {
        let variant = self.variant(placement.orientation)?;
        let at = point - placement.position + variant.origin();
        variant.get(at.x, at.y).map(|cell| cell.datum)
    }

    /// Visits every point covered at `placement`, row by row.
    pub fn footprint_at(&self, placement: Placement, mut visit: impl FnMut(Point, RenderDatum)) {
        let Some(variant) = self.variant(placement.orientation) else {
            return;
        };

        let base = placement.position - variant.origin();
        for (at, cell) in variant.cells() {
            visit(at + base, cell.datum);
        }
    }

    /// Would the entity fit at `placement` in `world`?
    ///
    /// Points the entity itself covers right now are not checked, so it can always turn or
    /// move through its own cells. That exclusion only applies when `world` contains it.
    pub fn fits<W: OccupancyQuery + ?Sized>(&self, world: &W, placement: Placement) -> bool {
        let in_world = world.contains(self.id);
        let current = self.placement();
        let mut fits = true;

        self.footprint_at(placement, |point, _| {
            if !fits {
                return;
            }
            if in_world && self.query_at(point, current).is_some() {
                return;
            }
            if world.is_occupied(point) {
                fits = false;
            }
        });

        fits
    }

    pub fn set_position(&self, position: Point) -> Result<(), EngineError> {
        self.placement.write().unwrap_or_else(PoisonError::into_inner).position = position;
        self.notify(true)
    }

    pub fn set_orientation(&self, orientation: usize) -> Result<(), EngineError> {
        self.placement.write().unwrap_or_else(PoisonError::into_inner).orientation = orientation;
        self.notify(false)
    }

    /// Moves and turns in one step, with a single repaint.
    pub fn place(&self, placement: Placement) -> Result<(), EngineError> {
        let moved = {
            let mut current = self.placement.write().unwrap_or_else(PoisonError::into_inner);
            let moved = current.position != placement.position;
            *current = placement;
            moved
        };
        self.notify(moved)
    }

    fn notify(&self, moved: bool) -> Result<(), EngineError> {
        let target = self.target.read().unwrap_or_else(PoisonError::into_inner).clone();
        let Some(compositor) = target.and_then(|t| t.upgrade()) else {
            return Ok(());
        };

        let result = if self.centering && moved {
            let (id, position) = (self.id, self.position());
            compositor
                .with(|c| {
                    if !c.contains(id) {
                        return Err(EngineError::OccupantNotFound(id));
                    }
                    c.set_center(position);
                    Ok(())
                })
                .and_then(|inner| inner)
        } else {
            compositor.mark_dirty(self.id)
        };

        match result {
            // Removed behind our back: no longer registered, nothing to repaint.
            Err(EngineError::OccupantNotFound(id)) if id == self.id => {
                log::debug!("entity {}: compositor no longer holds it, detaching", id);
                self.attach(None);
                Ok(())
            }
            other => other,
        }
    }
}

impl Occupant for Entity {
    fn id(&self) -> OccupantId {
        self.id
    }

    fn query(&self, point: Point) -> Option<RenderDatum> {
        self.query_at(point, self.placement())
    }

    fn footprint(&self, _window: &Viewport, visit: &mut dyn FnMut(Point, RenderDatum)) {
        self.footprint_at(self.placement(), visit)
    }

    fn attach(&self, target: Option<WeakCompositor>) {
        *self.target.write().unwrap_or_else(PoisonError::into_inner) = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Compositor, CompositorHandle, LocalPoint, TileExtent};
    use crate::render::sinks::grid::GridSink;
    use crate::occupant::Background;
    use std::sync::Arc;

    const HULL: RenderDatum = RenderDatum::new(1, 0, 179);
    const WATER: RenderDatum = RenderDatum::new(0, 0, 99);

    fn hull(template: &str, origin: Point) -> Footprint<Cell> {
        Footprint::from_template(template, origin, |kind| Some(Cell { kind, datum: HULL }))
    }

    /// Straight two-tile boat anchored at its stern.
    fn boat() -> Entity {
        let straight = hull("1\n1", Point::new(0, 1));
        Entity::new(Footprint::orientations(&[straight], 4))
    }

    struct Members<'a>(Vec<&'a Entity>);

    impl OccupancyQuery for Members<'_> {
        fn contains(&self, id: OccupantId) -> bool {
            self.0.iter().any(|e| e.id == id)
        }

        fn is_occupied(&self, point: Point) -> bool {
            self.0.iter().any(|e| e.query(point).is_some())
        }
    }

    #[test]
    fn query_and_footprint_follow_placement() {
        let entity = boat().with_placement(Placement::new(Point::new(5, 5), 0));

        assert_eq!(entity.query(Point::new(5, 5)), Some(HULL));
        assert_eq!(entity.query(Point::new(5, 4)), Some(HULL));
        assert_eq!(entity.query(Point::new(5, 6)), None);

        let mut points = Vec::new();
        entity.footprint_at(entity.placement(), |p, _| points.push(p));
        assert_eq!(points, vec![Point::new(5, 4), Point::new(5, 5)]);

        // A quarter turn clockwise points the bow east.
        let mut points = Vec::new();
        entity.footprint_at(Placement::new(Point::new(5, 5), 1), |p, _| points.push(p));
        assert_eq!(points, vec![Point::new(5, 5), Point::new(6, 5)]);
    }

    #[test]
    fn orientation_wraps_over_variants() {
        let entity = boat();
        assert_eq!(entity.orientations(), 4);
        assert_eq!(entity.variant(5), entity.variant(1));
    }

    #[test]
    fn standing_still_always_fits() {
        let entity = boat().with_placement(Placement::new(Point::new(0, 0), 0));
        let world = Members(vec![&entity]);

        assert!(entity.fits(&world, entity.placement()));
        // Turning sweeps over the stern, which the boat already holds.
        assert!(entity.fits(&world, Placement::new(Point::new(0, 0), 2)));
    }

    #[test]
    fn blocked_by_other_members() {
        let a = boat().with_placement(Placement::new(Point::new(0, 0), 0));
        let b = boat().with_placement(Placement::new(Point::new(1, 0), 0));
        let world = Members(vec![&a, &b]);

        assert!(!a.fits(&world, Placement::new(Point::new(1, 0), 0)));
        assert!(!a.fits(&world, Placement::new(Point::new(0, 0), 1)));
        assert!(a.fits(&world, Placement::new(Point::new(-1, 0), 0)));
    }

    #[test]
    fn self_overlap_only_excluded_when_member() {
        let entity = boat().with_placement(Placement::new(Point::new(0, 0), 0));
        let other = boat().with_placement(Placement::new(Point::new(0, 0), 0));
        // `entity` is not a member, so its own cells (held by `other`) block it.
        let world = Members(vec![&other]);

        assert!(!entity.fits(&world, entity.placement()));
    }

    #[test]
    fn unregistered_entity_mutates_silently() {
        let entity = boat();
        entity.set_position(Point::new(3, 3)).unwrap();
        entity.set_orientation(2).unwrap();
        assert_eq!(entity.placement(), Placement::new(Point::new(3, 3), 2));
    }

    #[test]
    fn mutation_repaints_through_compositor() {
        let extent = TileExtent::new(5, 5);
        let compositor = CompositorHandle::new(Compositor::new(
            Viewport::new(Point::ORIGIN, extent),
            Box::new(GridSink::new(extent)),
        ));
        compositor.add_occupant(Arc::new(Background::solid(WATER)), 0).unwrap();

        let entity = Arc::new(boat());
        compositor.add_occupant(entity.clone(), 1).unwrap();
        entity.set_position(Point::new(1, 1)).unwrap();

        compositor
            .with(|c| {
                let grid = c.sink_as::<GridSink>().unwrap();
                // (0, 0) and (0, -1) were left behind, (1, 1) and (1, 0) are now hull.
                assert_eq!(grid.get(LocalPoint::new(2, 2)), Some(WATER));
                assert_eq!(grid.get(LocalPoint::new(2, 1)), Some(WATER));
                assert_eq!(grid.get(LocalPoint::new(3, 3)), Some(HULL));
                assert_eq!(grid.get(LocalPoint::new(3, 2)), Some(HULL));
            })
            .unwrap();

        compositor.remove_occupant(entity.id()).unwrap();
        // Detached: no compositor to notify anymore.
        entity.set_position(Point::new(0, 0)).unwrap();
        assert!(!compositor.contains(entity.id()).unwrap());
    }

    #[test]
    fn removal_without_handle_detaches_on_next_move() {
        let extent = TileExtent::new(5, 5);
        let compositor = CompositorHandle::new(Compositor::new(
            Viewport::new(Point::ORIGIN, extent),
            Box::new(GridSink::new(extent)),
        ));
        compositor.add_occupant(Arc::new(Background::solid(WATER)), 0).unwrap();

        let plain = Arc::new(boat());
        let follower = Arc::new(boat().centering());
        compositor.add_occupant(plain.clone(), 1).unwrap();
        compositor.add_occupant(follower.clone(), 1).unwrap();
        compositor.with(|c| c.remove_occupant(plain.id())).unwrap().unwrap();
        compositor.with(|c| c.remove_occupant(follower.id())).unwrap().unwrap();

        plain.set_position(Point::new(1, 1)).unwrap();
        follower.set_position(Point::new(20, 20)).unwrap();
        plain.set_orientation(1).unwrap();

        assert_eq!(compositor.viewport().unwrap().center(), Point::ORIGIN);
        assert!(plain.target.read().unwrap().is_none());
        assert!(follower.target.read().unwrap().is_none());
    }

    #[test]
    fn centering_entity_moves_viewport() {
        let extent = TileExtent::new(3, 3);
        let compositor = CompositorHandle::new(Compositor::new(
            Viewport::new(Point::ORIGIN, extent),
            Box::new(GridSink::new(extent)),
        ));
        compositor.add_occupant(Arc::new(Background::solid(WATER)), 0).unwrap();

        let entity = Arc::new(boat().centering());
        compositor.add_occupant(entity.clone(), 1).unwrap();
        entity.set_position(Point::new(10, -4)).unwrap();

        assert_eq!(compositor.viewport().unwrap().center(), Point::new(10, -4));
        compositor
            .with(|c| {
                let grid = c.sink_as::<GridSink>().unwrap();
                assert_eq!(grid.get(LocalPoint::new(1, 1)), Some(HULL));
                assert_eq!(grid.get(LocalPoint::new(1, 0)), Some(HULL));
                assert_eq!(grid.get(LocalPoint::new(1, 2)), Some(WATER));
            })
            .unwrap();
    }
}
