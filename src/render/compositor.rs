//! Layered tile composition.
//!
//! The [`Compositor`] owns an ordered list of layers, each an ordered list of occupants. For
//! every viewport tile it forwards the datum of the topmost occupant covering it to the
//! [`TileSink`]. Every occupant record remembers the exact points it painted last time, so a
//! single occupant change costs its footprint size, not the viewport size. Only viewport
//! reconfiguration repaints everything.
//!
//! Priority: a higher layer index paints over a lower one; within a layer, the occupant
//! inserted last wins.
//!
//! ```
//! use std::sync::Arc;
//! use tileport::geometry::Point;
//! use tileport::occupant::Background;
//! use tileport::render::sinks::null::NullSink;
//! use tileport::render::{Compositor, RenderDatum, TileExtent, Viewport};
//!
//! # fn main() -> Result<(), tileport::EngineError> {
//! let mut compositor = Compositor::new(
//!     Viewport::new(Point::new(0, 0), TileExtent::new(9, 9)),
//!     Box::new(NullSink::new()),
//! );
//! compositor.add_occupant(Arc::new(Background::solid(RenderDatum::new(0, 0, 99))), 0)?;
//!
//! assert_eq!(compositor.resolve_topmost(Point::new(3, 3))?.bg, 99);
//! # Ok(()) }
//! ```

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::geometry::Point;
use crate::occupant::{Occupant, OccupantId};
use crate::render::sink::TileSink;
use crate::render::sinks::coalescing::CoalescingSink;
use crate::render::{RenderDatum, Viewport, ViewportConfig};
use std::sync::Arc;

/// An occupant together with the points it painted during the last pass.
struct OccupantRecord {
    occupant: Arc<dyn Occupant>,
    footprint: Vec<Point>,
}

pub struct Compositor {
    layers: Vec<Vec<OccupantRecord>>,
    viewport: Viewport,
    sink: Box<dyn TileSink>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("layers", &self.layers.iter().map(Vec::len).collect::<Vec<_>>())
            .field("viewport", &self.viewport)
            .field("sink", &self.sink.name())
            .finish()
    }
}

impl Compositor {
    /// Creates an empty compositor drawing `viewport` into `sink`.
    pub fn new(viewport: Viewport, mut sink: Box<dyn TileSink>) -> Self {
        sink.resize(viewport.tile_count());

        Self {
            layers: Vec::new(),
            viewport,
            sink,
        }
    }

    /// Creates a compositor from the engine configuration. With `coalesce_tiles` set, draws are
    /// held back until [`flush`](Self::flush).
    pub fn with_config(config: &EngineConfig, sink: Box<dyn TileSink>) -> Self {
        let viewport = Viewport::new(config.center, config.tile_count);
        if config.coalesce_tiles {
            Self::new(viewport, Box::new(CoalescingSink::new(sink)))
        } else {
            Self::new(viewport, sink)
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Occupant ids of a layer, bottom (first inserted) to top.
    pub fn layer(&self, index: usize) -> Vec<OccupantId> {
        self.layers
            .get(index)
            .map(|layer| layer.iter().map(|r| r.occupant.id()).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: OccupantId) -> bool {
        self.find(id).is_some()
    }

    pub fn occupant(&self, id: OccupantId) -> Option<Arc<dyn Occupant>> {
        let (l, i) = self.find(id)?;
        Some(self.layers[l][i].occupant.clone())
    }

    /// Points painted for `id` during its last pass.
    pub fn last_footprint(&self, id: OccupantId) -> Option<&[Point]> {
        let (l, i) = self.find(id)?;
        Some(&self.layers[l][i].footprint)
    }

    pub fn sink(&self) -> &dyn TileSink {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> &mut dyn TileSink {
        self.sink.as_mut()
    }

    /// Returns the sink as its concrete type, looking through a coalescing wrapper.
    pub fn sink_as<T: TileSink + 'static>(&self) -> Option<&T> {
        let any = self.sink.as_any();
        if let Some(sink) = any.downcast_ref::<T>() {
            return Some(sink);
        }
        any.downcast_ref::<CoalescingSink<Box<dyn TileSink>>>()
            .and_then(|c| c.inner().as_any().downcast_ref::<T>())
    }

    /// Appends `occupant` to `layer`, creating empty layers up to it, and paints its footprint.
    ///
    /// An id can be registered only once. When the first paint fails the record stays in place.
    pub fn add_occupant(&mut self, occupant: Arc<dyn Occupant>, layer: usize) -> Result<(), EngineError> {
        if self.contains(occupant.id()) {
            return Err(EngineError::DuplicateOccupant(occupant.id()));
        }
        while self.layers.len() <= layer {
            self.layers.push(Vec::new());
        }

        log::debug!("compositor: adding occupant {} to layer {}", occupant.id(), layer);
        let index = self.layers[layer].len();
        self.layers[layer].push(OccupantRecord {
            occupant,
            footprint: Vec::new(),
        });

        self.draw_record(layer, index)
    }

    /// Removes an occupant and repaints the cells it used to cover.
    ///
    /// Nothing changes when one of those cells is on screen and nothing else covers it: the
    /// call fails with `NoCoverage` and the occupant stays registered.
    pub fn remove_occupant(&mut self, id: OccupantId) -> Result<Arc<dyn Occupant>, EngineError> {
        let (l, i) = self.find(id).ok_or(EngineError::OccupantNotFound(id))?;

        let uncovered = self.layers[l][i]
            .footprint
            .iter()
            .copied()
            .filter(|p| self.viewport.contains(*p))
            .find(|p| self.resolve_except(*p, (l, i)).is_none());
        if let Some(point) = uncovered {
            return Err(EngineError::NoCoverage { x: point.x, y: point.y });
        }

        let record = self.layers[l].remove(i);

        log::debug!("compositor: removed occupant {} from layer {}", id, l);
        self.draw_points(&record.footprint)?;

        Ok(record.occupant)
    }

    /// Repaints an occupant after it changed: first the cells it painted last time (it may
    /// have left some of them), then its current footprint.
    pub fn mark_dirty(&mut self, id: OccupantId) -> Result<(), EngineError> {
        let (l, i) = self.find(id).ok_or(EngineError::OccupantNotFound(id))?;

        log::trace!("compositor: occupant {} dirty ({} stale points)", id, self.layers[l][i].footprint.len());
        let stale = self.layers[l][i].footprint.clone();
        self.draw_points(&stale)?;
        self.draw_record(l, i)
    }

    /// Paints every occupant's current footprint in layer and insertion order.
    pub fn repaint_all(&mut self) {
        for l in 0..self.layers.len() {
            for i in 0..self.layers[l].len() {
                self.paint_own(l, i);
            }
        }
    }

    /// Datum of the topmost occupant covering `point`.
    pub fn resolve_topmost(&self, point: Point) -> Result<RenderDatum, EngineError> {
        self.layers
            .iter()
            .rev()
            .flat_map(|layer| layer.iter().rev())
            .find_map(|record| record.occupant.query(point))
            .ok_or(EngineError::NoCoverage { x: point.x, y: point.y })
    }

    /// Recenters the viewport and repaints the whole window.
    pub fn set_center(&mut self, center: Point) {
        log::debug!("compositor: centering viewport on {}", center);
        self.viewport.set_center(center);
        self.repaint_all();
    }

    /// Applies a viewport reconfiguration. A new extent keeps the current center unless a new
    /// center is given as well.
    pub fn configure(&mut self, config: ViewportConfig) {
        if let Some(tile_count) = config.tile_count {
            log::debug!("compositor: resizing viewport to {}x{}", tile_count.width, tile_count.height);
            self.viewport.resize(tile_count);
            self.sink.resize(tile_count);
        }

        match config.center {
            Some(center) => self.set_center(center),
            None if config.tile_count.is_some() => self.repaint_all(),
            None => {}
        }
    }

    /// Ends a tick on the sink.
    pub fn flush(&mut self) {
        self.sink.flush();
    }

    fn find(&self, id: OccupantId) -> Option<(usize, usize)> {
        self.layers.iter().enumerate().find_map(|(l, layer)| {
            layer
                .iter()
                .position(|r| r.occupant.id() == id)
                .map(|i| (l, i))
        })
    }

    /// Topmost datum at `point`, ignoring the record at `skip`.
    fn resolve_except(&self, point: Point, skip: (usize, usize)) -> Option<RenderDatum> {
        self.layers
            .iter()
            .enumerate()
            .rev()
            .flat_map(|(l, layer)| layer.iter().enumerate().rev().map(move |(i, r)| ((l, i), r)))
            .filter(|(at, _)| *at != skip)
            .find_map(|(_, record)| record.occupant.query(point))
    }

    /// Asks the occupant for its current footprint and stores the covered points.
    fn refresh_footprint(&mut self, layer: usize, index: usize) -> Vec<(Point, RenderDatum)> {
        let occupant = self.layers[layer][index].occupant.clone();

        let mut covered = Vec::new();
        occupant.footprint(&self.viewport, &mut |point, datum| covered.push((point, datum)));

        self.layers[layer][index].footprint = covered.iter().map(|(point, _)| *point).collect();
        covered
    }

    /// Recomputes a record's footprint and paints what is visible on each of its points.
    fn draw_record(&mut self, layer: usize, index: usize) -> Result<(), EngineError> {
        for (point, _) in self.refresh_footprint(layer, index) {
            self.draw_point(point)?;
        }
        Ok(())
    }

    /// Recomputes a record's footprint and paints its own data over whatever is below.
    fn paint_own(&mut self, layer: usize, index: usize) {
        for (point, datum) in self.refresh_footprint(layer, index) {
            if let Some(local) = self.viewport.to_local(point) {
                self.sink.draw(local, datum);
            }
        }
    }

    fn draw_points(&mut self, points: &[Point]) -> Result<(), EngineError> {
        for &point in points {
            self.draw_point(point)?;
        }
        Ok(())
    }

    /// Forwards the visible datum at one point. Off-screen points are skipped before any lookup.
    fn draw_point(&mut self, point: Point) -> Result<(), EngineError> {
        let Some(local) = self.viewport.to_local(point) else {
            return Ok(());
        };

        let datum = self.resolve_topmost(point)?;
        self.sink.draw(local, datum);
        Ok(())
    }
}
