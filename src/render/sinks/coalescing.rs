use crate::render::sink::TileSink;
use crate::render::{LocalPoint, RenderDatum, TileExtent, TileList};
use std::any::Any;

/// Sink wrapper that holds draws back until the end of a scheduling tick.
///
/// Repeated draws of the same cell within one tick collapse into a single draw on the inner
/// sink, carrying the latest datum.
pub struct CoalescingSink<S: TileSink + 'static> {
    inner: S,
    pending: TileList,
}

impl<S: TileSink + 'static> CoalescingSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: TileList::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Number of cells waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn into_inner(mut self) -> S {
        self.flush();
        self.inner
    }
}

impl<S: TileSink + 'static> TileSink for CoalescingSink<S> {
    fn name(&self) -> &str {
        "CoalescingSink"
    }

    fn draw(&mut self, at: LocalPoint, datum: RenderDatum) {
        self.pending.add_command(at, datum);
    }

    fn resize(&mut self, tile_count: TileExtent) {
        // Local coordinates of the old extent mean nothing after a resize.
        self.pending.clear();
        self.inner.resize(tile_count);
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            self.inner.flush();
            return;
        }

        log::trace!("{}: flushing {} tiles to {}", self.name(), self.pending.len(), self.inner.name());
        for cmd in self.pending.drain() {
            self.inner.draw(cmd.at, cmd.datum);
        }
        self.inner.flush();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
