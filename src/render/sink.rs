use std::any::Any;
use crate::render::{LocalPoint, RenderDatum, TileExtent};

/// Rasterization backend that consumes finalized tiles. Calls occur on the compositor's
/// owning thread.
///
/// A sink may apply draws immediately or hold them until [`flush`](TileSink::flush); either
/// way, once flushed it must show the last datum drawn for every cell.
pub trait TileSink: Send {
    /// Human readable name of the sink, used in log output.
    fn name(&self) -> &str;

    /// Draw one tile at a viewport-local position.
    fn draw(&mut self, at: LocalPoint, datum: RenderDatum);

    /// The viewport extent changed. A full repaint follows immediately.
    fn resize(&mut self, _tile_count: TileExtent) {}

    /// End of a scheduling tick: push out anything that has been held back.
    fn flush(&mut self) {}

    /// Allows hosts to get the concrete sink back from a compositor.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: TileSink + ?Sized> TileSink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn draw(&mut self, at: LocalPoint, datum: RenderDatum) {
        (**self).draw(at, datum)
    }

    fn resize(&mut self, tile_count: TileExtent) {
        (**self).resize(tile_count)
    }

    fn flush(&mut self) {
        (**self).flush()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        (**self).as_any_mut()
    }
}
