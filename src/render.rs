pub mod sink;

/// Tile sinks shipped with the crate.
pub mod sinks {
    pub mod coalescing;
    pub mod grid;
    pub mod null;
}

mod compositor;
mod datum;
mod handle;
mod tile_list;
mod viewport;

pub use compositor::Compositor;
pub use datum::RenderDatum;
pub use handle::{CompositorHandle, WeakCompositor};
pub use tile_list::{TileCommand, TileList};
pub use viewport::{LocalPoint, TileExtent, Viewport, ViewportConfig};
