use crate::render::sink::TileSink;
use crate::render::{LocalPoint, RenderDatum, TileExtent};
use std::any::Any;

/// Sink that does not draw anything. It only counts what it is handed.
#[derive(Debug, Default)]
pub struct NullSink {
    draws: u64,
    flushes: u64,
    tile_count: TileExtent,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    pub fn tile_count(&self) -> TileExtent {
        self.tile_count
    }
}

impl TileSink for NullSink {
    fn name(&self) -> &str {
        "NullSink"
    }

    fn draw(&mut self, _at: LocalPoint, _datum: RenderDatum) {
        self.draws = self.draws.wrapping_add(1);
    }

    fn resize(&mut self, tile_count: TileExtent) {
        self.tile_count = tile_count;
    }

    fn flush(&mut self) {
        self.flushes = self.flushes.wrapping_add(1);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
