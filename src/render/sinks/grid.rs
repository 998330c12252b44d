use crate::render::sink::TileSink;
use crate::render::{LocalPoint, RenderDatum, TileExtent};
use std::any::Any;

/// In-memory frame that keeps the last datum drawn to every viewport cell.
///
/// Useful for tests and for hosts that rasterize a whole frame at once.
#[derive(Debug, Clone, Default)]
pub struct GridSink {
    tile_count: TileExtent,
    cells: Vec<Option<RenderDatum>>,
    draws: u64,
}

impl GridSink {
    pub fn new(tile_count: TileExtent) -> Self {
        Self {
            tile_count,
            cells: vec![None; tile_count.area()],
            draws: 0,
        }
    }

    pub fn tile_count(&self) -> TileExtent {
        self.tile_count
    }

    /// Last datum drawn at `at`, if that cell was ever drawn since the last resize.
    pub fn get(&self, at: LocalPoint) -> Option<RenderDatum> {
        self.index(at).and_then(|i| self.cells[i])
    }

    /// Row-major copy of the frame.
    pub fn snapshot(&self) -> Vec<Option<RenderDatum>> {
        self.cells.clone()
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Renders the frame as text, one line per row. Undrawn cells show as `?`.
    pub fn render_glyphs(&self, glyph: impl Fn(&RenderDatum) -> char) -> String {
        let width = self.tile_count.width.max(1) as usize;
        self.cells
            .chunks(width)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map(&glyph).unwrap_or('?'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn index(&self, at: LocalPoint) -> Option<usize> {
        if at.x >= self.tile_count.width || at.y >= self.tile_count.height {
            return None;
        }
        Some(at.y as usize * self.tile_count.width as usize + at.x as usize)
    }
}

impl TileSink for GridSink {
    fn name(&self) -> &str {
        "GridSink"
    }

    fn draw(&mut self, at: LocalPoint, datum: RenderDatum) {
        match self.index(at) {
            Some(i) => {
                self.cells[i] = Some(datum);
                self.draws += 1;
            }
            None => log::warn!("GridSink: draw outside frame at ({}, {})", at.x, at.y),
        }
    }

    fn resize(&mut self, tile_count: TileExtent) {
        self.tile_count = tile_count;
        self.cells = vec![None; tile_count.area()];
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_draw_per_cell() {
        let mut sink = GridSink::new(TileExtent::new(2, 2));
        sink.draw(LocalPoint::new(1, 0), RenderDatum::new(1, 0, 0));
        sink.draw(LocalPoint::new(1, 0), RenderDatum::new(2, 0, 0));
        sink.draw(LocalPoint::new(5, 5), RenderDatum::new(3, 0, 0));

        assert_eq!(sink.get(LocalPoint::new(1, 0)).map(|d| d.glyph), Some(2));
        assert_eq!(sink.get(LocalPoint::new(0, 0)), None);
        assert_eq!(sink.draws(), 2);
        assert_eq!(
            sink.render_glyphs(|d| char::from_digit(d.glyph as u32, 10).unwrap_or('#')),
            "?2\n??"
        );
    }

    #[test]
    fn resize_clears_frame() {
        let mut sink = GridSink::new(TileExtent::new(1, 1));
        sink.draw(LocalPoint::new(0, 0), RenderDatum::default());
        sink.resize(TileExtent::new(3, 1));

        assert_eq!(sink.snapshot(), vec![None; 3]);
    }
}
