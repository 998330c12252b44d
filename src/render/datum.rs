use serde::{Deserialize, Serialize};

/// Final appearance of one tile: a glyph index plus foreground and background palette indices.
///
/// Palette index `0` is an ordinary color, not "transparent".
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderDatum {
    pub glyph: u16,
    pub fg: u8,
    pub bg: u8,
}

impl RenderDatum {
    pub const fn new(glyph: u16, fg: u8, bg: u8) -> Self {
        Self { glyph, fg, bg }
    }

    /// Packs both palette indices into one word as `(bg << 8) | fg`.
    pub fn style(&self) -> u16 {
        ((self.bg as u16) << 8) | self.fg as u16
    }

    pub fn from_style(glyph: u16, style: u16) -> Self {
        Self {
            glyph,
            fg: (style & 0xff) as u8,
            bg: (style >> 8) as u8,
        }
    }
}
