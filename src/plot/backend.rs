//! Drawing contracts the chart renders through

use crate::error::Result;
use crate::importance::FeatureScore;
use serde::{Deserialize, Serialize};

/// RGB color for chart elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from RGB components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex representation, "#rrggbb".
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Default bar palette, reused cyclically across chart elements
pub const DEFAULT_PALETTE: [Color; 5] = [
    Color::new(0x1f, 0x77, 0xb4),
    Color::new(0xff, 0x7f, 0x0e),
    Color::new(0x2c, 0xa0, 0x2c),
    Color::new(0xd6, 0x27, 0x28),
    Color::new(0x94, 0x67, 0xbd),
];

/// A surface bars can be drawn onto.
///
/// What a surface is (an image buffer, a window, a terminal grid) is up to
/// the backend; the chart only pushes geometry at it.
pub trait Surface {
    /// Draw one horizontal bar per entry, in series order, with the first
    /// entry at the base of the axis.
    fn draw_hbars(&mut self, bars: &[FeatureScore], color: Color) -> Result<()>;
}

/// Source of drawing surfaces.
///
/// Opening a surface fails with `RenderDisplayUnavailable` when the
/// environment cannot provide one, e.g. a headless session for a windowing
/// backend.
pub trait PlotBackend {
    /// Open a fresh drawing surface.
    fn new_surface(&mut self) -> Result<Box<dyn Surface>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        assert_eq!(Color::new(0x1f, 0x77, 0xb4).to_hex(), "#1f77b4");
        assert_eq!(Color::new(0, 0, 0).to_hex(), "#000000");
    }

    #[test]
    fn test_palette_colors_are_distinct() {
        for (i, a) in DEFAULT_PALETTE.iter().enumerate() {
            for b in DEFAULT_PALETTE.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
