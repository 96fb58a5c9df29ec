// Copyright (c) 2026 rezky_nightky

use crate::color::Rgba;
use crate::font::Font;
use crate::gradient::LinearGradient;

/// A canvas-like drawing target with a fixed device-pixel resolution.
///
/// Coordinates passed to the fill methods are in user space: device pixels
/// multiplied by the current scale transform.
pub trait Surface {
    /// Size in device pixels.
    fn resolution(&self) -> (u32, u32);

    /// Resizes the surface. Existing content is discarded.
    fn set_resolution(&mut self, width: u32, height: u32);

    /// Ascent + descent of `glyph` rendered in `font`, in logical units.
    fn measure_glyph_height(&mut self, font: &Font, glyph: char) -> f64;

    /// Composites `color` over the rectangle with opacity `alpha`.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba, alpha: f64);

    fn set_scale(&mut self, sx: f64, sy: f64);

    fn reset_transform(&mut self);

    /// Draws `glyph` centered horizontally and vertically on `(x, y)`, filled
    /// with `paint` sampled in user space.
    fn fill_glyph(&mut self, glyph: char, x: f64, y: f64, paint: &LinearGradient, font: &Font);
}
