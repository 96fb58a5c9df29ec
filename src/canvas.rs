// Copyright (c) 2026 rezky_nightky

//! A [`Surface`] whose device pixels are terminal cells.

use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::color::{ColorMode, Rgba};
use crate::font::Font;
use crate::frame::Frame;
use crate::gradient::LinearGradient;
use crate::surface::Surface;

/// Ink this close to the cell background (largest channel difference) is
/// no longer visible and the glyph is dropped.
const ERASE_DISTANCE: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pixel {
    bg: Rgba,
    ink: Rgba,
    glyph: Option<char>,
}

const EMPTY: Pixel = Pixel {
    bg: Rgba::TRANSPARENT,
    ink: Rgba::TRANSPARENT,
    glyph: None,
};

/// Terminal cells treated as a canvas bitmap. Fills composite toward the
/// fill color; glyph ink fades along with the background under it.
#[derive(Clone, Debug)]
pub struct TermCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    scale: (f64, f64),
}

impl TermCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![EMPTY; width as usize * height as usize],
            scale: (1.0, 1.0),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Device-pixel span `[x0, x1) x [y0, y1)` of cells whose centers lie in
    /// the user-space rectangle.
    fn device_rect(&self, x: f64, y: f64, w: f64, h: f64) -> Option<(u32, u32, u32, u32)> {
        let (sx, sy) = self.scale;
        let xs = [x * sx, (x + w) * sx];
        let ys = [y * sy, (y + h) * sy];
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return None;
        }
        let span = |a: f64, b: f64, max: u32| {
            let lo = (a.min(b) - 0.5).ceil().clamp(0.0, max as f64) as u32;
            let hi = (a.max(b) - 0.5).ceil().clamp(0.0, max as f64) as u32;
            (lo, hi)
        };
        let (x0, x1) = span(xs[0], xs[1], self.width);
        let (y0, y1) = span(ys[0], ys[1], self.height);
        (x0 < x1 && y0 < y1).then_some((x0, x1, y0, y1))
    }

    fn is_wide_at(&self, x: u32, y: u32) -> bool {
        self.pixels[self.index(x, y)]
            .glyph
            .is_some_and(|g| glyph_cells(g) == 2)
    }

    #[cfg(test)]
    fn glyph_at(&self, x: u32, y: u32) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[self.index(x, y)].glyph
    }

    #[cfg(test)]
    fn background_at(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)].bg)
    }

    /// Writes the visible part of the canvas into `frame`, top-left aligned.
    /// Frame cells outside the canvas are blank with the terminal default
    /// background.
    pub fn present(&self, frame: &mut Frame, mode: ColorMode) {
        for y in 0..frame.height {
            for x in 0..frame.width {
                let (cx, cy) = (x as u32, y as u32);
                if cx >= self.width || cy >= self.height {
                    frame.set(x, y, Cell::blank(None));
                    continue;
                }

                let p = self.pixels[self.index(cx, cy)];
                let bg = visible(p.bg).and_then(|c| c.to_term(mode));
                if cx > 0 && self.is_wide_at(cx - 1, cy) {
                    frame.set(x, y, Cell::tail(bg));
                    continue;
                }

                let cell = match p.glyph {
                    // the second half would fall off the screen
                    Some(ch) if glyph_cells(ch) == 2 && x + 1 >= frame.width => Cell::blank(bg),
                    Some(ch) => Cell {
                        ch,
                        fg: p.ink.to_term(mode),
                        bg,
                        tail: false,
                    },
                    None => Cell::blank(bg),
                };
                frame.set(x, y, cell);
            }
        }
    }
}

/// Cells never painted keep the terminal's own background.
fn visible(c: Rgba) -> Option<Rgba> {
    (c.a > 0.0).then_some(c)
}

/// Number of terminal columns `ch` occupies. Zero for combining marks and
/// control characters, which cannot stand in a cell of their own.
pub fn glyph_cells(ch: char) -> u32 {
    UnicodeWidthChar::width(ch).map_or(0, |w| w.min(2) as u32)
}

impl Surface for TermCanvas {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_resolution(&mut self, width: u32, height: u32) {
        *self = TermCanvas::new(width, height);
    }

    /// Glyphs are as tall as the font's pixel size.
    fn measure_glyph_height(&mut self, font: &Font, _glyph: char) -> f64 {
        font.size_px
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba, alpha: f64) {
        let a = alpha.clamp(0.0, 1.0) as f32 * color.a;
        if !(a > 0.0) {
            return;
        }
        let Some((x0, x1, y0, y1)) = self.device_rect(x, y, width, height) else {
            return;
        };
        let solid = Rgba { a: 1.0, ..color };

        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.index(px, py);
                let p = &mut self.pixels[i];
                p.bg = p.bg.lerp(solid, a);
                if p.glyph.is_some() {
                    p.ink = p.ink.lerp(solid, a);
                    if p.ink.distance(p.bg) < ERASE_DISTANCE {
                        p.glyph = None;
                    }
                }
            }
        }
    }

    fn set_scale(&mut self, sx: f64, sy: f64) {
        self.scale = (self.scale.0 * sx, self.scale.1 * sy);
    }

    fn reset_transform(&mut self) {
        self.scale = (1.0, 1.0);
    }

    fn fill_glyph(&mut self, glyph: char, x: f64, y: f64, paint: &LinearGradient, _font: &Font) {
        let Some(color) = paint.color_at(x, y) else {
            return;
        };
        let (dx, dy) = (x * self.scale.0, y * self.scale.1);
        if !(color.a > 0.0) || !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let w = glyph_cells(glyph);
        if dx < 0.0 || dy < 0.0 || dx >= self.width as f64 || dy >= self.height as f64 {
            return;
        }
        if w == 0 || self.width < w {
            return;
        }

        let row = dy.floor() as u32;
        let col = (dx - w as f64 / 2.0)
            .floor()
            .clamp(0.0, (self.width - w) as f64) as u32;

        // a wide glyph to the left would overlap the new one
        if col > 0 && self.is_wide_at(col - 1, row) {
            let i = self.index(col - 1, row);
            self.pixels[i].glyph = None;
        }
        for c in col..col + w {
            let i = self.index(c, row);
            self.pixels[i].glyph = None;
        }

        let i = self.index(col, row);
        let p = &mut self.pixels[i];
        p.ink = p.bg.lerp(Rgba { a: 1.0, ..color }, color.a);
        p.glyph = Some(glyph);
    }
}
