// Copyright (c) 2026 rezky_nightky

//! Cell, grid and scale derivation. Everything here is recomputed from its
//! inputs, never adjusted incrementally.

/// Logical layout of the rain grid.
///
/// Container and cell sizes are in CSS-style logical units; the scale maps
/// the `grid_cols x grid_rows` cell grid onto the surface's device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geometry {
    pub container_width: f64,
    pub container_height: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Geometry {
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.container_width = finite_or_zero(width);
        self.container_height = finite_or_zero(height);
    }

    /// `glyph_height` is the measured ascent + descent of a representative
    /// glyph in the current font.
    pub fn update_cell_size(&mut self, glyph_height: f64, space_x: f64, space_y: f64) {
        self.cell_width = finite_or_zero(space_x * glyph_height);
        self.cell_height = finite_or_zero(space_y * glyph_height);
    }

    pub fn update_grid_size(&mut self) {
        self.grid_cols = cell_count(self.container_width, self.cell_width);
        self.grid_rows = cell_count(self.container_height, self.cell_height);
    }

    /// `resolution` is the surface size in device pixels.
    pub fn update_scale(&mut self, resolution: (u32, u32)) {
        self.scale_x = ratio(
            resolution.0 as f64,
            self.cell_width * self.grid_cols as f64,
        );
        self.scale_y = ratio(
            resolution.1 as f64,
            self.cell_height * self.grid_rows as f64,
        );
    }

    /// The grid-to-pixel scale, or `None` when the grid spans no area and
    /// nothing can be drawn.
    pub fn scale(&self) -> Option<(f64, f64)> {
        if self.scale_x > 0.0 && self.scale_y > 0.0 {
            Some((self.scale_x, self.scale_y))
        } else {
            None
        }
    }

    /// Center of cell `(col, row)` in logical units.
    pub fn cell_center(&self, col: u32, row: i64) -> (f64, f64) {
        (
            (col as f64 + 0.5) * self.cell_width,
            (row as f64 + 0.5) * self.cell_height,
        )
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

fn cell_count(extent: f64, cell: f64) -> u32 {
    let n = (extent / cell).round();
    if n.is_finite() && n > 0.0 {
        n.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

fn ratio(pixels: f64, span: f64) -> f64 {
    let r = pixels / span;
    if r.is_finite() && r > 0.0 {
        r
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(w: f64, h: f64, cell_w: f64, cell_h: f64) -> Geometry {
        let mut g = Geometry::default();
        g.set_container_size(w, h);
        g.cell_width = cell_w;
        g.cell_height = cell_h;
        g.update_grid_size();
        g
    }

    #[test]
    fn grid_counts_round_container_over_cell() {
        let g = geometry(800.0, 600.0, 10.0, 20.0);
        assert_eq!((g.grid_cols, g.grid_rows), (80, 30));

        let g = geometry(805.0, 611.0, 10.0, 20.0);
        assert_eq!((g.grid_cols, g.grid_rows), (81, 31));
    }

    #[test]
    fn cell_size_scales_glyph_height_by_spacing() {
        let mut g = Geometry::default();
        g.update_cell_size(16.0, 1.5, 0.5);
        assert_eq!((g.cell_width, g.cell_height), (24.0, 8.0));
    }

    #[test]
    fn scale_maps_grid_onto_resolution() {
        let mut g = geometry(800.0, 600.0, 10.0, 20.0);
        g.update_scale((1600, 300));
        assert_eq!(g.scale(), Some((2.0, 0.5)));
        assert_eq!(g.cell_center(0, 0), (5.0, 10.0));
        assert_eq!(g.cell_center(3, -1), (35.0, -10.0));
    }

    #[test]
    fn degenerate_geometry_has_no_scale() {
        let mut g = geometry(0.0, 0.0, 10.0, 20.0);
        assert_eq!((g.grid_cols, g.grid_rows), (0, 0));
        g.update_scale((800, 600));
        assert_eq!(g.scale(), None);

        let mut g = geometry(800.0, 600.0, 0.0, 0.0);
        assert_eq!((g.grid_cols, g.grid_rows), (0, 0));
        g.update_scale((800, 600));
        assert_eq!(g.scale(), None);

        let mut g = geometry(800.0, 600.0, 10.0, 20.0);
        g.update_scale((0, 600));
        assert_eq!(g.scale(), None);
    }
}
