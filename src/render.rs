// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::engine::RainState;
use crate::surface::Surface;

/// Glyph measured to size cells: it reaches both the ascender and the
/// descender.
pub const MEASURE_GLYPH: char = 'j';

/// Fills the whole surface in device pixels with the background. With
/// `use_alpha` the fill is translucent at the fade rate, leaving a trail of
/// the previous frame; otherwise it is opaque.
pub fn fill_background<S: Surface + ?Sized>(state: &RainState, surface: &mut S, use_alpha: bool) {
    let alpha = if use_alpha { state.fade_rate } else { 1.0 };
    let (width, height) = surface.resolution();
    surface.fill_rect(
        0.0,
        0.0,
        width as f64,
        height as f64,
        state.background,
        alpha,
    );
}

/// Paints one frame: fade, then one random glyph per drop at its cell center.
pub fn animate_next_frame<S: Surface + ?Sized, R: Rng + ?Sized>(
    state: &RainState,
    surface: &mut S,
    rng: &mut R,
) {
    fill_background(state, surface, true);

    let Some((sx, sy)) = state.geometry.scale() else {
        return;
    };
    if state.alphabet.is_empty() {
        return;
    }

    surface.set_scale(sx, sy);
    for drop in state.drops.iter() {
        let glyph = state.alphabet[rng.random_range(0..state.alphabet.len())];
        let (x, y) = state.geometry.cell_center(drop.col, drop.row);
        surface.fill_glyph(glyph, x, y, &state.foreground, &state.font);
    }
    surface.reset_transform();
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::color::Rgba;
    use crate::drops::RainDrop;
    use crate::surface::recording::{Op, RecordingSurface};

    fn state() -> RainState {
        let mut s = RainState::default();
        s.geometry.set_container_size(800.0, 600.0);
        s.geometry.update_cell_size(10.0, 1.0, 2.0);
        s.geometry.update_grid_size();
        s.geometry.update_scale((1600, 1200));
        s.alphabet = vec!['x'];
        s.fade_rate = 0.25;
        s.background = Rgba::rgb(1, 2, 3);
        s
    }

    #[test]
    fn frame_fades_then_draws_scaled_glyphs() {
        let mut s = state();
        s.drops.push(RainDrop { col: 0, row: 0 });
        s.drops.push(RainDrop { col: 4, row: 7 });
        let mut surface = RecordingSurface::new(1600, 1200, 10.0);
        let mut rng = StdRng::seed_from_u64(0);

        animate_next_frame(&s, &mut surface, &mut rng);

        assert_eq!(
            surface.ops,
            vec![
                Op::FillRect {
                    rect: (0.0, 0.0, 1600.0, 1200.0),
                    color: Rgba::rgb(1, 2, 3),
                    alpha: 0.25,
                },
                Op::Scale(2.0, 2.0),
                Op::Glyph {
                    glyph: 'x',
                    x: 5.0,
                    y: 10.0,
                },
                Op::Glyph {
                    glyph: 'x',
                    x: 45.0,
                    y: 150.0,
                },
                Op::ResetTransform,
            ]
        );
    }

    #[test]
    fn resolution_fill_is_opaque() {
        let s = state();
        let mut surface = RecordingSurface::new(1600, 1200, 10.0);
        fill_background(&s, &mut surface, false);
        assert_eq!(surface.fill_alphas(), vec![1.0]);
    }

    #[test]
    fn glyphs_come_from_the_alphabet() {
        let mut s = state();
        s.alphabet = vec!['a', 'b', 'c'];
        for col in 0..50 {
            s.drops.push(RainDrop { col, row: 1 });
        }
        let mut surface = RecordingSurface::new(1600, 1200, 10.0);
        let mut rng = StdRng::seed_from_u64(99);
        animate_next_frame(&s, &mut surface, &mut rng);
        let glyphs = surface.glyphs();
        assert_eq!(glyphs.len(), 50);
        assert!(glyphs.iter().all(|(g, _, _)| "abc".contains(*g)));
    }

    #[test]
    fn degenerate_geometry_only_fades() {
        let mut s = state();
        s.geometry.set_container_size(0.0, 0.0);
        s.geometry.update_grid_size();
        s.geometry.update_scale((1600, 1200));
        s.drops.push(RainDrop { col: 0, row: 0 });
        let mut surface = RecordingSurface::new(1600, 1200, 10.0);
        let mut rng = StdRng::seed_from_u64(0);
        animate_next_frame(&s, &mut surface, &mut rng);
        assert_eq!(surface.ops.len(), 1);
        assert_eq!(surface.fill_alphas(), vec![0.25]);
    }

    #[test]
    fn empty_alphabet_only_fades() {
        let mut s = state();
        s.alphabet.clear();
        s.drops.push(RainDrop { col: 0, row: 0 });
        let mut surface = RecordingSurface::new(1600, 1200, 10.0);
        let mut rng = StdRng::seed_from_u64(0);
        animate_next_frame(&s, &mut surface, &mut rng);
        assert!(surface.glyphs().is_empty());
        assert!(!surface.ops.contains(&Op::ResetTransform));
    }
}
