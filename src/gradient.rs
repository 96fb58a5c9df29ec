// Copyright (c) 2026 rezky_nightky

//! Foreground paint: color stops resolved from configuration and the linear
//! gradient they are laid out on.

use log::warn;
use serde::Deserialize;

use crate::color::{parse_color, Rgba};
use crate::config::Config;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Resolves the stop list: explicit gradient, else evenly spaced uniform
/// colors, else the solid color at offset 0.
pub fn color_stops(config: &Config) -> Vec<ColorStop> {
    if !config.gradient.is_empty() {
        return config.gradient.clone();
    }

    if config.uniform_gradient.is_empty() {
        return vec![ColorStop {
            offset: 0.0,
            color: config.color.clone(),
        }];
    }

    let base_offset = 1.0 / (config.uniform_gradient.len().saturating_sub(1)).max(1) as f64;
    config
        .uniform_gradient
        .iter()
        .enumerate()
        .map(|(i, color)| ColorStop {
            offset: i as f64 * base_offset,
            color: color.clone(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: (f64, f64),
    pub end: (f64, f64),
    stops: Vec<(f64, Rgba)>,
}

impl LinearGradient {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Gradient spanning the container along `orientation`, with every usable
    /// stop of `stops` added in order.
    pub fn oriented(
        orientation: Orientation,
        width: f64,
        height: f64,
        stops: &[ColorStop],
    ) -> Self {
        let end = match orientation {
            Orientation::Horizontal => (width, 0.0),
            Orientation::Vertical => (0.0, height),
        };
        let mut gradient = LinearGradient::new((0.0, 0.0), end);
        for stop in stops {
            gradient.add_color_stop(stop.offset, &stop.color);
        }
        gradient
    }

    /// Inserts after any stop with the same or a smaller offset. Stops with an
    /// offset outside [0, 1] or an unparsable color are rejected.
    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> bool {
        if !(0.0..=1.0).contains(&offset) {
            warn!("skipping gradient stop with offset {} outside [0, 1]", offset);
            return false;
        }
        let Some(rgba) = parse_color(color) else {
            warn!("skipping gradient stop with invalid color {:?}", color);
            return false;
        };
        let idx = self.stops.partition_point(|&(o, _)| o <= offset);
        self.stops.insert(idx, (offset, rgba));
        true
    }

    #[cfg(test)]
    fn stops(&self) -> &[(f64, Rgba)] {
        &self.stops
    }

    /// Paint color at `(x, y)`, or `None` where the gradient paints nothing:
    /// no stops, or a zero-length axis.
    pub fn color_at(&self, x: f64, y: f64) -> Option<Rgba> {
        let (first, last) = (self.stops.first()?, self.stops.last()?);
        let dx = self.end.0 - self.start.0;
        let dy = self.end.1 - self.start.1;
        let len2 = dx * dx + dy * dy;
        if !(len2 > 0.0) || !len2.is_finite() {
            return None;
        }

        let t = ((x - self.start.0) * dx + (y - self.start.1) * dy) / len2;
        if t < first.0 {
            return Some(first.1);
        }
        if t >= last.0 {
            return Some(last.1);
        }

        let idx = self.stops.partition_point(|&(o, _)| o <= t);
        let (lo, hi) = (self.stops[idx - 1], self.stops[idx]);
        let local = (t - lo.0) / (hi.0 - lo.0);
        Some(lo.1.lerp(hi.1, local as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    fn offsets(stops: &[ColorStop]) -> Vec<f64> {
        stops.iter().map(|s| s.offset).collect()
    }

    #[test]
    fn uniform_gradient_is_evenly_spaced() {
        let mut c = config();
        c.uniform_gradient = vec!["#f00".into(), "#0f0".into(), "#00f".into()];
        let stops = color_stops(&c);
        assert_eq!(offsets(&stops), vec![0.0, 0.5, 1.0]);
        let colors: Vec<&str> = stops.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["#f00", "#0f0", "#00f"]);
    }

    #[test]
    fn single_uniform_color_has_one_stop_at_zero() {
        let mut c = config();
        c.uniform_gradient = vec!["#abc".into()];
        let stops = color_stops(&c);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].offset, 0.0);
        assert_eq!(stops[0].color, "#abc");
    }

    #[test]
    fn explicit_gradient_wins_over_uniform_and_color() {
        let mut c = config();
        c.color = "#123456".into();
        c.uniform_gradient = vec!["#f00".into(), "#00f".into()];
        c.gradient = vec![ColorStop {
            offset: 0.3,
            color: "#fff".into(),
        }];
        assert_eq!(color_stops(&c), c.gradient);

        c.gradient.clear();
        assert_eq!(offsets(&color_stops(&c)), vec![0.0, 1.0]);

        c.uniform_gradient.clear();
        let stops = color_stops(&c);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].color, "#123456");
    }

    #[test]
    fn explicit_gradient_is_copied() {
        let mut c = config();
        c.gradient = vec![ColorStop {
            offset: 0.0,
            color: "#fff".into(),
        }];
        let stops = color_stops(&c);
        c.gradient[0].color = "#000".into();
        assert_eq!(stops[0].color, "#fff");
    }

    #[test]
    fn orientation_selects_axis() {
        let stops = [ColorStop {
            offset: 0.0,
            color: "#0f0".into(),
        }];
        let h = LinearGradient::oriented(Orientation::Horizontal, 800.0, 600.0, &stops);
        assert_eq!(h.end, (800.0, 0.0));
        let v = LinearGradient::oriented(Orientation::Vertical, 800.0, 600.0, &stops);
        assert_eq!(v.end, (0.0, 600.0));
        assert_eq!(v.start, (0.0, 0.0));
    }

    #[test]
    fn samples_between_stops() {
        let mut g = LinearGradient::new((0.0, 0.0), (100.0, 0.0));
        assert!(g.add_color_stop(0.0, "#000000"));
        assert!(g.add_color_stop(1.0, "#ff0000"));
        assert_eq!(g.color_at(-10.0, 0.0), Some(Rgba::rgb(0, 0, 0)));
        assert_eq!(g.color_at(50.0, 999.0).map(|c| c.to_rgb8()), Some((128, 0, 0)));
        assert_eq!(g.color_at(150.0, 0.0), Some(Rgba::rgb(255, 0, 0)));
    }

    #[test]
    fn out_of_order_stops_are_placed_by_offset() {
        let mut g = LinearGradient::new((0.0, 0.0), (10.0, 0.0));
        g.add_color_stop(1.0, "#00f");
        g.add_color_stop(0.0, "#f00");
        g.add_color_stop(0.0, "#0f0");
        let o: Vec<f64> = g.stops().iter().map(|s| s.0).collect();
        assert_eq!(o, vec![0.0, 0.0, 1.0]);
        assert_eq!(g.stops()[1].1, Rgba::rgb(0, 255, 0));
    }

    #[test]
    fn unusable_stops_and_degenerate_axis_paint_nothing() {
        let mut g = LinearGradient::new((0.0, 0.0), (10.0, 0.0));
        assert!(!g.add_color_stop(0.5, "nope"));
        assert!(!g.add_color_stop(1.5, "#fff"));
        assert_eq!(g.color_at(5.0, 0.0), None);

        let stops = [ColorStop {
            offset: 0.0,
            color: "#fff".into(),
        }];
        let flat = LinearGradient::oriented(Orientation::Horizontal, 0.0, 0.0, &stops);
        assert_eq!(flat.color_at(0.0, 0.0), None);
    }
}
