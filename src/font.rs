// Copyright (c) 2026 rezky_nightky

use log::warn;

const ROOT_FONT_PX: f64 = 16.0;

/// Font selected from a CSS `font` shorthand. Only the size and family are
/// kept; style and weight keywords are accepted and ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub size_px: f64,
    pub family: String,
}

impl Default for Font {
    /// The 2D canvas default, `10px sans-serif`.
    fn default() -> Self {
        Self {
            size_px: 10.0,
            family: "sans-serif".to_string(),
        }
    }
}

impl Font {
    pub fn parse(spec: &str) -> Option<Font> {
        let mut tokens = spec.split_whitespace();
        let mut size_px = None;
        for tok in tokens.by_ref() {
            // `16px/1.2` carries a line height we don't need.
            let size = tok.split('/').next().unwrap_or(tok);
            if let Some(px) = parse_size(size) {
                size_px = Some(px);
                break;
            }
        }
        let size_px = size_px?;
        let family = tokens.collect::<Vec<_>>().join(" ");
        if family.is_empty() || !(size_px > 0.0) {
            return None;
        }
        Some(Font { size_px, family })
    }

    /// Parses `spec`, keeping `current` when it is not a valid shorthand.
    pub fn parse_or_keep(spec: &str, current: &Font) -> Font {
        Font::parse(spec).unwrap_or_else(|| {
            warn!(
                "ignoring invalid font {:?}, keeping {}px {}",
                spec, current.size_px, current.family
            );
            current.clone()
        })
    }
}

fn parse_size(tok: &str) -> Option<f64> {
    const UNITS: [(&str, f64); 5] = [
        ("px", 1.0),
        ("rem", ROOT_FONT_PX),
        ("em", ROOT_FONT_PX),
        ("pt", 4.0 / 3.0),
        ("%", ROOT_FONT_PX / 100.0),
    ];
    let tok = tok.to_ascii_lowercase();
    for (unit, factor) in UNITS {
        if let Some(num) = tok.strip_suffix(unit) {
            let v: f64 = num.parse().ok()?;
            return v.is_finite().then_some(v * factor);
        }
    }
    None
}
