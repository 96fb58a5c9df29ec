// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::warn;
use serde::Deserialize;

use crate::alphabet::{alphabet_preset, DEFAULT_ALPHABET, PRESETS};
use crate::gradient::{ColorStop, Orientation};

pub const DEFAULT_COLOR: &str = "#00ff00";
pub const DEFAULT_BACKGROUND: &str = "#000000";
pub const DEFAULT_FONT: &str = "1.0rem monospace";

/// Accepted `(min, max)` of numeric settings. Props outside are clamped when
/// resolved; command-line flags outside are rejected.
pub const DENSITY_RANGE: (f64, f64) = (0.0, 1.0);
pub const DRY_RATE_RANGE: (f64, f64) = (0.0, 1000.0);
pub const FADE_RATE_RANGE: (f64, f64) = (0.0, 1.0);
pub const SPACE_RANGE: (f64, f64) = (0.1, 10.0);
pub const MAX_RESOLUTION: u32 = 4096;

/// Fully resolved rain configuration. Replaced wholesale on every update.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub color: String,
    pub gradient: Vec<ColorStop>,
    pub uniform_gradient: Vec<String>,
    pub gradient_orientation: Orientation,
    pub background_color: String,
    pub alphabet: String,
    pub font: String,
    pub space_x: f64,
    pub space_y: f64,
    pub density: f64,
    /// Milliseconds per simulation tick.
    pub delay: f64,
    pub dry_rate: f64,
    pub fade_rate: f64,
    pub resolution_x: u32,
    pub resolution_y: u32,
    /// Stacking order for hosts that layer the surface; the terminal host
    /// has a single layer and ignores it.
    pub z_index: i32,
}

impl Default for Config {
    /// Defaults with a zero resolution; hosts resolve it through
    /// [`Props::resolve`] with their display size.
    fn default() -> Self {
        Props::default().resolve((0, 0))
    }
}

/// Partial configuration as supplied by a host. Omitted fields fall back to
/// defaults when resolved.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Props {
    pub color: Option<String>,
    pub gradient: Option<Vec<ColorStop>>,
    pub uniform_gradient: Option<Vec<String>>,
    pub gradient_orientation: Option<Orientation>,
    pub background_color: Option<String>,
    pub alphabet: Option<String>,
    pub font: Option<String>,
    pub space_x: Option<f64>,
    pub space_y: Option<f64>,
    pub density: Option<f64>,
    pub delay: Option<f64>,
    pub dry_rate: Option<f64>,
    pub fade_rate: Option<f64>,
    pub resolution_x: Option<u32>,
    pub resolution_y: Option<u32>,
    pub z_index: Option<i32>,
}

impl Props {
    pub fn from_json(s: &str) -> Result<Props, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Parses a JSON object, optionally prefixed with `?` as in a page query
    /// string. Malformed input yields empty props.
    pub fn from_query_or_default(s: &str) -> Props {
        let s = s.trim();
        let s = s.strip_prefix('?').unwrap_or(s);
        Props::from_json(s).unwrap_or_else(|e| {
            warn!("ignoring malformed props ({}), using defaults", e);
            Props::default()
        })
    }

    /// Overlays every field set in `other` on top of `self`.
    pub fn merge(self, other: Props) -> Props {
        Props {
            color: other.color.or(self.color),
            gradient: other.gradient.or(self.gradient),
            uniform_gradient: other.uniform_gradient.or(self.uniform_gradient),
            gradient_orientation: other.gradient_orientation.or(self.gradient_orientation),
            background_color: other.background_color.or(self.background_color),
            alphabet: other.alphabet.or(self.alphabet),
            font: other.font.or(self.font),
            space_x: other.space_x.or(self.space_x),
            space_y: other.space_y.or(self.space_y),
            density: other.density.or(self.density),
            delay: other.delay.or(self.delay),
            dry_rate: other.dry_rate.or(self.dry_rate),
            fade_rate: other.fade_rate.or(self.fade_rate),
            resolution_x: other.resolution_x.or(self.resolution_x),
            resolution_y: other.resolution_y.or(self.resolution_y),
            z_index: other.z_index.or(self.z_index),
        }
    }

    pub fn resolve(self, display: (u32, u32)) -> Config {
        let alphabet = self
            .alphabet
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_ALPHABET.to_string());

        Config {
            color: self.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            gradient: self.gradient.unwrap_or_default(),
            uniform_gradient: self.uniform_gradient.unwrap_or_default(),
            gradient_orientation: self.gradient_orientation.unwrap_or_default(),
            background_color: self
                .background_color
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            alphabet,
            font: self.font.unwrap_or_else(|| DEFAULT_FONT.to_string()),
            space_x: in_range("spaceX", self.space_x, 1.0, SPACE_RANGE),
            space_y: in_range("spaceY", self.space_y, 1.0, SPACE_RANGE),
            density: in_range("density", self.density, 0.02, DENSITY_RANGE),
            delay: in_range("delay", self.delay, 50.0, (f64::MIN, f64::MAX)),
            dry_rate: in_range("dryRate", self.dry_rate, 1.0, DRY_RATE_RANGE),
            fade_rate: in_range("fadeRate", self.fade_rate, 0.1, FADE_RATE_RANGE),
            resolution_x: resolution("resolutionX", self.resolution_x, display.0),
            resolution_y: resolution("resolutionY", self.resolution_y, display.1),
            z_index: self.z_index.unwrap_or(-1),
        }
    }
}

/// `value` clamped into `range`; a non-finite value falls back to `default`.
fn in_range(name: &str, value: Option<f64>, default: f64, range: (f64, f64)) -> f64 {
    let Some(v) = value else {
        return default;
    };
    if !v.is_finite() {
        warn!("{} {} is not a finite number, using {}", name, v, default);
        return default;
    }
    let clamped = v.clamp(range.0, range.1);
    if clamped != v {
        warn!("{} {} out of range, clamped to {}", name, v, clamped);
    }
    clamped
}

fn resolution(name: &str, value: Option<u32>, display: u32) -> u32 {
    let v = value.unwrap_or(display);
    if v > MAX_RESOLUTION {
        warn!("{} {} exceeds {}, clamped", name, v, MAX_RESOLUTION);
    }
    v.min(MAX_RESOLUTION)
}

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// `OFFSET:COLOR`, e.g. `0.5:#00ff00`.
impl FromStr for ColorStop {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (offset, color) = s
            .split_once(':')
            .ok_or_else(|| "expected: OFFSET:COLOR".to_string())?;
        let offset: f64 = offset
            .trim()
            .parse()
            .map_err(|_| "invalid offset".to_string())?;
        let color = color.trim();
        if color.is_empty() {
            return Err("missing color".to_string());
        }
        Ok(ColorStop {
            offset,
            color: color.to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "matrix-rain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'p',
        long = "props",
        help_heading = "GENERAL",
        help = "Configuration as a JSON object (a leading '?' is ignored)"
    )]
    pub props: Option<String>,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write log records to this file (filter via RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        short = 'c',
        long = "color",
        help_heading = "APPEARANCE",
        help = "Text color, CSS notation (default #00ff00)"
    )]
    pub color: Option<String>,

    #[arg(
        short = 'g',
        long = "gradient",
        value_name = "OFFSET:COLOR",
        help_heading = "APPEARANCE",
        help = "Gradient stop, repeatable; overrides --uniform-gradient and --color"
    )]
    pub gradient: Vec<ColorStop>,

    #[arg(
        short = 'u',
        long = "uniform-gradient",
        value_name = "COLOR",
        help_heading = "APPEARANCE",
        help = "Evenly spaced gradient color, repeatable; overrides --color"
    )]
    pub uniform_gradient: Vec<String>,

    #[arg(
        short = 'o',
        long = "orientation",
        value_enum,
        help_heading = "APPEARANCE",
        help = "Gradient orientation"
    )]
    pub orientation: Option<Orientation>,

    #[arg(
        short = 'B',
        long = "background",
        help_heading = "APPEARANCE",
        help = "Background color, CSS notation (default #000000)"
    )]
    pub background: Option<String>,

    #[arg(
        long = "font",
        help_heading = "APPEARANCE",
        help = "Font shorthand, CSS notation (default \"1.0rem monospace\")"
    )]
    pub font: Option<String>,

    #[arg(
        long = "space-x",
        help_heading = "APPEARANCE",
        help = "Horizontal spacing multiplier (min 0.1 max 10)"
    )]
    pub space_x: Option<f64>,

    #[arg(
        long = "space-y",
        help_heading = "APPEARANCE",
        help = "Vertical spacing multiplier (min 0.1 max 10)"
    )]
    pub space_y: Option<f64>,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: detected from COLORTERM/TERM"
    )]
    pub colormode: Option<u16>,

    #[arg(
        short = 'a',
        long = "alphabet",
        help_heading = "CHARSET",
        help = "Characters to rain; repeats raise a character's odds"
    )]
    pub alphabet: Option<String>,

    #[arg(
        long = "charset",
        help_heading = "CHARSET",
        help = "Alphabet preset (see --list-charsets); --alphabet wins"
    )]
    pub charset: Option<String>,

    #[arg(
        short = 'd',
        long = "density",
        help_heading = "RAIN",
        help = "Ratio of raining characters (min 0 max 1, default 0.02)"
    )]
    pub density: Option<f64>,

    #[arg(
        short = 'D',
        long = "delay",
        help_heading = "RAIN",
        help = "Milliseconds per fall step (min 1 max 10000, default 50)"
    )]
    pub delay: Option<f64>,

    #[arg(
        short = 'r',
        long = "dry-rate",
        help_heading = "RAIN",
        help = "How quickly characters dry out early (min 0 max 1000, default 1)"
    )]
    pub dry_rate: Option<f64>,

    #[arg(
        short = 'F',
        long = "fade-rate",
        help_heading = "RAIN",
        help = "Trail fade per step (min 0 max 1, default 0.1)"
    )]
    pub fade_rate: Option<f64>,

    #[arg(
        short = 'x',
        long = "resolution-x",
        help_heading = "SURFACE",
        help = "Horizontal resolution in cells (default: terminal width, follows resizes)"
    )]
    pub resolution_x: Option<u32>,

    #[arg(
        short = 'y',
        long = "resolution-y",
        help_heading = "SURFACE",
        help = "Vertical resolution in cells (default: terminal height, follows resizes)"
    )]
    pub resolution_y: Option<u32>,

    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "SURFACE",
        help = "Frame delivery rate (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available alphabet presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

impl Args {
    /// Props set explicitly on the command line.
    pub fn flag_props(&self) -> Result<Props, String> {
        let alphabet = match (&self.alphabet, &self.charset) {
            (Some(a), _) => Some(a.clone()),
            (None, Some(preset)) => Some(alphabet_preset(preset)?),
            (None, None) => None,
        };

        Ok(Props {
            color: self.color.clone(),
            gradient: (!self.gradient.is_empty()).then(|| self.gradient.clone()),
            uniform_gradient: (!self.uniform_gradient.is_empty())
                .then(|| self.uniform_gradient.clone()),
            gradient_orientation: self.orientation,
            background_color: self.background.clone(),
            alphabet,
            font: self.font.clone(),
            space_x: self.space_x,
            space_y: self.space_y,
            density: self.density,
            delay: self.delay,
            dry_rate: self.dry_rate,
            fade_rate: self.fade_rate,
            resolution_x: self.resolution_x,
            resolution_y: self.resolution_y,
            z_index: None,
        })
    }
}

pub fn print_list_charsets() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE CHARSET PRESETS:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --charset.\x1b[0m");
    } else {
        println!("AVAILABLE CHARSET PRESETS:");
        println!("NOTE: Use only the VALUE (left side) with --charset.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    for p in PRESETS {
        if p.aliases.is_empty() {
            println!("{:<12} {}", p.name, p.description);
        } else {
            println!(
                "{:<12} {} (aliases: {})",
                p.name,
                p.description,
                p.aliases.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let c = Props::default().resolve((1920, 1080));
        assert_eq!(c.color, "#00ff00");
        assert!(c.gradient.is_empty());
        assert!(c.uniform_gradient.is_empty());
        assert_eq!(c.gradient_orientation, Orientation::Horizontal);
        assert_eq!(c.background_color, "#000000");
        assert_eq!(c.alphabet, DEFAULT_ALPHABET);
        assert_eq!(c.font, "1.0rem monospace");
        assert_eq!((c.space_x, c.space_y), (1.0, 1.0));
        assert_eq!(c.density, 0.02);
        assert_eq!(c.delay, 50.0);
        assert_eq!(c.dry_rate, 1.0);
        assert_eq!(c.fade_rate, 0.1);
        assert_eq!((c.resolution_x, c.resolution_y), (1920, 1080));
        assert_eq!(c.z_index, -1);
    }

    #[test]
    fn json_props_are_camel_case_and_shallow() {
        let p = Props::from_json(
            r##"{"gradient":[{"offset":0,"color":"#f00"},{"offset":1,"color":"#00f"}],
                "gradientOrientation":"vertical","spaceX":1.5,"resolutionX":640,"zIndex":3}"##,
        )
        .unwrap();
        let c = p.resolve((100, 50));
        assert_eq!(c.gradient.len(), 2);
        assert_eq!(c.gradient[1].color, "#00f");
        assert_eq!(c.gradient_orientation, Orientation::Vertical);
        assert_eq!(c.space_x, 1.5);
        assert_eq!(c.space_y, 1.0);
        assert_eq!((c.resolution_x, c.resolution_y), (640, 50));
        assert_eq!(c.z_index, 3);
        assert_eq!(c.color, DEFAULT_COLOR);
    }

    #[test]
    fn malformed_query_falls_back_to_defaults() {
        assert_eq!(Props::from_query_or_default("?{not json"), Props::default());
        assert_eq!(Props::from_query_or_default(""), Props::default());
        let p = Props::from_query_or_default("?{\"density\":0.5}");
        assert_eq!(p.density, Some(0.5));
    }

    #[test]
    fn json_values_are_clamped_on_resolve() {
        let c = Props::from_query_or_default(
            r#"?{"resolutionX":4000000000,"resolutionY":4000000000,
                "density":7,"fadeRate":-1,"spaceX":0}"#,
        )
        .resolve((80, 24));
        assert_eq!((c.resolution_x, c.resolution_y), (MAX_RESOLUTION, MAX_RESOLUTION));
        assert_eq!(c.density, 1.0);
        assert_eq!(c.fade_rate, 0.0);
        assert_eq!(c.space_x, 0.1);

        let c = Props::default().resolve((100_000, 24));
        assert_eq!((c.resolution_x, c.resolution_y), (MAX_RESOLUTION, 24));
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let p = Props {
            delay: Some(f64::NAN),
            dry_rate: Some(f64::INFINITY),
            ..Props::default()
        };
        let c = p.resolve((0, 0));
        assert_eq!(c.delay, 50.0);
        assert_eq!(c.dry_rate, 1.0);
    }

    #[test]
    fn empty_alphabet_resolves_to_default() {
        let p = Props {
            alphabet: Some(String::new()),
            ..Props::default()
        };
        assert_eq!(p.resolve((0, 0)).alphabet, DEFAULT_ALPHABET);
    }

    #[test]
    fn merge_prefers_overlay() {
        let base = Props {
            color: Some("#fff".into()),
            density: Some(0.3),
            ..Props::default()
        };
        let overlay = Props {
            density: Some(0.7),
            ..Props::default()
        };
        let m = base.merge(overlay);
        assert_eq!(m.color.as_deref(), Some("#fff"));
        assert_eq!(m.density, Some(0.7));
    }

    #[test]
    fn color_stop_flag_parses() {
        let s: ColorStop = "0.25:rgb(1, 2, 3)".parse().unwrap();
        assert_eq!(s.offset, 0.25);
        assert_eq!(s.color, "rgb(1, 2, 3)");
        assert!("nocolon".parse::<ColorStop>().is_err());
        assert!("x:#fff".parse::<ColorStop>().is_err());
    }

    #[test]
    fn flags_become_props() {
        let args = Args::parse_from([
            "matrix-rain",
            "--charset",
            "binary",
            "-u",
            "#f00",
            "-u",
            "#00f",
            "--density",
            "0.5",
        ]);
        let p = args.flag_props().unwrap();
        assert_eq!(p.alphabet.as_deref(), Some("01"));
        assert_eq!(p.uniform_gradient.map(|u| u.len()), Some(2));
        assert_eq!(p.density, Some(0.5));
        assert_eq!(p.gradient, None);
        assert_eq!(p.color, None);
    }
}
