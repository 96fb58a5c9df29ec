// Copyright (c) 2026 rezky_nightky

//! Engine state for one mounted surface and the lifecycle around it.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::color::{parse_color, Rgba};
use crate::config::Config;
use crate::drops::{update_rain_drops, DropSet};
use crate::font::Font;
use crate::geometry::Geometry;
use crate::gradient::{color_stops, ColorStop, LinearGradient, Orientation};
use crate::observer::{ResizeObserver, Size};
use crate::render::{animate_next_frame, fill_background, MEASURE_GLYPH};
use crate::scheduler::{FrameHandle, FrameQueue, TickClock};
use crate::surface::Surface;

/// Everything derived from the configuration and the surface size, plus the
/// live drops. Mutated in place; never replaced while mounted.
#[derive(Clone, Debug)]
pub struct RainState {
    pub geometry: Geometry,

    pub color_gradient: Vec<ColorStop>,
    pub gradient_orientation: Orientation,
    pub foreground: LinearGradient,
    pub background: Rgba,

    pub alphabet: Vec<char>,
    pub font: Font,
    pub space_x: f64,
    pub space_y: f64,
    pub density: f64,
    pub delay: f64,
    pub dry_rate: f64,
    pub fade_rate: f64,

    pub drops: DropSet,
}

impl Default for RainState {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            color_gradient: Vec::new(),
            gradient_orientation: Orientation::Horizontal,
            foreground: LinearGradient::new((0.0, 0.0), (0.0, 0.0)),
            background: Rgba::BLACK,
            alphabet: Vec::new(),
            font: Font::default(),
            space_x: 1.0,
            space_y: 1.0,
            density: 0.0,
            delay: 0.0,
            dry_rate: 0.0,
            fade_rate: 0.0,
            drops: DropSet::default(),
        }
    }
}

/// Copies `config` into `state` and refreshes everything derived from it.
pub fn update_state<S: Surface + ?Sized>(config: &Config, state: &mut RainState, surface: &mut S) {
    state.alphabet = config.alphabet.chars().collect();
    state.font = Font::parse_or_keep(&config.font, &state.font);
    state.space_x = config.space_x;
    state.space_y = config.space_y;
    state.density = config.density;
    state.delay = config.delay;
    state.dry_rate = config.dry_rate;
    state.fade_rate = config.fade_rate;

    state.color_gradient = color_stops(config);
    state.gradient_orientation = config.gradient_orientation;
    state.background = match parse_color(&config.background_color) {
        Some(c) => c,
        None => {
            warn!(
                "ignoring invalid background color {:?}",
                config.background_color
            );
            state.background
        }
    };

    update_foreground_style(state);
    update_cell_size(state, surface);
    state.geometry.update_grid_size();
    state.geometry.update_scale(surface.resolution());

    debug!("configuration applied: {:?}", state.geometry);
}

/// Recomputes what depends on the displayed size of the surface.
pub fn on_container_resize<S: Surface + ?Sized>(state: &mut RainState, surface: &S, size: Size) {
    state.geometry.set_container_size(size.width, size.height);
    update_foreground_style(state);
    state.geometry.update_grid_size();
    state.geometry.update_scale(surface.resolution());

    debug!("container resized: {:?}", state.geometry);
}

fn update_foreground_style(state: &mut RainState) {
    state.foreground = LinearGradient::oriented(
        state.gradient_orientation,
        state.geometry.container_width,
        state.geometry.container_height,
        &state.color_gradient,
    );
}

fn update_cell_size<S: Surface + ?Sized>(state: &mut RainState, surface: &mut S) {
    let glyph_height = surface.measure_glyph_height(&state.font, MEASURE_GLYPH);
    let (space_x, space_y) = (state.space_x, state.space_y);
    state.geometry.update_cell_size(glyph_height, space_x, space_y);
}

/// A rain animation mounted on one surface.
///
/// The host owns the surface and the frame queue and passes them into every
/// call. Dropping the engine without [`MatrixRain::unmount`] leaves its frame
/// request queued; the request is then ignored by any other engine.
pub struct MatrixRain {
    state: RainState,
    clock: TickClock,
    frame: Option<FrameHandle>,
    resize: ResizeObserver,
    rng: StdRng,
}

impl MatrixRain {
    pub fn mount<S: Surface + ?Sized>(
        config: &Config,
        surface: &mut S,
        container: Size,
        frames: &mut FrameQueue,
        now: f64,
    ) -> Self {
        Self::mount_with_rng(
            config,
            surface,
            container,
            frames,
            now,
            StdRng::from_os_rng(),
        )
    }

    pub fn mount_with_rng<S: Surface + ?Sized>(
        config: &Config,
        surface: &mut S,
        container: Size,
        frames: &mut FrameQueue,
        now: f64,
        rng: StdRng,
    ) -> Self {
        surface.set_resolution(config.resolution_x, config.resolution_y);

        let Size { width, height } = container;
        let mut state = RainState::default();
        state.geometry.set_container_size(width, height);
        update_state(config, &mut state, surface);
        fill_background(&state, surface, false);

        let mut resize = ResizeObserver::new();
        if let Some(size) = resize.observe(container) {
            on_container_resize(&mut state, surface, size);
        }

        let mut rain = Self {
            state,
            clock: TickClock::new(now),
            frame: None,
            resize,
            rng,
        };
        rain.animate(now, surface, frames);
        debug!("mounted at {:.1}ms", now);
        rain
    }

    /// Applies a new configuration. A changed resolution resizes the surface
    /// and clears it with an opaque background fill.
    pub fn update_config<S: Surface + ?Sized>(&mut self, config: &Config, surface: &mut S) {
        let resolution = (config.resolution_x, config.resolution_y);
        let resized = surface.resolution() != resolution;
        if resized {
            surface.set_resolution(resolution.0, resolution.1);
        }

        update_state(config, &mut self.state, surface);

        if resized {
            fill_background(&self.state, surface, false);
        }
    }

    /// Reports the displayed size of the surface; only changes are applied.
    pub fn container_resized<S: Surface + ?Sized>(&mut self, surface: &S, size: Size) {
        if let Some(size) = self.resize.notify(size) {
            on_container_resize(&mut self.state, surface, size);
        }
    }

    /// Delivers a frame callback. Returns whether a tick ran. Handles this
    /// engine no longer waits on are ignored.
    pub fn on_animation_frame<S: Surface + ?Sized>(
        &mut self,
        handle: FrameHandle,
        time: f64,
        surface: &mut S,
        frames: &mut FrameQueue,
    ) -> bool {
        if self.frame != Some(handle) {
            return false;
        }
        self.frame = None;
        self.animate(time, surface, frames)
    }

    fn animate<S: Surface + ?Sized>(
        &mut self,
        time: f64,
        surface: &mut S,
        frames: &mut FrameQueue,
    ) -> bool {
        let due = self.clock.advance(time, self.state.delay);
        if due {
            update_rain_drops(&mut self.state, &mut self.rng);
            animate_next_frame(&self.state, surface, &mut self.rng);
        }
        self.frame = Some(frames.request_frame());
        due
    }

    /// Stops the animation: the outstanding frame request is cancelled and
    /// size reports are no longer observed.
    pub fn unmount(mut self, frames: &mut FrameQueue) {
        if let Some(handle) = self.frame.take() {
            frames.cancel_frame(handle);
        }
        self.resize.disconnect();
        debug!("unmounted with {} drops", self.state.drops.len());
    }

    pub fn state(&self) -> &RainState {
        &self.state
    }

    pub fn next_tick_time(&self) -> f64 {
        self.clock.next_tick_time()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }
}
