// Copyright (c) 2026 rezky_nightky

//! Falling-characters rain painted onto a canvas-like [`surface::Surface`].
//!
//! [`engine::MatrixRain`] is mounted on a surface and driven by a host: the
//! host delivers frames from a [`scheduler::FrameQueue`], reports the
//! displayed size of the surface, and passes configuration updates. The
//! terminal modules (`canvas`, `cell`, `frame`, `terminal`) are one such
//! host, used by the `matrix-rain` binary.

pub mod alphabet;
pub mod canvas;
pub mod cell;
pub mod color;
pub mod config;
pub mod drops;
pub mod engine;
pub mod font;
pub mod frame;
pub mod geometry;
pub mod gradient;
pub mod observer;
pub mod render;
pub mod scheduler;
pub mod surface;
pub mod terminal;
