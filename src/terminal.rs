// Copyright (c) 2026 rezky_nightky

use std::env;
use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::color::ColorMode;
use crate::frame::Frame;
use crate::observer::Size;

/// CSS pixels per terminal cell used to report the box of the surface.
pub const CELL_CSS_WIDTH: f64 = 8.0;
pub const CELL_CSS_HEIGHT: f64 = 16.0;

pub struct Terminal {
    stdout: Stdout,
    run_buf: String,
    last_size: Option<(u16, u16)>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            run_buf: String::with_capacity(256),
            last_size: None,
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Prints every dirty row of `frame`, batching runs of equally colored
    /// cells into one print.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        if self.last_size != Some((frame.width, frame.height)) {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last_size = Some((frame.width, frame.height));
        }

        let mut cur_fg: Option<Color> = None;
        let mut cur_bg: Option<Color> = None;
        let mut colors_known = false;

        for y in 0..frame.height {
            if !frame.is_row_dirty(y) {
                continue;
            }
            self.stdout.queue(cursor::MoveTo(0, y))?;

            let row = frame.row(y);
            let mut i = 0usize;
            while i < row.len() {
                let cell0 = row[i];
                if cell0.tail {
                    i += 1;
                    continue;
                }

                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut j = i + 1;
                while j < row.len() {
                    let cell1 = row[j];
                    if cell1.tail {
                        j += 1;
                        continue;
                    }
                    if cell1.fg != cell0.fg || cell1.bg != cell0.bg {
                        break;
                    }
                    self.run_buf.push(cell1.ch);
                    j += 1;
                }

                if !colors_known || cell0.fg != cur_fg {
                    let fg = cell0.fg.unwrap_or(Color::Reset);
                    self.stdout.queue(SetForegroundColor(fg))?;
                    cur_fg = cell0.fg;
                }
                if !colors_known || cell0.bg != cur_bg {
                    let bg = cell0.bg.unwrap_or(Color::Reset);
                    self.stdout.queue(SetBackgroundColor(bg))?;
                    cur_bg = cell0.bg;
                }
                colors_known = true;

                self.stdout.queue(Print(self.run_buf.as_str()))?;
                i = j;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        frame.clear_dirty();
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Box of a `cols` x `rows` terminal in CSS pixels.
pub fn container_size(cols: u16, rows: u16) -> Size {
    let width = cols as f64 * CELL_CSS_WIDTH;
    let height = rows as f64 * CELL_CSS_HEIGHT;
    Size::new(width, height)
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }
    if term == "linux" {
        return ColorMode::Color16;
    }

    ColorMode::Color256
}

/// `forced` is the bit depth given on the command line, if any.
pub fn detect_color_mode(forced: Option<u16>) -> std::result::Result<ColorMode, String> {
    match forced {
        None => Ok(detect_color_mode_auto()),
        Some(0) => Ok(ColorMode::Mono),
        Some(16) => Ok(ColorMode::Color16),
        Some(8) | Some(256) => Ok(ColorMode::Color256),
        Some(24) | Some(32) => Ok(ColorMode::TrueColor),
        Some(m) => Err(format!("invalid --colormode: {} (allowed: 0,16,8/256,24/32)", m)),
    }
}

pub fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}
