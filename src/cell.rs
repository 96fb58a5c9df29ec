// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

/// One terminal cell as it should appear on screen.
///
/// `tail` marks the right half of a double-width glyph printed in the cell
/// to its left; nothing is printed for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub tail: bool,
}

impl Cell {
    pub fn blank(bg: Option<Color>) -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg,
            tail: false,
        }
    }

    pub fn tail(bg: Option<Color>) -> Self {
        Self {
            tail: true,
            ..Self::blank(bg)
        }
    }
}
