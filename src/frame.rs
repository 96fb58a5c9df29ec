// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// Screen-sized cell buffer. Writes that change a cell mark its row dirty;
/// the terminal redraws dirty rows only.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_rows: Vec<bool>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank(None); len],
            dirty_all: true,
            dirty_rows: vec![false; height as usize],
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_all || self.dirty_rows.iter().any(|&d| d)
    }

    pub fn is_row_dirty(&self, y: u16) -> bool {
        self.dirty_all || self.dirty_rows.get(y as usize).copied().unwrap_or(false)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty_all = false;
        self.dirty_rows.fill(false);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        let w = self.width as usize;
        let start = (y as usize * w).min(self.cells.len());
        let end = (start + w).min(self.cells.len());
        &self.cells[start..end]
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            if self.cells[i] == cell {
                return;
            }
            self.cells[i] = cell;
            self.dirty_rows[y as usize] = true;
        }
    }
}
