// Copyright (c) 2026 rezky_nightky

/// Displayed size of a surface in logical units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Subscription to size changes of one surface box.
///
/// The host reports sizes through [`ResizeObserver::notify`]; a change is
/// passed on only while connected, and a disconnected observer swallows
/// every later report.
#[derive(Debug, Default)]
pub struct ResizeObserver {
    observed: Option<Size>,
    connected: bool,
}

impl ResizeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts observing. Returns the initial observation, which callers handle
    /// like any other change.
    pub fn observe(&mut self, size: Size) -> Option<Size> {
        self.connected = true;
        self.observed = Some(size);
        Some(size)
    }

    pub fn notify(&mut self, size: Size) -> Option<Size> {
        if !self.connected || self.observed == Some(size) {
            return None;
        }
        self.observed = Some(size);
        Some(size)
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
        self.observed = None;
    }

    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.connected
    }
}
