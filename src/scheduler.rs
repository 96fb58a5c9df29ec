// Copyright (c) 2026 rezky_nightky

//! Fixed-cadence ticking on top of variable-rate frame delivery.

/// Tracks the next tick boundary. Timestamps are milliseconds on the frame
/// clock of the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickClock {
    next_tick_time: f64,
}

impl TickClock {
    pub fn new(start: f64) -> Self {
        Self {
            next_tick_time: start,
        }
    }

    pub fn next_tick_time(&self) -> f64 {
        self.next_tick_time
    }

    /// Reports whether a tick is due at `time`, then moves the boundary to
    /// the first multiple of `delay` past it at or after `time`.
    ///
    /// At most one tick is reported per call however many boundaries `time`
    /// overshot; a stalled host resumes with a single step.
    pub fn advance(&mut self, time: f64, delay: f64) -> bool {
        let due = time > self.next_tick_time;

        if delay > 0.0 && delay.is_finite() {
            let delta = time - self.next_tick_time;
            let multiple = (delta / delay).ceil();
            self.next_tick_time += delay * multiple;
        } else {
            self.next_tick_time = time;
        }

        due
    }
}

/// Identifies one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Outstanding frame-delivery requests, drained by the host once per
/// display refresh.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_frame(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    /// A cancelled handle is never delivered by this queue again. Callees must
    /// still ignore handles they no longer own, since a host may have taken
    /// it before cancellation.
    pub fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|&h| h != handle);
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes every request made before this call; requests made while the
    /// returned batch is delivered wait for the next refresh.
    pub fn take_pending(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_at_start_is_not_due() {
        let mut clock = TickClock::new(0.0);
        assert!(!clock.advance(0.0, 50.0));
        assert_eq!(clock.next_tick_time(), 0.0);
    }

    #[test]
    fn boundary_arithmetic_from_mount() {
        let mut clock = TickClock::new(0.0);
        clock.advance(0.0, 50.0);

        let mut ticks = Vec::new();
        for t in [40.0, 60.0, 145.0] {
            if clock.advance(t, 50.0) {
                ticks.push(t);
            }
        }
        // 40 > 0 -> next 50; 60 > 50 -> next 100; 145 > 100 -> next 150
        assert_eq!(ticks, vec![40.0, 60.0, 145.0]);
        assert_eq!(clock.next_tick_time(), 150.0);
    }

    #[test]
    fn boundary_arithmetic_from_first_boundary() {
        let mut clock = TickClock::new(50.0);
        let mut ticks = Vec::new();
        for t in [40.0, 60.0, 145.0] {
            if clock.advance(t, 50.0) {
                ticks.push(t);
            }
        }
        assert_eq!(ticks, vec![60.0, 145.0]);
        assert_eq!(clock.next_tick_time(), 150.0);
    }

    #[test]
    fn stall_catches_up_with_one_tick() {
        let mut clock = TickClock::new(0.0);
        assert!(clock.advance(1010.0, 50.0));
        assert_eq!(clock.next_tick_time(), 1050.0);
        assert!(!clock.advance(1020.0, 50.0));
        assert!(!clock.advance(1050.0, 50.0));
        assert!(clock.advance(1051.0, 50.0));
        assert_eq!(clock.next_tick_time(), 1100.0);
    }

    #[test]
    fn shorter_delay_pulls_boundary_back() {
        let mut clock = TickClock::new(0.0);
        clock.advance(1.0, 1000.0);
        assert_eq!(clock.next_tick_time(), 1000.0);
        assert!(!clock.advance(120.0, 50.0));
        assert_eq!(clock.next_tick_time(), 150.0);
    }

    #[test]
    fn non_positive_delay_ticks_every_frame() {
        let mut clock = TickClock::new(0.0);
        assert!(!clock.advance(0.0, 0.0));
        assert!(clock.advance(16.0, 0.0));
        assert!(clock.advance(32.0, -5.0));
        assert_eq!(clock.next_tick_time(), 32.0);
    }

    #[test]
    fn cancelled_frames_are_not_delivered() {
        let mut q = FrameQueue::new();
        let a = q.request_frame();
        let b = q.request_frame();
        assert_ne!(a, b);
        q.cancel_frame(a);
        assert!(!q.is_pending(a));
        assert_eq!(q.take_pending(), vec![b]);
        assert!(q.is_empty());
    }
}
