// Copyright (c) 2026 rezky_nightky

use log::trace;
use rand::Rng;

use crate::engine::RainState;

/// One falling character. `row` is -1 right after spawning and is removed
/// once it reaches the grid's row count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RainDrop {
    pub col: u32,
    pub row: i64,
}

/// Active drops, stored densely and removed by swap.
///
/// Two drops at the same cell are independent entries; nothing dedups them.
#[derive(Clone, Debug, Default)]
pub struct DropSet {
    drops: Vec<RainDrop>,
}

impl DropSet {
    pub fn len(&self) -> usize {
        self.drops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RainDrop> {
        self.drops.iter()
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, drop: RainDrop) {
        self.drops.push(drop);
    }
}

/// Advances the simulation by one tick: spawn toward the density target,
/// then move every drop down a row and drop those that left the grid or
/// dried out.
pub fn update_rain_drops<R: Rng + ?Sized>(state: &mut RainState, rng: &mut R) {
    let cols = state.geometry.grid_cols;
    let rows = state.geometry.grid_rows;
    let target = state.density * cols as f64 * rows as f64;
    let missing = target - state.drops.len() as f64;
    let dry_probability = state.dry_rate / rows as f64;
    let drops = &mut state.drops.drops;

    let mut spawned = 0usize;
    if cols > 0 && !state.alphabet.is_empty() {
        for _ in 0..spawn_attempts(missing) {
            if rng.random::<f64>() < state.density {
                drops.push(RainDrop {
                    col: rng.random_range(0..cols),
                    row: -1,
                });
                spawned += 1;
            }
        }
    }

    let mut removed = 0usize;
    let mut i = 0;
    while i < drops.len() {
        let d = &mut drops[i];
        d.row += 1;

        if d.col >= cols || d.row >= rows as i64 || rng.random::<f64>() < dry_probability {
            drops.swap_remove(i);
            removed += 1;
        } else {
            i += 1;
        }
    }

    trace!(
        "tick: spawned {} removed {} active {}",
        spawned,
        removed,
        drops.len()
    );
}

fn spawn_attempts(missing: f64) -> usize {
    if missing > 0.0 && missing.is_finite() {
        missing.ceil() as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn state(cols: u32, rows: u32, density: f64, dry_rate: f64) -> RainState {
        let mut s = RainState::default();
        s.geometry.grid_cols = cols;
        s.geometry.grid_rows = rows;
        s.density = density;
        s.dry_rate = dry_rate;
        s.alphabet = vec!['0', '1'];
        s
    }

    fn rows(s: &RainState) -> Vec<i64> {
        s.drops.iter().map(|d| d.row).collect()
    }

    #[test]
    fn zero_density_never_spawns() {
        let mut s = state(80, 30, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            update_rain_drops(&mut s, &mut rng);
            assert!(s.drops.is_empty());
        }
    }

    #[test]
    fn rows_advance_by_one_until_exit() {
        let mut s = state(10, 5, 0.0, 0.0);
        s.drops.drops.push(RainDrop { col: 3, row: -1 });
        let mut rng = StdRng::seed_from_u64(1);

        for expected in 0..5 {
            update_rain_drops(&mut s, &mut rng);
            assert_eq!(rows(&s), vec![expected]);
        }
        update_rain_drops(&mut s, &mut rng);
        assert!(s.drops.is_empty());
    }

    #[test]
    fn surviving_drops_stay_inside_grid() {
        let mut s = state(40, 20, 0.3, 1.0);
        let mut rng = StdRng::seed_from_u64(42);
        let mut saw_drops = false;
        for _ in 0..200 {
            update_rain_drops(&mut s, &mut rng);
            saw_drops |= !s.drops.is_empty();
            for d in s.drops.iter() {
                assert!(d.col < 40);
                assert!((0..20).contains(&d.row));
            }
        }
        assert!(saw_drops);
    }

    #[test]
    fn population_stays_at_or_below_target() {
        let mut s = state(50, 40, 0.1, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        let target = (0.1 * 50.0 * 40.0) as usize;
        for _ in 0..300 {
            update_rain_drops(&mut s, &mut rng);
            assert!(s.drops.len() <= target);
        }
        assert!(!s.drops.is_empty());
    }

    #[test]
    fn shrinking_grid_removes_out_of_range_columns() {
        let mut s = state(100, 50, 0.0, 0.0);
        s.drops.drops.push(RainDrop { col: 50, row: 2 });
        s.drops.drops.push(RainDrop { col: 5, row: 2 });
        s.drops.drops.push(RainDrop { col: 5, row: 2 });
        s.geometry.grid_cols = 10;
        let mut rng = StdRng::seed_from_u64(9);
        update_rain_drops(&mut s, &mut rng);
        let left: Vec<RainDrop> = s.drops.iter().copied().collect();
        assert_eq!(left, vec![RainDrop { col: 5, row: 3 }; 2]);
    }

    #[test]
    fn fresh_drops_are_invisible_for_one_tick() {
        let mut s = state(20, 20, 1.0, 0.0);
        let mut rng = StdRng::seed_from_u64(11);
        update_rain_drops(&mut s, &mut rng);
        // spawned at -1, advanced once in the same tick
        assert_eq!(s.drops.len(), 400);
        assert!(s.drops.iter().all(|d| d.row == 0));
    }

    #[test]
    fn empty_alphabet_or_grid_skips_spawning() {
        let mut s = state(20, 20, 1.0, 0.0);
        s.alphabet.clear();
        let mut rng = StdRng::seed_from_u64(5);
        update_rain_drops(&mut s, &mut rng);
        assert!(s.drops.is_empty());

        let mut s = state(0, 0, 1.0, 1.0);
        update_rain_drops(&mut s, &mut rng);
        assert!(s.drops.is_empty());
    }

    #[test]
    fn huge_dry_rate_removes_everything() {
        let mut s = state(20, 20, 0.0, 1e9);
        s.drops.drops.push(RainDrop { col: 1, row: 0 });
        let mut rng = StdRng::seed_from_u64(5);
        update_rain_drops(&mut s, &mut rng);
        assert!(s.drops.is_empty());
    }

    #[test]
    fn spawn_attempts_round_up() {
        assert_eq!(spawn_attempts(3.2), 4);
        assert_eq!(spawn_attempts(0.0), 0);
        assert_eq!(spawn_attempts(-2.0), 0);
        assert_eq!(spawn_attempts(f64::NAN), 0);
    }
}
