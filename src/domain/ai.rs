/// Ghost decision logic.
///
/// A brain only ever sees a `GhostView` (its cell, the passable directions
/// out of it, and where the player is) and answers with a `Direction`.
/// It never touches the grid; the engine decides what the move does.
///
/// `Wanderer`:
///   1. With probability `chase_bias`, take the passable direction that
///      most reduces Manhattan distance to the player.
///   2. Otherwise pick randomly, avoiding an immediate reversal unless
///      that is the only way out.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::direction::Direction;

/// What a ghost's decision logic is allowed to see.
#[derive(Clone, Debug)]
pub struct GhostView {
    pub x: usize,
    pub y: usize,
    pub passable: Vec<Direction>,
    pub player: (usize, usize),
}

pub trait GhostBrain: Send {
    fn choose(&mut self, view: &GhostView) -> Direction;
}

pub struct Wanderer {
    rng: StdRng,
    chase_bias: f64,
    last: Direction,
}

impl Wanderer {
    pub fn new(seed: u64, chase_bias: f64) -> Self {
        Wanderer {
            rng: StdRng::seed_from_u64(seed),
            chase_bias: if chase_bias.is_nan() { 0.0 } else { chase_bias.clamp(0.0, 1.0) },
            last: Direction::Stay,
        }
    }
}

impl GhostBrain for Wanderer {
    fn choose(&mut self, view: &GhostView) -> Direction {
        if view.passable.is_empty() {
            return Direction::Stay;
        }

        let dir = if self.rng.gen_bool(self.chase_bias) {
            toward(view)
        } else {
            let forward: Vec<Direction> = view.passable.iter()
                .copied()
                .filter(|&d| d != self.last.opposite() || self.last == Direction::Stay)
                .collect();
            let pool = if forward.is_empty() { &view.passable } else { &forward };
            pool.choose(&mut self.rng).copied().unwrap_or(Direction::Stay)
        };

        self.last = dir;
        dir
    }
}

/// Passable direction that lands closest to the player (first wins ties).
fn toward(view: &GhostView) -> Direction {
    let (px, py) = (view.player.0 as i64, view.player.1 as i64);
    view.passable.iter()
        .copied()
        .min_by_key(|d| {
            let (dx, dy) = d.offset();
            let nx = view.x as i64 + dx as i64;
            let ny = view.y as i64 + dy as i64;
            (nx - px).abs() + (ny - py).abs()
        })
        .unwrap_or(Direction::Stay)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(passable: &[Direction], player: (usize, usize)) -> GhostView {
        GhostView { x: 5, y: 5, passable: passable.to_vec(), player }
    }

    #[test]
    fn boxed_in_ghost_stays() {
        let mut w = Wanderer::new(1, 0.5);
        assert_eq!(w.choose(&view(&[], (0, 0))), Direction::Stay);
    }

    #[test]
    fn only_passable_directions_are_chosen() {
        let mut w = Wanderer::new(7, 0.3);
        let v = view(&[Direction::Up, Direction::Left], (9, 9));
        for _ in 0..200 {
            let d = w.choose(&v);
            assert!(v.passable.contains(&d), "chose {d:?}");
        }
    }

    #[test]
    fn full_chase_heads_for_player() {
        let mut w = Wanderer::new(3, 1.0);
        let v = view(&[Direction::Up, Direction::Right, Direction::Down, Direction::Left], (9, 5));
        assert_eq!(w.choose(&v), Direction::Right);
    }

    #[test]
    fn avoids_reversing_in_a_corridor() {
        let mut w = Wanderer::new(11, 0.0);
        w.last = Direction::Right;
        let v = view(&[Direction::Right, Direction::Left], (0, 0));
        for _ in 0..50 {
            w.last = Direction::Right;
            assert_eq!(w.choose(&v), Direction::Right);
        }
    }

    #[test]
    fn reverses_at_dead_end() {
        let mut w = Wanderer::new(5, 0.0);
        w.last = Direction::Right;
        assert_eq!(w.choose(&view(&[Direction::Left], (0, 0))), Direction::Left);
    }
}
