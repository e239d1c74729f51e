/// Actors: Player and Ghost, plus the rule constants they share.
/// Actors hold coordinates only; the grid owns cell contents.

use super::direction::Direction;
use super::tile::Tile;

pub const WORLD_WIDTH: usize = 23;
pub const WORLD_HEIGHT: usize = 21;
pub const MAX_LIFE: u32 = 5;
pub const BEAN_VALUE: u32 = 10;
#[cfg(test)]
pub const PLAYER_START: (usize, usize) = (11, 15);
#[cfg(test)]
pub const GHOST_STARTS: [(usize, usize); 4] = [(1, 9), (11, 9), (11, 11), (21, 9)];

/// Which actor a move proposal comes from.
/// The two kinds follow different collision tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Mover {
    Player,
    Ghost(usize),
}

/// Capability shared by every actor the resolver can relocate.
pub trait Positioned {
    fn pos(&self) -> (usize, usize);
    fn set_direction(&mut self, dir: Direction);
    fn relocate(&mut self, x: usize, y: usize);

    /// Back to the fixed start cell, facing Stay.
    fn return_to_start(&mut self);
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
    pub life: u32,
    pub score: u32,
    pub start_x: usize,
    pub start_y: usize,
}

impl Player {
    pub fn new(x: usize, y: usize) -> Self {
        Player {
            x, y,
            direction: Direction::Stay,
            life: MAX_LIFE,
            score: 0,
            start_x: x,
            start_y: y,
        }
    }

    /// Lose one life. Returns true while lives remain.
    pub fn lose_life(&mut self) -> bool {
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Hearts are not capped at MAX_LIFE.
    pub fn gain_life(&mut self) {
        self.life += 1;
    }

    pub fn add_bean(&mut self) {
        self.score += BEAN_VALUE;
    }
}

impl Positioned for Player {
    fn pos(&self) -> (usize, usize) { (self.x, self.y) }
    fn set_direction(&mut self, dir: Direction) { self.direction = dir; }
    fn relocate(&mut self, x: usize, y: usize) {
        self.x = x;
        self.y = y;
    }
    fn return_to_start(&mut self) {
        self.direction = Direction::Stay;
        self.x = self.start_x;
        self.y = self.start_y;
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub id: usize,
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
    pub start_x: usize,
    pub start_y: usize,
    /// What was under the ghost before it entered its current cell.
    /// Never Player or Ghost on a healthy grid.
    pub vacated: Tile,
}

impl Ghost {
    pub fn new(id: usize, x: usize, y: usize) -> Self {
        Ghost {
            id, x, y,
            direction: Direction::Stay,
            start_x: x,
            start_y: y,
            vacated: Tile::Floor,
        }
    }

    #[cfg(test)]
    pub fn at_start(&self) -> bool {
        self.x == self.start_x && self.y == self.start_y
    }
}

impl Positioned for Ghost {
    fn pos(&self) -> (usize, usize) { (self.x, self.y) }
    fn set_direction(&mut self, dir: Direction) { self.direction = dir; }
    fn relocate(&mut self, x: usize, y: usize) {
        self.x = x;
        self.y = y;
    }
    fn return_to_start(&mut self) {
        self.vacated = Tile::Floor;
        self.direction = Direction::Stay;
        self.x = self.start_x;
        self.y = self.start_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_life_counts_down_to_zero_and_stays() {
        let mut p = Player::new(PLAYER_START.0, PLAYER_START.1);
        for _ in 0..MAX_LIFE - 1 {
            assert!(p.lose_life());
        }
        assert!(!p.lose_life());
        assert_eq!(p.life, 0);
        assert!(!p.lose_life());
        assert_eq!(p.life, 0);
    }

    #[test]
    fn hearts_are_uncapped() {
        let mut p = Player::new(0, 0);
        p.gain_life();
        p.gain_life();
        assert_eq!(p.life, MAX_LIFE + 2);
    }

    #[test]
    fn ghost_return_to_start_clears_transients() {
        let mut g = Ghost::new(2, 11, 11);
        g.relocate(4, 4);
        g.vacated = Tile::Bean;
        g.set_direction(Direction::Left);
        g.return_to_start();
        assert!(g.at_start());
        assert_eq!(g.vacated, Tile::Floor);
        assert_eq!(g.direction, Direction::Stay);
    }
}
