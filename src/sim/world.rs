/// GameState: everything the Move Resolver mutates.
///
/// Owned by the engine behind a single lock. Actors never hold a grid
/// reference, only a `Mover` naming their record in here.
///
/// ## Flags
///   - `win_flag` / `lose_flag` only ever go false → true.
///
/// ## Frame
/// `Frame` is a detached copy for renderers. It may lag the live state
/// by one transition; that staleness is acceptable for display.

use crate::domain::entity::{Ghost, Player};
use crate::domain::tile::Tile;
use crate::error::EngineError;
use super::event::GameEvent;
use super::grid::Grid;

#[derive(Clone, Debug)]
pub struct GameState {
    pub grid: Grid,
    pub player: Player,
    pub ghosts: Vec<Ghost>,
    pub win_score: u32,
    pub win_flag: bool,
    pub lose_flag: bool,
    /// Events produced since the last publish.
    pub events: Vec<GameEvent>,
}

/// Read-only snapshot for rendering.
#[derive(Clone, Debug)]
pub struct Frame {
    pub grid: Grid,
    pub life: u32,
    pub score: u32,
    pub win_score: u32,
    pub won: bool,
    pub lost: bool,
}

impl GameState {
    pub fn new(grid: Grid, player: Player, ghosts: Vec<Ghost>, win_score: u32) -> Self {
        GameState {
            grid,
            player,
            ghosts,
            win_score,
            win_flag: false,
            lose_flag: false,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.grid.tile(x, y)
    }

    pub fn is_over(&self) -> bool {
        self.win_flag || self.lose_flag
    }

    pub fn ghost_index(&self, id: usize) -> Result<usize, EngineError> {
        self.ghosts
            .iter()
            .position(|g| g.id == id)
            .ok_or(EngineError::UnknownGhost(id))
    }

    pub fn frame(&self) -> Frame {
        Frame {
            grid: self.grid.clone(),
            life: self.player.life,
            score: self.player.score,
            win_score: self.win_score,
            won: self.win_flag,
            lost: self.lose_flag,
        }
    }
}
