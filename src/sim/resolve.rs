/// The Move Resolver: applies one actor's proposed move and every
/// side effect it triggers (pickup, collision, reset, win, lose).
///
/// Everything here runs with exclusive access to `GameState`; the engine
/// holds its lock for the whole call, including the collision pauses, so
/// no other actor can touch the grid mid-transition.
///
/// Collision tables:
///
///   Player → | Ghost: collision | Bean: score + move | Heart: life + move
///            | Floor: move      | Wall / off-grid: blocked
///
///   Ghost  → | Player: relocate, then collision at destination
///            | Ghost: blocked   | Floor / Bean / Heart: relocate (no pickup)
///            | Wall / off-grid: blocked
///
/// Once the game is won or lost every proposal resolves to `Blocked`.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::domain::direction::Direction;
use crate::domain::entity::{Mover, Positioned};
use crate::domain::tile::Tile;
use crate::error::EngineError;
use super::event::GameEvent;
use super::world::GameState;

/// Screen the presentation layer should show.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scene {
    Play,
    Win,
    Lose,
}

/// What a single proposal ended up doing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Stayed,
    Blocked,
    Moved,
    Collected(Tile),
    LifeLost { remaining: u32 },
    Won,
    Lost,
}

/// Fixed stalls taken while the grid is locked.
#[derive(Clone, Copy, Debug)]
pub struct Pauses {
    /// After the collision cell is cleared, before actors are reset.
    pub collision: Duration,
    /// After the reset is displayed, before play resumes.
    pub reset: Duration,
    /// Before switching to the win/lose scene.
    pub transition: Duration,
}

impl Pauses {
    pub const ZERO: Pauses = Pauses {
        collision: Duration::ZERO,
        reset: Duration::ZERO,
        transition: Duration::ZERO,
    };
}

/// Side effects the resolver requests from the outside world.
pub trait Effects {
    /// Publish the current state and ask for a redraw.
    fn refresh(&self, state: &mut GameState);
    fn switch_scene(&self, scene: Scene);
    fn pause(&self, duration: Duration);
}

// ══════════════════════════════════════════════════════════════
// Entry point
// ══════════════════════════════════════════════════════════════

/// Resolve one proposal. The actor's current cell is read from the state,
/// never from the caller.
pub fn propose_move(
    state: &mut GameState,
    mover: Mover,
    direction: Direction,
    pauses: &Pauses,
    fx: &dyn Effects,
) -> Result<MoveOutcome, EngineError> {
    match mover {
        Mover::Player => Ok(resolve_player(state, direction, pauses, fx)),
        Mover::Ghost(id) => {
            let idx = state.ghost_index(id)?;
            resolve_ghost(state, idx, direction, pauses, fx)
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Player table
// ══════════════════════════════════════════════════════════════

fn resolve_player(
    state: &mut GameState,
    direction: Direction,
    pauses: &Pauses,
    fx: &dyn Effects,
) -> MoveOutcome {
    if state.is_over() { return MoveOutcome::Blocked; }
    if direction == Direction::Stay { return MoveOutcome::Stayed; }
    state.player.set_direction(direction);

    let (x, y) = state.player.pos();
    let (nx, ny) = match state.grid.neighbor(x, y, direction) {
        Some(p) => p,
        None => return MoveOutcome::Blocked,
    };

    match state.tile(nx, ny) {
        Some(Tile::Ghost) => {
            info!(x, y, "player ran into ghost");
            handle_collision(state, x, y, pauses, fx)
        }
        Some(Tile::Bean) => {
            state.player.add_bean();
            move_player(state, nx, ny);
            state.events.push(GameEvent::BeanCollected { x: nx, y: ny });
            if state.player.score >= state.win_score {
                trigger_win(state, pauses, fx);
                return MoveOutcome::Won;
            }
            MoveOutcome::Collected(Tile::Bean)
        }
        Some(Tile::Heart) => {
            state.player.gain_life();
            move_player(state, nx, ny);
            state.events.push(GameEvent::HeartCollected { x: nx, y: ny });
            MoveOutcome::Collected(Tile::Heart)
        }
        Some(Tile::Floor) => {
            move_player(state, nx, ny);
            MoveOutcome::Moved
        }
        Some(Tile::Wall) | Some(Tile::Player) | None => MoveOutcome::Blocked,
    }
}

fn move_player(state: &mut GameState, nx: usize, ny: usize) {
    let (x, y) = state.player.pos();
    state.grid.set(x, y, Tile::Floor);
    state.player.relocate(nx, ny);
    state.grid.set(nx, ny, Tile::Player);
    state.player.set_direction(Direction::Stay);
}

fn trigger_win(state: &mut GameState, pauses: &Pauses, fx: &dyn Effects) {
    state.win_flag = true;
    state.events.push(GameEvent::Won);
    info!(score = state.player.score, "win");
    fx.refresh(state);
    fx.pause(pauses.transition);
    fx.switch_scene(Scene::Win);
    fx.refresh(state);
}

// ══════════════════════════════════════════════════════════════
// Ghost table
// ══════════════════════════════════════════════════════════════

fn resolve_ghost(
    state: &mut GameState,
    idx: usize,
    direction: Direction,
    pauses: &Pauses,
    fx: &dyn Effects,
) -> Result<MoveOutcome, EngineError> {
    if state.is_over() { return Ok(MoveOutcome::Blocked); }
    if direction == Direction::Stay { return Ok(MoveOutcome::Stayed); }
    state.ghosts[idx].set_direction(direction);

    let (x, y) = state.ghosts[idx].pos();
    let (nx, ny) = match state.grid.neighbor(x, y, direction) {
        Some(p) => p,
        None => return Ok(MoveOutcome::Blocked),
    };

    match state.tile(nx, ny) {
        Some(Tile::Player) => {
            info!(ghost = state.ghosts[idx].id, "ghost caught player");
            relocate_ghost(state, idx, nx, ny)?;
            Ok(handle_collision(state, nx, ny, pauses, fx))
        }
        Some(Tile::Floor) | Some(Tile::Bean) | Some(Tile::Heart) => {
            relocate_ghost(state, idx, nx, ny)?;
            Ok(MoveOutcome::Moved)
        }
        Some(Tile::Ghost) | Some(Tile::Wall) | None => Ok(MoveOutcome::Blocked),
    }
}

/// Move ghost `idx` into (nx, ny), restoring what it was covering.
///
/// Returns Ok(false) without touching the grid when the destination
/// already holds a ghost. A ghost never remembers `Player` as its
/// vacated tile: stepping onto the player records `Floor` instead.
pub fn relocate_ghost(
    state: &mut GameState,
    idx: usize,
    nx: usize,
    ny: usize,
) -> Result<bool, EngineError> {
    let ghost = &state.ghosts[idx];
    if ghost.vacated.is_actor() {
        error!(ghost = ghost.id, vacated = ?ghost.vacated, "ghost vacated tile is corrupt");
        return Err(EngineError::CorruptVacatedTile { ghost: ghost.id, tile: ghost.vacated });
    }

    let dest = match state.tile(nx, ny) {
        Some(t) => t,
        None => return Ok(false),
    };
    if dest == Tile::Ghost { return Ok(false); }

    let (x, y) = ghost.pos();
    let restore = ghost.vacated;
    debug!(ghost = ghost.id, x, y, to_x = nx, to_y = ny, vacated = ?restore, "ghost move");

    state.grid.set(x, y, restore);
    let ghost = &mut state.ghosts[idx];
    ghost.relocate(nx, ny);
    ghost.vacated = if dest == Tile::Player { Tile::Floor } else { dest };
    ghost.set_direction(Direction::Stay);
    let id = ghost.id;
    state.grid.set(nx, ny, Tile::Ghost);
    state.events.push(GameEvent::GhostMoved { id, x: nx, y: ny });
    Ok(true)
}

// ══════════════════════════════════════════════════════════════
// Collision / reset
// ══════════════════════════════════════════════════════════════

/// Player and ghost met at (x, y).
///
/// Lives left: clear the cell, stall, reset every actor, redraw, stall longer.
/// No lives left: clear the cell, raise `lose_flag`, redraw, switch to Lose.
pub fn handle_collision(
    state: &mut GameState,
    x: usize,
    y: usize,
    pauses: &Pauses,
    fx: &dyn Effects,
) -> MoveOutcome {
    // Life is frozen once the game is decided.
    if state.is_over() { return MoveOutcome::Blocked; }

    if state.player.lose_life() {
        let remaining = state.player.life;
        state.grid.set(x, y, Tile::Floor);
        state.events.push(GameEvent::LifeLost { remaining });
        info!(remaining, "life lost, resetting actors");
        fx.pause(pauses.collision);
        reset_player_and_ghosts(state);
        fx.refresh(state);
        fx.pause(pauses.reset);
        MoveOutcome::LifeLost { remaining }
    } else {
        state.grid.set(x, y, Tile::Floor);
        state.lose_flag = true;
        state.events.push(GameEvent::LifeLost { remaining: 0 });
        state.events.push(GameEvent::Lost);
        info!(score = state.player.score, "lose");
        fx.refresh(state);
        fx.pause(pauses.transition);
        fx.switch_scene(Scene::Lose);
        fx.refresh(state);
        MoveOutcome::Lost
    }
}

/// Return the player and every ghost to their start cells.
///
/// Ghost start cells are not marked `Ghost` here; a ghost shows up again
/// once it next moves. Ghosts are cleared before the player is placed so a
/// ghost standing on the player's start cell cannot erase the new marker.
pub fn reset_player_and_ghosts(state: &mut GameState) {
    for ghost in state.ghosts.iter_mut() {
        let restore = if ghost.vacated == Tile::Player { Tile::Floor } else { ghost.vacated };
        state.grid.set(ghost.x, ghost.y, restore);
        ghost.return_to_start();
    }

    let (px, py) = state.player.pos();
    state.grid.set(px, py, Tile::Floor);
    state.player.return_to_start();
    let (sx, sy) = state.player.pos();
    state.grid.set(sx, sy, Tile::Player);
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
