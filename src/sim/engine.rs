/// Engine: the single serialization point for all grid mutation.
///
/// ## Locks
///   - `state`     — the whole grid, every actor record and both flags.
///                   Held for an entire `propose_move`, collision pauses
///                   included, so the simulation freezes during a
///                   life-loss or win/lose transition.
///   - `published` — the latest `Frame` plus undelivered events.
///                   Only ever held briefly; renderers never touch `state`.
///
/// Lock order is always `state` → `published`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::warn;

use crate::domain::ai::GhostView;
use crate::domain::direction::Direction;
use crate::domain::entity::Mover;
use crate::error::EngineError;
use super::event::GameEvent;
use super::resolve::{self, Effects, MoveOutcome, Pauses, Scene};
use super::world::{Frame, GameState};

/// Presentation-side collaborator. Both calls are fire-and-forget.
pub trait Display: Send + Sync {
    fn request_refresh(&self);
    fn switch_scene(&self, scene: Scene);
}

struct Published {
    frame: Frame,
    events: Vec<GameEvent>,
}

pub struct Engine {
    state: Mutex<GameState>,
    published: Mutex<Published>,
    display: Arc<dyn Display>,
    pauses: Pauses,
    finished: AtomicBool,
    halted: AtomicBool,
}

impl Engine {
    pub fn new(state: GameState, display: Arc<dyn Display>, pauses: Pauses) -> Self {
        let frame = state.frame();
        Engine {
            state: Mutex::new(state),
            published: Mutex::new(Published { frame, events: Vec::new() }),
            display,
            pauses,
            finished: AtomicBool::new(false),
            halted: AtomicBool::new(false),
        }
    }

    /// The only mutation entry point. Blocks until every earlier move,
    /// including its collision/reset/win/lose handling, has completed.
    pub fn propose_move(&self, mover: Mover, direction: Direction) -> Result<MoveOutcome, EngineError> {
        let mut state = self.state.lock().map_err(|_| EngineError::LockPoisoned)?;
        let outcome = resolve::propose_move(&mut state, mover, direction, &self.pauses, self)?;
        self.publish(&mut state);
        Ok(outcome)
    }

    pub fn ghost_view(&self, id: usize) -> Result<GhostView, EngineError> {
        let state = self.state.lock().map_err(|_| EngineError::LockPoisoned)?;
        let ghost = &state.ghosts[state.ghost_index(id)?];
        Ok(GhostView {
            x: ghost.x,
            y: ghost.y,
            passable: state.grid.passable_directions(ghost.x, ghost.y),
            player: (state.player.x, state.player.y),
        })
    }

    pub fn ghost_ids(&self) -> Result<Vec<usize>, EngineError> {
        let state = self.state.lock().map_err(|_| EngineError::LockPoisoned)?;
        Ok(state.ghosts.iter().map(|g| g.id).collect())
    }

    /// Latest published frame. May trail the live grid.
    pub fn frame(&self) -> Frame {
        match self.published.lock() {
            Ok(p) => p.frame.clone(),
            Err(poisoned) => poisoned.into_inner().frame.clone(),
        }
    }

    pub fn drain_events(&self) -> Vec<GameEvent> {
        match self.published.lock() {
            Ok(mut p) => std::mem::take(&mut p.events),
            Err(_) => Vec::new(),
        }
    }

    /// Won or lost. Actor threads stop proposing once this is true.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Ask every actor to stop (quit key or fatal engine error).
    pub fn halt(&self) {
        self.halted.store(true, Ordering::Release);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Run `f` against the live state. Test and diagnostics use only.
    #[cfg(test)]
    pub fn with_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        f(&state)
    }

    fn publish(&self, state: &mut GameState) {
        if state.is_over() {
            self.finished.store(true, Ordering::Release);
        }
        let frame = state.frame();
        let events = std::mem::take(&mut state.events);
        match self.published.lock() {
            Ok(mut p) => {
                p.frame = frame;
                p.events.extend(events);
            }
            Err(_) => warn!("frame lock poisoned; dropping frame"),
        }
    }
}

impl Effects for Engine {
    fn refresh(&self, state: &mut GameState) {
        self.publish(state);
        self.display.request_refresh();
    }

    fn switch_scene(&self, scene: Scene) {
        self.display.switch_scene(scene);
    }

    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
