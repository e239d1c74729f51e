/// Actor threads: one OS thread per actor, all sharing one `Engine`.
///
/// Each thread sleeps its step interval, decides a direction, and hands it
/// to `Engine::propose_move`, which may block for as long as another
/// actor's collision handling holds the grid.
///
/// A thread exits when the game is won or lost, when the engine is halted,
/// or when the engine reports a fault. The check runs again after each
/// sleep so a finished game sees no late proposals. A fault halts the engine so every
/// other actor stops too.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

use crate::domain::ai::GhostBrain;
use crate::domain::direction::Direction;
use crate::domain::entity::Mover;
use crate::error::EngineError;
use super::engine::Engine;

/// Latest direction requested for the player.
/// Taking it resets it to Stay, so each request yields at most one step.
pub struct Steering(AtomicU8);

impl Default for Steering {
    fn default() -> Self {
        Steering::new()
    }
}

impl Steering {
    pub fn new() -> Self {
        Steering(AtomicU8::new(Direction::Stay.to_u8()))
    }

    pub fn set(&self, dir: Direction) {
        self.0.store(dir.to_u8(), Ordering::Release);
    }

    pub fn take(&self) -> Direction {
        Direction::from_u8(self.0.swap(Direction::Stay.to_u8(), Ordering::AcqRel))
    }
}

pub type ActorHandle = JoinHandle<Result<(), EngineError>>;

fn keep_running(engine: &Engine) -> bool {
    !engine.is_finished() && !engine.is_halted()
}

fn fail(engine: &Engine, mover: Mover, err: EngineError) -> Result<(), EngineError> {
    error!(?mover, "actor stopped: {err}");
    engine.halt();
    Err(err)
}

pub fn spawn_player(engine: Arc<Engine>, steering: Arc<Steering>, step: Duration) -> std::io::Result<ActorHandle> {
    thread::Builder::new()
        .name("player".into())
        .spawn(move || {
            while keep_running(&engine) {
                thread::sleep(step);
                if !keep_running(&engine) { break; }
                let dir = steering.take();
                if dir == Direction::Stay { continue; }
                if let Err(e) = engine.propose_move(Mover::Player, dir) {
                    return fail(&engine, Mover::Player, e);
                }
            }
            debug!("player thread done");
            Ok(())
        })
}

pub fn spawn_ghost(
    engine: Arc<Engine>,
    id: usize,
    mut brain: Box<dyn GhostBrain>,
    step: Duration,
) -> std::io::Result<ActorHandle> {
    thread::Builder::new()
        .name(format!("ghost-{id}"))
        .spawn(move || {
            let mover = Mover::Ghost(id);
            while keep_running(&engine) {
                thread::sleep(step);
                if !keep_running(&engine) { break; }
                let result = engine
                    .ghost_view(id)
                    .and_then(|view| engine.propose_move(mover, brain.choose(&view)));
                if let Err(e) = result {
                    return fail(&engine, mover, e);
                }
            }
            debug!(ghost = id, "ghost thread done");
            Ok(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ai::{GhostView, Wanderer};
    use crate::domain::tile::Tile;
    use crate::sim::engine::tests::CountingDisplay;
    use crate::sim::resolve::tests::state_from;
    use crate::sim::resolve::Pauses;

    fn engine_for(rows: &[&str]) -> Arc<Engine> {
        let display = Arc::new(CountingDisplay::default());
        Arc::new(Engine::new(state_from(rows), display, Pauses::ZERO))
    }

    #[test]
    fn steering_take_resets_to_stay() {
        let s = Steering::new();
        assert_eq!(s.take(), Direction::Stay);
        s.set(Direction::Left);
        assert_eq!(s.take(), Direction::Left);
        assert_eq!(s.take(), Direction::Stay);
    }

    #[test]
    fn player_thread_steps_and_wins() {
        let engine = engine_for(&["P.#"]);
        let steering = Arc::new(Steering::new());
        steering.set(Direction::Right);
        let h = spawn_player(engine.clone(), steering, Duration::from_millis(1)).unwrap();
        h.join().unwrap().unwrap();
        assert!(engine.is_finished());
        assert!(engine.frame().won);
    }

    #[test]
    fn halt_stops_every_actor() {
        let engine = engine_for(&[
            "#######",
            "#G   G#",
            "#  P  #",
            "#######",
        ]);
        let steering = Arc::new(Steering::new());
        let mut handles = vec![spawn_player(engine.clone(), steering, Duration::from_millis(1)).unwrap()];
        for id in engine.ghost_ids().unwrap() {
            let brain = Box::new(Wanderer::new(id as u64, 0.0));
            handles.push(spawn_ghost(engine.clone(), id, brain, Duration::from_millis(1)).unwrap());
        }
        thread::sleep(Duration::from_millis(20));
        engine.halt();
        for h in handles {
            h.join().unwrap().unwrap();
        }
    }

    #[test]
    fn halt_during_sleep_skips_the_pending_step() {
        let engine = engine_for(&["P.."]);
        let steering = Arc::new(Steering::new());
        steering.set(Direction::Right);
        let h = spawn_player(engine.clone(), steering, Duration::from_millis(50)).unwrap();
        engine.halt();
        h.join().unwrap().unwrap();
        assert_eq!(engine.frame().grid.tile(0, 0), Some(Tile::Player));
        assert_eq!(engine.frame().score, 0);
    }

    struct AlwaysRight;

    impl GhostBrain for AlwaysRight {
        fn choose(&mut self, _view: &GhostView) -> Direction {
            Direction::Right
        }
    }

    #[test]
    fn engine_fault_halts_the_engine() {
        let engine = engine_for(&["G  "]);
        // No ghost 4 in this maze: the first view request fails.
        let h = spawn_ghost(engine.clone(), 4, Box::new(AlwaysRight), Duration::from_millis(1)).unwrap();
        assert_eq!(h.join().unwrap(), Err(EngineError::UnknownGhost(4)));
        assert!(engine.is_halted());
    }

    #[test]
    fn ghost_thread_moves_its_ghost() {
        let engine = engine_for(&["G #P"]);
        let h = spawn_ghost(engine.clone(), 0, Box::new(AlwaysRight), Duration::from_millis(1)).unwrap();
        thread::sleep(Duration::from_millis(30));
        engine.halt();
        h.join().unwrap().unwrap();
        assert_eq!(engine.frame().grid.tile(1, 0), Some(Tile::Ghost));
    }
}
