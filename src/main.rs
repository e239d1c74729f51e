/// Entry point: wires config, logging, the engine, actor threads and the
/// terminal front end together, then runs the render loop.

mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::process::ExitCode;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use config::GameConfig;
use domain::ai::Wanderer;
use domain::direction::Direction;
use error::EngineError;
use sim::actors::{self, ActorHandle, Steering};
use sim::engine::{Display, Engine};
use sim::level::load_level;
use sim::resolve::Scene;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{Sfx, SoundEngine};

/// Upper bound on how long the render loop waits for a refresh request.
const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Requests from the engine side to the render loop.
enum UiSignal {
    Refresh,
    Scene(Scene),
}

/// `Display` that forwards to the render loop over a channel.
/// Sends never block, and a closed channel (render loop gone) is ignored.
struct ChannelDisplay {
    tx: Sender<UiSignal>,
}

impl Display for ChannelDisplay {
    fn request_refresh(&self) {
        let _ = self.tx.send(UiSignal::Refresh);
    }

    fn switch_scene(&self, scene: Scene) {
        let _ = self.tx.send(UiSignal::Scene(scene));
    }
}

fn main() -> ExitCode {
    let config = GameConfig::load();
    if !logging::init(&config) {
        eprintln!("Could not open log file {}; logging disabled", config.log_file.display());
    }
    for w in &config.warnings {
        warn!("{w}");
    }

    let state = match load_level(config.maze_file.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            error!("no playable maze: {e}");
            eprintln!("No playable maze: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        ghosts = state.ghosts.len(),
        win_score = state.win_score,
        "maze ready"
    );
    debug!("maze layout:\n{}", state.grid);

    let (tx, rx) = mpsc::channel();
    let engine = Arc::new(Engine::new(state, Arc::new(ChannelDisplay { tx }), config.timing.pauses()));
    let steering = Arc::new(Steering::new());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let sound = SoundEngine::new();
    let mut handles = vec![];
    let result = spawn_actors(&engine, &steering, &config, &mut handles)
        .and_then(|()| game_loop(&engine, &steering, &rx, &mut renderer, sound.as_ref(), &config));

    engine.halt();
    let faults = join_actors(handles);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        error!("render loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    let frame = engine.frame();
    println!();
    println!("Thanks for playing Ghost Maze!");
    println!("Final Score: {} / {}", frame.score, frame.win_score);

    if faults.is_empty() {
        ExitCode::SUCCESS
    } else {
        for f in &faults {
            eprintln!("Engine fault: {f}");
        }
        ExitCode::FAILURE
    }
}

fn spawn_actors(
    engine: &Arc<Engine>,
    steering: &Arc<Steering>,
    config: &GameConfig,
    handles: &mut Vec<ActorHandle>,
) -> std::io::Result<()> {
    handles.push(actors::spawn_player(engine.clone(), steering.clone(), config.timing.player_step())?);

    let seed = config.ghosts.seed.unwrap_or_else(rand::random::<u64>);
    info!(seed, chase_bias = config.ghosts.chase_bias, "spawning ghosts");
    let ids = engine.ghost_ids().map_err(std::io::Error::other)?;
    for id in ids {
        let brain = Box::new(Wanderer::new(seed.wrapping_add(id as u64), config.ghosts.chase_bias));
        handles.push(actors::spawn_ghost(engine.clone(), id, brain, config.timing.ghost_step())?);
    }
    Ok(())
}

/// Wait for every actor thread; returns the faults they reported.
fn join_actors(handles: Vec<ActorHandle>) -> Vec<EngineError> {
    let mut faults = vec![];
    for h in handles {
        match h.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => faults.push(e),
            Err(_) => {
                error!("actor thread panicked");
                faults.push(EngineError::LockPoisoned);
            }
        }
    }
    faults
}

fn game_loop(
    engine: &Engine,
    steering: &Steering,
    signals: &Receiver<UiSignal>,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    info!(connected = gp.connected, "gamepad");
    let mut scene = Scene::Play;

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_pressed() || gp.quit_pressed() {
            info!("quit requested");
            break;
        }
        if engine.is_halted() {
            break;
        }

        match scene {
            Scene::Play => {
                let dir = match kb.steering() {
                    Direction::Stay => gp.steering(),
                    d => d,
                };
                if dir != Direction::Stay {
                    steering.set(dir);
                }
            }
            Scene::Win | Scene::Lose => {
                if kb.confirm_pressed() || gp.confirm_pressed() {
                    break;
                }
            }
        }

        // Sleep until the engine asks for a redraw or the frame interval ends.
        match signals.recv_timeout(FRAME_SLEEP) {
            Ok(sig) => {
                for s in std::iter::once(sig).chain(signals.try_iter()) {
                    if let UiSignal::Scene(next) = s {
                        info!(?next, "scene switch");
                        scene = next;
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for event in engine.drain_events() {
            if let (Some(sfx), Some(cue)) = (sound, Sfx::for_event(&event)) {
                sfx.play(cue);
            }
        }

        renderer.render(&engine.frame(), scene)?;
    }

    Ok(())
}
