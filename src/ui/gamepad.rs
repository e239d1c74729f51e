/// Gamepad input via gilrs.
///
/// D-pad and left stick steer. Confirm and quit buttons come from the
/// `[gamepad]` section of config.toml:
///   confirm = ["Start", "A"]
///   quit    = ["Select"]
///
/// Without the "gamepad" feature this is an always-disconnected stub.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
#[cfg(feature = "gamepad")]
use tracing::info;

use crate::config::GamepadConfig;
use crate::domain::direction::Direction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Face, shoulder and menu buttons that can be bound to actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A, // South
    B, // East
    X, // West
    Y, // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

fn parse_buttons(names: &[String], fallback: &[Btn]) -> Vec<Btn> {
    let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
    if parsed.is_empty() { fallback.to_vec() } else { parsed }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    just_pressed: [bool; BTN_COUNT],
    /// Up, Right, Down, Left
    dpad: [bool; 4],
    stick: (f32, f32),

    confirm: Vec<Btn>,
    quit: Vec<Btn>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            just_pressed: [false; BTN_COUNT],
            dpad: [false; 4],
            stick: (0.0, 0.0),
            confirm: parse_buttons(&cfg.confirm, &[Btn::Start]),
            quit: parse_buttons(&cfg.quit, &[Btn::Select]),
            connected,
        }
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = &mut self.gilrs else { return };
        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick.0 = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick.1 = v,
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, btn: Button, down: bool) {
        self.connected = true;
        let dpad_slot = match btn {
            Button::DPadUp => Some(0),
            Button::DPadRight => Some(1),
            Button::DPadDown => Some(2),
            Button::DPadLeft => Some(3),
            _ => None,
        };
        if let Some(i) = dpad_slot {
            self.dpad[i] = down;
        } else if let Some(b) = Btn::from_gilrs(btn) {
            if down {
                self.just_pressed[b as usize] = true;
            }
        }
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.confirm)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.quit)
    }

    /// D-pad wins over the stick; Up > Right > Down > Left on conflict.
    pub fn steering(&self) -> Direction {
        let (sx, sy) = self.stick;
        let stick = [sy > STICK_DEADZONE, sx > STICK_DEADZONE, sy < -STICK_DEADZONE, sx < -STICK_DEADZONE];
        let dirs = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];
        (0..4)
            .find(|&i| self.dpad[i])
            .or_else(|| (0..4).find(|&i| stick[i]))
            .map(|i| dirs[i])
            .unwrap_or(Direction::Stay)
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dpad = [false; 4];
        self.stick = (0.0, 0.0);
    }
}
