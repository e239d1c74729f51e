/// Keyboard input tracker.
///
/// Keeps a per-key "last seen active" timestamp so a held arrow key keeps
/// steering the player between terminal auto-repeat events. Terminals that
/// report Release events drop the key immediately; others fall back to a
/// timeout.
///
/// Keys:
///   Arrows / WASD   →  steer
///   Enter / Space   →  confirm (leave the win/lose screen)
///   Esc / Q         →  quit

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::direction::Direction;

/// A key counts as released after this long without Press/Repeat.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from released to held during the last drain.
    fresh_presses: Vec<KeyCode>,
    raw_events: Vec<KeyEvent>,
    pub honor_release: bool,
}

impl Default for InputState {
    fn default() -> Self {
        InputState::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Read every pending terminal event without blocking. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.feed(key, Instant::now());
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn feed(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held_at(key.code, now);
                self.last_active.insert(key.code, now);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_at(code, Instant::now())
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Edge trigger: pressed during the most recent drain.
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c') | KeyCode::Char('C'))
        })
    }

    /// Currently requested steering, Up > Down > Left > Right on conflict.
    pub fn steering(&self) -> Direction {
        let active = |keys: &[KeyCode]| self.any_held(keys) || self.any_pressed(keys);
        if active(KEYS_UP) {
            Direction::Up
        } else if active(KEYS_DOWN) {
            Direction::Down
        } else if active(KEYS_LEFT) {
            Direction::Left
        } else if active(KEYS_RIGHT) {
            Direction::Right
        } else {
            Direction::Stay
        }
    }

    pub fn quit_pressed(&self) -> bool {
        self.ctrl_c_pressed() || self.any_pressed(KEYS_QUIT)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_pressed(KEYS_CONFIRM)
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn arrow_steers_and_wasd_matches() {
        let mut input = InputState::new();
        input.feed(key(KeyCode::Left, KeyEventKind::Press), Instant::now());
        assert_eq!(input.steering(), Direction::Left);

        let mut input = InputState::new();
        input.feed(key(KeyCode::Char('s'), KeyEventKind::Press), Instant::now());
        assert_eq!(input.steering(), Direction::Down);
    }

    #[test]
    fn nothing_held_means_stay() {
        assert_eq!(InputState::new().steering(), Direction::Stay);
    }

    #[test]
    fn repeat_is_not_a_fresh_press() {
        let mut input = InputState::new();
        let now = Instant::now();
        input.feed(key(KeyCode::Enter, KeyEventKind::Press), now);
        assert!(input.confirm_pressed());
        input.fresh_presses.clear();
        input.feed(key(KeyCode::Enter, KeyEventKind::Repeat), now);
        assert!(!input.confirm_pressed());
    }

    #[test]
    fn release_honored_only_when_enabled() {
        let mut input = InputState::new();
        input.feed(key(KeyCode::Up, KeyEventKind::Press), Instant::now());
        input.feed(key(KeyCode::Up, KeyEventKind::Release), Instant::now());
        assert!(input.is_held(KeyCode::Up));

        input.honor_release = true;
        input.feed(key(KeyCode::Up, KeyEventKind::Release), Instant::now());
        assert!(!input.is_held(KeyCode::Up));
    }

    #[test]
    fn quit_keys_and_ctrl_c() {
        let mut input = InputState::new();
        input.feed(key(KeyCode::Char('q'), KeyEventKind::Press), Instant::now());
        assert!(input.quit_pressed());

        let mut input = InputState::new();
        let mut ctrl_c = key(KeyCode::Char('c'), KeyEventKind::Press);
        ctrl_c.modifiers = KeyModifiers::CONTROL;
        input.feed(ctrl_c, Instant::now());
        assert!(input.quit_pressed());
    }
}
