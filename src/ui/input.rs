/// Keyboard input: turns terminal key events into session signals.
///
/// Every key press becomes at most one `Signal`, kept in arrival order so
/// the session can apply them one by one (two quick turns inside one
/// frame both count). Release and repeat events are ignored: terminals
/// that support keyboard enhancement report them, and a held `P` must not
/// flicker the pause screen.
///
/// Bindings:
///   Arrow keys / WASD  →  Turn
///   P                  →  Pause / resume
///   R                  →  Restart
///   Esc / Ctrl+C       →  Quit

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::grid::Heading;
use crate::domain::signal::Signal;

pub struct InputState {
    /// Signals collected during the most recent `drain_events()` call.
    signals: Vec<Signal>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { signals: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.signals.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if let Some(signal) = signal_for_key(&key) {
                    self.signals.push(signal);
                }
            }
        }
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }
}

/// Map a single key event to a signal. Letter keys are case-insensitive.
pub fn signal_for_key(key: &KeyEvent) -> Option<Signal> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Signal::Quit),
            _ => None,
        };
    }

    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };

    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Signal::Turn(Heading::Up)),
        KeyCode::Down | KeyCode::Char('s') => Some(Signal::Turn(Heading::Down)),
        KeyCode::Left | KeyCode::Char('a') => Some(Signal::Turn(Heading::Left)),
        KeyCode::Right | KeyCode::Char('d') => Some(Signal::Turn(Heading::Right)),
        KeyCode::Char('p') => Some(Signal::TogglePause),
        KeyCode::Char('r') => Some(Signal::Restart),
        KeyCode::Esc => Some(Signal::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_are_equivalent() {
        let pairs = [
            (KeyCode::Up, 'w', Heading::Up),
            (KeyCode::Down, 's', Heading::Down),
            (KeyCode::Left, 'a', Heading::Left),
            (KeyCode::Right, 'd', Heading::Right),
        ];
        for (arrow, letter, heading) in pairs {
            let expected = Some(Signal::Turn(heading));
            assert_eq!(signal_for_key(&press(arrow)), expected);
            assert_eq!(signal_for_key(&press(KeyCode::Char(letter))), expected);
            let upper = KeyEvent::new(
                KeyCode::Char(letter.to_ascii_uppercase()),
                KeyModifiers::SHIFT,
            );
            assert_eq!(signal_for_key(&upper), expected);
        }
    }

    #[test]
    fn control_keys() {
        assert_eq!(signal_for_key(&press(KeyCode::Char('p'))), Some(Signal::TogglePause));
        assert_eq!(signal_for_key(&press(KeyCode::Char('R'))), Some(Signal::Restart));
        assert_eq!(signal_for_key(&press(KeyCode::Esc)), Some(Signal::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(signal_for_key(&ctrl_c), Some(Signal::Quit));
    }

    #[test]
    fn ctrl_with_other_keys_is_ignored() {
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(signal_for_key(&ctrl_d), None);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(signal_for_key(&press(KeyCode::Char('x'))), None);
        assert_eq!(signal_for_key(&press(KeyCode::Enter)), None);
        assert_eq!(signal_for_key(&press(KeyCode::F(1))), None);
    }

    #[test]
    fn release_and_repeat_are_ignored() {
        for kind in [KeyEventKind::Release, KeyEventKind::Repeat] {
            let ev = KeyEvent::new_with_kind_and_state(
                KeyCode::Char('p'),
                KeyModifiers::NONE,
                kind,
                KeyEventState::NONE,
            );
            assert_eq!(signal_for_key(&ev), None);
        }
    }
}
