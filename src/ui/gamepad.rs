/// Gamepad input using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Turn
///   Start                 →  Pause / resume
///   A                     →  Restart
///   Select                →  Quit
///
/// Only fresh presses produce signals; holding a direction does nothing
/// beyond the first press, the same as the keyboard.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::grid::Heading;
use crate::domain::signal::Signal;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    pause: Vec<Btn>,
    restart: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            pause:   vec![Btn::Start],
            restart: vec![Btn::A],
            quit:    vec![Btn::Select],
        }
    }
}

/// Directional inputs, indexed by `dir_index(Heading)`.
#[derive(Clone, Copy, Debug, Default)]
struct DirStates {
    dpad: [BtnState; 4],
    stick: [BtnState; 4],
}

fn dir_index(h: Heading) -> usize {
    match h {
        Heading::Up => 0,
        Heading::Down => 1,
        Heading::Left => 2,
        Heading::Right => 3,
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    // All tracked buttons (indexed by Btn)
    buttons: [BtnState; 10],
    dirs: DirStates,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

fn btn_index(btn: Btn) -> usize {
    btn as usize
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::debug!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); 10],
            dirs: DirStates::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Unknown names are skipped; an
    /// action whose list ends up empty keeps its default buttons.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let p = parse_list(&cfg.pause);
        if !p.is_empty() { map.pause = p; }
        let r = parse_list(&cfg.restart);
        if !r.is_empty() { map.restart = r; }
        let q = parse_list(&cfg.quit);
        if !q.is_empty() { map.quit = q; }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    /// Signals for this frame's fresh presses: directions first, then
    /// pause, restart and quit.
    pub fn signals(&self) -> Vec<Signal> {
        let mut out = Vec::new();
        for h in Heading::ALL {
            let i = dir_index(h);
            if self.dirs.dpad[i].just_pressed || self.dirs.stick[i].just_pressed {
                out.push(Signal::Turn(h));
            }
        }
        if self.any_just_pressed(&self.action_map.pause) {
            out.push(Signal::TogglePause);
        }
        if self.any_just_pressed(&self.action_map.restart) {
            out.push(Signal::Restart);
        }
        if self.any_just_pressed(&self.action_map.quit) {
            out.push(Signal::Quit);
        }
        out
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    self.update_axis(axis, value);
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }

        // Derive stick digital states (gilrs: +y is up)
        let held = [
            self.stick_y > STICK_DEADZONE,
            self.stick_y < -STICK_DEADZONE,
            self.stick_x < -STICK_DEADZONE,
            self.stick_x > STICK_DEADZONE,
        ];
        for (state, now) in self.dirs.stick.iter_mut().zip(held) {
            if now && !state.held {
                state.just_pressed = true;
            }
            state.held = now;
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        // D-pad handled separately (not in Btn enum)
        let dpad = match gilrs_btn {
            Button::DPadUp    => Some(Heading::Up),
            Button::DPadDown  => Some(Heading::Down),
            Button::DPadLeft  => Some(Heading::Left),
            Button::DPadRight => Some(Heading::Right),
            _ => None,
        };
        if let Some(h) = dpad {
            let state = &mut self.dirs.dpad[dir_index(h)];
            state.held = held;
            if held { state.just_pressed = true; }
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            let state = &mut self.buttons[btn_index(btn)];
            state.held = held;
            if held { state.just_pressed = true; }
        }
    }

    #[cfg(feature = "gamepad")]
    fn update_axis(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::LeftStickX => self.stick_x = value,
            Axis::LeftStickY => self.stick_y = value,
            _ => {}
        }
    }

    // ── Internal ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[btn_index(b)].just_pressed)
    }

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons { b.just_pressed = false; }
        for d in self.dirs.dpad.iter_mut().chain(self.dirs.stick.iter_mut()) {
            d.just_pressed = false;
        }
    }

    #[cfg(feature = "gamepad")]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); 10];
        self.dirs = DirStates::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn button_names_parse_case_insensitively() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("rb"), Some(Btn::R1));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_mapping_and_keeps_defaults_for_empty_lists() {
        let mut pad = GamepadState::new();
        pad.load_button_config(&GamepadConfig {
            pause: names(&["Y"]),
            restart: names(&["nonsense"]),
            quit: names(&["B", "Select"]),
        });
        assert_eq!(pad.action_map.pause, vec![Btn::Y]);
        assert_eq!(pad.action_map.restart, vec![Btn::A]);
        assert_eq!(pad.action_map.quit, vec![Btn::B, Btn::Select]);
    }

    #[test]
    fn fresh_presses_become_signals() {
        let mut pad = GamepadState::new();
        pad.dirs.dpad[dir_index(Heading::Left)].just_pressed = true;
        pad.buttons[btn_index(Btn::Start)].just_pressed = true;
        assert_eq!(pad.signals(), vec![Signal::Turn(Heading::Left), Signal::TogglePause]);
    }

    #[test]
    fn held_buttons_do_not_repeat() {
        let mut pad = GamepadState::new();
        pad.buttons[btn_index(Btn::A)] = BtnState { held: true, just_pressed: true };
        assert_eq!(pad.signals(), vec![Signal::Restart]);
        pad.clear_just_pressed();
        assert!(pad.signals().is_empty());
    }

    #[test]
    fn stick_and_dpad_same_direction_signal_once() {
        let mut pad = GamepadState::new();
        pad.dirs.dpad[dir_index(Heading::Up)].just_pressed = true;
        pad.dirs.stick[dir_index(Heading::Up)].just_pressed = true;
        assert_eq!(pad.signals(), vec![Signal::Turn(Heading::Up)]);
    }
}
