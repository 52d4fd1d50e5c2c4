/// Discrete player intents produced by the input layer.
///
/// Keyboard and gamepad both translate their raw events into these, so the
/// session never sees a device-specific key code.

use super::grid::Heading;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Signal {
    Quit,
    TogglePause,
    Restart,
    Turn(Heading),
}
