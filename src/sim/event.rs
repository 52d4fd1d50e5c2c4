/// Events emitted by the session while handling signals and ticks.
/// The presentation layer consumes these for sound and logging.

use crate::domain::grid::Cell;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Crash {
    Wall,
    SelfBite,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { at: Cell, score: u32 },
    FoodPlaced { at: Cell },
    Crashed { cause: Crash, score: u32 },
    BoardFilled { score: u32 },
    Paused,
    Resumed,
    Restarted,
}
