/// Session: the complete state of one running game.
///
/// ## Modes
///
/// ```text
///            TogglePause              crash
///   Running ─────────────▶ Paused     Running ──▶ GameOver
///      ▲    ◀─────────────            Running ──▶ Won (no free cell for food)
///      └────────── Restart (from any mode) ───────────┘
/// ```
///
/// Signals are applied one at a time in arrival order. The per-tick
/// update only runs while `Running`; every other mode is frozen until
/// the player restarts or quits.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::grid::{Cell, GRID_HEIGHT, GRID_WIDTH, SCORE_PER_FOOD};
use crate::domain::signal::Signal;
use crate::domain::snake::Snake;
use super::event::{Crash, GameEvent};
use super::food;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Running,
    Paused,
    GameOver,
    /// The snake fills the whole grid.
    Won,
}

pub struct Session<R: Rng = StdRng> {
    snake: Snake,
    /// `None` only in `Mode::Won`.
    food: Option<Cell>,
    score: u32,
    best_score: u32,
    mode: Mode,
    crash: Option<Crash>,
    rng: R,
}

impl Session<StdRng> {
    pub fn new() -> Self {
        Session::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(mut rng: R) -> Self {
        let snake = Snake::new();
        let food = food::place_food(&mut rng, &snake);
        Session {
            snake,
            food,
            score: 0,
            best_score: 0,
            mode: Mode::Running,
            crash: None,
            rng,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best final score of this run. Kept in memory only.
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Why the last game ended, while in `GameOver`.
    pub fn crash(&self) -> Option<Crash> {
        self.crash
    }

    /// Apply one input signal. Returns true when the player asked to quit.
    pub fn handle_signal(&mut self, signal: Signal, events: &mut Vec<GameEvent>) -> bool {
        match signal {
            Signal::Quit => return true,
            Signal::TogglePause => match self.mode {
                Mode::Running => {
                    self.mode = Mode::Paused;
                    events.push(GameEvent::Paused);
                }
                Mode::Paused => {
                    self.mode = Mode::Running;
                    events.push(GameEvent::Resumed);
                }
                Mode::GameOver | Mode::Won => {}
            },
            Signal::Restart => {
                self.restart();
                events.push(GameEvent::Restarted);
                if let Some(at) = self.food {
                    events.push(GameEvent::FoodPlaced { at });
                }
            }
            Signal::Turn(heading) => {
                if self.mode == Mode::Running {
                    self.snake.change_heading(heading);
                }
            }
        }
        false
    }

    /// Fresh snake and food, score back to zero, playing again.
    pub fn restart(&mut self) {
        self.snake = Snake::new();
        self.food = food::place_food(&mut self.rng, &self.snake);
        self.score = 0;
        self.crash = None;
        self.mode = Mode::Running;
    }

    /// Advance the game by one step. Does nothing unless `Running`.
    ///
    /// Order: move, eat, then collision check.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.mode != Mode::Running {
            return events;
        }

        self.snake.advance();

        if self.food == Some(self.snake.head()) {
            self.eat(&mut events);
            if self.mode == Mode::Won {
                return events;
            }
        }

        if let Some(cause) = self.detect_crash() {
            self.crash = Some(cause);
            self.mode = Mode::GameOver;
            self.best_score = self.best_score.max(self.score);
            events.push(GameEvent::Crashed { cause, score: self.score });
        }

        events
    }

    fn eat(&mut self, events: &mut Vec<GameEvent>) {
        let at = self.snake.head();
        self.score += SCORE_PER_FOOD;
        self.snake.grow();
        events.push(GameEvent::FoodEaten { at, score: self.score });

        self.food = food::place_food(&mut self.rng, &self.snake);
        match self.food {
            Some(at) => events.push(GameEvent::FoodPlaced { at }),
            None => {
                self.mode = Mode::Won;
                self.best_score = self.best_score.max(self.score);
                events.push(GameEvent::BoardFilled { score: self.score });
            }
        }
    }

    fn detect_crash(&self) -> Option<Crash> {
        if self.snake.collides_with_wall(GRID_WIDTH, GRID_HEIGHT) {
            Some(Crash::Wall)
        } else if self.snake.collides_with_self() {
            Some(Crash::SelfBite)
        } else {
            None
        }
    }
}
