/// The snake: body segments (head first), heading and pending growth.
///
/// The snake knows nothing about food, score or the playfield edges.
/// It may step outside the grid; callers detect that with
/// `collides_with_wall` after moving.

use std::collections::VecDeque;

use super::grid::{Cell, Heading, CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};

pub const INITIAL_LENGTH: usize = 3;

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Heading,
    pending_growth: u32,
}

impl Snake {
    /// Default snake: three segments laid out horizontally, head at the
    /// centre of the grid, moving right.
    pub fn new() -> Self {
        let head = Cell::new(GRID_WIDTH / 2, GRID_HEIGHT / 2);
        let body = (0..INITIAL_LENGTH as i32)
            .map(|i| Cell::new(head.x - i * CELL_SIZE, head.y))
            .collect();
        Snake { body, heading: Heading::Right, pending_growth: 0 }
    }

    /// Build a snake from explicit segments. `body` must be non-empty.
    #[cfg(test)]
    pub fn from_parts(body: Vec<Cell>, heading: Heading, pending_growth: u32) -> Self {
        assert!(!body.is_empty(), "snake body must have a head");
        Snake { body: body.into(), heading, pending_growth }
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    #[cfg(test)]
    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub fn head(&self) -> Cell {
        // Body is never empty: built with at least one segment and
        // `advance` pushes before it pops.
        self.body[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// One step along the current heading. The tail stays in place while
    /// growth is pending, so the snake gets one segment longer.
    pub fn advance(&mut self) {
        let new_head = self.head().offset(self.heading);
        self.body.push_front(new_head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop_back();
        }
    }

    /// Turning straight back is ignored.
    pub fn change_heading(&mut self, heading: Heading) {
        if heading == self.heading.reverse() {
            return;
        }
        self.heading = heading;
    }

    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&c| c == head)
    }

    pub fn collides_with_wall(&self, width: i32, height: i32) -> bool {
        !self.head().in_bounds(width, height)
    }
}

impl Default for Snake {
    fn default() -> Self {
        Snake::new()
    }
}
