/// Food placement: uniform random cell that the snake does not occupy.

use rand::Rng;

use crate::domain::grid::{Cell, COLUMNS, ROWS, TOTAL_CELLS};
use crate::domain::snake::Snake;

/// Uniformly random cell anywhere on the grid.
pub fn random_cell<R: Rng + ?Sized>(rng: &mut R) -> Cell {
    let column = rng.gen_range(0..COLUMNS as i32);
    let row = rng.gen_range(0..ROWS as i32);
    Cell::at(column, row)
}

/// Sample until the cell is off the snake.
///
/// Returns `None` when the snake covers every cell: there is nowhere left
/// to put food, and rejection sampling would never finish.
pub fn place_food<R: Rng + ?Sized>(rng: &mut R, snake: &Snake) -> Option<Cell> {
    if snake.len() >= TOTAL_CELLS {
        return None;
    }
    loop {
        let cell = random_cell(rng);
        if !snake.occupies(cell) {
            return Some(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{Heading, GRID_HEIGHT, GRID_WIDTH};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Snake that snakes row by row over the first `len` cells of the grid.
    fn snake_covering(len: usize) -> Snake {
        let body = (0..len)
            .map(|i| {
                let row = (i / COLUMNS) as i32;
                let col = (i % COLUMNS) as i32;
                let col = if row % 2 == 0 { col } else { COLUMNS as i32 - 1 - col };
                Cell::at(col, row)
            })
            .rev()
            .collect();
        Snake::from_parts(body, Heading::Right, 0)
    }

    #[test]
    fn random_cell_is_aligned_and_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let c = random_cell(&mut rng);
            assert!(c.in_bounds(GRID_WIDTH, GRID_HEIGHT), "{c:?}");
            assert_eq!(c.x % 20, 0);
            assert_eq!(c.y % 20, 0);
        }
    }

    #[test]
    fn food_never_lands_on_snake() {
        let mut rng = StdRng::seed_from_u64(42);
        let snake = snake_covering(TOTAL_CELLS / 2);
        for _ in 0..500 {
            let food = place_food(&mut rng, &snake).expect("free cells remain");
            assert!(!snake.occupies(food));
        }
    }

    #[test]
    fn finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = snake_covering(TOTAL_CELLS - 1);
        let free = (0..ROWS as i32)
            .flat_map(|r| (0..COLUMNS as i32).map(move |c| Cell::at(c, r)))
            .find(|c| !snake.occupies(*c))
            .unwrap();
        assert_eq!(place_food(&mut rng, &snake), Some(free));
    }

    #[test]
    fn full_board_has_no_food() {
        let mut rng = StdRng::seed_from_u64(1);
        let snake = snake_covering(TOTAL_CELLS);
        assert_eq!(place_food(&mut rng, &snake), None);
    }
}
