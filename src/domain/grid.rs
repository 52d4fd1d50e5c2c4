/// Playfield geometry: fixed dimensions, cells and headings.
///
/// Positions are kept in playfield units (the same units the dimensions
/// are given in). Every cell coordinate is an exact multiple of
/// `CELL_SIZE`, so `(320, 240)` is the cell in column 16, row 12.

// ── Geometry ──

pub const GRID_WIDTH: i32 = 640;
pub const GRID_HEIGHT: i32 = 480;
pub const CELL_SIZE: i32 = 20;

pub const COLUMNS: usize = (GRID_WIDTH / CELL_SIZE) as usize; // 32
pub const ROWS: usize = (GRID_HEIGHT / CELL_SIZE) as usize; // 24
pub const TOTAL_CELLS: usize = COLUMNS * ROWS;

// ── Rules ──

pub const TICKS_PER_SECOND: u64 = 10;
pub const SCORE_PER_FOOD: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Cell at grid column/row (not units).
    pub const fn at(column: i32, row: i32) -> Self {
        Cell { x: column * CELL_SIZE, y: row * CELL_SIZE }
    }

    /// The neighbouring cell one step along `heading`.
    pub fn offset(self, heading: Heading) -> Cell {
        let (dx, dy) = heading.delta();
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn column(self) -> i32 {
        self.x.div_euclid(CELL_SIZE)
    }

    pub fn row(self) -> i32 {
        self.y.div_euclid(CELL_SIZE)
    }

    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        self.x >= 0 && self.x < width && self.y >= 0 && self.y < height
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Displacement of one step, in units. Screen coordinates: y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -CELL_SIZE),
            Heading::Down => (0, CELL_SIZE),
            Heading::Left => (-CELL_SIZE, 0),
            Heading::Right => (CELL_SIZE, 0),
        }
    }

    /// Component-wise negation of `delta()`.
    pub fn reverse(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_are_whole_cells() {
        assert_eq!(GRID_WIDTH % CELL_SIZE, 0);
        assert_eq!(GRID_HEIGHT % CELL_SIZE, 0);
        assert_eq!(COLUMNS, 32);
        assert_eq!(ROWS, 24);
        assert_eq!(TOTAL_CELLS, 768);
    }

    #[test]
    fn reverse_negates_delta() {
        for h in Heading::ALL {
            let (dx, dy) = h.delta();
            assert_eq!(h.reverse().delta(), (-dx, -dy));
            assert_eq!(h.reverse().reverse(), h);
        }
    }

    #[test]
    fn offset_moves_one_cell() {
        let c = Cell::new(100, 100);
        assert_eq!(c.offset(Heading::Right), Cell::new(120, 100));
        assert_eq!(c.offset(Heading::Left), Cell::new(80, 100));
        assert_eq!(c.offset(Heading::Up), Cell::new(100, 80));
        assert_eq!(c.offset(Heading::Down), Cell::new(100, 120));
    }

    #[test]
    fn column_row_of_negative_cell() {
        let c = Cell::new(-20, 460);
        assert_eq!(c.column(), -1);
        assert_eq!(c.row(), 23);
        assert_eq!(Cell::at(16, 12), Cell::new(320, 240));
    }

    #[test]
    fn bounds_are_half_open() {
        assert!(Cell::new(0, 0).in_bounds(GRID_WIDTH, GRID_HEIGHT));
        assert!(Cell::new(620, 460).in_bounds(GRID_WIDTH, GRID_HEIGHT));
        assert!(!Cell::new(640, 0).in_bounds(GRID_WIDTH, GRID_HEIGHT));
        assert!(!Cell::new(0, 480).in_bounds(GRID_WIDTH, GRID_HEIGHT));
        assert!(!Cell::new(-20, 0).in_bounds(GRID_WIDTH, GRID_HEIGHT));
        assert!(!Cell::new(0, -20).in_bounds(GRID_WIDTH, GRID_HEIGHT));
    }
}
