pub mod grid;
pub mod signal;
pub mod snake;
