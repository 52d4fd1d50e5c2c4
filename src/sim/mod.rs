pub mod event;
pub mod food;
pub mod session;
