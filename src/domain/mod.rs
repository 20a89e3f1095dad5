pub mod food;
pub mod grid;
pub mod intent;
pub mod rules;
