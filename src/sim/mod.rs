pub mod clock;
pub mod engine;
pub mod event;
pub mod session;
pub mod state;
