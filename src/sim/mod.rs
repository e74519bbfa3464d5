pub mod driver;
pub mod event;
pub mod state;
pub mod step;
