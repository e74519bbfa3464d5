pub mod entity;
pub mod field;
pub mod movement;
pub mod placement;
pub mod tile;
