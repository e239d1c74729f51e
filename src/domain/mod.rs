pub mod ai;
pub mod direction;
pub mod entity;
pub mod tile;
