pub mod actors;
pub mod engine;
pub mod event;
pub mod grid;
pub mod level;
pub mod resolve;
pub mod world;
