pub mod geometry;
pub mod projector;
