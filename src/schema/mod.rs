pub mod bindings;
pub mod geometry;
pub mod speech;
pub mod world;
