pub mod error;
pub mod font;
pub mod geometry;
pub mod packer;
pub mod renderer;
pub mod scene;
