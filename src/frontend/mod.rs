//! macroquad window side: keys, files on disk, sounds and drawing.

pub mod assets;
pub mod input;
pub mod render;
