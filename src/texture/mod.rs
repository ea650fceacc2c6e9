/// Texture file handling
///
/// This module handles:
/// - Rotating image files on disk by a quarter turn
/// - Reading image dimensions for the catalog

pub mod rotate;

pub use rotate::{image_dimensions, rotate_file, QuarterTurn, RotateError};
