//! Box projection and texture rotation tools for shader node graphs.
//!
//! - [`naming`] works out rotated/original counterpart file names
//! - [`ops`] holds the two editor operators (`BoxToggle`, `RotateImage`)
//! - [`keymap`] registers them and binds them to keys
//! - [`state`] is the scene model and the image catalog

pub mod config;
pub mod error;
pub mod keymap;
pub mod naming;
pub mod ops;
pub mod state;
pub mod texture;

pub use error::Error;
pub use naming::{resolve, ImageNameInfo, NamingError, Resolution};
