/// State management module
///
/// This module handles all tool state, including:
/// - The scene model and its shader node graphs (data.rs)
/// - Loading and saving scene documents (scene.rs)
/// - The image catalog backing node images (library.rs)

pub mod data;
pub mod library;
pub mod scene;

pub use data::{ImageRecord, Material, NodeKind, Projection, Scene, SceneObject, ShaderNode};
pub use library::{Library, LibraryError};
