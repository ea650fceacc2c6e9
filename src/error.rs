use crate::config::ConfigError;
use crate::keymap::KeymapError;
use crate::naming::NamingError;
use crate::state::library::LibraryError;
use crate::state::scene::SceneError;
use crate::texture::RotateError;

/// Any failure surfaced by the tools
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Texture(#[from] RotateError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Keymap(#[from] KeymapError),
}
