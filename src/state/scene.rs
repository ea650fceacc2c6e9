//! Scene documents
//!
//! A scene is stored as a JSON file. The operators edit it in memory and the
//! CLI writes it back once they finish.

use super::data::Scene;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Scene {
    /// Convert to a pretty JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{NodeKind, Projection};

    const SCENE: &str = r#"{
        "active_object": {
            "name": "Cube",
            "active_material": {
                "name": "Brick",
                "nodes": [
                    { "name": "Image Texture", "kind": "tex_image", "select": true, "image": "brick.png" },
                    { "name": "Principled BSDF", "kind": { "other": "BSDF_PRINCIPLED" } }
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let mut scene = Scene::from_json(SCENE).unwrap();
        let material = scene.active_material_mut().unwrap();

        let texture = &material.nodes[0];
        assert_eq!(texture.kind, NodeKind::TexImage);
        assert_eq!(texture.projection, Projection::Flat);
        assert_eq!(texture.image.as_deref(), Some("brick.png"));

        let bsdf = &material.nodes[1];
        assert_eq!(bsdf.kind, NodeKind::Other("BSDF_PRINCIPLED".to_string()));
        assert!(!bsdf.select);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let mut scene = Scene::from_json(SCENE).unwrap();
        scene.active_material_mut().unwrap().nodes[0].projection = Projection::Box;
        scene.save(&path).unwrap();

        let restored = Scene::load(&path).unwrap();
        assert_eq!(scene, restored);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scene::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }
}
