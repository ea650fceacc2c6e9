//! Shared data structures for the tool state
//!
//! These structs represent the scene model the operators work on and the
//! records stored in the image catalog.

use serde::{Deserialize, Serialize};

/// Represents a single image in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Unique database ID
    pub id: i64,
    /// Catalog name, unique (e.g., "brick.png" or "brick.png.001")
    pub name: String,
    /// Full path to the image file
    pub filepath: String,
    pub width: u32,
    pub height: u32,
    /// Unix timestamp of when the image was loaded
    pub loaded_at: i64,
}

/// Texture mapping strategy of an image-texture node
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Projection {
    #[default]
    Flat,
    Box,
}

/// Node type tag
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    TexImage,
    /// Any node the tools do not touch, keeps its type name
    Other(String),
}

/// A node in a material's shader graph
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShaderNode {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub select: bool,
    /// Name of the bound image in the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default)]
    pub projection_blend: f32,
}

impl ShaderNode {
    /// Create an unselected image-texture node
    pub fn tex_image(name: &str, image: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::TexImage,
            select: false,
            image: image.map(str::to_string),
            projection: Projection::Flat,
            projection_blend: 0.0,
        }
    }

    /// Whether this node is a selected image-texture node
    pub fn is_selected_texture(&self) -> bool {
        self.select && self.kind == NodeKind::TexImage
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<ShaderNode>,
}

impl Material {
    /// Selected image-texture nodes, in graph order
    pub fn selected_textures_mut(&mut self) -> impl Iterator<Item = &mut ShaderNode> {
        self.nodes.iter_mut().filter(|node| node.is_selected_texture())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SceneObject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_material: Option<Material>,
}

/// Everything the operators can see
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_object: Option<SceneObject>,
}

impl Scene {
    pub fn active_material_mut(&mut self) -> Option<&mut Material> {
        self.active_object
            .as_mut()
            .and_then(|object| object.active_material.as_mut())
    }
}
