use super::{Context, Operator, OperatorReport};
use crate::error::Error;
use crate::state::Projection;

/// Toggle box and flat projection on the selected image-texture nodes.
///
/// Switching to box also resets the projection blend to the configured value.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxToggle;

impl BoxToggle {
    pub const IDNAME: &'static str = "node.batchbox";
}

impl Operator for BoxToggle {
    fn idname(&self) -> &'static str {
        Self::IDNAME
    }

    fn label(&self) -> &'static str {
        "BoxToggle"
    }

    fn execute(&self, ctx: &mut Context<'_>) -> Result<OperatorReport, Error> {
        let blend = ctx.settings.projection_blend;
        let Some(material) = ctx.scene.active_material_mut() else {
            log::warn!("Active object has no material, nothing to toggle");
            return Ok(OperatorReport::finished(0));
        };

        let mut touched = 0;
        for node in material.selected_textures_mut() {
            if node.projection != Projection::Box {
                node.projection = Projection::Box;
                node.projection_blend = blend;
            } else {
                node.projection = Projection::Flat;
            }
            log::info!("📦 {}: projection {:?}", node.name, node.projection);
            touched += 1;
        }

        Ok(OperatorReport::finished(touched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::ops::{invoke, Status};
    use crate::state::{Library, Material, NodeKind, Scene, SceneObject, ShaderNode};

    fn scene_with(nodes: Vec<ShaderNode>) -> Scene {
        Scene {
            active_object: Some(SceneObject {
                name: "Cube".to_string(),
                active_material: Some(Material {
                    name: "Brick".to_string(),
                    nodes,
                }),
            }),
        }
    }

    fn selected(name: &str) -> ShaderNode {
        ShaderNode {
            select: true,
            ..ShaderNode::tex_image(name, None)
        }
    }

    #[test]
    fn test_flat_to_box_sets_blend() {
        let library = Library::open_in_memory().unwrap();
        let settings = Settings::default();
        let mut scene = scene_with(vec![selected("A")]);

        let report = invoke(&BoxToggle, &mut Context::new(&mut scene, &library, &settings)).unwrap();
        assert_eq!(report, OperatorReport::finished(1));

        let node = &scene.active_material_mut().unwrap().nodes[0];
        assert_eq!(node.projection, Projection::Box);
        assert_eq!(node.projection_blend, 0.2);
    }

    #[test]
    fn test_box_to_flat_keeps_blend() {
        let library = Library::open_in_memory().unwrap();
        let settings = Settings::default();
        let mut scene = scene_with(vec![ShaderNode {
            projection: Projection::Box,
            projection_blend: 0.7,
            ..selected("A")
        }]);

        invoke(&BoxToggle, &mut Context::new(&mut scene, &library, &settings)).unwrap();

        let node = &scene.active_material_mut().unwrap().nodes[0];
        assert_eq!(node.projection, Projection::Flat);
        assert_eq!(node.projection_blend, 0.7);
    }

    #[test]
    fn test_only_selected_textures_change() {
        let library = Library::open_in_memory().unwrap();
        let settings = Settings {
            projection_blend: 0.5,
            ..Settings::default()
        };
        let mut scene = scene_with(vec![
            selected("A"),
            ShaderNode::tex_image("B", None),
            ShaderNode {
                kind: NodeKind::Other("MAPPING".to_string()),
                ..selected("C")
            },
        ]);

        let report = invoke(&BoxToggle, &mut Context::new(&mut scene, &library, &settings)).unwrap();
        assert_eq!(report.touched, 1);

        let nodes = &scene.active_material_mut().unwrap().nodes;
        assert_eq!(nodes[0].projection, Projection::Box);
        assert_eq!(nodes[0].projection_blend, 0.5);
        assert_eq!(nodes[1].projection, Projection::Flat);
        assert_eq!(nodes[2].projection, Projection::Flat);
    }

    #[test]
    fn test_no_active_object_cancels() {
        let library = Library::open_in_memory().unwrap();
        let settings = Settings::default();
        let mut scene = Scene::default();

        let report = invoke(&BoxToggle, &mut Context::new(&mut scene, &library, &settings)).unwrap();
        assert_eq!(report.status, Status::Cancelled);
    }

    #[test]
    fn test_no_material_is_noop() {
        let library = Library::open_in_memory().unwrap();
        let settings = Settings::default();
        let mut scene = Scene {
            active_object: Some(SceneObject {
                name: "Empty".to_string(),
                active_material: None,
            }),
        };

        let report = invoke(&BoxToggle, &mut Context::new(&mut scene, &library, &settings)).unwrap();
        assert_eq!(report, OperatorReport::finished(0));
    }
}
