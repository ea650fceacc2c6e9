use std::path::Path;

use super::{Context, Operator, OperatorReport};
use crate::error::Error;
use crate::naming;
use crate::state::{ImageRecord, Library};
use crate::texture;

/// Swap the images of the selected image-texture nodes for their rotated
/// (or de-rotated) counterparts.
///
/// The counterpart is taken from the catalog when it is already loaded, read
/// from disk when the file exists, and otherwise written by rotating the
/// current image. This writes image files next to the originals.
#[derive(Debug, Default, Clone, Copy)]
pub struct RotateImage;

impl RotateImage {
    pub const IDNAME: &'static str = "node.rotateimage";
}

impl Operator for RotateImage {
    fn idname(&self) -> &'static str {
        Self::IDNAME
    }

    fn label(&self) -> &'static str {
        "RotateImage"
    }

    fn execute(&self, ctx: &mut Context<'_>) -> Result<OperatorReport, Error> {
        let library = ctx.library;
        let Some(material) = ctx.scene.active_material_mut() else {
            log::warn!("Active object has no material, nothing to rotate");
            return Ok(OperatorReport::finished(0));
        };

        let mut touched = 0;
        for node in material.selected_textures_mut() {
            let Some(image_name) = node.image.as_deref() else {
                continue;
            };
            let Some(current) = library.find_by_name(image_name)? else {
                log::warn!("⚠️  {}: image {} is not in the catalog", node.name, image_name);
                continue;
            };

            let Some(counterpart) = swap_image(library, &current)? else {
                continue;
            };

            log::info!("🔄 {}: {} -> {}", node.name, current.name, counterpart.name);
            node.image = Some(counterpart.name);
            touched += 1;
        }

        Ok(OperatorReport::finished(touched))
    }
}

/// Find, load or create the counterpart of `current`
fn swap_image(library: &Library, current: &ImageRecord) -> Result<Option<ImageRecord>, Error> {
    // The catalog name carries the numeric suffix, the file path the directory
    let dir_end = current
        .filepath
        .rfind(['/', '\\'])
        .map_or(0, |sep| sep + 1);
    let lookup = format!("{}{}", &current.filepath[..dir_end], current.name);

    let resolution = match naming::resolve(&lookup) {
        Ok(resolution) => resolution,
        Err(e) => {
            log::warn!("⚠️  Skipping {}: {}", current.name, e);
            return Ok(None);
        }
    };

    if let Some(loaded) = library.find_by_name(&resolution.counterpart_name())? {
        return Ok(Some(loaded));
    }

    let counterpart_file = resolution.counterpart_file();
    if !Path::new(&counterpart_file).is_file() {
        texture::rotate_file(
            Path::new(&current.filepath),
            Path::new(&counterpart_file),
            resolution.rotation(),
        )?;
        log::info!("💾 Wrote {}", counterpart_file);
    }

    Ok(Some(library.load(&counterpart_file)?))
}
