/// Editor operators
///
/// Each operator works on the selected image-texture nodes of the active
/// object's active material. Everything an operator needs is handed to it
/// through a [`Context`].

pub mod box_toggle;
pub mod rotate_image;

pub use box_toggle::BoxToggle;
pub use rotate_image::RotateImage;

use crate::config::Settings;
use crate::error::Error;
use crate::state::{Library, Scene};

/// What an operator gets to see and change
pub struct Context<'a> {
    pub scene: &'a mut Scene,
    pub library: &'a Library,
    pub settings: &'a Settings,
}

impl<'a> Context<'a> {
    pub fn new(scene: &'a mut Scene, library: &'a Library, settings: &'a Settings) -> Self {
        Self {
            scene,
            library,
            settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Finished,
    /// The operator did not run because `poll` failed
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorReport {
    pub status: Status,
    /// Number of nodes changed
    pub touched: usize,
}

impl OperatorReport {
    pub fn finished(touched: usize) -> Self {
        Self {
            status: Status::Finished,
            touched,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            status: Status::Cancelled,
            touched: 0,
        }
    }
}

pub trait Operator {
    /// Registry identifier (e.g. "node.batchbox")
    fn idname(&self) -> &'static str;

    /// Name shown to the user
    fn label(&self) -> &'static str;

    /// Whether the operator can run in this context
    fn poll(&self, ctx: &Context<'_>) -> bool {
        ctx.scene.active_object.is_some()
    }

    fn execute(&self, ctx: &mut Context<'_>) -> Result<OperatorReport, Error>;
}

/// Run `op` if its poll passes
pub fn invoke(op: &dyn Operator, ctx: &mut Context<'_>) -> Result<OperatorReport, Error> {
    if !op.poll(ctx) {
        log::warn!("{} cancelled: no active object", op.label());
        return Ok(OperatorReport::cancelled());
    }

    let report = op.execute(ctx)?;
    log::info!("✅ {} finished, {} nodes changed", op.label(), report.touched);
    Ok(report)
}
