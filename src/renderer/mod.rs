//! Renderer — the deterministic compositor.
//!
//! Takes a `ResolvedFrame` (in-memory, from the engine) and paints it onto
//! the `RenderContext` canvas. The renderer is stateless: it knows nothing
//! about layout, hands or layers, only the order it was given.

mod context;

use std::path::Path;

use image::Rgba;
use image::imageops;

use crate::error::{EngineError, Result};
use crate::types::ResolvedFrame;

pub use context::RenderContext;

pub struct Renderer;

impl Renderer {
    /// Paint a frame: clear, background at the origin, each op in order,
    /// then the overlay. Everything is alpha-blended and clipped to the
    /// canvas.
    pub fn rasterize(frame: &ResolvedFrame<'_>, ctx: &mut RenderContext) {
        let (canvas, background) = ctx.canvas_and_background();
        for px in canvas.pixels_mut() {
            *px = Rgba([0, 0, 0, 255]);
        }
        if let Some(bg) = background {
            imageops::overlay(canvas, bg, 0, 0);
        }
        for op in &frame.ops {
            imageops::overlay(canvas, op.image, op.x, op.y);
        }
        if let Some(overlay) = &frame.overlay {
            imageops::overlay(canvas, &overlay.image, overlay.x, overlay.y);
        }
    }

    pub fn save_png(ctx: &RenderContext, path: &Path) -> Result<()> {
        ctx.canvas()
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| EngineError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}
