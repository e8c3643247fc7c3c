use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::error::{EngineError, Result};
use crate::viewport::Viewport;

/// The display resource: viewport, background and the canvas every frame
/// is composed onto. Created once at startup and handed to whoever draws.
pub struct RenderContext {
    viewport: Viewport,
    background: Option<RgbaImage>,
    canvas: RgbaImage,
}

impl RenderContext {
    pub fn new(viewport: Viewport) -> Self {
        RenderContext {
            canvas: RgbaImage::from_pixel(viewport.width(), viewport.height(), Rgba([0, 0, 0, 255])),
            viewport,
            background: None,
        }
    }

    /// Load the background image, rescaled into viewport space.
    pub fn with_background_file(mut self, path: &Path) -> Result<Self> {
        let image = image::open(path)
            .map_err(|source| EngineError::FatalAsset {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        self.set_background(image);
        Ok(self)
    }

    pub fn set_background(&mut self, image: RgbaImage) {
        self.background = Some(self.viewport.rescale(&image));
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn background(&self) -> Option<&RgbaImage> {
        self.background.as_ref()
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub(super) fn canvas_and_background(&mut self) -> (&mut RgbaImage, Option<&RgbaImage>) {
        (&mut self.canvas, self.background.as_ref())
    }
}
