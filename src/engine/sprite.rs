//! Sprites and the registry that owns them.
//!
//! Layers and the hand refer to sprites by `SpriteHandle`; only the
//! registry holds the images.

use std::collections::HashMap;
use std::path::PathBuf;

use image::RgbaImage;

use super::raster;
use crate::types::{PixelRect, Point};

/// What a sprite represents. Fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteKind {
    Card {
        /// Directory the card image was found in, relative to the card root.
        tag: String,
        source: PathBuf,
    },
    BoardNode {
        icon: String,
        /// Where connectors attach, in actual pixels.
        anchor: Point,
    },
    Connector {
        from: Point,
        to: Point,
    },
    Generic,
}

#[derive(Debug, Clone)]
pub struct PlacedSprite {
    id: String,
    original: RgbaImage,
    image: RgbaImage,
    top_left: Point,
    kind: SpriteKind,
}

impl PlacedSprite {
    pub fn new(id: impl Into<String>, top_left: Point, image: RgbaImage, kind: SpriteKind) -> Self {
        PlacedSprite {
            id: id.into(),
            original: image.clone(),
            image,
            top_left,
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &SpriteKind {
        &self.kind
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    /// The image as currently drawn (after any rotate).
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn set_top_left(&mut self, top_left: Point) {
        self.top_left = top_left;
    }

    /// Bounding rect, always derived from the current image size.
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(
            self.top_left.x.round() as i64,
            self.top_left.y.round() as i64,
            self.image.width(),
            self.image.height(),
        )
    }

    /// Re-derive the current image from the original, rotated by
    /// `angle_degrees` (counter-clockwise) and scaled by `scale`.
    ///
    /// The rect's size follows the new image but `top_left` is left as is:
    /// callers that care about placement must set it again afterwards.
    pub fn rotate(&mut self, angle_degrees: f64, scale: f64) {
        self.image = raster::rotozoom(&self.original, angle_degrees, scale);
    }

    pub fn contains(&self, p: Point) -> bool {
        let r = self.rect();
        p.x >= r.x as f64 && p.y >= r.y as f64 && p.x < r.right() as f64 && p.y < r.bottom() as f64
    }

    pub fn collides(&self, other: &PixelRect) -> bool {
        self.rect().intersects(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteHandle(usize);

impl SpriteHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SpriteRegistry {
    sprites: Vec<PlacedSprite>,
    by_id: HashMap<String, SpriteHandle>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a sprite. A later sprite with the same id shadows
    /// the earlier one for `find`, but both stay addressable by handle.
    pub fn insert(&mut self, sprite: PlacedSprite) -> SpriteHandle {
        let handle = SpriteHandle(self.sprites.len());
        self.by_id.insert(sprite.id.clone(), handle);
        self.sprites.push(sprite);
        handle
    }

    pub fn create_sprite(
        &mut self,
        id: impl Into<String>,
        top_left: Point,
        image: RgbaImage,
        kind: SpriteKind,
    ) -> SpriteHandle {
        self.insert(PlacedSprite::new(id, top_left, image, kind))
    }

    pub fn get(&self, handle: SpriteHandle) -> Option<&PlacedSprite> {
        self.sprites.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: SpriteHandle) -> Option<&mut PlacedSprite> {
        self.sprites.get_mut(handle.0)
    }

    pub fn find(&self, id: &str) -> Option<SpriteHandle> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpriteHandle, &PlacedSprite)> {
        self.sprites
            .iter()
            .enumerate()
            .map(|(i, s)| (SpriteHandle(i), s))
    }
}
