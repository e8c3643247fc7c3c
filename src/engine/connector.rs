//! Connector sprites: a filled, oriented bar between two points.
//!
//! The bar is rasterized once into its own transparent image whose origin is
//! the bar's bounding box corner. Flipped connectors are mirrored and then
//! moved one box-width (or height) to the flagged side; for a looped edge
//! this draws the two halves leaving the board on opposite sides instead of
//! one bar across it.

use image::RgbaImage;
use image::imageops;
use serde::{Deserialize, Serialize};

use super::raster;
use super::sprite::{PlacedSprite, SpriteKind};
use crate::types::{Color, Point};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flip {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Flip {
    pub const NONE: Flip = Flip {
        left: false,
        right: false,
        up: false,
        down: false,
    };

    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorSpec {
    pub from: Point,
    pub to: Point,
    pub width: f64,
    pub color: Color,
    pub flip: Flip,
}

impl ConnectorSpec {
    pub fn new(from: Point, to: Point, width: f64, color: Color) -> Self {
        ConnectorSpec {
            from,
            to,
            width,
            color,
            flip: Flip::NONE,
        }
    }

    pub fn flipped(mut self, flip: Flip) -> Self {
        self.flip = flip;
        self
    }

    /// Half-width offset perpendicular to the segment.
    pub fn perpendicular(&self) -> Point {
        let half = self.width / 2.0;
        let dx = self.from.x - self.to.x;
        let dy = self.from.y - self.to.y;
        // Horizontal (or zero-length) segments have no finite slope.
        if dy.abs() < f64::EPSILON {
            return Point::new(0.0, half);
        }
        let (px, py) = (-1.0_f64, dx / dy);
        let len = px.hypot(py);
        Point::new(px / len * half, py / len * half)
    }

    /// Quad corners in drawing order: A+p, A−p, B−p, B+p.
    pub fn corners(&self) -> [Point; 4] {
        let p = self.perpendicular();
        let (a, b) = (self.from, self.to);
        [
            Point::new(a.x + p.x, a.y + p.y),
            Point::new(a.x - p.x, a.y - p.y),
            Point::new(b.x - p.x, b.y - p.y),
            Point::new(b.x + p.x, b.y + p.y),
        ]
    }
}

/// Build the connector sprite. Never fails: degenerate segments fall back to
/// the horizontal case.
pub fn generate(id: impl Into<String>, spec: &ConnectorSpec) -> PlacedSprite {
    let corners = spec.corners();
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor();
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor();
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).ceil();
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil();
    let box_w = max_x - min_x;
    let box_h = max_y - min_y;

    let local = corners.map(|p| Point::new(p.x - min_x, p.y - min_y));
    let mut image = RgbaImage::new(box_w as u32 + 1, box_h as u32 + 1);
    raster::fill_convex_polygon(&mut image, &local, spec.color.to_rgba());

    let mut top_left = Point::new(min_x, min_y);
    if spec.flip.horizontal() {
        imageops::flip_horizontal_in_place(&mut image);
    }
    if spec.flip.vertical() {
        imageops::flip_vertical_in_place(&mut image);
    }
    if spec.flip.left {
        top_left.x -= box_w;
    }
    if spec.flip.right {
        top_left.x += box_w;
    }
    if spec.flip.up {
        top_left.y -= box_h;
    }
    if spec.flip.down {
        top_left.y += box_h;
    }

    PlacedSprite::new(
        id,
        top_left,
        image,
        SpriteKind::Connector {
            from: spec.from,
            to: spec.to,
        },
    )
}
