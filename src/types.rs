//! Shared boundary types for the tabletop presentation engine.
//!
//! This module defines the geometry primitives used across components and
//! the one in-memory contract between engine and renderer:
//! - Engine → Renderer: `ResolvedFrame` containing ordered `DrawOp`s

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Color::Rgb { r, g, b } => [r, g, b],
            Color::Named(n) => match n {
                NamedColor::Black => [0, 0, 0],
                NamedColor::Red => [255, 0, 0],
                NamedColor::Green => [0, 255, 0],
                NamedColor::Yellow => [255, 255, 0],
                NamedColor::Blue => [0, 0, 255],
                NamedColor::Magenta => [255, 0, 255],
                NamedColor::Cyan => [0, 255, 255],
                NamedColor::White => [255, 255, 255],
            },
        }
    }

    /// Fully opaque pixel of this color.
    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.to_rgb();
        Rgba([r, g, b, 255])
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Integer pixel rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        PixelRect { x, y, width, height }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height as i64
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Overlap test with exclusive edges: rectangles that only touch do not
    /// collide, and empty rectangles never collide.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.width > 0
            && self.height > 0
            && other.width > 0
            && other.height > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ---------------------------------------------------------------------------
// Engine → Renderer boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct DrawOp<'a> {
    pub image: &'a RgbaImage,
    pub x: i64,
    pub y: i64,
}

/// A render-only image drawn after everything else. Used for the hover
/// magnification so the card's stored transform is never touched.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub image: RgbaImage,
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone)]
pub struct ResolvedFrame<'a> {
    /// Painter's order: earlier ops are covered by later ones.
    pub ops: Vec<DrawOp<'a>>,
    pub overlay: Option<Overlay>,
}
