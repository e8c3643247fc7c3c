//! Viewport negotiation and design → actual coordinate scaling.
//!
//! All asset positions are authored against a fixed design resolution. The
//! viewport records the resolution actually presented and the two
//! independent scale factors between them. There is no aspect-ratio
//! correction: a 4:3 window showing a 16:9 design stretches non-uniformly.

use std::fmt;

use image::RgbaImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::Point;

/// Named display resolutions, in table order.
pub const RESOLUTIONS: &[(&str, u32, u32)] = &[
    ("NONE", 0, 0),
    ("CGA", 320, 200),
    ("QVGA", 320, 240),
    ("CIF", 352, 288),
    ("SIF", 383, 288),
    ("HVGA", 480, 320),
    ("VGA", 640, 480),
    ("PAL1", 768, 576),
    ("WVGA1", 800, 480),
    ("SVGA", 800, 600),
    ("WVGA2", 854, 480),
    ("PAL2", 1024, 576),
    ("WSVGA", 1024, 600),
    ("XGA", 1024, 768),
    ("XGA+", 1152, 864),
    ("HD 720", 1280, 720),
    ("WXGA1", 1280, 768),
    ("WXGA2", 1280, 800),
    ("SXGA", 1280, 1024),
    ("SXGA+", 1400, 1050),
    ("UXGA", 1600, 1200),
    ("WSXGA+", 1680, 1050),
    ("HD 1080", 1920, 1080),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const VGA: Resolution = Resolution::new(640, 480);
    pub const HD_720: Resolution = Resolution::new(1280, 720);
    pub const HD_1080: Resolution = Resolution::new(1920, 1080);

    pub const fn new(width: u32, height: u32) -> Self {
        Resolution { width, height }
    }

    /// Look up a resolution by its table name (case-insensitive).
    pub fn by_name(name: &str) -> Result<Self> {
        RESOLUTIONS
            .iter()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, w, h)| Resolution::new(w, h))
            .ok_or_else(|| EngineError::UnknownResolution(name.to_string()))
    }

    /// Table name for this resolution, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        RESOLUTIONS
            .iter()
            .find(|&&(_, w, h)| w == self.width && h == self.height)
            .map(|&(n, _, _)| n)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Serialize for Resolution {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        [self.width, self.height].serialize(s)
    }
}

/// Accepts either a table name (`"HD 1080"`) or a `[width, height]` pair.
impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D>(d: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, SeqAccess, Visitor};

        struct ResolutionVisitor;

        impl<'de> Visitor<'de> for ResolutionVisitor {
            type Value = Resolution;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a resolution name or a [width, height] pair")
            }

            fn visit_str<E: Error>(self, v: &str) -> std::result::Result<Resolution, E> {
                Resolution::by_name(v).map_err(E::custom)
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Resolution, A::Error> {
                let width = seq
                    .next_element()?
                    .ok_or_else(|| A::Error::invalid_length(0, &self))?;
                let height = seq
                    .next_element()?
                    .ok_or_else(|| A::Error::invalid_length(1, &self))?;
                Ok(Resolution::new(width, height))
            }
        }

        d.deserialize_any(ResolutionVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DisplayMode {
    /// Present at the native display size; assets are not resized.
    Fullscreen { native: Resolution },
    /// Present at a fixed window size; assets are rescaled from design space.
    Windowed { resolution: Resolution },
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Windowed {
            resolution: Resolution::VGA,
        }
    }
}

/// Immutable after construction: scale factors are fixed once and applied
/// identically by every rescale call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    design: Resolution,
    actual: Resolution,
    scale_w: f64,
    scale_h: f64,
    fullscreen: bool,
}

impl Viewport {
    /// Negotiate the presented resolution. Zero-sized resolutions are a
    /// caller error and are not checked.
    pub fn initialize(design: Resolution, mode: DisplayMode) -> Self {
        let viewport = match mode {
            DisplayMode::Fullscreen { native } => Viewport {
                design,
                actual: native,
                scale_w: 1.0,
                scale_h: 1.0,
                fullscreen: true,
            },
            DisplayMode::Windowed { resolution } => Viewport {
                design,
                actual: resolution,
                scale_w: resolution.width as f64 / design.width as f64,
                scale_h: resolution.height as f64 / design.height as f64,
                fullscreen: false,
            },
        };
        log::info!(
            "viewport {} -> {} ({}), scale {:.4}x{:.4}",
            viewport.design,
            viewport.actual,
            if viewport.fullscreen { "fullscreen" } else { "windowed" },
            viewport.scale_w,
            viewport.scale_h,
        );
        viewport
    }

    pub fn design(&self) -> Resolution {
        self.design
    }

    pub fn actual(&self) -> Resolution {
        self.actual
    }

    pub fn width(&self) -> u32 {
        self.actual.width
    }

    pub fn height(&self) -> u32 {
        self.actual.height
    }

    pub fn scale_w(&self) -> f64 {
        self.scale_w
    }

    pub fn scale_h(&self) -> f64 {
        self.scale_h
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Size an image of `width × height` design pixels takes on screen.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            scale_dimension(width, self.scale_w),
            scale_dimension(height, self.scale_h),
        )
    }

    /// Resize an image by the viewport's independent width/height factors.
    pub fn rescale(&self, image: &RgbaImage) -> RgbaImage {
        let (w, h) = self.scaled_size(image.width(), image.height());
        if (w, h) == image.dimensions() {
            return image.clone();
        }
        imageops::resize(image, w, h, FilterType::Triangle)
    }

    pub fn to_actual(&self, p: Point) -> Point {
        Point::new(p.x * self.scale_w, p.y * self.scale_h)
    }

    pub fn to_design(&self, p: Point) -> Point {
        Point::new(p.x / self.scale_w, p.y / self.scale_h)
    }
}

fn scale_dimension(value: u32, factor: f64) -> u32 {
    if value == 0 {
        return 0;
    }
    ((value as f64 * factor).round() as u32).max(1)
}
