//! Atlas extraction: slicing named sub-images out of one packed image.
//!
//! An atlas is paired with a JSON index of `{sprite_id, position, rotate?}`
//! records. Records are validated up front so a broken index fails at load
//! time with the offending record and field, never halfway through a frame.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::raster;
use crate::error::{EngineError, Result};
use crate::types::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorKey {
    /// Use the top-left pixel of each extracted region as the key.
    TopLeft,
    #[serde(untagged)]
    Color(Color),
}

/// Source rectangle inside an atlas, in atlas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        AtlasRect { x, y, width, height }
    }
}

impl From<[u32; 4]> for AtlasRect {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        AtlasRect::new(x, y, width, height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub sprite_id: String,
    pub position: AtlasRect,
    pub rotate: bool,
}

/// One record as written on disk; required fields are checked afterwards so
/// the error can name them.
#[derive(Debug, Deserialize)]
struct RawIndexEntry {
    sprite_id: Option<String>,
    position: Option<[u32; 4]>,
    #[serde(default)]
    rotate: bool,
}

/// Parse an atlas index document.
pub fn parse_index(json: &str) -> std::result::Result<Vec<IndexEntry>, IndexError> {
    let raw: Vec<RawIndexEntry> = serde_json::from_str(json).map_err(IndexError::Json)?;
    raw.into_iter()
        .enumerate()
        .map(|(record, entry)| {
            let sprite_id = entry.sprite_id.ok_or(IndexError::Missing {
                record,
                field: "sprite_id",
            })?;
            let position = entry.position.ok_or(IndexError::Missing {
                record,
                field: "position",
            })?;
            Ok(IndexEntry {
                sprite_id,
                position: position.into(),
                rotate: entry.rotate,
            })
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to parse index: {0}")]
    Json(#[source] serde_json::Error),

    #[error("index record {record} is missing required field `{field}`")]
    Missing { record: usize, field: &'static str },
}

/// Read and validate an atlas index file.
pub fn load_index(path: &Path) -> Result<Vec<IndexEntry>> {
    let json = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_index(&json).map_err(|e| match e {
        IndexError::Json(source) => EngineError::Json {
            path: path.to_path_buf(),
            source,
        },
        IndexError::Missing { record, field } => EngineError::MalformedIndex { record, field },
    })?;
    log::debug!("index {} has {} records", path.display(), entries.len());
    Ok(entries)
}

pub struct Atlas {
    path: Option<PathBuf>,
    sheet: RgbaImage,
}

impl Atlas {
    /// Decode an atlas image. Failure is fatal for everything sliced from it.
    pub fn open(path: &Path) -> Result<Self> {
        let sheet = image::open(path)
            .map_err(|source| EngineError::FatalAsset {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        log::info!(
            "atlas {} decoded ({}x{})",
            path.display(),
            sheet.width(),
            sheet.height()
        );
        Ok(Atlas {
            path: Some(path.to_path_buf()),
            sheet,
        })
    }

    pub fn from_image(sheet: RgbaImage) -> Self {
        Atlas { path: None, sheet }
    }

    pub fn size(&self) -> (u32, u32) {
        self.sheet.dimensions()
    }

    /// Copy `rect` out of the atlas onto a fresh transparent surface of the
    /// rect's size. Parts of `rect` outside the atlas stay transparent.
    pub fn extract_one(&self, rect: AtlasRect, color_key: Option<ColorKey>) -> RgbaImage {
        let mut out = RgbaImage::from_pixel(rect.width, rect.height, Rgba([0, 0, 0, 0]));
        let (sw, sh) = self.sheet.dimensions();
        let x_end = rect.x.saturating_add(rect.width).min(sw);
        let y_end = rect.y.saturating_add(rect.height).min(sh);
        for sy in rect.y..y_end {
            for sx in rect.x..x_end {
                out.put_pixel(sx - rect.x, sy - rect.y, *self.sheet.get_pixel(sx, sy));
            }
        }

        let key = match color_key {
            None => None,
            Some(ColorKey::Color(c)) => Some(c.to_rgb()),
            Some(ColorKey::TopLeft) if rect.width > 0 && rect.height > 0 => {
                let p = out.get_pixel(0, 0).0;
                Some([p[0], p[1], p[2]])
            }
            Some(ColorKey::TopLeft) => None,
        };
        if let Some(key) = key {
            raster::apply_color_key(&mut out, key);
        }
        out
    }

    pub fn extract_many(&self, rects: &[AtlasRect], color_key: Option<ColorKey>) -> Vec<RgbaImage> {
        rects.iter().map(|&r| self.extract_one(r, color_key)).collect()
    }

    /// Extract `count` equally sized frames laid out left to right starting
    /// at `rect`. No wrapping onto following rows; the strip ends early if a
    /// frame's offset would not fit in atlas coordinates.
    pub fn extract_strip(
        &self,
        rect: AtlasRect,
        count: usize,
        color_key: Option<ColorKey>,
    ) -> Vec<RgbaImage> {
        let rects: Vec<AtlasRect> = (0..count)
            .map_while(|i| {
                let i = u32::try_from(i).ok()?;
                let x = rect.width.checked_mul(i)?.checked_add(rect.x)?;
                Some(AtlasRect { x, ..rect })
            })
            .collect();
        self.extract_many(&rects, color_key)
    }

    /// Slice every index entry; entries flagged `rotate` are turned a
    /// quarter counter-clockwise. A repeated `sprite_id` replaces the
    /// earlier image.
    pub fn extract_from_index(
        &self,
        entries: &[IndexEntry],
        color_key: Option<ColorKey>,
    ) -> HashMap<String, RgbaImage> {
        let mut out = HashMap::with_capacity(entries.len());
        for entry in entries {
            let mut img = self.extract_one(entry.position, color_key);
            if entry.rotate {
                img = raster::rotate_quarter_ccw(&img);
            }
            if out.insert(entry.sprite_id.clone(), img).is_some() {
                log::debug!("sprite `{}` redefined by a later index record", entry.sprite_id);
            }
        }
        if let Some(path) = &self.path {
            log::info!("{} sprites extracted from {}", out.len(), path.display());
        }
        out
    }
}
