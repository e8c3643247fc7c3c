//! Scene source: the human-authored description of what to load.
//!
//! These types say *what exists* (atlases, layers, cards, board data), not
//! how it is drawn. Paths are relative to the scene file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::atlas::ColorKey;
use super::board::{LineStyle, NodeStyle};
use super::fan::FanConfig;
use crate::error::{EngineError, Result};
use crate::viewport::{DisplayMode, Resolution};

fn default_design() -> Resolution {
    Resolution::HD_1080
}

fn default_fps() -> u32 {
    30
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSource {
    #[serde(default = "default_design")]
    pub design_resolution: Resolution,
    #[serde(default)]
    pub display: DisplayMode,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<PathBuf>,
    #[serde(default)]
    pub atlases: Vec<AtlasSource>,
    #[serde(default)]
    pub layers: Vec<LayerSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<CardSource>,
    #[serde(default)]
    pub hand: HandSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasSource {
    pub name: String,
    pub image: PathBuf,
    pub index: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_key: Option<ColorKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSource {
    /// Insertion index; existing layers at or above it move up.
    pub index: usize,
    pub sprites: Vec<LayerSprite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSprite {
    pub atlas: String,
    pub sprite_id: String,
    /// Top-left in design coordinates.
    pub position: [i64; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSource {
    pub dir: PathBuf,
    /// Sort each directory by name instead of filesystem order.
    #[serde(default)]
    pub sorted: bool,
    /// Named decks carved out of the draw pile, in order.
    #[serde(default)]
    pub decks: Vec<DeckSource>,
}

/// A deck selects cards by tag (the card's sub-directory). An empty
/// `include` list accepts every tag not excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSource {
    pub name: String,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl DeckSource {
    pub fn accepts(&self, tag: &str) -> bool {
        (self.include.is_empty() || self.include.iter().any(|t| t == tag))
            && !self.exclude.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandSource {
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Cards dealt into the hand at startup.
    #[serde(default)]
    pub initial: usize,
    /// Deck the initial cards come from; the draw pile when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<String>,
    #[serde(default)]
    pub fan: FanConfig,
}

impl Default for HandSource {
    fn default() -> Self {
        HandSource {
            visible: true,
            initial: 0,
            deck: None,
            fan: FanConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSource {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub icon_atlas: String,
    pub label_atlas: String,
    #[serde(default)]
    pub line: LineStyle,
    #[serde(default)]
    pub node_style: NodeStyle,
}

impl SceneSource {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// Read and deserialize a JSON data file.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}
