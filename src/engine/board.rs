//! Board-graph assembly: node sprites composed from atlas art, and the
//! connectors drawn between them.

use std::collections::HashMap;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::connector::{self, ConnectorSpec, Flip};
use super::sprite::{PlacedSprite, SpriteKind};
use crate::error::{EngineError, Result};
use crate::types::{Color, Point};
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub sprite_id: String,
    pub sprite_icon: String,
    /// Top-left in design coordinates.
    pub position: [i64; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub connection: [String; 2],
    /// Draw both directions, each leaving the board on its own side.
    #[serde(rename = "loop", default)]
    pub looped: bool,
}

/// Node art dimensions in design pixels: an icon centred above a name
/// label, the label tucked up under the icon by `label_upshift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub icon_size: u32,
    pub label_width: u32,
    pub label_height: u32,
    pub label_upshift: u32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        NodeStyle {
            icon_size: 50,
            label_width: 150,
            label_height: 24,
            label_upshift: 10,
        }
    }
}

impl NodeStyle {
    /// Connector attachment point relative to the node's top-left.
    pub fn anchor_offset(&self) -> (f64, f64) {
        (
            (self.label_width / 2) as f64,
            (self.icon_size / 2) as f64,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            color: Color::rgb(160, 255, 255),
            width: 3.0,
        }
    }
}

/// Stack the icon over the label into one transparent image.
pub fn compose_node(icon: &RgbaImage, label: &RgbaImage, style: &NodeStyle) -> RgbaImage {
    let icon = imageops::resize(icon, style.icon_size, style.icon_size, FilterType::Triangle);
    let label = imageops::resize(label, style.label_width, style.label_height, FilterType::Triangle);
    let height = (style.icon_size + style.label_height).saturating_sub(style.label_upshift);
    let mut out = RgbaImage::new(style.label_width.max(style.icon_size), height);
    let icon_x = (style.label_width as i64 - style.icon_size as i64) / 2;
    imageops::overlay(&mut out, &icon, icon_x.max(0), 0);
    let label_y = style.icon_size as i64 - style.label_upshift as i64;
    imageops::overlay(&mut out, &label, 0, label_y);
    out
}

#[derive(Debug, Default)]
pub struct Board {
    pub nodes: Vec<PlacedSprite>,
    pub connectors: Vec<PlacedSprite>,
}

pub struct BoardArt<'a> {
    pub icons: &'a HashMap<String, RgbaImage>,
    pub labels: &'a HashMap<String, RgbaImage>,
}

fn lookup<'m>(map: &'m HashMap<String, RgbaImage>, id: &str) -> Result<&'m RgbaImage> {
    map.get(id)
        .ok_or_else(|| EngineError::UnknownSprite { id: id.to_string() })
}

/// Build node and connector sprites, already placed in actual pixels.
pub fn build_board(
    nodes: &[NodeRecord],
    edges: &[EdgeRecord],
    art: &BoardArt<'_>,
    node_style: &NodeStyle,
    line: &LineStyle,
    viewport: &Viewport,
) -> Result<Board> {
    let (ax, ay) = node_style.anchor_offset();

    let mut board = Board::default();
    let mut anchors: HashMap<&str, Point> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        let icon = lookup(art.icons, &node.sprite_icon)?;
        let label = lookup(art.labels, &node.sprite_id)?;
        let image = viewport.rescale(&compose_node(icon, label, node_style));

        let [x, y] = node.position;
        let top_left = viewport.to_actual(Point::new(x as f64, y as f64));
        let anchor = viewport.to_actual(Point::new(x as f64 + ax, y as f64 + ay));
        anchors.insert(node.sprite_id.as_str(), anchor);
        board.nodes.push(PlacedSprite::new(
            node.sprite_id.clone(),
            top_left,
            image,
            SpriteKind::BoardNode {
                icon: node.sprite_icon.clone(),
                anchor,
            },
        ));
    }

    let anchor_of = |id: &str| {
        anchors
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::UnknownSprite { id: id.to_string() })
    };
    for edge in edges {
        let [a, b] = &edge.connection;
        let (pa, pb) = (anchor_of(a)?, anchor_of(b)?);

        let forward = ConnectorSpec::new(pa, pb, line.width, line.color).flipped(Flip {
            left: edge.looped,
            ..Flip::NONE
        });
        board.connectors.push(connector::generate(format!("{a}{b}"), &forward));

        if edge.looped {
            let back = ConnectorSpec::new(pb, pa, line.width, line.color).flipped(Flip {
                right: true,
                ..Flip::NONE
            });
            board.connectors.push(connector::generate(format!("{b}{a}"), &back));
        }
    }

    log::info!(
        "board built: {} nodes, {} connectors",
        board.nodes.len(),
        board.connectors.len()
    );
    Ok(board)
}
