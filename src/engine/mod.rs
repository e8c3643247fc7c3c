//! Engine — the stage.
//!
//! Owns every sprite, the layer stack and the hand, and turns them into a
//! `ResolvedFrame` (an ordered draw list) once per frame. The engine
//! understands layout and z-order; it never touches a canvas or terminal.

pub mod atlas;
pub mod board;
pub mod cards;
pub mod connector;
pub mod fan;
pub mod hand;
pub mod layers;
pub mod raster;
pub mod source;
pub mod sprite;

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use image::RgbaImage;

use crate::error::{EngineError, Result};
use crate::types::{DrawOp, Point, ResolvedFrame};
use crate::viewport::Viewport;
use atlas::Atlas;
use board::{BoardArt, EdgeRecord, NodeRecord};
use fan::{FanConfig, FanGeometry, FanLayout};
use hand::Hand;
use layers::LayerStack;
use source::{SceneSource, read_json};
use sprite::{PlacedSprite, SpriteHandle, SpriteKind, SpriteRegistry};

#[derive(Debug, Default)]
pub struct Engine {
    registry: SpriteRegistry,
    layers: LayerStack,
    hand: Hand,
    draw_pile: VecDeque<SpriteHandle>,
    decks: HashMap<String, VecDeque<SpriteHandle>>,
    fan: FanLayout,
    hand_visible: bool,
}

impl Engine {
    pub fn new(fan: FanConfig) -> Self {
        Engine {
            fan: FanLayout::new(fan),
            hand_visible: true,
            ..Default::default()
        }
    }

    /// Load everything a scene source names. Any missing or undecodable
    /// asset aborts the build.
    pub fn build(source: &SceneSource, base_dir: &Path, viewport: &Viewport) -> Result<Self> {
        let mut engine = Engine::new(source.hand.fan);

        let mut sheets: HashMap<&str, HashMap<String, RgbaImage>> = HashMap::new();
        for a in &source.atlases {
            let atlas = Atlas::open(&base_dir.join(&a.image))?;
            let index = atlas::load_index(&base_dir.join(&a.index))?;
            sheets.insert(a.name.as_str(), atlas.extract_from_index(&index, a.color_key));
        }
        let sheet = |name: &str| {
            sheets.get(name).ok_or_else(|| EngineError::UnknownSprite {
                id: name.to_string(),
            })
        };

        if let Some(b) = &source.board {
            let nodes: Vec<NodeRecord> = read_json(&base_dir.join(&b.nodes))?;
            let edges: Vec<EdgeRecord> = read_json(&base_dir.join(&b.edges))?;
            let art = BoardArt {
                icons: sheet(&b.icon_atlas)?,
                labels: sheet(&b.label_atlas)?,
            };
            let built = board::build_board(&nodes, &edges, &art, &b.node_style, &b.line, viewport)?;
            engine.add_layer(built.nodes, 0);
            engine.add_layer(built.connectors, 0);
        }

        for layer in &source.layers {
            let mut sprites = Vec::with_capacity(layer.sprites.len());
            for s in &layer.sprites {
                let image = sheet(&s.atlas)?.get(&s.sprite_id).ok_or_else(|| {
                    EngineError::UnknownSprite {
                        id: format!("{}/{}", s.atlas, s.sprite_id),
                    }
                })?;
                let [x, y] = s.position;
                sprites.push(PlacedSprite::new(
                    s.sprite_id.clone(),
                    viewport.to_actual(Point::new(x as f64, y as f64)),
                    viewport.rescale(image),
                    SpriteKind::Generic,
                ));
            }
            engine.add_layer(sprites, layer.index);
        }

        if let Some(c) = &source.cards {
            let cards = cards::load_cards(&base_dir.join(&c.dir), c.sorted, viewport)?;
            engine.add_cards(cards);
            for deck in &c.decks {
                let moved = engine.create_deck(deck.name.as_str(), |tag| deck.accepts(tag));
                log::info!("deck `{}` holds {moved} cards", deck.name);
            }
            for dealt in 0..source.hand.initial {
                let card = match &source.hand.deck {
                    Some(name) => engine.draw_from(name),
                    None => engine.draw_card(),
                };
                if card.is_none() {
                    log::warn!(
                        "ran out of cards after {dealt} of {} initial cards",
                        source.hand.initial
                    );
                    break;
                }
            }
        }
        engine.hand_visible = source.hand.visible;

        Ok(engine)
    }

    pub fn registry(&self) -> &SpriteRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SpriteRegistry {
        &mut self.registry
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub fn fan(&self) -> &FanLayout {
        &self.fan
    }

    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    /// Register `sprites` and insert them as a new layer at `index`.
    pub fn add_layer(&mut self, sprites: Vec<PlacedSprite>, index: usize) -> Vec<SpriteHandle> {
        let handles: Vec<_> = sprites.into_iter().map(|s| self.registry.insert(s)).collect();
        self.layers.add_layer(handles.clone(), index);
        handles
    }

    /// Register cards at the bottom of the draw pile.
    pub fn add_cards(&mut self, cards: Vec<PlacedSprite>) -> Vec<SpriteHandle> {
        let handles: Vec<_> = cards.into_iter().map(|c| self.registry.insert(c)).collect();
        self.draw_pile.extend(handles.iter().copied());
        handles
    }

    /// Move the top of the draw pile to the end of the hand.
    pub fn draw_card(&mut self) -> Option<SpriteHandle> {
        let card = self.draw_pile.pop_front()?;
        self.hand.push(card);
        Some(card)
    }

    /// Move every draw-pile card whose tag passes `filter` into the deck
    /// `name`, keeping pile order. Cards already in the deck stay on top.
    /// Returns how many cards moved.
    pub fn create_deck(&mut self, name: impl Into<String>, filter: impl Fn(&str) -> bool) -> usize {
        let registry = &self.registry;
        let (picked, rest): (VecDeque<_>, VecDeque<_>) =
            self.draw_pile.drain(..).partition(|&h| match registry.get(h).map(|s| s.kind()) {
                Some(SpriteKind::Card { tag, .. }) => filter(tag.as_str()),
                _ => false,
            });
        self.draw_pile = rest;
        let moved = picked.len();
        self.decks.entry(name.into()).or_default().extend(picked);
        moved
    }

    /// Move the top of the named deck to the end of the hand.
    pub fn draw_from(&mut self, deck: &str) -> Option<SpriteHandle> {
        let card = self.decks.get_mut(deck)?.pop_front()?;
        self.hand.push(card);
        Some(card)
    }

    pub fn deck_len(&self, deck: &str) -> Option<usize> {
        self.decks.get(deck).map(VecDeque::len)
    }

    pub fn deck(&self, deck: &str) -> Option<&VecDeque<SpriteHandle>> {
        self.decks.get(deck)
    }

    /// Return the last hand card to the bottom of the draw pile.
    pub fn discard_last(&mut self) -> Option<SpriteHandle> {
        let card = self.hand.pop()?;
        self.draw_pile.push_back(card);
        Some(card)
    }

    pub fn show_hand(&mut self) {
        self.hand_visible = true;
    }

    pub fn hide_hand(&mut self) {
        self.hand_visible = false;
    }

    pub fn toggle_hand(&mut self) {
        self.hand_visible = !self.hand_visible;
    }

    pub fn hand_visible(&self) -> bool {
        self.hand_visible
    }

    /// Lay out the hand for this frame, writing each card's rotation and
    /// position back into the registry.
    pub fn layout_hand(&mut self, viewport: &Viewport) -> Option<FanGeometry> {
        self.fan.arrange(&self.hand, &mut self.registry, viewport)
    }

    /// Resolve one frame: layers back to front, then the hand in order, then
    /// the hovered card's magnified copy if the pointer is over one.
    pub fn resolve_frame(&mut self, viewport: &Viewport, pointer: Option<Point>) -> ResolvedFrame<'_> {
        let geometry = if self.hand_visible {
            self.layout_hand(viewport)
        } else {
            None
        };

        let registry = &self.registry;
        let op = |h: SpriteHandle| {
            registry.get(h).map(|s| {
                let r = s.rect();
                DrawOp {
                    image: s.image(),
                    x: r.x,
                    y: r.y,
                }
            })
        };

        let mut ops: Vec<DrawOp<'_>> = self.layers.draw_order().filter_map(op).collect();
        let overlay = match &geometry {
            Some(geometry) => {
                ops.extend(self.hand.iter().filter_map(op));
                pointer.and_then(|p| self.fan.hover_overlay(geometry, &self.hand, registry, p))
            }
            None => None,
        };

        ResolvedFrame { ops, overlay }
    }
}
