//! Fan layout: a hand of same-sized cards spread along a circular arc.
//!
//! The arc's centre sits below the bottom edge of the viewport so only its
//! top is visible. Cards are spaced along the arc by a fraction of their
//! width, compressed when the hand would overflow the arc, and rotated to
//! follow the tangent. The card under the pointer is magnified for display
//! only; the stored transforms are never touched by hover.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::hand::Hand;
use super::raster;
use super::sprite::{SpriteHandle, SpriteRegistry};
use crate::types::{Overlay, PixelRect, Point};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    /// Arc radius as a fraction of viewport width.
    pub radius_ratio: f64,
    /// How far below the bottom edge the arc centre sits, as a fraction of
    /// the radius.
    pub center_drop_ratio: f64,
    /// Sine of the angle between the horizontal and the arc's end points.
    /// The usable half-angle is `90° - asin(arc_clamp_ratio)`.
    pub arc_clamp_ratio: f64,
    /// Preferred distance between neighbouring cards, as a fraction of card
    /// width.
    pub spacing_ratio: f64,
    pub hover_scale: f64,
    /// Outward push of the magnified card away from the arc centre.
    pub hover_push: f64,
    /// Side of the square pointer probe used for hit testing.
    pub probe_size: u32,
}

impl Default for FanConfig {
    fn default() -> Self {
        FanConfig {
            radius_ratio: 0.85,
            center_drop_ratio: 0.90,
            arc_clamp_ratio: 0.9,
            spacing_ratio: 0.5,
            hover_scale: 1.5,
            hover_push: 1.05,
            probe_size: 10,
        }
    }
}

impl FanConfig {
    /// The arcsine argument actually used, kept inside `[0, 1]`.
    pub fn arc_clamp_argument(&self) -> f64 {
        if self.arc_clamp_ratio.is_finite() {
            self.arc_clamp_ratio.clamp(0.0, 1.0)
        } else {
            FanConfig::default().arc_clamp_ratio
        }
    }

    /// Largest angle (degrees) a card may sit from the top of the arc.
    pub fn max_half_angle_degrees(&self) -> f64 {
        90.0 - self.arc_clamp_argument().asin().to_degrees()
    }
}

/// Per-frame fan solution. A pure function of hand size, card width and
/// viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct FanGeometry {
    pub center: Point,
    pub radius: f64,
    pub max_half_angle: f64,
    pub usable_arc: f64,
    /// Arc length between neighbouring cards after any compression.
    pub spacing: f64,
    pub step_degrees: f64,
    /// Angle of each card from the top of the arc, re-centred so the fan is
    /// symmetric. Positive is to the right.
    pub angles: Vec<f64>,
}

impl FanGeometry {
    /// Solve the fan for `count` cards. Returns `None` for an empty hand.
    pub fn solve(count: usize, card_width: f64, width: f64, height: f64, config: &FanConfig) -> Option<Self> {
        if count == 0 {
            return None;
        }

        let radius = width * config.radius_ratio;
        let center = Point::new(width / 2.0, height + radius * config.center_drop_ratio);
        let max_half_angle = config.max_half_angle_degrees();
        let usable_arc = (max_half_angle * 2.0).to_radians() * radius;

        let mut spacing = card_width * config.spacing_ratio;
        if count > 1 {
            let required = spacing * (count - 1) as f64;
            if required > usable_arc {
                spacing = usable_arc / (count - 1) as f64;
            }
        }

        let step_degrees = if radius > 0.0 {
            spacing / (2.0 * radius * PI) * 360.0
        } else {
            0.0
        };
        let raw: Vec<f64> = (0..count).map(|i| step_degrees * i as f64).collect();
        let mid = median(&raw);
        let angles = raw.iter().map(|a| a - mid).collect();

        Some(FanGeometry {
            center,
            radius,
            max_half_angle,
            usable_arc,
            spacing,
            step_degrees,
            angles,
        })
    }

    /// Where the centre of card `index` goes on the arc.
    pub fn card_center(&self, index: usize) -> Point {
        let theta = (90.0 + self.angles[index]).to_radians();
        Point::new(
            self.center.x - self.radius * theta.cos(),
            self.center.y - self.radius * theta.sin(),
        )
    }
}

/// Median of an ascending slice.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanLayout {
    pub config: FanConfig,
}

impl FanLayout {
    pub fn new(config: FanConfig) -> Self {
        FanLayout { config }
    }

    /// Rotate and place every card of the hand. Card width is taken from the
    /// first card's unrotated image so repeated frames give identical
    /// results.
    pub fn arrange(
        &self,
        hand: &Hand,
        registry: &mut SpriteRegistry,
        viewport: &Viewport,
    ) -> Option<FanGeometry> {
        let first = registry.get(*hand.cards().first()?)?;
        let card_width = first.original().width() as f64;
        let geometry = FanGeometry::solve(
            hand.len(),
            card_width,
            viewport.width() as f64,
            viewport.height() as f64,
            &self.config,
        )?;

        for (i, handle) in hand.iter().enumerate() {
            let Some(card) = registry.get_mut(handle) else {
                continue;
            };
            card.rotate(-geometry.angles[i], 1.0);
            let c = geometry.card_center(i);
            let (w, h) = card.image().dimensions();
            card.set_top_left(Point::new(c.x - w as f64 / 2.0, c.y - h as f64 / 2.0));
        }
        Some(geometry)
    }

    /// Topmost hand card under the pointer, if any. Cards later in the hand
    /// are painted over earlier ones, so the last hit wins.
    pub fn hit_test(&self, hand: &Hand, registry: &SpriteRegistry, pointer: Point) -> Option<SpriteHandle> {
        let probe = PixelRect::new(
            pointer.x.floor() as i64,
            pointer.y.floor() as i64,
            self.config.probe_size,
            self.config.probe_size,
        );
        hand.cards()
            .iter()
            .rev()
            .copied()
            .find(|&h| registry.get(h).is_some_and(|s| s.collides(&probe)))
    }

    /// Magnified copy of the hovered card, pushed outward from the arc
    /// centre. Render-only: nothing in the registry changes.
    pub fn hover_overlay(
        &self,
        geometry: &FanGeometry,
        hand: &Hand,
        registry: &SpriteRegistry,
        pointer: Point,
    ) -> Option<Overlay> {
        let handle = self.hit_test(hand, registry, pointer)?;
        let card = registry.get(handle)?;
        let image = raster::scale_uniform(card.image(), self.config.hover_scale);
        let center = card.rect().center();
        let push = self.config.hover_push;
        let x = (center.x - geometry.center.x) * push - image.width() as f64 / 2.0 + geometry.center.x;
        let y = (center.y - geometry.center.y) * push - image.height() as f64 / 2.0 + geometry.center.y;
        Some(Overlay {
            image,
            x: x.round() as i64,
            y: y.round() as i64,
        })
    }
}
