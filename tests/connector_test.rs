//! Connector sprite tests: bounding boxes, degenerate segments and the
//! flip offsets used by looped board edges.

use image::imageops;

use tabletop_presenter::engine::connector::{self, ConnectorSpec, Flip};
use tabletop_presenter::engine::sprite::SpriteKind;
use tabletop_presenter::types::{Color, NamedColor, Point};

const LINE: Color = Color::Named(NamedColor::Cyan);

fn spec(a: (f64, f64), b: (f64, f64), width: f64) -> ConnectorSpec {
    ConnectorSpec::new(Point::new(a.0, a.1), Point::new(b.0, b.1), width, LINE)
}

#[test]
fn test_horizontal_segment_is_axis_aligned_bar() {
    let sprite = connector::generate("h", &spec((0.0, 0.0), (10.0, 0.0), 4.0));
    // Box plus the inclusive far edge.
    assert_eq!(sprite.image().dimensions(), (11, 5));
    assert_eq!(sprite.top_left(), Point::new(0.0, -2.0));
    assert!(sprite.image().pixels().all(|p| p.0 == [0, 255, 255, 255]));
}

#[test]
fn test_vertical_segment_does_not_fault() {
    let sprite = connector::generate("v", &spec((0.0, 0.0), (0.0, 10.0), 4.0));
    assert_eq!(sprite.image().dimensions(), (5, 11));
    assert_eq!(sprite.top_left(), Point::new(-2.0, 0.0));
}

#[test]
fn test_zero_length_segment_falls_back_to_horizontal() {
    let s = spec((3.0, 3.0), (3.0, 3.0), 4.0);
    assert_eq!(s.perpendicular(), Point::new(0.0, 2.0));
    let sprite = connector::generate("dot", &s);
    assert_eq!(sprite.image().dimensions(), (1, 5));
}

#[test]
fn test_perpendicular_has_half_width_length() {
    let s = spec((0.0, 0.0), (30.0, 40.0), 6.0);
    let p = s.perpendicular();
    assert!((p.x.hypot(p.y) - 3.0).abs() < 1e-12);
    // Perpendicular to the segment direction.
    assert!((p.x * 30.0 + p.y * 40.0).abs() < 1e-9);
}

#[test]
fn test_diagonal_bar_follows_the_segment() {
    let sprite = connector::generate("d", &spec((0.0, 0.0), (10.0, 10.0), 4.0));
    let img = sprite.image();
    assert_eq!(img.dimensions(), (15, 15));
    assert_eq!(sprite.top_left(), Point::new(-2.0, -2.0));
    // Midpoint (5, 5) is local (7, 7); the off-diagonal corners stay empty.
    assert_eq!(img.get_pixel(7, 7).0[3], 255);
    assert_eq!(img.get_pixel(0, 14).0[3], 0);
    assert_eq!(img.get_pixel(14, 0).0[3], 0);
}

#[test]
fn test_flips_mirror_and_offset_by_box_size() {
    let base = spec((0.0, 0.0), (10.0, 4.0), 2.0);
    let plain = connector::generate("p", &base);
    let box_w = plain.image().width() as f64 - 1.0;
    let box_h = plain.image().height() as f64 - 1.0;

    let left = connector::generate(
        "l",
        &base.flipped(Flip {
            left: true,
            ..Flip::NONE
        }),
    );
    assert_eq!(left.top_left().x, plain.top_left().x - box_w);
    assert_eq!(left.top_left().y, plain.top_left().y);
    assert_eq!(left.image(), &imageops::flip_horizontal(plain.image()));

    let right = connector::generate(
        "r",
        &base.flipped(Flip {
            right: true,
            ..Flip::NONE
        }),
    );
    assert_eq!(right.top_left().x, plain.top_left().x + box_w);

    let up = connector::generate(
        "u",
        &base.flipped(Flip {
            up: true,
            ..Flip::NONE
        }),
    );
    assert_eq!(up.top_left().y, plain.top_left().y - box_h);
    assert_eq!(up.image(), &imageops::flip_vertical(plain.image()));

    let down = connector::generate(
        "d",
        &base.flipped(Flip {
            down: true,
            ..Flip::NONE
        }),
    );
    assert_eq!(down.top_left().y, plain.top_left().y + box_h);
}

#[test]
fn test_connector_remembers_its_endpoints() {
    let s = spec((1.0, 2.0), (3.0, 4.0), 2.0);
    let sprite = connector::generate("e", &s);
    assert_eq!(sprite.id(), "e");
    assert_eq!(
        sprite.kind(),
        &SpriteKind::Connector {
            from: Point::new(1.0, 2.0),
            to: Point::new(3.0, 4.0),
        }
    );
}
