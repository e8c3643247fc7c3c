//! Pixel-level transforms shared by the sprite, atlas and connector code.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::types::Point;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Rotate an image by `angle_degrees` (positive = counter-clockwise on
/// screen) and scale it uniformly. The output grows to the rotated bounding
/// box; uncovered corners are transparent.
pub fn rotozoom(src: &RgbaImage, angle_degrees: f64, scale: f64) -> RgbaImage {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 || scale <= 0.0 {
        return RgbaImage::new(0, 0);
    }
    let turns = angle_degrees.rem_euclid(360.0);
    if turns == 0.0 {
        return scale_uniform(src, scale);
    }

    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let sw = w as f64 * scale;
    let sh = h as f64 * scale;
    // Snap away float noise so exact quarter turns keep their size.
    let out_w = snap_ceil(sw * cos.abs() + sh * sin.abs()).max(1.0) as u32;
    let out_h = snap_ceil(sw * sin.abs() + sh * cos.abs()).max(1.0) as u32;

    let ocx = out_w as f64 / 2.0;
    let ocy = out_h as f64 / 2.0;
    let icx = w as f64 / 2.0;
    let icy = h as f64 / 2.0;

    let mut out = RgbaImage::from_pixel(out_w, out_h, TRANSPARENT);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - ocx;
        let dy = y as f64 + 0.5 - ocy;
        // Inverse of the on-screen counter-clockwise rotation (y points down).
        let sx = (dx * cos - dy * sin) / scale + icx;
        let sy = (dx * sin + dy * cos) / scale + icy;
        if sx >= 0.0 && sy >= 0.0 && sx < w as f64 && sy < h as f64 {
            *px = *src.get_pixel(sx as u32, sy as u32);
        }
    }
    out
}

/// Uniform scale; sizes round to nearest and never drop below 1×1.
pub fn scale_uniform(src: &RgbaImage, scale: f64) -> RgbaImage {
    let (w, h) = src.dimensions();
    let nw = ((w as f64 * scale).round() as u32).max(1);
    let nh = ((h as f64 * scale).round() as u32).max(1);
    if (nw, nh) == (w, h) {
        return src.clone();
    }
    imageops::resize(src, nw, nh, FilterType::Triangle)
}

/// Quarter turn counter-clockwise, as used for atlas entries flagged
/// `rotate`.
pub fn rotate_quarter_ccw(src: &RgbaImage) -> RgbaImage {
    imageops::rotate270(src)
}

/// Make every pixel whose RGB matches `key` fully transparent.
pub fn apply_color_key(image: &mut RgbaImage, key: [u8; 3]) {
    for px in image.pixels_mut() {
        if px.0[..3] == key {
            *px = TRANSPARENT;
        }
    }
}

/// Fill a convex polygon onto `image`. A pixel is covered when its
/// integer coordinate lies inside or on the polygon boundary.
pub fn fill_convex_polygon(image: &mut RgbaImage, corners: &[Point], color: Rgba<u8>) {
    if corners.len() < 3 {
        return;
    }
    let (min_y, max_y) = corners
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let (min_x, max_x) = corners
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        });

    let y0 = min_y.floor().max(0.0) as u32;
    let y1 = (max_y.ceil() as i64).min(image.height() as i64 - 1);
    let x0 = min_x.floor().max(0.0) as u32;
    let x1 = (max_x.ceil() as i64).min(image.width() as i64 - 1);
    if y1 < 0 || x1 < 0 {
        return;
    }

    for y in y0..=y1 as u32 {
        for x in x0..=x1 as u32 {
            if point_in_convex(corners, Point::new(x as f64, y as f64)) {
                image.put_pixel(x, y, color);
            }
        }
    }
}

fn point_in_convex(corners: &[Point], p: Point) -> bool {
    const EPS: f64 = 1e-9;
    let mut sign = 0.0_f64;
    for (i, a) in corners.iter().enumerate() {
        let b = corners[(i + 1) % corners.len()];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross.abs() <= EPS {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

fn snap_ceil(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-6 { r } else { v.ceil() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(w: u32, h: u32) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(w, h, Rgba([10, 10, 10, 255]));
        img.put_pixel(w - 1, 0, Rgba([255, 0, 0, 255]));
        img
    }

    #[test]
    fn zero_angle_unit_scale_is_identity() {
        let img = marked(7, 5);
        assert_eq!(rotozoom(&img, 0.0, 1.0), img);
        assert_eq!(rotozoom(&img, -0.0, 1.0), img);
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let img = marked(8, 4);
        let out = rotozoom(&img, 90.0, 1.0);
        assert_eq!(out.dimensions(), (4, 8));
        // Top-right marker ends up top-left after a counter-clockwise turn.
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(rotate_quarter_ccw(&img), out);
    }

    #[test]
    fn diagonal_rotation_grows_bounds() {
        let img = marked(10, 10);
        let out = rotozoom(&img, 45.0, 1.0);
        assert_eq!(out.dimensions(), (15, 15));
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn color_key_clears_matching_pixels() {
        let mut img = marked(3, 3);
        apply_color_key(&mut img, [10, 10, 10]);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        assert_eq!(img.get_pixel(2, 0).0[3], 255);
    }

    #[test]
    fn polygon_fill_covers_axis_aligned_quad() {
        let mut img = RgbaImage::new(6, 4);
        let quad = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 3.0),
            Point::new(0.0, 3.0),
        ];
        fill_convex_polygon(&mut img, &quad, Rgba([1, 2, 3, 255]));
        assert!(img.pixels().all(|p| p.0 == [1, 2, 3, 255]));
    }
}
