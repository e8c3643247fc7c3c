//! Terminal presentation of a canvas using upper-half-block cells: each
//! cell shows two vertically stacked pixels, the top one as foreground and
//! the bottom one as background.

use image::RgbaImage;

use crate::types::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HalfCell {
    pub top: [u8; 3],
    pub bottom: [u8; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: HalfCell,
}

/// Nearest-neighbour sample of `canvas` onto a `cols × rows` cell grid.
pub fn sample(canvas: &RgbaImage, cols: u16, rows: u16) -> Vec<Vec<HalfCell>> {
    let (w, h) = canvas.dimensions();
    if w == 0 || h == 0 {
        return vec![vec![HalfCell::default(); cols as usize]; rows as usize];
    }
    let pixel = |px: f64, py: f64| {
        let x = ((px * w as f64) as u32).min(w - 1);
        let y = ((py * h as f64) as u32).min(h - 1);
        let p = canvas.get_pixel(x, y).0;
        [p[0], p[1], p[2]]
    };
    let sub_rows = rows as f64 * 2.0;
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    let fx = (c as f64 + 0.5) / cols as f64;
                    HalfCell {
                        top: pixel(fx, (r as f64 * 2.0 + 0.5) / sub_rows),
                        bottom: pixel(fx, (r as f64 * 2.0 + 1.5) / sub_rows),
                    }
                })
                .collect()
        })
        .collect()
}

/// Cells that differ between two grids of the same shape.
pub fn diff(prev: &[Vec<HalfCell>], next: &[Vec<HalfCell>]) -> Vec<CellChange> {
    let mut changes = Vec::new();
    for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
        for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
            if prev_cell != next_cell {
                changes.push(CellChange {
                    x: x as u16,
                    y: y as u16,
                    cell: *next_cell,
                });
            }
        }
    }
    changes
}

/// Canvas pixel under the centre of a grid cell.
pub fn cell_to_pixel(col: u16, row: u16, cols: u16, rows: u16, width: u32, height: u32) -> Point {
    Point::new(
        (col as f64 + 0.5) * width as f64 / cols.max(1) as f64,
        (row as f64 + 0.5) * height as f64 / rows.max(1) as f64,
    )
}
