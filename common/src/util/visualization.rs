use crate::db::core::Circuit;
use crate::db::grid::Grid;
use crate::geom::coord::GridCoord;
use image::{ImageResult, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as ImageRect;
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([20, 20, 20]);

/// Renders the grid, every occupied site and one flyline per source -> sink.
pub fn draw_placement(
    circuit: &Circuit,
    grid: &Grid,
    filename: &str,
    width: u32,
    height: u32,
) -> ImageResult<()> {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let pitch = (width as f64 / grid.cols() as f64).min(height as f64 / grid.rows() as f64);
    if pitch < 1.0 {
        log::warn!(
            "Grid {}x{} does not fit in a {}x{} image; skipping render.",
            grid.cols(),
            grid.rows(),
            width,
            height
        );
        return Ok(());
    }

    // Row 0 at the bottom, like the die plots.
    let origin = |p: GridCoord| {
        (
            p.col as f64 * pitch,
            height as f64 - (p.row as f64 + 1.0) * pitch,
        )
    };
    let center = |p: GridCoord| {
        let (x, y) = origin(p);
        ((x + pitch / 2.0) as f32, (y + pitch / 2.0) as f32)
    };

    let site_color = Rgb([60, 60, 70]);
    let cell_color = Rgb([180, 60, 60]);
    let margin = (pitch * 0.15).max(1.0);
    let side = pitch as u32;
    let inner = ((pitch - 2.0 * margin).max(1.0)) as u32;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let (x, y) = origin(GridCoord::new(col, row));
            let rect = ImageRect::at(x as i32, y as i32).of_size(side.max(1), side.max(1));
            draw_hollow_rect_mut(&mut img, rect, site_color);
        }
    }

    for (site, _) in grid.occupied() {
        let (x, y) = origin(site);
        let rect = ImageRect::at((x + margin) as i32, (y + margin) as i32).of_size(inner, inner);
        draw_filled_rect_mut(&mut img, rect, cell_color);
    }

    let wire_color = Rgb([0, 200, 255]);
    for net in &circuit.nets {
        let Some(src) = grid.position(net.source) else {
            continue;
        };
        for &sink in &net.sinks {
            if let Some(dst) = grid.position(sink) {
                draw_line_segment_mut(&mut img, center(src), center(dst), wire_color);
            }
        }
    }

    img.save(Path::new(filename))
}

/// Plots cost against annealing iteration.
pub fn draw_cost_history(
    history: &[u64],
    filename: &str,
    width: u32,
    height: u32,
) -> ImageResult<()> {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);

    let left = width as f32 * 0.1;
    let right = width as f32 * 0.9;
    let top = height as f32 * 0.1;
    let bottom = height as f32 * 0.92;

    let axis_color = Rgb([220, 220, 220]);
    draw_line_segment_mut(&mut img, (left, bottom), (right, bottom), axis_color);
    draw_line_segment_mut(&mut img, (left, bottom), (left, top), axis_color);

    if history.len() >= 2 {
        let max_cost = history.iter().copied().max().unwrap_or(0).max(1) as f32;
        let last = (history.len() - 1) as f32;
        let point = |i: usize, cost: u64| {
            (
                left + (right - left) * (i as f32 / last),
                bottom - (bottom - top) * (cost as f32 / max_cost),
            )
        };

        let line_color = Rgb([255, 140, 0]);
        for (i, pair) in history.windows(2).enumerate() {
            draw_line_segment_mut(
                &mut img,
                point(i, pair[0]),
                point(i + 1, pair[1]),
                line_color,
            );
        }
    }

    img.save(Path::new(filename))
}
