//! Synthetic contour generators.
//!
//! These generators create predictable contour sets whose interpolated
//! heights are easy to reason about, plus a jittered variant for
//! benchmarks and stress tests.

use contour_raster::{LineStrip, Point};
use std::f64::consts::TAU;

/// Creates evenly spaced horizontal contours across `[0, x_max]`.
///
/// Contour `i` lies at `y = (i + 1) * y_max / (count + 1)`, has elevation id
/// `i` and elevation `i * elevation_step`. Each line carries
/// `points_per_line` evenly spaced vertices (at least 2).
///
/// # Example
///
/// ```
/// use test_utils::create_horizontal_contours;
///
/// let strips = create_horizontal_contours(3, 1.0, 1.0, 10.0, 5);
/// assert_eq!(strips.len(), 3);
/// assert_eq!(strips[1].points[0].y, 0.5);
/// assert_eq!(strips[2].elevation, 20.0);
/// ```
pub fn create_horizontal_contours(
    count: usize,
    x_max: f64,
    y_max: f64,
    elevation_step: f64,
    points_per_line: usize,
) -> Vec<LineStrip> {
    let n = points_per_line.max(2);
    (0..count)
        .map(|i| {
            let y = (i + 1) as f64 * y_max / (count + 1) as f64;
            let points = (0..n)
                .map(|k| Point::new(k as f64 * x_max / (n - 1) as f64, y))
                .collect();
            LineStrip {
                elevation_id: i as i32,
                elevation: i as f64 * elevation_step,
                points,
            }
        })
        .collect()
}

/// Creates closed concentric circles around `center`, highest in the middle.
///
/// Ring `i` has radius `(i + 1) * spacing`, elevation id `i` and elevation
/// `peak - i * elevation_step`. The first vertex is repeated at the end so
/// each strip closes.
pub fn create_concentric_circles(
    center: Point,
    count: usize,
    spacing: f64,
    peak: f64,
    elevation_step: f64,
    points_per_ring: usize,
) -> Vec<LineStrip> {
    let n = points_per_ring.max(3);
    (0..count)
        .map(|i| {
            let radius = (i + 1) as f64 * spacing;
            let points = (0..=n)
                .map(|k| {
                    let angle = TAU * (k % n) as f64 / n as f64;
                    Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
                })
                .collect();
            LineStrip {
                elevation_id: i as i32,
                elevation: peak - i as f64 * elevation_step,
                points,
            }
        })
        .collect()
}

/// Creates wavy contours split into several strips per level.
///
/// Level `i` follows a sine wave around `y = (i + 1) / (levels + 1)` in the
/// unit square, with each vertex nudged by a deterministic pseudo-random
/// offset. Every level is cut into `pieces` strips sharing one elevation id,
/// which exercises the ranker's same-level deduplication.
pub fn create_jittered_contours(
    levels: usize,
    points_per_level: usize,
    pieces: usize,
    seed: u32,
) -> Vec<LineStrip> {
    let n = points_per_level.max(2);
    let pieces = pieces.clamp(1, n - 1);
    let spacing = 1.0 / (levels + 1) as f64;
    let mut strips = Vec::with_capacity(levels * pieces);

    for level in 0..levels {
        let base_y = (level + 1) as f64 * spacing;
        let points: Vec<Point> = (0..n)
            .map(|k| {
                let x = k as f64 / (n - 1) as f64;
                let jitter = (simple_hash(k as u32, level as u32, seed) % 1000) as f64 / 1000.0 - 0.5;
                let y = base_y + 0.25 * spacing * ((x * TAU * 2.0).sin() + jitter * 0.5);
                Point::new(x, y.clamp(0.0, 1.0))
            })
            .collect();

        // Adjacent pieces share their boundary vertex so the level stays connected
        let per_piece = (n - 1) / pieces;
        for p in 0..pieces {
            let start = p * per_piece;
            let end = if p + 1 == pieces { n - 1 } else { start + per_piece };
            strips.push(LineStrip {
                elevation_id: level as i32,
                elevation: level as f64 * 10.0,
                points: points[start..=end].to_vec(),
            });
        }
    }

    strips
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}
