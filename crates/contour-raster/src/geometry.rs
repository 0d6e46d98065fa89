//! Stateless geometric helpers: point-to-segment distance and ring traversal.

use crate::types::{CellCoord, Point};

/// Squared distance from `p` to the segment `a → b`.
///
/// Projects `p` onto the segment direction, clips the parameter to `[0, 1]`
/// and falls back to the nearer endpoint outside that range. A zero-length
/// segment degenerates to the distance to `a`.
#[inline]
pub fn point_segment_distance_sq(p: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return p.distance_sq(a);
    }

    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    if t <= 0.0 {
        p.distance_sq(a)
    } else if t >= 1.0 {
        p.distance_sq(b)
    } else {
        let proj = Point::new(a.x + t * dx, a.y + t * dy);
        p.distance_sq(&proj)
    }
}

/// Iterator over the in-bounds cells at exactly Chebyshev distance `radius`
/// from a centre cell.
///
/// Radius 0 yields the centre itself. Larger radii yield only the border of
/// the square (top row, bottom row, then the two side columns without their
/// corners), so consecutive rings never revisit a cell.
#[derive(Debug, Clone)]
pub struct RingCells {
    cx: i64,
    cy: i64,
    radius: i64,
    size: i64,
    next: i64,
    len: i64,
}

impl RingCells {
    pub fn new(center: CellCoord, radius: usize, grid_size: usize) -> Self {
        let radius = radius as i64;
        Self {
            cx: center.cx as i64,
            cy: center.cy as i64,
            radius,
            size: grid_size as i64,
            next: 0,
            len: if radius == 0 { 1 } else { 8 * radius },
        }
    }

    /// Offset of the `k`-th border position relative to the centre.
    fn offset(&self, k: i64) -> (i64, i64) {
        let r = self.radius;
        if r == 0 {
            return (0, 0);
        }
        let side = 2 * r + 1;
        if k < side {
            (k - r, -r)
        } else if k < 2 * side {
            (k - side - r, r)
        } else {
            let k = k - 2 * side;
            let inner = 2 * r - 1;
            if k < inner {
                (-r, k - r + 1)
            } else {
                (r, k - inner - r + 1)
            }
        }
    }
}

impl Iterator for RingCells {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        while self.next < self.len {
            let (dx, dy) = self.offset(self.next);
            self.next += 1;

            let x = self.cx + dx;
            let y = self.cy + dy;
            if x >= 0 && y >= 0 && x < self.size && y < self.size {
                return Some(CellCoord::new(x as usize, y as usize));
            }
        }
        None
    }
}

/// Largest ring radius around `center` that still touches the grid.
pub fn max_ring_radius(center: CellCoord, grid_size: usize) -> usize {
    let last = grid_size.saturating_sub(1);
    center
        .cx
        .max(center.cy)
        .max(last - center.cx.min(last))
        .max(last - center.cy.min(last))
}
