//! Column-range partitioning of row-major raster buffers.
//!
//! A buffer is cut into contiguous column ranges; every row is split at the
//! range boundaries and each range receives its own `&mut` sub-slice of each
//! row. The ranges are then processed in parallel. No two tasks can reach
//! the same element, so no locking is needed.

use rayon::prelude::*;
use std::ops::Range;

/// Split `0..width` into at most `splits` contiguous, non-empty ranges.
///
/// Range `i` starts at `i * width / splits`, so sizes differ by at most one.
pub fn column_ranges(width: usize, splits: usize) -> Vec<Range<usize>> {
    if width == 0 {
        return Vec::new();
    }
    let splits = splits.clamp(1, width);
    (0..splits)
        .map(|i| (i * width / splits)..((i + 1) * width / splits))
        .collect()
}

/// Run `f` once per column range of a row-major `buffer`, in parallel.
///
/// `f` receives the column range and, for each row in order, the mutable
/// sub-slice of that row covering the range. Results come back in column
/// order regardless of completion order.
pub fn map_column_blocks<T, R, F>(buffer: &mut [T], width: usize, splits: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(Range<usize>, Vec<&mut [T]>) -> R + Sync,
{
    if width == 0 || buffer.is_empty() {
        return Vec::new();
    }
    let height = buffer.len() / width;

    let mut blocks: Vec<(Range<usize>, Vec<&mut [T]>)> = column_ranges(width, splits)
        .into_iter()
        .map(|cols| (cols, Vec::with_capacity(height)))
        .collect();

    for row in buffer.chunks_exact_mut(width) {
        let mut rest = row;
        let mut consumed = 0;
        for (cols, rows) in blocks.iter_mut() {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(cols.end - consumed);
            rows.push(head);
            rest = tail;
            consumed = cols.end;
        }
    }

    blocks
        .into_par_iter()
        .map(|(cols, rows)| f(cols, rows))
        .collect()
}
