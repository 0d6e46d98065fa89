//! Exclusion masks: grid cells that rasterization must skip.

use crate::types::CellCoord;

/// Membership query for excluded bucket grid cells.
///
/// Masks are shared by reference across rasterization workers and are never
/// mutated while a rasterizer borrows them.
pub trait ExclusionMask: Sync {
    /// Whether cell `(cx, cy)` is excluded.
    fn is_excluded(&self, cx: usize, cy: usize) -> bool;

    /// Convenience wrapper taking a [`CellCoord`].
    #[inline]
    fn is_cell_excluded(&self, cell: CellCoord) -> bool {
        self.is_excluded(cell.cx, cell.cy)
    }
}

/// A mask that excludes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusion;

impl ExclusionMask for NoExclusion {
    #[inline]
    fn is_excluded(&self, _cx: usize, _cy: usize) -> bool {
        false
    }
}

impl<F> ExclusionMask for F
where
    F: Fn(usize, usize) -> bool + Sync,
{
    #[inline]
    fn is_excluded(&self, cx: usize, cy: usize) -> bool {
        self(cx, cy)
    }
}

/// Dense per-cell exclusion flags for a square grid.
///
/// Cells outside the grid are reported as not excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    size: usize,
    excluded: Vec<bool>,
}

impl CellMask {
    /// An empty mask for a `size × size` grid.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            excluded: vec![false; size * size],
        }
    }

    /// A mask with the given cells excluded. Out-of-range cells are ignored.
    pub fn from_cells<I>(size: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut mask = Self::new(size);
        for (cx, cy) in cells {
            mask.exclude(cx, cy);
        }
        mask
    }

    fn slot(&self, cx: usize, cy: usize) -> Option<usize> {
        (cx < self.size && cy < self.size).then(|| cy * self.size + cx)
    }

    /// Mark a cell as excluded. Returns false if the cell is out of range.
    pub fn exclude(&mut self, cx: usize, cy: usize) -> bool {
        self.set(cx, cy, true)
    }

    /// Clear a cell's exclusion. Returns false if the cell is out of range.
    pub fn include(&mut self, cx: usize, cy: usize) -> bool {
        self.set(cx, cy, false)
    }

    fn set(&mut self, cx: usize, cy: usize, value: bool) -> bool {
        match self.slot(cx, cy) {
            Some(i) => {
                self.excluded[i] = value;
                true
            }
            None => false,
        }
    }

    /// Number of excluded cells.
    pub fn excluded_count(&self) -> usize {
        self.excluded.iter().filter(|&&e| e).count()
    }

    /// Cells per side.
    pub fn size(&self) -> usize {
        self.size
    }

}

impl ExclusionMask for CellMask {
    #[inline]
    fn is_excluded(&self, cx: usize, cy: usize) -> bool {
        self.slot(cx, cy).is_some_and(|i| self.excluded[i])
    }
}
