//! Three-slot ranking of the nearest distinct contour levels.
//!
//! A [`ContourRanker`] lives for a single query. It keeps the closest
//! segment seen for up to three different elevation ids, sorted by squared
//! distance, and turns them into an inverse-distance-weighted elevation.

use crate::NO_DATA;

/// Number of distinct contour levels tracked per query.
pub const RANK_SLOTS: usize = 3;

/// Elevation id marking an unoccupied slot.
pub const EMPTY_ELEVATION_ID: i32 = -1;

/// One ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub distance_sq: f64,
    pub elevation_id: i32,
    pub elevation: f64,
}

impl Candidate {
    const EMPTY: Candidate = Candidate {
        distance_sq: f64::INFINITY,
        elevation_id: EMPTY_ELEVATION_ID,
        elevation: 0.0,
    };
}

/// Closest candidates of up to three distinct elevation ids.
///
/// Occupied slots always form a prefix of `slots`, are sorted by ascending
/// `distance_sq` and carry pairwise distinct elevation ids.
#[derive(Debug, Clone)]
pub struct ContourRanker {
    slots: [Candidate; RANK_SLOTS],
    len: usize,
}

impl Default for ContourRanker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContourRanker {
    pub fn new() -> Self {
        Self {
            slots: [Candidate::EMPTY; RANK_SLOTS],
            len: 0,
        }
    }

    /// Offer a candidate segment.
    ///
    /// A candidate for an elevation id that is already ranked only replaces
    /// it when strictly closer, then bubbles up past farther slots. A new id
    /// is inserted at its rank, pushing farther slots down and dropping
    /// whatever falls off rank three.
    pub fn add_candidate(&mut self, distance_sq: f64, elevation_id: i32, elevation: f64) {
        let len = self.len;

        if let Some(pos) = self.slots[..len]
            .iter()
            .position(|c| c.elevation_id == elevation_id)
        {
            if distance_sq < self.slots[pos].distance_sq {
                self.slots[pos].distance_sq = distance_sq;
                self.slots[pos].elevation = elevation;

                let mut i = pos;
                while i > 0 && self.slots[i].distance_sq < self.slots[i - 1].distance_sq {
                    self.slots.swap(i, i - 1);
                    i -= 1;
                }
            }
            return;
        }

        let pos = self.slots[..len]
            .iter()
            .position(|c| distance_sq < c.distance_sq)
            .unwrap_or(len);
        if pos >= RANK_SLOTS {
            return;
        }

        // Shift farther slots down one rank; a full ranker loses its last slot.
        let last = len.min(RANK_SLOTS - 1);
        for i in (pos..last).rev() {
            self.slots[i + 1] = self.slots[i];
        }
        self.slots[pos] = Candidate {
            distance_sq,
            elevation_id,
            elevation,
        };
        self.len = (len + 1).min(RANK_SLOTS);
    }

    /// True once the two nearest ranks are occupied. The third is optional.
    pub fn has_sufficient_data(&self) -> bool {
        self.len >= 2
    }

    /// Inverse-distance-squared weighted elevation of the occupied slots.
    ///
    /// Weights are taken relative to the closest slot, which is
    /// algebraically identical to `Σ(e/d) / Σ(1/d)` but exact when distances
    /// tie. A single occupied slot (or a zero closest distance) yields that
    /// slot's elevation unchanged. An empty ranker yields [`NO_DATA`].
    pub fn weighted_elevation(&self) -> f64 {
        let ranked = self.ranked();
        let Some(closest) = ranked.first() else {
            return NO_DATA;
        };
        if ranked.len() == 1 || closest.distance_sq <= 0.0 {
            return closest.elevation;
        }

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for c in ranked {
            let w = closest.distance_sq / c.distance_sq;
            weighted_sum += c.elevation * w;
            weight_total += w;
        }
        weighted_sum / weight_total
    }

    /// Occupied slots, closest first.
    pub fn ranked(&self) -> &[Candidate] {
        &self.slots[..self.len]
    }

    /// Slot by rank (0 = closest); unoccupied slots carry
    /// [`EMPTY_ELEVATION_ID`].
    pub fn slot(&self, rank: usize) -> &Candidate {
        &self.slots[rank]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
