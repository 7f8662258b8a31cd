//! Obstacle field: the ordered stream of pipe pairs
//!
//! Creation order is left-to-right order, since every pair moves at the same
//! speed. Positions are integers on purpose: the scoring check in
//! `sim::actor` depends on pairs stepping through every even x.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::Rect;
use crate::consts::*;

/// Two fixed-gap pipe halves sharing one horizontal position.
///
/// `gap_y` is the top edge of the bottom pipe; the top pipe hangs
/// `PIPE_H + PIPE_GAP` above it. Both are drawn once at creation and only
/// `x` changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipePair {
    pub x: i32,
    pub gap_y: i32,
}

impl PipePair {
    /// Top edge of the upper pipe half
    pub fn top_y(&self) -> i32 {
        self.gap_y - PIPE_H - PIPE_GAP
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.top_y() as f32,
            PIPE_W as f32,
            PIPE_H as f32,
        )
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.gap_y as f32,
            PIPE_W as f32,
            PIPE_H as f32,
        )
    }

    /// The x the bird must sit on to score this pair
    pub fn trailing_edge(&self) -> i32 {
        self.x + PIPE_W
    }
}

/// Ordered set of pipe pairs, oldest (leftmost) first
#[derive(Debug, Clone, Default)]
pub struct PipeField {
    pairs: Vec<PipePair>,
}

impl PipeField {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: Vec<PipePair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[PipePair] {
        &self.pairs
    }

    /// Spawn a fresh pair once every existing pair has fully entered the
    /// screen (or the field is empty). The spawn offset keeps at most one
    /// pair in spawn position at a time.
    pub fn maybe_spawn(&mut self, rng: &mut Pcg32) {
        let all_entered = self
            .pairs
            .iter()
            .all(|p| p.x < SCREEN_W as i32 - PIPE_W);
        if all_entered {
            let gap_y = rng.random_range(GAP_MIN_Y..GAP_MAX_Y);
            self.pairs.push(PipePair {
                x: PIPE_SPAWN_X,
                gap_y,
            });
        }
    }

    /// Advance every pair by the fixed step (while the round is moving) and
    /// drop pairs that have fully left the trailing edge.
    pub fn advance_and_prune(&mut self, moving: bool) {
        if moving {
            for pair in &mut self.pairs {
                pair.x -= PIPE_STEP;
            }
        }
        self.pairs.retain(|p| p.x >= -PIPE_W);
    }

    /// Both rectangles of every pair, for the collision query
    pub fn collision_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.pairs
            .iter()
            .flat_map(|p| [p.top_rect(), p.bottom_rect()])
    }

    /// Trailing-edge x of every pair, for the scoring query
    pub fn trailing_edges(&self) -> impl Iterator<Item = i32> + '_ {
        self.pairs.iter().map(|p| p.trailing_edge())
    }
}
