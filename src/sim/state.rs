//! Session aggregate and the round/presentation state machine
//!
//! One `GameSession` owns everything a round needs - bird, pipe field,
//! cosmetic picks and the RNG that made them - so the frame driver holds a
//! single value instead of a pile of globals.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::actor::{Bird, BirdVariant};
use super::field::PipeField;

/// Backdrop picked once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Day,
    Night,
}

/// Pipe texture column picked once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeSkin {
    Green,
    Red,
}

/// Phase of a single round. Advances are one-directional; the only cycle
/// point is the fade back to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundPhase {
    /// Bird hovers, "get ready" overlay shown; exits on the first flap
    Ready,
    /// Normal physics; exits when the bird's alive flag flips
    Flying,
    /// White flash decaying while the game-over reveal counts down
    Dying { flash: u8 },
    /// Results panel up, display score ramping toward the true score
    Results { display_score: u32, restart_armed: bool },
    /// Black overlay ramping up, state swapped at full black, then back down
    MenuFade {
        opacity: u8,
        rising: bool,
        display_score: u32,
    },
}

/// Sound-worthy moments surfaced by a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Wing,
    Point,
    Hit,
    Die,
    Swoosh,
    /// The round score just beat the persisted best
    NewBest(u32),
}

/// Everything the frame driver owns: one round's worth of mutable state
/// plus the process-wide best score.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub rng: Pcg32,
    pub bird: Bird,
    pub pipes: PipeField,
    pub phase: RoundPhase,
    /// Gravity and rotation stay off until the round's first flap
    pub first_input: bool,
    /// Ticks since this round started
    pub ticks: u64,
    /// Scrolling ground offset, wraps every 48 px
    pub ground_x: i32,
    pub background: Background,
    pub pipe_skin: PipeSkin,
    /// Highest score ever achieved; survives round resets
    pub best_score: u32,
}

impl GameSession {
    pub fn new(seed: u64, best_score: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (bird, background, pipe_skin) = draw_cosmetics(&mut rng);
        Self {
            rng,
            bird,
            pipes: PipeField::new(),
            phase: RoundPhase::Ready,
            first_input: false,
            ticks: 0,
            ground_x: 0,
            background,
            pipe_skin,
            best_score,
        }
    }

    /// Reset everything that belongs to a single round. The RNG and the best
    /// score survive; the caller decides the phase (the fade transition
    /// resets at full black, the very first round starts in `Ready`).
    pub fn reset_round(&mut self) {
        let (bird, background, pipe_skin) = draw_cosmetics(&mut self.rng);
        self.bird = bird;
        self.pipes = PipeField::new();
        self.first_input = false;
        self.ticks = 0;
        self.ground_x = 0;
        self.background = background;
        self.pipe_skin = pipe_skin;
    }
}

fn draw_cosmetics(rng: &mut Pcg32) -> (Bird, Background, PipeSkin) {
    let variant = match rng.random_range(0..3) {
        0 => BirdVariant::Yellow,
        1 => BirdVariant::Red,
        _ => BirdVariant::Blue,
    };
    let background = if rng.random_range(0..2) == 0 {
        Background::Day
    } else {
        Background::Night
    };
    let skin = if rng.random_range(0..2) == 0 {
        PipeSkin::Green
    } else {
        PipeSkin::Red
    };
    (Bird::new(variant), background, skin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn new_session_starts_ready() {
        let s = GameSession::new(7, 12);
        assert_eq!(s.phase, RoundPhase::Ready);
        assert!(!s.first_input);
        assert_eq!(s.best_score, 12);
        assert_eq!(s.bird.y, BIRD_START_Y);
        assert!(s.pipes.pairs().is_empty());
    }

    #[test]
    fn reset_round_keeps_best_score_and_rng_stream() {
        let mut s = GameSession::new(7, 0);
        s.best_score = 9;
        s.first_input = true;
        s.ticks = 500;
        s.ground_x = -30;
        s.bird.score = 9;
        s.reset_round();
        assert_eq!(s.best_score, 9);
        assert!(!s.first_input);
        assert_eq!(s.ticks, 0);
        assert_eq!(s.ground_x, 0);
        assert_eq!(s.bird.score, 0);
        assert!(s.bird.alive);
    }

    #[test]
    fn same_seed_draws_the_same_cosmetics() {
        let a = GameSession::new(42, 0);
        let b = GameSession::new(42, 0);
        assert_eq!(a.bird.variant, b.bird.variant);
        assert_eq!(a.background, b.background);
        assert_eq!(a.pipe_skin, b.pipe_skin);
    }
}
