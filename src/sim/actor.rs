//! The player-controlled bird: physics integration, input response,
//! animation-frame selection and death detection.
//!
//! Collision, scoring and death are side effects inspectable through public
//! fields; `update` itself returns nothing but pushes sound-worthy moments
//! into the event list.

use super::field::PipeField;
use super::state::GameEvent;
use crate::Rect;
use crate::consts::*;

/// Wing frame order; the middle frame appears twice per cycle.
const WING_SEQ: [u8; 4] = [0, 1, 2, 1];

/// Sprite palette picked once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdVariant {
    Yellow,
    Red,
    Blue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Vertical position; x is fixed at `consts::BIRD_X`
    pub y: f32,
    /// Downward velocity, integrated once per tick
    pub velocity: f32,
    pub alive: bool,
    /// Monotonically non-decreasing while alive; reset only with the bird
    pub score: u32,
    /// Drives the death/fade sequencing in the round state machine
    pub ticks_since_death: u32,
    pub variant: BirdVariant,
    wing_phase: usize,
}

impl Bird {
    pub fn new(variant: BirdVariant) -> Self {
        Self {
            y: BIRD_START_Y,
            velocity: 0.0,
            alive: true,
            score: 0,
            ticks_since_death: 0,
            variant,
            wing_phase: 0,
        }
    }

    /// Shrunk collision rectangle at the current position
    pub fn hitbox(&self) -> Rect {
        Rect::new(BIRD_X as f32, self.y, BIRD_W, BIRD_H).inset(HITBOX_INSET)
    }

    /// True once the alive-side terminal velocity has been reached
    pub fn at_terminal(&self) -> bool {
        self.velocity >= TERMINAL_ALIVE
    }

    /// Sprite frame to show: the fixed plunge frame at terminal velocity,
    /// otherwise the wing cycle
    pub fn frame(&self) -> u8 {
        if self.at_terminal() {
            2
        } else {
            WING_SEQ[self.wing_phase]
        }
    }

    /// Visual rotation in degrees, a linear map of velocity. Zero until the
    /// round's first input, like the physics.
    pub fn rotation(&self, first_input: bool) -> f32 {
        if !first_input {
            0.0
        } else if self.velocity > 0.0 {
            -self.velocity * 15.0 + 15.0
        } else {
            15.0
        }
    }

    /// One fixed step: input response, gravity, clamps, collision, scoring.
    pub fn update(
        &mut self,
        flap: bool,
        first_input: bool,
        tick: u64,
        pipes: &PipeField,
        events: &mut Vec<GameEvent>,
    ) {
        if tick % WING_PERIOD == 0 && !self.at_terminal() {
            self.wing_phase = (self.wing_phase + 1) % WING_SEQ.len();
        }

        if flap && self.alive {
            self.velocity = FLAP_VELOCITY;
            events.push(GameEvent::Wing);
        }

        if self.alive {
            if self.velocity < TERMINAL_ALIVE {
                self.velocity += GRAVITY_ALIVE;
            }
        } else if self.velocity < TERMINAL_DEAD {
            self.velocity += GRAVITY_DEAD;
        }

        // The bird hovers until the round's first input
        if !first_input {
            self.velocity = 0.0;
        }

        self.y += self.velocity;

        if self.y < CEILING_Y {
            self.y = CEILING_Y;
            self.velocity = 0.0;
        }
        if self.y > FLOOR_Y {
            self.y = FLOOR_Y;
            self.velocity = 0.0;
            if self.alive {
                self.alive = false;
                events.push(GameEvent::Hit);
            }
        }

        if self.alive {
            let hitbox = self.hitbox();
            if pipes.collision_rects().any(|r| hitbox.overlaps(&r)) {
                self.alive = false;
                events.push(GameEvent::Hit);
            } else {
                // Exact-equality scoring: pairs step by 2 through even x
                // values and BIRD_X is even, so each trailing edge lands on
                // BIRD_X exactly once. Changing the step or any x offset
                // breaks this - see the regression test in sim::tick.
                for edge in pipes.trailing_edges() {
                    if edge == BIRD_X {
                        self.score += 1;
                        events.push(GameEvent::Point);
                    }
                }
            }
        } else {
            self.ticks_since_death += 1;
            if self.ticks_since_death == DIE_SOUND_TICK {
                events.push(GameEvent::Die);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::field::PipePair;
    use proptest::prelude::*;

    fn bird() -> Bird {
        Bird::new(BirdVariant::Yellow)
    }

    fn step(b: &mut Bird, flap: bool, first_input: bool, tick: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        b.update(flap, first_input, tick, &PipeField::new(), &mut events);
        events
    }

    #[test]
    fn hovers_until_first_input() {
        let mut b = bird();
        for t in 0..100 {
            step(&mut b, false, false, t);
        }
        assert_eq!(b.y, BIRD_START_Y);
        assert_eq!(b.velocity, 0.0);
        assert!(b.alive);
        assert_eq!(b.score, 0);
    }

    #[test]
    fn flap_resets_velocity_and_cues_the_wing() {
        let mut b = bird();
        let events = step(&mut b, true, true, 0);
        assert!(events.contains(&GameEvent::Wing));
        // one tick of gravity has already been applied
        assert!((b.velocity - (FLAP_VELOCITY + GRAVITY_ALIVE)).abs() < 1e-6);
        assert!(b.y < BIRD_START_Y);
    }

    #[test]
    fn gravity_never_overshoots_terminal_velocity() {
        let mut b = bird();
        for t in 0..600 {
            step(&mut b, false, true, t);
            let cap = if b.alive {
                TERMINAL_ALIVE + GRAVITY_ALIVE
            } else {
                TERMINAL_DEAD + GRAVITY_DEAD
            };
            assert!(b.velocity <= cap, "velocity {} over cap {}", b.velocity, cap);
        }
    }

    #[test]
    fn floor_clamp_kills_exactly_once() {
        let mut b = bird();
        b.y = FLOOR_Y - 1.0;
        let mut hits = 0;
        for t in 0..120 {
            hits += step(&mut b, false, true, t)
                .iter()
                .filter(|e| **e == GameEvent::Hit)
                .count();
            assert!(b.y <= FLOOR_Y);
        }
        assert_eq!(hits, 1);
        assert!(!b.alive);
        assert_eq!(b.y, FLOOR_Y);
    }

    #[test]
    fn ceiling_clamp_zeroes_velocity() {
        let mut b = bird();
        b.y = 0.0;
        b.velocity = -20.0;
        // velocity is forced upward far past the clamp in a single step
        let mut events = Vec::new();
        b.update(false, true, 1, &PipeField::new(), &mut events);
        assert_eq!(b.y, CEILING_Y);
        assert_eq!(b.velocity, 0.0);
        assert!(b.alive);
    }

    #[test]
    fn pipe_contact_kills_and_cues_the_hit() {
        let mut b = bird();
        let field = PipeField::from_pairs(vec![PipePair {
            x: BIRD_X,
            gap_y: 124, // bottom pipe occupies the bird's row
        }]);
        let mut events = Vec::new();
        b.update(false, true, 0, &field, &mut events);
        assert!(!b.alive);
        assert_eq!(events, vec![GameEvent::Hit]);
        // a second update must not re-trigger the transition
        events.clear();
        b.update(false, true, 1, &field, &mut events);
        assert!(!events.contains(&GameEvent::Hit));
    }

    #[test]
    fn scores_when_a_trailing_edge_sits_on_the_bird() {
        let mut b = bird();
        let field = PipeField::from_pairs(vec![PipePair {
            x: BIRD_X - PIPE_W, // trailing edge exactly at BIRD_X
            gap_y: 344,         // gap covers the bird's row
        }]);
        let mut events = Vec::new();
        b.update(false, false, 0, &field, &mut events);
        assert_eq!(b.score, 1);
        assert_eq!(events, vec![GameEvent::Point]);
    }

    #[test]
    fn die_cue_fires_a_quarter_second_after_death() {
        let mut b = bird();
        b.alive = false;
        let mut die_ticks = Vec::new();
        for t in 0..60u64 {
            if step(&mut b, false, true, t).contains(&GameEvent::Die) {
                die_ticks.push(b.ticks_since_death);
            }
        }
        assert_eq!(die_ticks, vec![DIE_SOUND_TICK]);
    }

    #[test]
    fn plunge_frame_at_terminal_velocity() {
        let mut b = bird();
        // long enough to hit terminal velocity, short of the floor clamp
        for t in 0..30 {
            step(&mut b, false, true, t);
        }
        assert!(b.alive);
        assert!(b.at_terminal());
        assert_eq!(b.frame(), 2);
    }

    #[test]
    fn wing_cycle_advances_every_fourth_tick() {
        let mut b = bird();
        let start = b.frame();
        step(&mut b, false, false, 1);
        step(&mut b, false, false, 2);
        step(&mut b, false, false, 3);
        assert_eq!(b.frame(), start, "no advance between period boundaries");
        step(&mut b, false, false, 4);
        assert_ne!(b.frame(), start);
    }

    #[test]
    fn rotation_is_zero_before_first_input() {
        let mut b = bird();
        b.velocity = 4.0;
        assert_eq!(b.rotation(false), 0.0);
        assert_eq!(b.rotation(true), -45.0);
        b.velocity = -3.0;
        assert_eq!(b.rotation(true), 15.0);
    }

    proptest! {
        /// For any flap sequence the bird stays inside the vertical band and
        /// its score never decreases.
        #[test]
        fn y_and_score_invariants(flaps in proptest::collection::vec(any::<bool>(), 1..400)) {
            let mut b = bird();
            let field = PipeField::new();
            let mut last_score = 0;
            for (t, flap) in flaps.iter().enumerate() {
                let mut events = Vec::new();
                b.update(*flap, true, t as u64, &field, &mut events);
                prop_assert!(b.y >= CEILING_Y);
                prop_assert!(b.y <= FLOOR_Y);
                prop_assert!(b.score >= last_score);
                last_score = b.score;
            }
        }
    }
}
