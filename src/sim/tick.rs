//! Fixed timestep session update
//!
//! One call = one tick: input response, obstacle mutation, actor physics,
//! then the round state machine. Events come back in the order they
//! happened so the frame driver can fire sounds and persistence.

use super::state::{GameEvent, GameSession, RoundPhase};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Jump trigger (key or primary pointer press)
    pub flap: bool,
    /// Restart-control activation (only honored while the control is armed)
    pub restart: bool,
}

/// Advance the session by one fixed timestep.
pub fn tick(session: &mut GameSession, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Restart control: swap to the menu fade, keep the ramping display
    // score running underneath it
    if input.restart
        && matches!(
            session.phase,
            RoundPhase::Results {
                restart_armed: true,
                ..
            }
        )
    {
        if let RoundPhase::Results { display_score, .. } = session.phase {
            session.phase = RoundPhase::MenuFade {
                opacity: 0,
                rising: true,
                display_score,
            };
            events.push(GameEvent::Swoosh);
        }
    }

    // The round's first flap starts the physics
    let flap = input.flap && session.bird.alive;
    if flap && !session.first_input {
        session.first_input = true;
        if session.phase == RoundPhase::Ready {
            session.phase = RoundPhase::Flying;
        }
    }

    // Obstacle field: spawn, then advance while the round is live
    session.pipes.maybe_spawn(&mut session.rng);
    let moving = session.bird.alive && session.first_input;
    session.pipes.advance_and_prune(moving);

    // Ground scrolls whenever the bird is alive, frozen on death
    if session.bird.alive {
        if session.ground_x > GROUND_WRAP {
            session.ground_x -= GROUND_STEP;
        } else {
            session.ground_x = 0;
        }
    }

    // Actor physics, collision and scoring
    let was_alive = session.bird.alive;
    session.bird.update(
        flap,
        session.first_input,
        session.ticks,
        &session.pipes,
        &mut events,
    );

    // Death transition: persist-worthy best score exactly once, here
    if was_alive && !session.bird.alive {
        if session.bird.score > session.best_score {
            session.best_score = session.bird.score;
            events.push(GameEvent::NewBest(session.bird.score));
        }
        session.phase = RoundPhase::Dying { flash: 255 };
    }

    session.phase = advance_phase(session, &mut events);
    session.ticks += 1;
    events
}

/// The presentation state machine: a pure function of the current phase,
/// the ticks-since-death counter and the overlay accumulators.
fn advance_phase(session: &mut GameSession, events: &mut Vec<GameEvent>) -> RoundPhase {
    let since_death = session.bird.ticks_since_death;
    match session.phase {
        RoundPhase::Ready | RoundPhase::Flying => session.phase,

        RoundPhase::Dying { flash } => {
            if since_death == GAME_OVER_TICK {
                events.push(GameEvent::Swoosh);
            }
            if since_death >= RESULTS_TICK {
                RoundPhase::Results {
                    display_score: 0,
                    restart_armed: false,
                }
            } else {
                RoundPhase::Dying {
                    flash: flash.saturating_sub(FLASH_STEP),
                }
            }
        }

        RoundPhase::Results {
            display_score,
            restart_armed,
        } => {
            if since_death == RESTART_TICK {
                events.push(GameEvent::Swoosh);
            }
            RoundPhase::Results {
                display_score: (display_score + 1).min(session.bird.score),
                restart_armed: restart_armed || since_death >= RESTART_TICK,
            }
        }

        RoundPhase::MenuFade {
            opacity,
            rising: true,
            display_score,
        } => {
            let opacity = opacity.saturating_add(FADE_STEP);
            if opacity == u8::MAX {
                // Full black: swap in the fresh round behind the overlay
                session.reset_round();
                RoundPhase::MenuFade {
                    opacity,
                    rising: false,
                    display_score: 0,
                }
            } else {
                RoundPhase::MenuFade {
                    opacity,
                    rising: true,
                    display_score: (display_score + 1).min(session.bird.score),
                }
            }
        }

        RoundPhase::MenuFade {
            opacity,
            rising: false,
            ..
        } => {
            let opacity = opacity.saturating_sub(FADE_STEP);
            if opacity == 0 {
                // Fully faded back in; a flap mid-fade already started the round
                if session.first_input {
                    RoundPhase::Flying
                } else {
                    RoundPhase::Ready
                }
            } else {
                RoundPhase::MenuFade {
                    opacity,
                    rising: false,
                    display_score: 0,
                }
            }
        }
    }
}
