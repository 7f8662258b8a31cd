//! One frame of draw commands from the session state
//!
//! Draw order matters: backdrop, pipes, ground, bird, then the HUD and
//! overlay layers on top. The overlays are driven entirely by the round
//! phase and the ticks-since-death counter.

use glam::Vec2;

use super::digits::{self, BIG, GlyphSet, SMALL};
use super::sprites::{DrawCmd, Medal, SpriteId};
use crate::consts::*;
use crate::sim::{GameSession, RoundPhase};

/// Compose the full command list for the current tick. `button_pressed`
/// nudges the restart control down while the pointer holds it.
pub fn compose(session: &GameSession, button_pressed: bool) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(32);

    cmds.push(DrawCmd::sprite(
        SpriteId::Background(session.background),
        0,
        0,
    ));

    for pair in session.pipes.pairs() {
        cmds.push(DrawCmd::sprite(
            SpriteId::Pipe {
                skin: session.pipe_skin,
                flipped: true,
            },
            pair.x,
            pair.top_y(),
        ));
        cmds.push(DrawCmd::sprite(
            SpriteId::Pipe {
                skin: session.pipe_skin,
                flipped: false,
            },
            pair.x,
            pair.gap_y,
        ));
    }

    cmds.push(DrawCmd::sprite(
        SpriteId::Ground,
        session.ground_x,
        GROUND_Y,
    ));

    let bird = &session.bird;
    cmds.push(DrawCmd::Sprite {
        id: SpriteId::Bird {
            variant: bird.variant,
            frame: bird.frame(),
        },
        pos: Vec2::new(BIRD_X as f32, bird.y),
        rotation: bird.rotation(session.first_input),
    });

    if bird.alive {
        let w = digits::width(bird.score, &BIG);
        push_score(
            &mut cmds,
            bird.score,
            &BIG,
            (SCREEN_W as i32 - w) / 2,
            BIG_SCORE_Y,
        );
    }

    if !session.first_input {
        cmds.push(DrawCmd::sprite(
            SpriteId::GetReady,
            GET_READY_POS.0,
            GET_READY_POS.1,
        ));
    }

    let since_death = bird.ticks_since_death;
    if !bird.alive && since_death >= GAME_OVER_TICK {
        cmds.push(DrawCmd::sprite(
            SpriteId::GameOver,
            GAME_OVER_POS.0,
            GAME_OVER_POS.1,
        ));
    }

    // Results panel, shown from the reveal tick through the fade-out
    let display_score = match session.phase {
        RoundPhase::Results { display_score, .. } => Some(display_score),
        RoundPhase::MenuFade {
            rising: true,
            display_score,
            ..
        } => Some(display_score),
        _ => None,
    };
    if let Some(shown) = display_score {
        cmds.push(DrawCmd::sprite(
            SpriteId::ResultsPanel,
            RESULTS_POS.0,
            RESULTS_POS.1,
        ));
        let w = digits::width(shown, &SMALL);
        push_small_score(&mut cmds, shown, RESULTS_SCORE_RIGHT - w, RESULTS_SCORE_Y);
        let best_w = digits::width(session.best_score, &SMALL);
        push_small_score(
            &mut cmds,
            session.best_score,
            RESULTS_SCORE_RIGHT - best_w,
            RESULTS_BEST_Y,
        );

        if since_death >= RESTART_TICK {
            if let Some(medal) = Medal::for_score(bird.score) {
                cmds.push(DrawCmd::sprite(
                    SpriteId::Medal(medal),
                    MEDAL_POS.0,
                    MEDAL_POS.1,
                ));
            }
            let button_y = PLAY_BUTTON_POS.1 + if button_pressed { 2 } else { 0 };
            cmds.push(DrawCmd::sprite(
                SpriteId::PlayButton,
                PLAY_BUTTON_POS.0,
                button_y,
            ));
        }
    }

    match session.phase {
        RoundPhase::Dying { flash } if flash > 0 => {
            cmds.push(DrawCmd::Fill {
                color: [255, 255, 255],
                alpha: flash,
            });
        }
        RoundPhase::MenuFade { opacity, .. } if opacity > 0 => {
            cmds.push(DrawCmd::Fill {
                color: [0, 0, 0],
                alpha: opacity,
            });
        }
        _ => {}
    }

    cmds
}

fn push_score(cmds: &mut Vec<DrawCmd>, value: u32, set: &GlyphSet, x: i32, y: i32) {
    for (digit, at) in digits::layout(value, set, x) {
        cmds.push(DrawCmd::sprite(SpriteId::BigDigit(digit), at, y));
    }
}

fn push_small_score(cmds: &mut Vec<DrawCmd>, value: u32, x: i32, y: i32) {
    for (digit, at) in digits::layout(value, &SMALL, x) {
        cmds.push(DrawCmd::sprite(SpriteId::SmallDigit(digit), at, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(cmds: &[DrawCmd], id: SpriteId) -> bool {
        cmds.iter().any(|c| matches!(c, DrawCmd::Sprite { id: i, .. } if *i == id))
    }

    #[test]
    fn ready_frame_shows_the_prompt_and_score() {
        let s = GameSession::new(1, 0);
        let cmds = compose(&s, false);
        assert!(has(&cmds, SpriteId::GetReady));
        assert!(has(&cmds, SpriteId::Background(s.background)));
        assert!(has(&cmds, SpriteId::BigDigit(0)));
        assert!(!has(&cmds, SpriteId::GameOver));
        assert!(!has(&cmds, SpriteId::ResultsPanel));
    }

    #[test]
    fn flying_frame_drops_the_prompt() {
        let mut s = GameSession::new(1, 0);
        s.first_input = true;
        s.phase = RoundPhase::Flying;
        let cmds = compose(&s, false);
        assert!(!has(&cmds, SpriteId::GetReady));
    }

    #[test]
    fn dying_frame_flashes_white() {
        let mut s = GameSession::new(1, 0);
        s.first_input = true;
        s.bird.alive = false;
        s.phase = RoundPhase::Dying { flash: 128 };
        let cmds = compose(&s, false);
        assert!(cmds.contains(&DrawCmd::Fill {
            color: [255, 255, 255],
            alpha: 128
        }));
        assert!(!has(&cmds, SpriteId::GameOver), "reveal has not ticked over yet");
    }

    #[test]
    fn results_frame_shows_panel_medal_and_button() {
        let mut s = GameSession::new(1, 3);
        s.first_input = true;
        s.bird.alive = false;
        s.bird.score = 25;
        s.bird.ticks_since_death = RESTART_TICK;
        s.phase = RoundPhase::Results {
            display_score: 25,
            restart_armed: true,
        };
        let cmds = compose(&s, false);
        assert!(has(&cmds, SpriteId::GameOver));
        assert!(has(&cmds, SpriteId::ResultsPanel));
        assert!(has(&cmds, SpriteId::Medal(Medal::Silver)));
        assert!(has(&cmds, SpriteId::PlayButton));
    }

    #[test]
    fn pressed_button_renders_lower() {
        let mut s = GameSession::new(1, 0);
        s.first_input = true;
        s.bird.alive = false;
        s.bird.ticks_since_death = RESTART_TICK;
        s.phase = RoundPhase::Results {
            display_score: 0,
            restart_armed: true,
        };
        let up = compose(&s, false);
        let down = compose(&s, true);
        let button_y = |cmds: &[DrawCmd]| {
            cmds.iter()
                .find_map(|c| match c {
                    DrawCmd::Sprite {
                        id: SpriteId::PlayButton,
                        pos,
                        ..
                    } => Some(pos.y),
                    _ => None,
                })
                .expect("button drawn")
        };
        assert_eq!(button_y(&down), button_y(&up) + 2.0);
    }

    #[test]
    fn menu_fade_tints_black_over_the_results() {
        let mut s = GameSession::new(1, 0);
        s.first_input = true;
        s.bird.alive = false;
        s.bird.ticks_since_death = RESTART_TICK + 10;
        s.phase = RoundPhase::MenuFade {
            opacity: 64,
            rising: true,
            display_score: 2,
        };
        let cmds = compose(&s, false);
        assert!(has(&cmds, SpriteId::ResultsPanel));
        assert!(cmds.contains(&DrawCmd::Fill {
            color: [0, 0, 0],
            alpha: 64
        }));
    }

    #[test]
    fn pipes_draw_flipped_tops_and_plain_bottoms() {
        let mut s = GameSession::new(1, 0);
        s.first_input = true;
        s.phase = RoundPhase::Flying;
        // run a while so a pair is on screen
        for _ in 0..200 {
            crate::sim::tick(&mut s, &crate::sim::TickInput::default());
            s.bird.alive = true; // keep the scene alive regardless of luck
            s.bird.ticks_since_death = 0;
            s.phase = RoundPhase::Flying;
        }
        let cmds = compose(&s, false);
        assert!(has(
            &cmds,
            SpriteId::Pipe {
                skin: s.pipe_skin,
                flipped: true
            }
        ));
        assert!(has(
            &cmds,
            SpriteId::Pipe {
                skin: s.pipe_skin,
                flipped: false
            }
        ));
    }
}
