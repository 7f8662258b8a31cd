//! Pipe Dash - a single-screen tap-to-flap arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, round state)
//! - `render`: Frame composition (state -> draw commands)
//! - `assets`: Spritesheet loading and slicing
//! - `audio`: Fire-and-forget sound cues
//! - `persistence`: Best-score store
//! - `app`: Window shell and the fixed-tick frame driver

pub mod app;
pub mod assets;
pub mod audio;
pub mod persistence;
pub mod render;
pub mod sim;

pub use persistence::ScoreStore;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical render surface (pixels); every offset below is relative to this
    pub const SCREEN_W: u32 = 288;
    pub const SCREEN_H: u32 = 512;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Bird geometry - x never changes, only y
    pub const BIRD_X: i32 = 70;
    pub const BIRD_START_Y: f32 = 244.0;
    pub const BIRD_W: f32 = 34.0;
    pub const BIRD_H: f32 = 24.0;
    /// Hit-box shrink per side (wiggle room)
    pub const HITBOX_INSET: f32 = 5.0;

    /// Vertical travel limits; the floor is where the ground strip begins
    /// minus a little headroom for the sprite
    pub const CEILING_Y: f32 = -5.0;
    pub const FLOOR_Y: f32 = 368.0;

    /// Gravity schedule - the dead bird falls harder and faster
    pub const GRAVITY_ALIVE: f32 = 0.2;
    pub const GRAVITY_DEAD: f32 = 0.4;
    pub const TERMINAL_ALIVE: f32 = 5.0;
    pub const TERMINAL_DEAD: f32 = 7.5;
    pub const FLAP_VELOCITY: f32 = -5.0;

    /// Pipe geometry and motion
    pub const PIPE_W: i32 = 52;
    pub const PIPE_H: i32 = 320;
    /// Vertical gap between the two halves of a pair
    pub const PIPE_GAP: i32 = 100;
    /// Horizontal spacing ahead of the screen edge for a fresh pair
    pub const PIPE_SPACING: i32 = 100;
    /// Horizontal step per tick. Even, like every x it ever touches; the
    /// scoring check relies on this (see `sim::actor`)
    pub const PIPE_STEP: i32 = 2;
    pub const PIPE_SPAWN_X: i32 = SCREEN_W as i32 + PIPE_SPACING;
    /// Placement range for the bottom pipe's top edge (keeps both halves
    /// on-screen given the fixed gap)
    pub const GAP_MIN_Y: i32 = 24 + PIPE_GAP;
    pub const GAP_MAX_Y: i32 = SCREEN_H as i32 - 168;

    /// Scrolling ground strip
    pub const GROUND_Y: i32 = SCREEN_H as i32 - 112;
    pub const GROUND_STEP: i32 = 2;
    pub const GROUND_WRAP: i32 = -48;

    /// Death sequencing, counted in ticks since the alive flag flipped
    pub const DIE_SOUND_TICK: u32 = TICK_RATE / 4;
    pub const GAME_OVER_TICK: u32 = TICK_RATE * 3 / 4;
    pub const RESULTS_TICK: u32 = TICK_RATE * 3 / 2;
    pub const RESTART_TICK: u32 = TICK_RATE * 2;

    /// White flash decay after death
    pub const FLASH_STEP: u8 = 16;
    /// Black menu-fade ramp, both directions
    pub const FADE_STEP: u8 = 8;

    /// Wing animation advances every 4th tick
    pub const WING_PERIOD: u64 = 4;

    /// Fixed overlay placement (centered offsets baked in, like the art)
    pub const GET_READY_POS: (i32, i32) = (57, 234);
    pub const GAME_OVER_POS: (i32, i32) = (48, 100);
    pub const RESULTS_POS: (i32, i32) = (31, 175);
    pub const MEDAL_POS: (i32, i32) = (57, 217);
    pub const PLAY_BUTTON_POS: (i32, i32) = (92, 300);
    /// Right edge the results-panel scores align to
    pub const RESULTS_SCORE_RIGHT: i32 = SCREEN_W as i32 / 2 + 91;
    pub const RESULTS_SCORE_Y: i32 = 209;
    pub const RESULTS_BEST_Y: i32 = 250;
    pub const BIG_SCORE_Y: i32 = 24;
}

/// Axis-aligned rectangle in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Shrink by `d` on every side
    pub fn inset(self, d: f32) -> Self {
        Self::new(self.x + d, self.y + d, self.w - 2.0 * d, self.h - 2.0 * d)
    }

    /// Strict overlap - rectangles that only touch do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}
