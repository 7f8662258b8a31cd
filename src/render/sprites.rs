//! Sprite handles and draw commands
//!
//! `SpriteId` names every pre-sliced image the asset collaborator supplies;
//! `DrawCmd` is the whole contract between the core and the blitter.

use glam::Vec2;

use crate::sim::{Background, BirdVariant, PipeSkin};

/// Results-panel medal tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Medal {
    pub fn for_score(score: u32) -> Option<Self> {
        match score {
            0..=9 => None,
            10..=19 => Some(Medal::Bronze),
            20..=29 => Some(Medal::Silver),
            30..=39 => Some(Medal::Gold),
            _ => Some(Medal::Platinum),
        }
    }
}

/// Handle to one pre-sliced image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Background(Background),
    /// One wing frame (0..3) of one palette
    Bird { variant: BirdVariant, frame: u8 },
    /// Bottom halves draw the skin as-is, top halves its vertical flip
    Pipe { skin: PipeSkin, flipped: bool },
    Ground,
    BigDigit(u8),
    SmallDigit(u8),
    GetReady,
    GameOver,
    ResultsPanel,
    Medal(Medal),
    PlayButton,
}

/// One frame instruction for the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    /// Draw `id` with its top-left corner at `pos`, rotated about its
    /// center by `rotation` degrees (counter-clockwise)
    Sprite {
        id: SpriteId,
        pos: Vec2,
        rotation: f32,
    },
    /// Blend a full-screen tint over everything drawn so far
    Fill { color: [u8; 3], alpha: u8 },
}

impl DrawCmd {
    pub fn sprite(id: SpriteId, x: i32, y: i32) -> Self {
        DrawCmd::Sprite {
            id,
            pos: Vec2::new(x as f32, y as f32),
            rotation: 0.0,
        }
    }
}
