//! Presentation composition
//!
//! Pure state-to-draw-commands mapping. Nothing here touches a surface;
//! the frame driver executes the command list against the blitter.

pub mod digits;
pub mod frame;
pub mod sprites;

pub use frame::compose;
pub use sprites::{DrawCmd, Medal, SpriteId};
