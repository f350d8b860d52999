#![no_std]

extern crate alloc;

pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use playback::*;
pub use scheme::*;
pub use score::*;
pub use timer::*;
pub use types::*;

mod difficulty;
mod engine;
mod error;
mod generator;
mod playback;
mod scheme;
mod score;
mod timer;
mod types;

/// Time between a highlight switching off and the next step starting.
pub const HIGHLIGHT_GAP: Millis = 200;

/// Pause between a completed round and the playback of the extended sequence.
pub const ROUND_DELAY: Millis = 1000;
