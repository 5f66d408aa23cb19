//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Keyboard input to per-player intents

pub mod input;
pub mod time;

pub use input::KeyBindings;
pub use time::now_ms;
