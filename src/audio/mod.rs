//! Sound cues for game events
//!
//! The terminal has no mixer, so cues are rung on the terminal bell.

pub mod sink;

pub use sink::{AudioSink, Silent, SoundCue, TerminalBell};
