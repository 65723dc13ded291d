//! Wrap Snake - a terminal snake game on a wrap-around board with obstacles
//!
//! This library provides:
//! - Core game logic (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Sound cues on the terminal bell (audio module)
//! - Session statistics (metrics module)
//! - The interactive play loop (modes module)

pub mod audio;
pub mod game;
pub mod input;
pub mod logger;
pub mod metrics;
pub mod modes;
pub mod render;
