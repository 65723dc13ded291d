//! Core game logic module for Snake
//!
//! The state machine that moves the snake, wraps it around the board edges,
//! detects collisions and places food. No I/O or rendering lives here.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome, free_cells};
pub use state::{Cell, CollisionType, GameState, GameStatus, Snake};
