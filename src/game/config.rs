use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use super::state::Cell;

/// Largest board edge, in cells, that still fits a terminal frame
pub const MAX_BOARD_CELLS: i32 = 1000;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in board units
    pub board_width: i32,
    /// Board height in board units
    pub board_height: i32,
    /// Size of one cell in board units
    pub grid_unit: i32,
    /// Where the one-cell snake starts each round
    pub start: Cell,
    /// Food position at the start of each round
    pub initial_food: Cell,
    /// Fixed obstacles, constant for the game's lifetime
    pub obstacles: Vec<Cell>,
    /// Time between ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Treat the tail cell the snake is about to leave as solid
    pub strict_tail_collision: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 400,
            board_height: 400,
            grid_unit: 20,
            start: Cell::new(160, 160),
            initial_food: Cell::new(320, 320),
            obstacles: vec![
                Cell::new(100, 100),
                Cell::new(200, 200),
                Cell::new(300, 100),
            ],
            tick_interval_ms: 300,
            strict_tail_collision: false,
        }
    }
}

impl GameConfig {
    /// Resize the board to `columns` x `rows` cells of the current grid unit
    pub fn set_cells(&mut self, columns: Option<i32>, rows: Option<i32>) -> Result<()> {
        if let Some(columns) = columns {
            self.board_width = self.cells_to_units(columns)?;
        }
        if let Some(rows) = rows {
            self.board_height = self.cells_to_units(rows)?;
        }
        Ok(())
    }

    fn cells_to_units(&self, cells: i32) -> Result<i32> {
        cells.checked_mul(self.grid_unit).with_context(|| {
            format!(
                "{} cells of {} units overflow the board size",
                cells, self.grid_unit
            )
        })
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check that the board and every preset cell are consistent
    pub fn validate(&self) -> Result<()> {
        let unit = self.grid_unit;
        ensure!(unit > 0, "grid unit must be positive, got {}", unit);
        ensure!(self.tick_interval_ms > 0, "tick interval must be positive");
        ensure!(
            self.board_width > 0 && self.board_width % unit == 0,
            "board width {} must be a positive multiple of the grid unit {}",
            self.board_width,
            unit
        );
        ensure!(
            self.board_height > 0 && self.board_height % unit == 0,
            "board height {} must be a positive multiple of the grid unit {}",
            self.board_height,
            unit
        );
        ensure!(
            self.board_width / unit <= MAX_BOARD_CELLS
                && self.board_height / unit <= MAX_BOARD_CELLS,
            "board of {}x{} cells exceeds the {} cell limit per side",
            self.board_width / unit,
            self.board_height / unit,
            MAX_BOARD_CELLS
        );

        let named = std::iter::once(("start", &self.start))
            .chain(std::iter::once(("initial food", &self.initial_food)))
            .chain(self.obstacles.iter().map(|cell| ("obstacle", cell)));
        for (name, cell) in named {
            ensure!(
                self.contains(*cell),
                "{} {:?} lies outside the {}x{} board",
                name,
                cell,
                self.board_width,
                self.board_height
            );
            ensure!(
                cell.is_aligned(unit),
                "{} {:?} is not aligned to the grid unit {}",
                name,
                cell,
                unit
            );
        }

        let mut seen = HashSet::new();
        for obstacle in &self.obstacles {
            ensure!(seen.insert(*obstacle), "duplicate obstacle {:?}", obstacle);
        }
        ensure!(
            !seen.contains(&self.start),
            "start {:?} is on an obstacle",
            self.start
        );
        ensure!(
            !seen.contains(&self.initial_food),
            "initial food {:?} is on an obstacle",
            self.initial_food
        );
        ensure!(
            self.initial_food != self.start,
            "initial food must not overlap the snake"
        );

        Ok(())
    }

    fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.board_width && cell.y >= 0 && cell.y < self.board_height
    }
}
