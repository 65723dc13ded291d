use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A board coordinate. Both components are multiples of the grid unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one grid unit in a direction, without wrapping
    pub fn stepped(&self, direction: Direction, grid_unit: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * grid_unit, dy * grid_unit)
    }

    pub fn is_aligned(&self, grid_unit: i32) -> bool {
        self.x % grid_unit == 0 && self.y % grid_unit == 0
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Cell>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// A one-cell snake
    pub fn new(head: Cell, direction: Direction) -> Self {
        Self {
            body: vec![head],
            direction,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Whether `cell` is part of the snake. With `ignore_tail`, the last
    /// segment is skipped since it is about to move away.
    pub fn occupies(&self, cell: Cell, ignore_tail: bool) -> bool {
        let segments = if ignore_tail {
            &self.body[..self.body.len() - 1]
        } else {
            &self.body[..]
        };
        segments.contains(&cell)
    }

    /// Prepend `new_head`; the tail is dropped unless the snake grows
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }
}

/// What the snake ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit its own body
    SelfCollision,
    /// Snake hit one of the fixed obstacles
    Obstacle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over,
}

/// Complete game state, owned by the caller and passed to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Cell,
    pub obstacles: Vec<Cell>,
    /// Board width in board units (a multiple of `grid_unit`)
    pub board_width: i32,
    /// Board height in board units (a multiple of `grid_unit`)
    pub board_height: i32,
    pub grid_unit: i32,
    pub score: u32,
    pub steps: u32,
    pub status: GameStatus,
    /// Set when the round ended on a collision
    pub collision: Option<CollisionType>,
}

impl GameState {
    pub fn new(
        snake: Snake,
        food: Cell,
        obstacles: Vec<Cell>,
        board_width: i32,
        board_height: i32,
        grid_unit: i32,
    ) -> Self {
        Self {
            snake,
            food,
            obstacles,
            board_width,
            board_height,
            grid_unit,
            score: 0,
            steps: 0,
            status: GameStatus::Running,
            collision: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    /// Request a new heading.
    ///
    /// Ignored while the round is over or when `direction` would reverse the
    /// snake onto itself. Returns whether the request was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.is_over() || self.snake.direction.is_opposite(direction) {
            return false;
        }
        self.snake.direction = direction;
        true
    }

    /// Fold a coordinate that left the board back in from the opposite edge
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell::new(
            cell.x.rem_euclid(self.board_width),
            cell.y.rem_euclid(self.board_height),
        )
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// Number of columns on the board
    pub fn columns(&self) -> i32 {
        self.board_width / self.grid_unit
    }

    /// Number of rows on the board
    pub fn rows(&self) -> i32 {
        self.board_height / self.grid_unit
    }
}
