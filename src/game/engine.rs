use super::{
    config::GameConfig,
    direction::Direction,
    state::{Cell, CollisionType, GameState, GameStatus, Snake},
};
use anyhow::Result;
use rand::{Rng, rngs::ThreadRng, seq::SliceRandom};

/// What a single tick did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The round is over; nothing changed
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the food and grew
    Ate,
    /// The new head hit the snake or an obstacle; the round is over
    Collided(CollisionType),
    /// The snake ate and no free cell is left for new food; the round is over
    BoardFilled,
}

/// The game engine that handles all game logic
pub struct GameEngine<R: Rng = ThreadRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine {
    /// Create an engine backed by the thread-local RNG
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    /// Create an engine with an explicit RNG (seeded RNGs make food placement reproducible)
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build the initial state of a round
    pub fn reset(&self) -> GameState {
        GameState::new(
            Snake::new(self.config.start, Direction::default()),
            self.config.initial_food,
            self.config.obstacles.clone(),
            self.config.board_width,
            self.config.board_height,
            self.config.grid_unit,
        )
    }

    /// Put `state` back to its initial values, whatever the current status
    pub fn restart(&self, state: &mut GameState) {
        *state = self.reset();
        log::info!("round restarted");
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        if state.is_over() {
            return TickOutcome::Idle;
        }

        let stepped = state
            .snake
            .head()
            .stepped(state.snake.direction, state.grid_unit);
        let new_head = state.wrap(stepped);
        let ate_food = new_head == state.food;

        if let Some(collision) = self.check_collision(state, new_head, ate_food) {
            state.status = GameStatus::Over;
            state.collision = Some(collision);
            log::info!(
                "collision ({:?}) at {:?}, final score {}",
                collision,
                new_head,
                state.score
            );
            return TickOutcome::Collided(collision);
        }

        state.snake.advance(new_head, ate_food);
        state.steps += 1;

        if !ate_food {
            return TickOutcome::Moved;
        }

        state.score += 1;
        log::debug!("ate food at {:?}, score {}", new_head, state.score);

        match self.spawn_food(state) {
            Some(food) => {
                state.food = food;
                TickOutcome::Ate
            }
            None => {
                state.status = GameStatus::Over;
                log::info!("board filled, final score {}", state.score);
                TickOutcome::BoardFilled
            }
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(
        &self,
        state: &GameState,
        head: Cell,
        will_grow: bool,
    ) -> Option<CollisionType> {
        if state.is_obstacle(head) {
            return Some(CollisionType::Obstacle);
        }

        let ignore_tail = !will_grow && !self.config.strict_tail_collision;
        if state.snake.occupies(head, ignore_tail) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a uniformly random cell that is neither snake nor obstacle
    fn spawn_food(&mut self, state: &GameState) -> Option<Cell> {
        let free = free_cells(state);
        free.choose(&mut self.rng).copied()
    }
}

/// Every grid-aligned cell not covered by the snake or an obstacle
pub fn free_cells(state: &GameState) -> Vec<Cell> {
    let unit = state.grid_unit as usize;
    (0..state.board_height)
        .step_by(unit)
        .flat_map(|y| {
            (0..state.board_width)
                .step_by(unit)
                .map(move |x| Cell::new(x, y))
        })
        .filter(|cell| !state.snake.occupies(*cell, false) && !state.is_obstacle(*cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn engine() -> GameEngine<StdRng> {
        GameEngine::with_rng(GameConfig::default(), StdRng::seed_from_u64(7)).unwrap()
    }

    fn strict_engine() -> GameEngine<StdRng> {
        let config = GameConfig {
            strict_tail_collision: true,
            ..GameConfig::default()
        };
        GameEngine::with_rng(config, StdRng::seed_from_u64(7)).unwrap()
    }

    /// A snake laid out head first
    fn snake_of(cells: &[(i32, i32)], direction: Direction) -> Snake {
        Snake {
            body: cells.iter().map(|&(x, y)| Cell::new(x, y)).collect(),
            direction,
        }
    }

    #[test]
    fn test_reset() {
        let engine = engine();
        let state = engine.reset();

        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.body, vec![Cell::new(160, 160)]);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.food, Cell::new(320, 320));
        assert_eq!(state.obstacles, GameConfig::default().obstacles);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            grid_unit: 0,
            ..GameConfig::default()
        };
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_basic_movement_keeps_length() {
        let mut engine = engine();
        let mut state = engine.reset();

        let outcome = engine.tick(&mut state);

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(state.snake.head(), Cell::new(180, 160));
        assert_eq!(state.snake.body.len(), 1);
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_eating_food_scenario() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.food = Cell::new(180, 160);

        let outcome = engine.tick(&mut state);

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(state.snake.head(), Cell::new(180, 160));
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.body.len(), 2);
        assert_ne!(state.food, Cell::new(180, 160));
        assert!(!state.snake.occupies(state.food, false));
        assert!(!state.is_obstacle(state.food));
        assert!(state.food.is_aligned(20));
    }

    #[test]
    fn test_length_grows_only_on_food() {
        let mut engine = engine();
        let mut state = engine.reset();
        let mut meals = 0;

        for _ in 0..200 {
            let before = state.snake.body.len();
            match engine.tick(&mut state) {
                TickOutcome::Ate => {
                    meals += 1;
                    assert_eq!(state.snake.body.len(), before + 1);
                }
                TickOutcome::Moved => assert_eq!(state.snake.body.len(), before),
                _ => break,
            }
            // Steer towards the food along x, then y.
            let head = state.snake.head();
            let want = if head.x != state.food.x {
                Direction::Right
            } else {
                Direction::Down
            };
            state.set_direction(want);
        }

        assert!(meals > 0, "the snake never reached the food");
        assert_eq!(state.score, meals);
    }

    #[test]
    fn test_wrap_left_from_zero() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.snake = snake_of(&[(0, 40)], Direction::Left);

        engine.tick(&mut state);

        assert_eq!(state.snake.head(), Cell::new(380, 40));
    }

    #[test]
    fn test_wrap_at_max_on_both_axes() {
        let mut engine = engine();
        let mut state = engine.reset();

        state.snake = snake_of(&[(380, 40)], Direction::Right);
        engine.tick(&mut state);
        assert_eq!(state.snake.head(), Cell::new(0, 40));

        state.snake = snake_of(&[(60, 380)], Direction::Down);
        engine.tick(&mut state);
        assert_eq!(state.snake.head(), Cell::new(60, 0));

        state.snake = snake_of(&[(60, 0)], Direction::Up);
        engine.tick(&mut state);
        assert_eq!(state.snake.head(), Cell::new(60, 380));
    }

    #[test]
    fn test_obstacle_collision_freezes_state() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.snake = snake_of(&[(80, 100)], Direction::Right);

        let outcome = engine.tick(&mut state);

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Obstacle));
        assert!(state.is_over());
        assert_eq!(state.collision, Some(CollisionType::Obstacle));

        let frozen = state.clone();
        assert_eq!(engine.tick(&mut state), TickOutcome::Idle);
        assert!(!state.set_direction(Direction::Up));
        assert_eq!(engine.tick(&mut state), TickOutcome::Idle);
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        let mut state = engine.reset();
        // Head at (40,20) heading up into a body segment at (40,0)
        state.snake = snake_of(
            &[(40, 20), (60, 20), (60, 0), (40, 0), (20, 0)],
            Direction::Up,
        );

        let outcome = engine.tick(&mut state);

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
        assert!(state.is_over());
        assert_eq!(state.snake.body.len(), 5);
    }

    #[test]
    fn test_moving_into_vacated_tail_cell() {
        // Square loop: the head steps into the cell the tail leaves this tick
        let body = [(20, 20), (40, 20), (40, 40), (20, 40)];

        let mut lenient = engine();
        let mut state = lenient.reset();
        state.snake = snake_of(&body, Direction::Down);
        assert_eq!(lenient.tick(&mut state), TickOutcome::Moved);
        assert_eq!(state.snake.head(), Cell::new(20, 40));

        let mut strict = strict_engine();
        let mut state = strict.reset();
        state.snake = snake_of(&body, Direction::Down);
        assert_eq!(
            strict.tick(&mut state),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_tail_is_solid_when_growing() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.snake = snake_of(&[(20, 20), (40, 20), (40, 40), (20, 40)], Direction::Down);
        state.food = Cell::new(20, 40);

        assert_eq!(
            engine.tick(&mut state),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_food_never_on_snake_or_obstacle() {
        let config = GameConfig {
            board_width: 100,
            board_height: 100,
            start: Cell::new(0, 0),
            initial_food: Cell::new(20, 0),
            obstacles: vec![Cell::new(60, 60), Cell::new(80, 20)],
            ..GameConfig::default()
        };
        let mut engine = GameEngine::with_rng(config, StdRng::seed_from_u64(42)).unwrap();

        for _ in 0..50 {
            let mut state = engine.reset();
            engine.tick(&mut state);
            assert!(!state.snake.occupies(state.food, false));
            assert!(!state.is_obstacle(state.food));
            assert!(state.food.x < 100 && state.food.y < 100);
        }
    }

    #[test]
    fn test_free_cells() {
        let engine = engine();
        let state = engine.reset();
        let free = free_cells(&state);

        assert_eq!(free.len(), 20 * 20 - 1 - 3);
        assert!(!free.contains(&Cell::new(160, 160)));
        assert!(!free.contains(&Cell::new(200, 200)));
        assert!(free.contains(&Cell::new(320, 320)));
    }

    #[test]
    fn test_board_filled_ends_round() {
        let config = GameConfig {
            board_width: 40,
            board_height: 20,
            start: Cell::new(0, 0),
            initial_food: Cell::new(20, 0),
            obstacles: vec![],
            ..GameConfig::default()
        };
        let mut engine = GameEngine::with_rng(config, StdRng::seed_from_u64(1)).unwrap();
        let mut state = engine.reset();

        assert_eq!(engine.tick(&mut state), TickOutcome::BoardFilled);
        assert!(state.is_over());
        assert_eq!(state.score, 1);
        assert_eq!(state.collision, None);
    }

    #[test]
    fn test_restart_from_over() {
        let mut engine = engine();
        let mut state = engine.reset();
        state.snake = snake_of(&[(80, 100)], Direction::Down);
        state.set_direction(Direction::Right);
        state.score = 7;
        engine.tick(&mut state);
        assert!(state.is_over());

        engine.restart(&mut state);

        assert_eq!(state, engine.reset());
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.body, vec![Cell::new(160, 160)]);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.status, GameStatus::Running);
        assert_eq!(state.collision, None);
    }

    #[test]
    fn test_restart_while_running() {
        let mut engine = engine();
        let mut state = engine.reset();
        engine.tick(&mut state);
        engine.tick(&mut state);

        engine.restart(&mut state);

        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.head(), Cell::new(160, 160));
    }
}
