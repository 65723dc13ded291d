//! Interactive play in the terminal
//!
//! One task drives everything: key events, the game tick, redraws and Ctrl+C
//! are multiplexed with `tokio::select!`, and each is handled to completion
//! before the next is taken.

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::audio::{AudioSink, SoundCue};
use crate::game::{Direction, GameConfig, GameEngine, GameState, TickOutcome};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Redraw rate, independent of the game tick
const RENDER_INTERVAL: Duration = Duration::from_millis(50);

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    audio: Box<dyn AudioSink>,
    should_quit: bool,
    /// Latest turn requested since the previous tick
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig, audio: Box<dyn AudioSink>) -> Result<Self> {
        let engine = GameEngine::new(config).context("Invalid game configuration")?;
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            audio,
            should_quit: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval fires immediately; let the player see the board first.
        tick_timer.tick().await;

        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => self.handle_key(key),
                        Some(Ok(_)) => {}
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick() => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    self.stats.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.stats);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                log::info!(
                    "quitting after {} rounds, best score {}",
                    self.stats.rounds_played,
                    self.stats.best_score
                );
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) if !self.state.is_over() => {
                self.pending_direction = Some(direction);
            }
            KeyAction::Restart if self.state.is_over() => self.restart(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Turn(_) | KeyAction::Restart | KeyAction::None => {}
        }
    }

    fn update_game(&mut self) -> TickOutcome {
        if let Some(direction) = self.pending_direction.take() {
            self.state.set_direction(direction);
        }

        let outcome = self.engine.tick(&mut self.state);
        self.stats.record(outcome, self.state.score);

        if let Some(cue) = SoundCue::for_outcome(outcome) {
            self.audio.play(cue);
        }

        outcome
    }

    fn restart(&mut self) {
        self.engine.restart(&mut self.state);
        self.stats.on_round_start();
        self.pending_direction = None;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, CollisionType};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<SoundCue>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    fn mode() -> (HumanMode, Recorder) {
        let recorder = Recorder::default();
        let mode = HumanMode::new(GameConfig::default(), Box::new(recorder.clone())).unwrap();
        (mode, recorder)
    }

    fn press(mode: &mut HumanMode, code: KeyCode) {
        mode.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_game_initialization() {
        let (mode, _) = mode();
        assert!(!mode.state.is_over());
        assert_eq!(mode.state.score, 0);
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = GameConfig {
            board_width: 0,
            ..GameConfig::default()
        };
        assert!(HumanMode::new(config, Box::new(crate::audio::Silent)).is_err());
    }

    #[test]
    fn test_latest_turn_applies_on_tick() {
        let (mut mode, _) = mode();

        press(&mut mode, KeyCode::Up);
        press(&mut mode, KeyCode::Down);
        assert_eq!(mode.state.snake.direction, Direction::Right);

        mode.update_game();
        assert_eq!(mode.state.snake.direction, Direction::Down);
        assert_eq!(mode.state.snake.head(), Cell::new(160, 180));
    }

    #[test]
    fn test_reverse_turn_is_ignored() {
        let (mut mode, _) = mode();

        press(&mut mode, KeyCode::Left);
        mode.update_game();

        assert_eq!(mode.state.snake.direction, Direction::Right);
        assert_eq!(mode.state.snake.head(), Cell::new(180, 160));
    }

    #[test]
    fn test_eat_and_crash_cues() {
        let (mut mode, recorder) = mode();
        mode.state.food = Cell::new(180, 160);
        assert_eq!(mode.update_game(), TickOutcome::Ate);

        mode.state.snake.body = vec![Cell::new(80, 100)];
        assert_eq!(
            mode.update_game(),
            TickOutcome::Collided(CollisionType::Obstacle)
        );

        assert_eq!(*recorder.0.borrow(), vec![SoundCue::Eat, SoundCue::GameOver]);
        assert_eq!(mode.stats.best_score, 1);
        assert_eq!(mode.stats.rounds_played, 1);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let (mut mode, _) = mode();
        mode.update_game();
        press(&mut mode, KeyCode::Char('r'));
        assert_eq!(mode.state.steps, 1);

        mode.state.snake.body = vec![Cell::new(80, 100)];
        mode.update_game();
        assert!(mode.state.is_over());

        press(&mut mode, KeyCode::Up);
        assert_eq!(mode.pending_direction, None);

        press(&mut mode, KeyCode::Char('R'));
        assert!(!mode.state.is_over());
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.snake.body, vec![Cell::new(160, 160)]);
    }

    #[test]
    fn test_quit_key() {
        let (mut mode, _) = mode();
        press(&mut mode, KeyCode::Char('q'));
        assert!(mode.should_quit);
    }
}
