use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Cell, CollisionType, GameState};
use crate::metrics::SessionStats;

const HEAD: &str = "● ";
const BODY: &str = "o ";
const FOOD: &str = "◆ ";
const OBSTACLE: &str = "▓▓";
const EMPTY: &str = "· ";

/// Paints the game state into a frame. Reads state only.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, stats: &SessionStats) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Score line
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        frame.render_widget(self.render_score(state, stats), chunks[0]);

        let board_area = centered(
            chunks[1],
            frame_span(state.columns(), 2),
            frame_span(state.rows(), 1),
        );
        frame.render_widget(self.render_board(state), board_area);

        if state.is_over() {
            let popup = centered(board_area, 30, 6);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(state), popup);
        }

        frame.render_widget(self.render_controls(state), chunks[2]);
    }

    fn render_board(&self, state: &GameState) -> Paragraph<'_> {
        let unit = state.grid_unit;
        let head = state.snake.head();

        let lines: Vec<Line> = (0..state.rows())
            .map(|row| {
                let spans: Vec<Span> = (0..state.columns())
                    .map(|col| {
                        let cell = Cell::new(col * unit, row * unit);
                        if cell == head {
                            let color = if state.is_over() {
                                Color::Red
                            } else {
                                Color::LightGreen
                            };
                            Span::styled(
                                HEAD,
                                Style::default().fg(color).add_modifier(Modifier::BOLD),
                            )
                        } else if state.snake.occupies(cell, false) {
                            Span::styled(BODY, Style::default().fg(Color::Green))
                        } else if state.is_obstacle(cell) {
                            Span::styled(OBSTACLE, Style::default().fg(Color::Gray))
                        } else if cell == state.food {
                            Span::styled(
                                FOOD,
                                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                            )
                        } else {
                            Span::styled(EMPTY, Style::default().fg(Color::DarkGray))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::White)),
        )
    }

    fn render_score(&self, state: &GameState, stats: &SessionStats) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(
                state.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(stats.best_score.max(state.score).to_string(), value),
            Span::raw("    "),
            Span::styled("Rounds: ", label),
            Span::styled(stats.rounds_played.to_string(), value),
            Span::raw("    "),
            Span::styled("Eaten: ", label),
            Span::styled(stats.food_eaten.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(stats.format_time(), value),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(Span::styled(
                format!("Game Over! Score: {}", state.score),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                ending(state.collision),
                Style::default().fg(Color::Gray),
            )),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to Restart", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, state: &GameState) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
        ];
        if state.is_over() {
            spans.push(Span::styled("R", Style::default().fg(Color::Green)));
            spans.push(Span::raw(" to restart | "));
        }
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Why the round ended, for the game-over panel
fn ending(collision: Option<CollisionType>) -> &'static str {
    match collision {
        Some(CollisionType::Obstacle) => "You hit an obstacle",
        Some(CollisionType::SelfCollision) => "You ran into yourself",
        None => "The board is full",
    }
}

/// Terminal cells needed for `cells` board cells of `width` columns each, plus the border
fn frame_span(cells: i32, width: u16) -> u16 {
    u16::try_from(cells)
        .unwrap_or(u16::MAX)
        .saturating_mul(width)
        .saturating_add(2)
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}
