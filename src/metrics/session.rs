use std::time::{Duration, Instant};

use crate::game::TickOutcome;

/// Running totals for one play session, across restarts
pub struct SessionStats {
    pub round_started: Instant,
    pub round_elapsed: Duration,
    pub best_score: u32,
    pub rounds_played: u32,
    pub food_eaten: u32,
    round_finished: bool,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            round_elapsed: Duration::ZERO,
            best_score: 0,
            rounds_played: 0,
            food_eaten: 0,
            round_finished: false,
        }
    }

    /// Refresh the round clock; it stops once the round has ended
    pub fn update(&mut self) {
        if !self.round_finished {
            self.round_elapsed = self.round_started.elapsed();
        }
    }

    pub fn on_round_start(&mut self) {
        self.round_started = Instant::now();
        self.round_elapsed = Duration::ZERO;
        self.round_finished = false;
    }

    /// Fold a tick outcome into the totals. `score` is the score after the tick.
    pub fn record(&mut self, outcome: TickOutcome, score: u32) {
        match outcome {
            TickOutcome::Ate => self.food_eaten += 1,
            TickOutcome::BoardFilled => {
                self.food_eaten += 1;
                self.finish_round(score);
            }
            TickOutcome::Collided(_) => self.finish_round(score),
            TickOutcome::Idle | TickOutcome::Moved => {}
        }
    }

    fn finish_round(&mut self, score: u32) {
        self.update();
        self.round_finished = true;
        self.rounds_played += 1;
        self.best_score = self.best_score.max(score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.round_elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
