use std::time::{Duration, Instant};

use crate::autopilot::AutopilotState;
use crate::game::{EndCause, SessionEnd};

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Games that ended in a collision while the autopilot was malfunctioning
    pub autopilot_crashes: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            autopilot_crashes: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, end: &SessionEnd) {
        self.games_played += 1;
        if end.score > self.high_score {
            self.high_score = end.score;
        }
        if end.cause == EndCause::Collision && end.autopilot == AutopilotState::Malfunctioning {
            self.autopilot_crashes += 1;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CollisionType;

    fn end(score: u32, cause: EndCause, autopilot: AutopilotState) -> SessionEnd {
        SessionEnd {
            score,
            cause,
            collision: (cause == EndCause::Collision).then_some(CollisionType::Wall),
            autopilot,
            steps: 0,
        }
    }

    #[test]
    fn test_time_formatting() {
        let mut metrics = GameMetrics::new();
        metrics.elapsed_time = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed_time = Duration::from_secs(0);
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed_time = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(&end(10, EndCause::Collision, AutopilotState::Off));
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(&end(5, EndCause::Quit, AutopilotState::Off));
        assert_eq!(metrics.high_score, 10); // Should not decrease
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(&end(15, EndCause::Collision, AutopilotState::Off));
        assert_eq!(metrics.high_score, 15); // Should update
        assert_eq!(metrics.games_played, 3);
    }

    #[test]
    fn test_autopilot_crash_counting() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(&end(0, EndCause::Collision, AutopilotState::Malfunctioning));
        metrics.on_game_over(&end(0, EndCause::Collision, AutopilotState::Active));
        metrics.on_game_over(&end(0, EndCause::Quit, AutopilotState::Malfunctioning));

        assert_eq!(metrics.autopilot_crashes, 1);
    }

    #[test]
    fn test_game_start_resets_time() {
        let mut metrics = GameMetrics::new();
        std::thread::sleep(Duration::from_millis(50));
        metrics.update();

        assert!(metrics.elapsed_time.as_millis() >= 50);

        metrics.on_game_start();
        metrics.update();
        assert!(metrics.elapsed_time.as_millis() < 50);
    }
}
