use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{GameConfig, GameSession, SessionEnd};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// How often the session clock is advanced
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// How often the screen is redrawn
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Interactive terminal game
pub struct PlayMode {
    config: GameConfig,
    session: GameSession,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
}

impl PlayMode {
    pub fn new(config: GameConfig) -> Self {
        let session = GameSession::new(config.clone());

        Self {
            config,
            session,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut render_timer = interval(RENDER_INTERVAL);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Advance the session by the real time since the last frame
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    let elapsed = now.duration_since(last_frame);
                    last_frame = now;

                    if !self.paused {
                        if let Some(end) = self.session.on_tick(elapsed) {
                            self.on_session_end(&end);
                        }
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let state = self.session.render_state();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &state, &self.metrics, self.paused);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                let end = self.session.quit();
                tracing::info!(score = end.score, "player quit");
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        self.apply_key_action(self.input_handler.handle_key_event(key));
    }

    fn apply_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Steer(direction) => {
                self.session.on_manual_direction(direction);
            }
            KeyAction::ToggleAutopilot => {
                let state = self.session.on_toggle_autopilot();
                tracing::debug!(state = state.as_str(), "autopilot toggled");
            }
            KeyAction::Pause => {
                if !self.session.is_over() {
                    self.paused = !self.paused;
                }
            }
            KeyAction::Restart => {
                self.reset_game();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn on_session_end(&mut self, end: &SessionEnd) {
        self.metrics.on_game_over(end);
    }

    fn reset_game(&mut self) {
        if !self.session.is_over() {
            let end = self.session.quit();
            self.metrics.on_game_over(&end);
        }

        // a fixed seed would replay the same game on every restart
        let mut config = self.config.clone();
        config.seed = self
            .config
            .seed
            .map(|seed| seed.wrapping_add(self.metrics.games_played as u64));

        self.session = GameSession::new(config);
        self.metrics.on_game_start();
        self.paused = false;
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
    use crate::autopilot::AutopilotState;
    use crate::game::{Direction, EndCause};

    #[test]
    fn test_game_initialization() {
        let mode = PlayMode::new(GameConfig::default());
        assert!(!mode.session.is_over());
        assert_eq!(mode.session.state().score, 0);
        assert!(!mode.paused);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = PlayMode::new(GameConfig::default().with_seed(5));
        mode.session.state_mut().score = 10;
        mode.reset_game();

        assert_eq!(mode.session.state().score, 0);
        assert!(!mode.session.is_over());
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, 10);
    }

    #[test]
    fn test_key_actions_reach_session() {
        let mut mode = PlayMode::new(GameConfig::default());

        mode.apply_key_action(KeyAction::ToggleAutopilot);
        assert_eq!(mode.session.autopilot_state(), AutopilotState::Engaging);

        mode.apply_key_action(KeyAction::ToggleAutopilot);
        assert_eq!(mode.session.autopilot_state(), AutopilotState::Off);

        mode.apply_key_action(KeyAction::Steer(Direction::Up));
        mode.apply_key_action(KeyAction::Pause);
        assert!(mode.paused);

        mode.apply_key_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }

    #[test]
    fn test_session_end_updates_metrics() {
        let mut mode = PlayMode::new(GameConfig::default());
        let end = mode.session.quit();
        mode.on_session_end(&end);

        assert_eq!(end.cause, EndCause::Quit);
        assert_eq!(mode.metrics.games_played, 1);
    }
}
