use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::autopilot::AutopilotState;
use crate::game::{EndCause, Position, RenderState, SessionEnd};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &RenderState,
        metrics: &GameMetrics,
        paused: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match &state.outcome {
            Some(end) => {
                let game_over = self.render_game_over(end);
                frame.render_widget(game_over, game_area);
            }
            None => {
                let grid = self.render_grid(state);
                frame.render_widget(grid, game_area);
            }
        }

        if let Some(remaining) = state.engaging_remaining {
            let popup = centered_rect(game_area, 40, 7);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_engaging(remaining.as_secs_f32()), popup);
        } else if paused && !state.is_over() {
            let popup = centered_rect(game_area, 24, 3);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new("PAUSED")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                popup,
            );
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &RenderState) -> Paragraph<'_> {
        let head = state.head();
        let body_style = match state.autopilot {
            AutopilotState::Malfunctioning => Style::default().fg(Color::Red),
            AutopilotState::Active => Style::default().fg(Color::Blue),
            _ => Style::default().fg(Color::Green),
        };

        let mut lines = Vec::with_capacity(state.grid.height);

        for y in 0..state.grid.height {
            let mut spans = Vec::with_capacity(state.grid.width);

            for x in 0..state.grid.width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(&pos) {
                    Span::styled("□ ", body_style)
                } else if pos == state.item {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let (border_color, title) = match state.autopilot {
            AutopilotState::Malfunctioning => (
                Color::Red,
                Span::styled(
                    " !! AUTOPILOT MALFUNCTION !! ",
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
                ),
            ),
            AutopilotState::Active => (Color::Blue, Span::raw(" FSD Snake ")),
            _ => (Color::White, Span::raw(" FSD Snake ")),
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &RenderState, metrics: &GameMetrics) -> Paragraph<'_> {
        let (autopilot_label, autopilot_style) = autopilot_badge(state.autopilot);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Tick: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}ms", state.tick_interval.as_millis()),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Autopilot: ", Style::default().fg(Color::Yellow)),
            Span::styled(autopilot_label, autopilot_style),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_engaging(&self, remaining_secs: f32) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "AUTOPILOT ENGAGING",
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Taking over in {:.1}s", remaining_secs)),
            Line::from(Span::styled(
                "Keep your hands off the keyboard",
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Blue)),
        )
    }

    fn render_game_over(&self, end: &SessionEnd) -> Paragraph<'_> {
        let reason = match (end.cause, end.collision) {
            (EndCause::Collision, Some(collision))
                if end.autopilot == AutopilotState::Malfunctioning =>
            {
                format!("Autopilot crashed ({})", collision.as_str())
            }
            (EndCause::Collision, Some(collision)) => format!("Crashed ({})", collision.as_str()),
            (EndCause::GridFilled, _) => "Grid filled, you win!".to_string(),
            (cause, _) => cause.to_string(),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(reason, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    end.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("F", Style::default().fg(Color::Blue)),
            Span::raw(" autopilot | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn autopilot_badge(state: AutopilotState) -> (&'static str, Style) {
    match state {
        AutopilotState::Off => ("OFF", Style::default().fg(Color::DarkGray)),
        AutopilotState::Engaging => ("ENGAGING", Style::default().fg(Color::Yellow)),
        AutopilotState::Active => (
            "ACTIVE",
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        AutopilotState::Malfunctioning => (
            "MALFUNCTION",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ),
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
