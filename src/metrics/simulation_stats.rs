//! Aggregate results of headless autopilot runs

use std::collections::BTreeMap;

use crate::autopilot::AutopilotState;
use crate::game::{EndCause, SessionEnd};

/// Summary statistics over a batch of sessions
///
/// # Example
///
/// ```rust
/// use fsd_snake::autopilot::AutopilotState;
/// use fsd_snake::game::{EndCause, SessionEnd};
/// use fsd_snake::metrics::SimulationStats;
///
/// let mut stats = SimulationStats::new();
/// stats.record(
///     &SessionEnd {
///         score: 30,
///         cause: EndCause::Collision,
///         collision: None,
///         autopilot: AutopilotState::Malfunctioning,
///         steps: 120,
///     },
///     400,
/// );
///
/// assert_eq!(stats.runs(), 1);
/// assert_eq!(stats.max_score(), 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    scores: Vec<u32>,
    steps: Vec<u32>,
    ticks: Vec<u64>,
    causes: BTreeMap<&'static str, usize>,
    malfunction_crashes: usize,
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished session and how many ticks it took
    pub fn record(&mut self, end: &SessionEnd, ticks: u64) {
        self.scores.push(end.score);
        self.steps.push(end.steps);
        self.ticks.push(ticks);
        *self.causes.entry(end.cause.as_str()).or_insert(0) += 1;

        if end.cause == EndCause::Collision && end.autopilot == AutopilotState::Malfunctioning {
            self.malfunction_crashes += 1;
        }
    }

    pub fn runs(&self) -> usize {
        self.scores.len()
    }

    pub fn mean_score(&self) -> f64 {
        mean(self.scores.iter().map(|&s| s as f64))
    }

    pub fn max_score(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    pub fn mean_steps(&self) -> f64 {
        mean(self.steps.iter().map(|&s| s as f64))
    }

    pub fn mean_ticks(&self) -> f64 {
        mean(self.ticks.iter().map(|&t| t as f64))
    }

    /// Number of runs that ended with `cause`
    pub fn cause_count(&self, cause: EndCause) -> usize {
        self.causes.get(cause.as_str()).copied().unwrap_or(0)
    }

    /// Collisions that happened while the autopilot was malfunctioning
    pub fn malfunction_crashes(&self) -> usize {
        self.malfunction_crashes
    }

    pub fn format_summary(&self) -> String {
        let causes = self
            .causes
            .iter()
            .map(|(cause, count)| format!("{cause}={count}"))
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "Runs: {} | Mean score: {:.1} | Max score: {} | Mean steps: {:.1} | Mean ticks: {:.1} | Malfunction crashes: {} | Causes: {}",
            self.runs(),
            self.mean_score(),
            self.max_score(),
            self.mean_steps(),
            self.mean_ticks(),
            self.malfunction_crashes,
            causes
        )
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
