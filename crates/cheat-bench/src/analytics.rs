use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::config::{AgentKind, BenchConfig};
use crate::runner::GameOutcome;

const CONFIDENCE_Z: f64 = 1.96; // 95% CI

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("agent '{0}' appears in results but not in the configuration")]
    UnknownAgent(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-agent results while the series streams past.
pub struct AnalyticsCollector {
    agents: HashMap<String, AgentAccumulator>,
    agent_order: Vec<String>,
    games: u32,
    finished: u32,
    total_turns: u64,
    challenges_total: u64,
    challenges_correct: u64,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchConfig) -> Self {
        let mut agents = HashMap::new();
        let mut order = Vec::new();
        for agent in &config.agents {
            agents.insert(
                agent.name.clone(),
                AgentAccumulator::new(agent.name.clone(), agent.kind),
            );
            order.push(agent.name.clone());
        }

        Self {
            agents,
            agent_order: order,
            games: 0,
            finished: 0,
            total_turns: 0,
            challenges_total: 0,
            challenges_correct: 0,
        }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) -> Result<(), AnalyticsError> {
        self.games += 1;
        if outcome.finished {
            self.finished += 1;
        }
        self.total_turns += u64::from(outcome.turns);
        self.challenges_total += u64::from(outcome.challenges.total);
        self.challenges_correct += u64::from(outcome.challenges.correct);

        for seat in &outcome.seat_results {
            let acc = self
                .agents
                .get_mut(&seat.agent_name)
                .ok_or_else(|| AnalyticsError::UnknownAgent(seat.agent_name.clone()))?;
            acc.record_game(seat.won, seat.cards_left);
        }

        Ok(())
    }

    pub fn finalize(mut self) -> AnalyticsSummary {
        let mut reports = Vec::new();
        for name in &self.agent_order {
            if let Some(acc) = self.agents.remove(name) {
                reports.push(acc.into_report());
            }
        }

        AnalyticsSummary {
            agents: reports,
            games: self.games,
            finished: self.finished,
            total_turns: self.total_turns,
            challenges_total: self.challenges_total,
            challenges_correct: self.challenges_correct,
        }
    }
}

struct AgentAccumulator {
    name: String,
    kind: AgentKind,
    games: u32,
    wins: u32,
    total_cards_left: u64,
    per_game_cards_left: Vec<f64>,
}

impl AgentAccumulator {
    fn new(name: String, kind: AgentKind) -> Self {
        Self {
            name,
            kind,
            games: 0,
            wins: 0,
            total_cards_left: 0,
            per_game_cards_left: Vec::new(),
        }
    }

    fn record_game(&mut self, won: bool, cards_left: usize) {
        self.games += 1;
        if won {
            self.wins += 1;
        }
        self.total_cards_left += cards_left as u64;
        self.per_game_cards_left.push(cards_left as f64);
    }

    fn into_report(self) -> AgentReport {
        let avg_cards_left = if self.games == 0 {
            0.0
        } else {
            self.total_cards_left as f64 / f64::from(self.games)
        };
        let (ci_low, ci_high) = confidence_interval(&self.per_game_cards_left);

        AgentReport {
            name: self.name,
            kind: self.kind,
            games: self.games as usize,
            wins: self.wins as usize,
            avg_cards_left,
            ci95: (ci_low, ci_high),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub agents: Vec<AgentReport>,
    pub games: u32,
    pub finished: u32,
    pub total_turns: u64,
    pub challenges_total: u64,
    pub challenges_correct: u64,
}

impl AnalyticsSummary {
    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        let avg_turns = if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / f64::from(self.games)
        };
        let accuracy = if self.challenges_total == 0 {
            0.0
        } else {
            self.challenges_correct as f64 / self.challenges_total as f64
        };

        let mut rows = String::new();
        rows.push_str("# Series Summary\n\n");
        rows.push_str(&format!(
            "{} of {} games finished, {avg_turns:.1} turns on average\n\n",
            self.finished, self.games
        ));
        rows.push_str(&format!(
            "Cheat calls: {} total, {:.1}% correct\n\n",
            self.challenges_total,
            accuracy * 100.0
        ));
        rows.push_str("| Agent | Kind | Games | Wins | Win % | Avg cards left | 95% CI |\n");
        rows.push_str("|-------|------|-------|------|-------|----------------|--------|\n");

        for agent in &self.agents {
            let win_rate = if agent.games == 0 {
                0.0
            } else {
                agent.wins as f64 / agent.games as f64
            };
            rows.push_str(&format!(
                "| {name} | {kind:?} | {games} | {wins} | {win:.1}% | {cards:.3} | [{ci_low:.3}, {ci_high:.3}] |\n",
                name = agent.name,
                kind = agent.kind,
                games = agent.games,
                wins = agent.wins,
                win = win_rate * 100.0,
                cards = agent.avg_cards_left,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
            ));
        }

        fs::write(path.as_ref(), rows).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub games: usize,
    pub wins: usize,
    pub avg_cards_left: f64,
    pub ci95: (f64, f64),
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
