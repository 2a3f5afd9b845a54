use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use cheat_core::game::{ChallengeStats, GameState, MAX_PLAYERS, MIN_PLAYERS};
use cheat_core::strategy::{Strategy, StrategyKind, ai_strategy};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, BenchConfig, ResolvedOutputs};

/// Primary entry point for running a benchmark series.
pub struct SeriesRunner {
    config: BenchConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl SeriesRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents: Vec<AgentBlueprint> =
            config.agents.iter().map(AgentBlueprint::from_config).collect();

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&agents.len()) {
            return Err(RunnerError::TableSize {
                found: agents.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Execute the series, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config);

        for game_index in 0..self.config.games.count {
            let base_seed = rng.next_u64();
            let rotation = game_index % self.agents.len();

            let outcome = self.play_game(game_index, rotation, base_seed)?;
            analytics.record_game(&outcome)?;
            rows_written += write_game_rows(
                &mut writer,
                &self.config,
                game_index,
                rotation,
                base_seed,
                &outcome,
            )?;
        }

        writer.flush()?;

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    /// Plays one game with the agent lineup rotated `rotation` seats.
    fn play_game(
        &self,
        game_index: usize,
        rotation: usize,
        base_seed: u64,
    ) -> Result<GameOutcome, RunnerError> {
        let count = self.agents.len();
        let lineup: Vec<&AgentBlueprint> = (0..count)
            .map(|seat| &self.agents[(seat + rotation) % count])
            .collect();

        let strategies = lineup
            .iter()
            .map(|agent| {
                ai_strategy(agent.kind).ok_or_else(|| {
                    RunnerError::game(format!(
                        "agent '{}' has no automated strategy",
                        agent.name
                    ))
                })
            })
            .collect::<Result<Vec<Box<dyn Strategy>>, RunnerError>>()?;

        let mut game = GameState::with_seed(strategies, base_seed)
            .map_err(|err| RunnerError::game(format!("table setup failed: {err}")))?;

        let mut winner_seat = None;
        while game.turn_number() < self.config.games.max_turns {
            game.play_turn();
            if let Some(seat) = game.winner() {
                winner_seat = Some(seat);
                break;
            }
        }

        let challenges = game.challenges();
        let seating: Vec<String> = lineup.iter().map(|agent| agent.name.clone()).collect();
        let seat_results = game
            .players()
            .iter()
            .map(|player| SeatResult {
                seat: player.index(),
                agent_name: lineup[player.index()].name.clone(),
                cards_left: player.cards_left(),
                won: winner_seat == Some(player.index()),
            })
            .collect();

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            let winner_name = winner_seat
                .map(|seat| lineup[seat].name.as_str())
                .unwrap_or("-");
            event!(
                target: "cheat_bench::game",
                Level::INFO,
                run_id = %self.config.run_id,
                game_index = game_index as u32,
                rotation = rotation as u32,
                seed = base_seed,
                turns = game.turn_number(),
                winner = winner_name,
                challenges = challenges.total
            );
        }

        Ok(GameOutcome {
            seating,
            seat_results,
            winner_seat,
            turns: game.turn_number(),
            finished: winner_seat.is_some(),
            challenges,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    config: &BenchConfig,
    game_index: usize,
    rotation: usize,
    base_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}_R{rotation:02}");

    let mut rows_written = 0usize;
    for seat_result in &outcome.seat_results {
        let row = GameLogRow {
            run_id: config.run_id.clone(),
            game_id: game_id.clone(),
            game_index,
            rotation,
            game_seed: base_seed,
            seat: seat_result.seat,
            agent: seat_result.agent_name.clone(),
            seating: outcome.seating.clone(),
            cards_left: seat_result.cards_left,
            won: seat_result.won,
            turns: outcome.turns,
            finished: outcome.finished,
            challenges_total: outcome.challenges.total,
            challenges_correct: outcome.challenges.correct,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

/// Result of one played game, before it is flattened into log rows.
pub struct GameOutcome {
    pub seating: Vec<String>,
    pub seat_results: Vec<SeatResult>,
    pub winner_seat: Option<usize>,
    pub turns: u32,
    pub finished: bool,
    pub challenges: ChallengeStats,
}

pub struct SeatResult {
    pub seat: usize,
    pub agent_name: String,
    pub cards_left: usize,
    pub won: bool,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    rotation: usize,
    game_seed: u64,
    seat: usize,
    agent: String,
    seating: Vec<String>,
    cards_left: usize,
    won: bool,
    turns: u32,
    finished: bool,
    challenges_total: u32,
    challenges_correct: u32,
}

struct AgentBlueprint {
    name: String,
    kind: StrategyKind,
}

impl AgentBlueprint {
    fn from_config(config: &AgentConfig) -> Self {
        Self {
            name: config.name.clone(),
            kind: config.kind.to_strategy(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("a table seats 2 to 8 agents but found {found}")]
    TableSize { found: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AgentKind, GamesConfig, LoggingConfig, OutputsConfig};

    fn three_seat_config() -> BenchConfig {
        BenchConfig {
            run_id: "rotation_check".to_string(),
            games: GamesConfig {
                seed: Some(21),
                count: 3,
                max_turns: 400,
            },
            agents: vec![
                AgentConfig {
                    name: "steady".to_string(),
                    kind: AgentKind::Basic,
                },
                AgentConfig {
                    name: "counter".to_string(),
                    kind: AgentKind::Thinker,
                },
                AgentConfig {
                    name: "shark".to_string(),
                    kind: AgentKind::Master,
                },
            ],
            outputs: OutputsConfig {
                jsonl: "out/games.jsonl".to_string(),
                summary_md: "out/summary.md".to_string(),
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn a_lone_agent_cannot_form_a_table() {
        let mut config = three_seat_config();
        config.agents.truncate(1);
        let outputs = config.resolved_outputs();
        assert!(matches!(
            SeriesRunner::new(config, outputs),
            Err(RunnerError::TableSize { found: 1 })
        ));
    }

    #[test]
    fn seats_rotate_one_step_each_game() {
        let config = three_seat_config();
        let outputs = config.resolved_outputs();
        let runner = SeriesRunner::new(config, outputs).expect("runner");

        let outcome = runner.play_game(1, 1, 42).expect("game plays");
        assert_eq!(outcome.seating, vec!["counter", "shark", "steady"]);
    }

    #[test]
    fn a_game_runs_to_a_winner_or_the_cap() {
        let config = three_seat_config();
        let outputs = config.resolved_outputs();
        let runner = SeriesRunner::new(config, outputs).expect("runner");

        let outcome = runner.play_game(0, 0, 7).expect("game plays");
        assert!(outcome.turns <= 400);
        assert_eq!(outcome.seat_results.len(), 3);
        assert_eq!(outcome.finished, outcome.winner_seat.is_some());
        assert!(outcome.challenges.correct <= outcome.challenges.total);
        if outcome.finished {
            assert_eq!(
                outcome.seat_results.iter().filter(|seat| seat.won).count(),
                1
            );
        }
    }
}
