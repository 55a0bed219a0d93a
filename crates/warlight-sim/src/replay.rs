//! Drives one bot through a recorded sequence of turn standings.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use warlight_bot::{
    BotError, BotFactory, BotFeatures, BotKind, DeployOrder, FactoryError, GameStart,
    TurnContext,
};
use warlight_core::belief::BeliefError;
use warlight_core::belief::telemetry::BeliefMetrics;
use warlight_core::map::{MapDetails, MapError, TerritoryId};
use warlight_core::standing::{Observation, TurnStanding};

use crate::config::{ResolvedOutputs, SimConfig};

pub struct ReplayRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
    map: Arc<MapDetails>,
    kind: BotKind,
    features: BotFeatures,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub bot: BotKind,
    pub turns_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub final_enemy_income: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TurnRow<'a> {
    run_id: &'a str,
    turn: u32,
    bot: &'static str,
    visible_enemy: usize,
    fogged: usize,
    orders: Vec<OrderRow>,
    armies_deployed: u32,
    estimated_income: Option<f64>,
    mean_probability: Option<f64>,
}

#[derive(Debug, Serialize)]
struct OrderRow {
    territory: TerritoryId,
    armies: u32,
}

impl From<DeployOrder> for OrderRow {
    fn from(order: DeployOrder) -> Self {
        Self {
            territory: order.territory,
            armies: order.armies,
        }
    }
}

impl ReplayRunner {
    /// Build a runner from a validated configuration, loading the map.
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let kind = BotFactory::resolve(&config.bot)?;
        let raw = fs::read_to_string(&config.map).map_err(|source| RunnerError::Read {
            source,
            path: config.map.clone(),
        })?;
        let map = Arc::new(MapDetails::from_json(&raw)?);
        let features = BotFeatures::from_env();
        let features = BotFeatures::new(
            features.seed(),
            features.belief_details() || config.logging.belief_details,
        );

        Ok(Self {
            config,
            outputs,
            map,
            kind,
            features,
        })
    }

    pub fn map(&self) -> &MapDetails {
        &self.map
    }

    /// Plays every recorded turn, streaming one JSONL row per turn.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let standings = load_standings(&self.config.standings)?;

        if let Some(parent) = self.outputs.jsonl.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);

        let mut bot = BotFactory::build(self.kind, self.features);
        bot.init(GameStart {
            map: Arc::clone(&self.map),
            settings: self.config.settings,
            perspective: self.config.perspective.clone(),
        })?;

        let mut rows_written = 0usize;
        for standing in &standings {
            let orders = bot.play_turn(&TurnContext {
                standing,
                income: self.config.income,
            })?;

            let metrics = bot
                .enemy_tracker()
                .map(BeliefMetrics::from_tracker)
                .transpose()?;
            let visible_enemy = standing
                .iter()
                .filter(|(_, entry)| {
                    entry.owner.classify(&self.config.perspective) == Observation::Enemy
                })
                .count();

            let row = TurnRow {
                run_id: &self.config.run_id,
                turn: standing.turn,
                bot: self.kind.name(),
                visible_enemy,
                fogged: standing.fogged_count(),
                armies_deployed: orders.iter().map(|order| order.armies).sum(),
                orders: orders.into_iter().map(OrderRow::from).collect(),
                estimated_income: metrics.map(|m| m.estimated_income),
                mean_probability: metrics.map(|m| m.mean_probability),
            };

            if self.config.logging.enable_structured && tracing::enabled!(Level::INFO) {
                event!(
                    target: "warlight_sim::turn",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    turn = row.turn,
                    bot = row.bot,
                    visible_enemy = row.visible_enemy,
                    fogged = row.fogged,
                    armies_deployed = row.armies_deployed,
                    estimated_income = ?row.estimated_income,
                );
            }

            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }
        writer.flush()?;

        Ok(RunSummary {
            bot: self.kind,
            turns_played: standings.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            final_enemy_income: bot
                .enemy_tracker()
                .and_then(|tracker| tracker.estimated_income()),
        })
    }
}

/// Reads one standing per non-blank line.
fn load_standings(path: &Path) -> Result<Vec<TurnStanding>, RunnerError> {
    let raw = fs::read_to_string(path).map_err(|source| RunnerError::Read {
        source,
        path: path.to_path_buf(),
    })?;
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            TurnStanding::from_json(line).map_err(|source| RunnerError::Standing {
                line: index + 1,
                source,
            })
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("invalid standing on line {line}: {source}")]
    Standing {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Factory(#[from] FactoryError),
    #[error(transparent)]
    Bot(#[from] BotError),
    #[error(transparent)]
    Belief(#[from] BeliefError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode row: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_standings_skips_blank_lines_and_reports_line_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let mut file = File::create(&path).unwrap();
        writeln!(file, r#"{{"turn":1,"territories":{{"1":{{"owner":{{"kind":"fogged"}}}}}}}}"#)
            .unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not json").unwrap();
        drop(file);

        let err = load_standings(&path).expect_err("third line is malformed");
        assert!(matches!(err, RunnerError::Standing { line: 3, .. }));
    }
}
