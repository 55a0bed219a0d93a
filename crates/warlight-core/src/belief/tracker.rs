//! Per-territory enemy-control probabilities and the estimates derived from them.

use super::rule::{FogRule, FreezeFogged};
use crate::map::{BonusDetails, BonusId, GameSettings, MapDetails, TerritoryId};
use crate::standing::{Observation, Perspective, TurnStanding};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Level, event};

/// Tracks how likely the (single) opponent is to hold each territory.
///
/// The tracker starts uninitialized and is bound to a map exactly once via
/// [`EnemyTracker::init`]. From then on it holds one probability per map
/// territory, every value in `[0, 1]`.
#[derive(Debug)]
pub struct EnemyTracker {
    rule: Box<dyn FogRule>,
    state: Option<TrackerState>,
}

#[derive(Debug, Clone)]
struct TrackerState {
    map: Arc<MapDetails>,
    minimum_army_bonus: f64,
    enemy_probs: BTreeMap<TerritoryId, f64>,
    enemy_deployed: u32,
    estimated_income: f64,
}

/// Counts of how each territory was classified during one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub visible_enemy: usize,
    pub visible_other: usize,
    pub fogged: usize,
}

/// Owned copy of the tracker state for downstream heuristics and logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefSnapshot {
    pub probabilities: BTreeMap<TerritoryId, f64>,
    pub enemy_deployed: u32,
    pub estimated_income: f64,
}

impl Default for EnemyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyTracker {
    /// Creates an uninitialized tracker that freezes fogged territories.
    pub fn new() -> Self {
        Self::with_rule(Box::new(FreezeFogged))
    }

    pub fn with_rule(rule: Box<dyn FogRule>) -> Self {
        Self { rule, state: None }
    }

    pub fn is_init(&self) -> bool {
        self.state.is_some()
    }

    /// Binds the tracker to `map`. Every territory starts at probability 0 and
    /// the income estimate starts at the settings' minimum army bonus.
    pub fn init(
        &mut self,
        map: Arc<MapDetails>,
        settings: &GameSettings,
    ) -> Result<(), BeliefError> {
        if self.state.is_some() {
            return Err(BeliefError::AlreadyInitialized);
        }

        let enemy_probs = map.territory_ids().map(|id| (id, 0.0)).collect();
        let minimum_army_bonus = f64::from(settings.minimum_army_bonus);
        self.state = Some(TrackerState {
            map,
            minimum_army_bonus,
            enemy_probs,
            enemy_deployed: 0,
            estimated_income: minimum_army_bonus,
        });
        Ok(())
    }

    /// Applies this turn's visible ownership.
    ///
    /// Territories held by us, a teammate, neutrals or nobody yet drop to 0;
    /// those held by any other player go to 1; fogged territories go to the
    /// tracker's [`FogRule`], clamped to `[0, 1]`. The standing must cover
    /// exactly the map's territories and the rule must not return NaN; a
    /// rejected update leaves the tracker unchanged.
    pub fn update(
        &mut self,
        standing: &TurnStanding,
        perspective: &Perspective,
    ) -> Result<UpdateSummary, BeliefError> {
        let state = self.state.as_mut().ok_or(BeliefError::NotInitialized)?;
        check_coverage(&state.map, standing)?;

        let mut summary = UpdateSummary::default();
        let mut next = Vec::with_capacity(standing.len());
        for (territory, entry) in standing.iter() {
            let prior = state.enemy_probs.get(&territory).copied().unwrap_or(0.0);
            let value = match entry.owner.classify(perspective) {
                Observation::NotEnemy => {
                    summary.visible_other += 1;
                    0.0
                }
                Observation::Enemy => {
                    summary.visible_enemy += 1;
                    1.0
                }
                Observation::Hidden => {
                    summary.fogged += 1;
                    let value = self
                        .rule
                        .fogged(territory, prior, &state.map, &state.enemy_probs);
                    if value.is_nan() {
                        return Err(BeliefError::InvalidProbability(territory));
                    }
                    value.clamp(0.0, 1.0)
                }
            };
            next.push((territory, value));
        }

        for (territory, value) in next {
            state.enemy_probs.insert(territory, value);
        }
        state.estimated_income = state.compute_income()?;

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "warlight_core::belief",
                Level::DEBUG,
                turn = standing.turn,
                visible_enemy = summary.visible_enemy,
                visible_other = summary.visible_other,
                fogged = summary.fogged,
                estimated_income = state.estimated_income,
            );
        }

        Ok(summary)
    }

    /// Probability the enemy holds every territory of `bonus`: the square root
    /// of the lowest member probability.
    ///
    /// The minimum bounds the chance of holding the whole group; the square
    /// root lifts it because opponents concentrate on one bonus at a time
    /// instead of spreading over many. An empty bonus yields 1.
    pub fn prob_enemy_controls(&self, bonus: &BonusDetails) -> Result<f64, BeliefError> {
        self.state()?.prob_controls(bonus)
    }

    pub fn prob_enemy_controls_id(&self, bonus: BonusId) -> Result<f64, BeliefError> {
        let state = self.state()?;
        let details = state.map.bonus(bonus).ok_or(BeliefError::UnknownBonus(bonus))?;
        state.prob_controls(details)
    }

    /// Minimum army bonus plus every bonus amount weighted by the probability
    /// the enemy controls it. Never below the minimum army bonus.
    pub fn compute_enemy_income(&self) -> Result<f64, BeliefError> {
        self.state()?.compute_income()
    }

    /// Income estimate as of the last `init` or `update`.
    pub fn estimated_income(&self) -> Option<f64> {
        self.state.as_ref().map(|state| state.estimated_income)
    }

    pub fn record_enemy_deployment(&mut self, armies: u32) -> Result<(), BeliefError> {
        let state = self.state.as_mut().ok_or(BeliefError::NotInitialized)?;
        state.enemy_deployed = armies;
        Ok(())
    }

    pub fn enemy_deployed(&self) -> u32 {
        self.state
            .as_ref()
            .map(|state| state.enemy_deployed)
            .unwrap_or(0)
    }

    pub fn prob(&self, territory: TerritoryId) -> Option<f64> {
        self.state
            .as_ref()
            .and_then(|state| state.enemy_probs.get(&territory).copied())
    }

    pub fn probabilities(&self) -> Option<&BTreeMap<TerritoryId, f64>> {
        self.state.as_ref().map(|state| &state.enemy_probs)
    }

    pub fn map(&self) -> Option<&Arc<MapDetails>> {
        self.state.as_ref().map(|state| &state.map)
    }

    pub fn snapshot(&self) -> Result<BeliefSnapshot, BeliefError> {
        let state = self.state()?;
        Ok(BeliefSnapshot {
            probabilities: state.enemy_probs.clone(),
            enemy_deployed: state.enemy_deployed,
            estimated_income: state.estimated_income,
        })
    }

    fn state(&self) -> Result<&TrackerState, BeliefError> {
        self.state.as_ref().ok_or(BeliefError::NotInitialized)
    }
}

impl TrackerState {
    fn prob_controls(&self, bonus: &BonusDetails) -> Result<f64, BeliefError> {
        let mut min_prob: f64 = 1.0;
        for territory in &bonus.territories {
            let prob = self
                .enemy_probs
                .get(territory)
                .copied()
                .ok_or(BeliefError::UnknownTerritory(*territory))?;
            min_prob = min_prob.min(prob);
        }
        Ok(min_prob.sqrt())
    }

    fn compute_income(&self) -> Result<f64, BeliefError> {
        let mut income = self.minimum_army_bonus;
        for bonus in self.map.bonuses() {
            income += self.prob_controls(bonus)? * f64::from(bonus.amount);
        }
        Ok(income)
    }
}

fn check_coverage(map: &MapDetails, standing: &TurnStanding) -> Result<(), BeliefError> {
    if let Some((extra, _)) = standing
        .iter()
        .find(|(territory, _)| !map.contains_territory(*territory))
    {
        return Err(BeliefError::UnknownTerritory(extra));
    }
    if let Some(missing) = map
        .territory_ids()
        .find(|territory| standing.get(*territory).is_none())
    {
        return Err(BeliefError::MissingTerritory(missing));
    }
    Ok(())
}

/// Misuse of the tracker. None of these are transient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeliefError {
    #[error("enemy tracker used before init")]
    NotInitialized,
    #[error("enemy tracker initialized twice")]
    AlreadyInitialized,
    #[error("territory {0} is not on the tracked map")]
    UnknownTerritory(TerritoryId),
    #[error("standing omits territory {0}")]
    MissingTerritory(TerritoryId),
    #[error("bonus {0} is not on the tracked map")]
    UnknownBonus(BonusId),
    #[error("fog rule returned NaN for territory {0}")]
    InvalidProbability(TerritoryId),
}
