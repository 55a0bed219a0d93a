//! Treatment of territories whose owner is hidden this turn.

use crate::map::{MapDetails, TerritoryId};
use std::collections::BTreeMap;
use std::fmt;

/// Produces the new enemy-control probability of a fogged territory.
///
/// `prior` is the value stored before this turn; `probs` is the full map as it
/// stood before the update started. Results outside `[0, 1]` are clamped by
/// the tracker.
pub trait FogRule: fmt::Debug + Send {
    fn fogged(
        &self,
        territory: TerritoryId,
        prior: f64,
        map: &MapDetails,
        probs: &BTreeMap<TerritoryId, f64>,
    ) -> f64;
}

/// Keeps the last known estimate for fogged territories: no decay and no
/// propagation from neighbors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreezeFogged;

impl FogRule for FreezeFogged {
    fn fogged(
        &self,
        _territory: TerritoryId,
        prior: f64,
        _map: &MapDetails,
        _probs: &BTreeMap<TerritoryId, f64>,
    ) -> f64 {
        prior
    }
}
