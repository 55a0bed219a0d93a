//! Opponent belief tracking under fog of war.
//!
//! This module is composed of:
//! - `tracker`: the per-territory enemy-control probabilities and the derived
//!   bonus and income estimates (`EnemyTracker`).
//! - `rule`: how fogged territories are treated on each update (`FogRule`).
//! - `telemetry`: summary metrics computed from a tracker.

mod rule;
pub mod telemetry;
mod tracker;

pub use rule::{FogRule, FreezeFogged};
pub use tracker::{BeliefError, BeliefSnapshot, EnemyTracker, UpdateSummary};
