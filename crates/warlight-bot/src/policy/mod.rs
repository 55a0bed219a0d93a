use crate::bot::BotKind;
use std::sync::Arc;
use thiserror::Error;
use warlight_core::belief::{BeliefError, EnemyTracker};
use warlight_core::map::{GameSettings, MapDetails, TerritoryId};
use warlight_core::standing::{Perspective, TurnStanding};

/// Everything a bot learns once, when the match starts.
#[derive(Debug, Clone)]
pub struct GameStart {
    pub map: Arc<MapDetails>,
    pub settings: GameSettings,
    pub perspective: Perspective,
}

/// Context provided to bots each turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub standing: &'a TurnStanding,
    /// Armies we may deploy this turn.
    pub income: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOrder {
    pub territory: TerritoryId,
    pub armies: u32,
}

/// Unified interface for the interchangeable AI strategies.
pub trait WarLightAi: Send {
    fn kind(&self) -> BotKind;

    /// Called once per match before the first turn.
    fn init(&mut self, game: GameStart) -> Result<(), BotError>;

    /// Deployments for this turn. Orders sum to `ctx.income` and only target
    /// territories we own; with nothing owned the list is empty.
    fn play_turn(&mut self, ctx: &TurnContext) -> Result<Vec<DeployOrder>, BotError>;

    /// Belief state, for bots that track the opponent.
    fn enemy_tracker(&self) -> Option<&EnemyTracker> {
        None
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot played a turn before the match started")]
    NotStarted,
    #[error("bot started twice")]
    AlreadyStarted,
    #[error(transparent)]
    Belief(#[from] BeliefError),
}
