mod cowzow;
mod prod;
mod pybot;
mod wunderwaffe;

pub use cowzow::Cowzow;
pub use prod::Prod;
pub use pybot::PyBot;
pub use wunderwaffe::Wunderwaffe;

use crate::policy::{BotError, DeployOrder, GameStart, TurnContext};
use core::fmt;
use warlight_core::map::TerritoryId;
use warlight_core::standing::TerritoryOwner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotKind {
    PyBot,
    Wunderwaffe,
    Prod,
    /// `Prod` with a randomized first deployment.
    ProdRandom,
    Cowzow,
}

impl BotKind {
    pub const ALL: [BotKind; 5] = [
        BotKind::PyBot,
        BotKind::Wunderwaffe,
        BotKind::Prod,
        BotKind::ProdRandom,
        BotKind::Cowzow,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            BotKind::PyBot => "PyBot",
            BotKind::Wunderwaffe => "Wunderwaffe",
            BotKind::Prod => "Prod",
            BotKind::ProdRandom => "ProdRandom",
            BotKind::Cowzow => "Cowzow",
        }
    }

    /// Case-insensitive lookup over the registered names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BotFeatures {
    seed: u64,
    belief_details: bool,
}

impl BotFeatures {
    pub const fn new(seed: u64, belief_details: bool) -> Self {
        Self {
            seed,
            belief_details,
        }
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    /// Seed for bots with randomized behavior.
    pub const fn seed(self) -> u64 {
        self.seed
    }

    pub const fn belief_details(self) -> bool {
        self.belief_details
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let seed = read("WL_BOT_SEED")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let belief_details = read("WL_BELIEF_DETAILS")
            .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(false);

        Self {
            seed,
            belief_details,
        }
    }
}

/// Match data shared by every bot once `init` has run.
#[derive(Debug, Default)]
struct Seat {
    game: Option<GameStart>,
}

impl Seat {
    fn start(&mut self, game: GameStart) -> Result<(), BotError> {
        if self.game.is_some() {
            return Err(BotError::AlreadyStarted);
        }
        self.game = Some(game);
        Ok(())
    }

    fn game(&self) -> Result<&GameStart, BotError> {
        self.game.as_ref().ok_or(BotError::NotStarted)
    }
}

/// Territories we own this turn, in id order.
fn owned(game: &GameStart, ctx: &TurnContext) -> Vec<TerritoryId> {
    ctx.standing.owned_by(game.perspective.me).collect()
}

/// Neighbors of `territory` not held by us or a teammate.
fn foreign_neighbors(
    game: &GameStart,
    ctx: &TurnContext,
    territory: TerritoryId,
) -> impl Iterator<Item = TerritoryId> {
    game.map.neighbors(territory).filter(move |neighbor| {
        match ctx.standing.get(*neighbor).map(|standing| standing.owner) {
            Some(TerritoryOwner::OwnedBy(player)) => !game.perspective.is_teammate_or_us(player),
            _ => true,
        }
    })
}

/// Owned territories with at least one foreign neighbor, in id order.
fn borders(game: &GameStart, ctx: &TurnContext) -> Vec<TerritoryId> {
    owned(game, ctx)
        .into_iter()
        .filter(|territory| foreign_neighbors(game, ctx, *territory).next().is_some())
        .collect()
}

fn all_on(territory: Option<TerritoryId>, income: u32) -> Vec<DeployOrder> {
    match territory {
        Some(territory) if income > 0 => vec![DeployOrder {
            territory,
            armies: income,
        }],
        _ => Vec::new(),
    }
}

/// First candidate with the strictly highest score.
fn best_by<F>(candidates: &[TerritoryId], mut score: F) -> Option<TerritoryId>
where
    F: FnMut(TerritoryId) -> f64,
{
    let mut best: Option<(TerritoryId, f64)> = None;
    for &territory in candidates {
        let value = score(territory);
        if best.is_none_or(|(_, current)| value > current) {
            best = Some((territory, value));
        }
    }
    best.map(|(territory, _)| territory)
}
