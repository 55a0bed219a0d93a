use super::{BotFeatures, BotKind, Seat, all_on, best_by, borders, foreign_neighbors, owned};
use crate::policy::{BotError, DeployOrder, GameStart, TurnContext, WarLightAi};
use std::sync::Arc;
use tracing::{Level, event};
use warlight_core::belief::EnemyTracker;

/// Reinforces the border facing the territory the enemy most likely holds.
#[derive(Debug)]
pub struct PyBot {
    seat: Seat,
    tracker: EnemyTracker,
    features: BotFeatures,
}

impl PyBot {
    pub fn new(features: BotFeatures) -> Self {
        Self {
            seat: Seat::default(),
            tracker: EnemyTracker::new(),
            features,
        }
    }
}

impl WarLightAi for PyBot {
    fn kind(&self) -> BotKind {
        BotKind::PyBot
    }

    fn init(&mut self, game: GameStart) -> Result<(), BotError> {
        self.seat.start(game)
    }

    fn play_turn(&mut self, ctx: &TurnContext) -> Result<Vec<DeployOrder>, BotError> {
        let game = self.seat.game()?;
        if !self.tracker.is_init() {
            self.tracker.init(Arc::clone(&game.map), &game.settings)?;
        }
        let summary = self.tracker.update(ctx.standing, &game.perspective)?;

        let tracker = &self.tracker;
        let front = borders(game, ctx);
        let threat = |territory| {
            foreign_neighbors(game, ctx, territory)
                .filter_map(|neighbor| tracker.prob(neighbor))
                .fold(0.0, f64::max)
        };
        let target = best_by(&front, threat).or_else(|| owned(game, ctx).first().copied());

        if self.features.belief_details() && tracing::enabled!(Level::INFO) {
            event!(
                target: "warlight_bot::pybot",
                Level::INFO,
                turn = ctx.standing.turn,
                visible_enemy = summary.visible_enemy,
                fogged = summary.fogged,
                enemy_income = tracker.estimated_income().unwrap_or_default(),
                deploy_to = ?target,
                income = ctx.income,
            );
        }

        Ok(all_on(target, ctx.income))
    }

    fn enemy_tracker(&self) -> Option<&EnemyTracker> {
        Some(&self.tracker)
    }
}
