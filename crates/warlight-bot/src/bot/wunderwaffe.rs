use super::{BotKind, Seat, all_on, best_by, owned};
use crate::policy::{BotError, DeployOrder, GameStart, TurnContext, WarLightAi};

/// Stacks every army on the strongest territory we hold.
#[derive(Debug, Default)]
pub struct Wunderwaffe {
    seat: Seat,
}

impl Wunderwaffe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WarLightAi for Wunderwaffe {
    fn kind(&self) -> BotKind {
        BotKind::Wunderwaffe
    }

    fn init(&mut self, game: GameStart) -> Result<(), BotError> {
        self.seat.start(game)
    }

    fn play_turn(&mut self, ctx: &TurnContext) -> Result<Vec<DeployOrder>, BotError> {
        let game = self.seat.game()?;
        let candidates = owned(game, ctx);
        let target = best_by(&candidates, |territory| {
            let armies = ctx
                .standing
                .get(territory)
                .and_then(|standing| standing.armies)
                .unwrap_or(0);
            f64::from(armies)
        });
        Ok(all_on(target, ctx.income))
    }
}
