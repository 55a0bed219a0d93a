use super::{BotKind, Seat, borders, owned};
use crate::policy::{BotError, DeployOrder, GameStart, TurnContext, WarLightAi};

/// Spreads income evenly across the front line.
#[derive(Debug, Default)]
pub struct Cowzow {
    seat: Seat,
}

impl Cowzow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WarLightAi for Cowzow {
    fn kind(&self) -> BotKind {
        BotKind::Cowzow
    }

    fn init(&mut self, game: GameStart) -> Result<(), BotError> {
        self.seat.start(game)
    }

    fn play_turn(&mut self, ctx: &TurnContext) -> Result<Vec<DeployOrder>, BotError> {
        let game = self.seat.game()?;
        let mut targets = borders(game, ctx);
        if targets.is_empty() {
            targets = owned(game, ctx);
        }
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let share = ctx.income / targets.len() as u32;
        let remainder = ctx.income as usize % targets.len();
        Ok(targets
            .into_iter()
            .enumerate()
            .map(|(index, territory)| DeployOrder {
                territory,
                armies: share + u32::from(index < remainder),
            })
            .filter(|order| order.armies > 0)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::fixtures::*;
    use warlight_core::map::TerritoryId;

    #[test]
    fn splits_income_across_borders() {
        let mut bot = Cowzow::new();
        bot.init(ring_game()).unwrap();
        let standing = opening();
        let orders = bot
            .play_turn(&TurnContext {
                standing: &standing,
                income: 5,
            })
            .unwrap();
        assert_eq!(
            orders,
            vec![
                DeployOrder {
                    territory: TerritoryId(2),
                    armies: 3
                },
                DeployOrder {
                    territory: TerritoryId(6),
                    armies: 2
                },
            ]
        );
        assert_eq!(total(&orders), 5);
    }

    #[test]
    fn small_income_skips_empty_orders() {
        let mut bot = Cowzow::new();
        bot.init(ring_game()).unwrap();
        let standing = opening();
        let orders = bot
            .play_turn(&TurnContext {
                standing: &standing,
                income: 1,
            })
            .unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(total(&orders), 1);
    }
}
