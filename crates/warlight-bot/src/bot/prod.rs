use super::{BotKind, Seat, all_on, best_by, borders, foreign_neighbors, owned};
use crate::policy::{BotError, DeployOrder, GameStart, TurnContext, WarLightAi};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deploys onto the territory facing the most foreign neighbors. The
/// randomized variant picks its first deployment uniformly among our borders.
#[derive(Debug)]
pub struct Prod {
    seat: Seat,
    randomized_opening: bool,
    rng: StdRng,
    turns_played: u32,
}

impl Prod {
    pub fn new(randomized_opening: bool, seed: u64) -> Self {
        Self {
            seat: Seat::default(),
            randomized_opening,
            rng: StdRng::seed_from_u64(seed),
            turns_played: 0,
        }
    }
}

impl WarLightAi for Prod {
    fn kind(&self) -> BotKind {
        if self.randomized_opening {
            BotKind::ProdRandom
        } else {
            BotKind::Prod
        }
    }

    fn init(&mut self, game: GameStart) -> Result<(), BotError> {
        self.seat.start(game)
    }

    fn play_turn(&mut self, ctx: &TurnContext) -> Result<Vec<DeployOrder>, BotError> {
        let game = self.seat.game()?;
        let opening = self.turns_played == 0;
        self.turns_played += 1;

        let front = borders(game, ctx);
        if self.randomized_opening && opening && !front.is_empty() {
            let pick = front[self.rng.gen_range(0..front.len())];
            return Ok(all_on(Some(pick), ctx.income));
        }

        let candidates = owned(game, ctx);
        let target = best_by(&candidates, |territory| {
            foreign_neighbors(game, ctx, territory).count() as f64
        });
        Ok(all_on(target, ctx.income))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::fixtures::*;
    use warlight_core::map::TerritoryId;

    fn turn(bot: &mut Prod, income: u32) -> Vec<DeployOrder> {
        let standing = opening();
        bot.play_turn(&TurnContext {
            standing: &standing,
            income,
        })
        .unwrap()
    }

    #[test]
    fn deterministic_prod_faces_most_foreign_neighbors() {
        let mut bot = Prod::new(false, 0);
        bot.init(ring_game()).unwrap();
        assert_eq!(bot.kind(), BotKind::Prod);
        let orders = turn(&mut bot, 6);
        assert_eq!(
            orders,
            vec![DeployOrder {
                territory: TerritoryId(2),
                armies: 6
            }]
        );
    }

    #[test]
    fn randomized_opening_is_seeded_and_stays_on_border() {
        for seed in 0..16 {
            let mut first = Prod::new(true, seed);
            let mut second = Prod::new(true, seed);
            first.init(ring_game()).unwrap();
            second.init(ring_game()).unwrap();
            assert_eq!(first.kind(), BotKind::ProdRandom);

            let a = turn(&mut first, 4);
            let b = turn(&mut second, 4);
            assert_eq!(a, b);
            assert_eq!(total(&a), 4);
            assert!(matches!(a[0].territory, TerritoryId(2) | TerritoryId(6)));

            let later = turn(&mut first, 4);
            assert_eq!(later[0].territory, TerritoryId(2));
        }
    }
}
