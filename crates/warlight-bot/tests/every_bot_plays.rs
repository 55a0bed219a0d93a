use std::sync::Arc;

use warlight_bot::{BotFactory, BotFeatures, GameStart, TurnContext};
use warlight_core::map::{BonusDetails, BonusId, GameSettings, MapDetails, TerritoryId};
use warlight_core::standing::{
    Perspective, PlayerId, TerritoryOwner, TerritoryStanding, TurnStanding,
};

const ME: PlayerId = PlayerId(5);
const ENEMY: PlayerId = PlayerId(6);

/// 3x3 grid, ids 1..=9 row by row. Bonus per row worth 2.
fn grid() -> MapDetails {
    let mut map = MapDetails::new(9, "grid");
    for id in 1..=9 {
        map.add_territory(TerritoryId(id), format!("g{id}")).unwrap();
    }
    for id in 1..=9u32 {
        if id % 3 != 0 {
            map.connect(TerritoryId(id), TerritoryId(id + 1)).unwrap();
        }
        if id <= 6 {
            map.connect(TerritoryId(id), TerritoryId(id + 3)).unwrap();
        }
    }
    for row in 0..3u32 {
        let members = (1..=3).map(|col| TerritoryId(row * 3 + col));
        map.add_bonus(BonusDetails::new(BonusId(row + 1), format!("row{row}"), members, 2))
            .unwrap();
    }
    map
}

fn standing(turn: u32) -> TurnStanding {
    let mut standing = TurnStanding::new(turn);
    for id in 1..=9 {
        let entry = match id {
            1 | 2 | 4 => TerritoryStanding::new(TerritoryOwner::OwnedBy(ME), 3),
            9 => TerritoryStanding::new(TerritoryOwner::OwnedBy(ENEMY), 3),
            5 => TerritoryStanding::new(TerritoryOwner::Neutral, 2),
            _ => TerritoryStanding::fogged(),
        };
        standing.set(TerritoryId(id), entry);
    }
    standing
}

#[test]
fn every_registered_bot_deploys_its_full_income_on_owned_territory() {
    let map = Arc::new(grid());
    for name in BotFactory::NAMES {
        let mut bot = BotFactory::construct_with(name, BotFeatures::new(11, false))
            .expect("registered name");
        bot.init(GameStart {
            map: Arc::clone(&map),
            settings: GameSettings::default(),
            perspective: Perspective::solo(ME),
        })
        .expect("first init");

        for turn in 1..=3 {
            let current = standing(turn);
            let orders = bot
                .play_turn(&TurnContext {
                    standing: &current,
                    income: 5,
                })
                .expect("turn plays");
            let total: u32 = orders.iter().map(|order| order.armies).sum();
            assert_eq!(total, 5, "{name} deployed {total}");
            for order in &orders {
                assert!(
                    matches!(
                        current.get(order.territory).map(|s| s.owner),
                        Some(TerritoryOwner::OwnedBy(owner)) if owner == ME
                    ),
                    "{name} deployed on {}",
                    order.territory
                );
            }
        }
    }
}

#[test]
fn second_init_is_rejected_for_every_bot() {
    let map = Arc::new(grid());
    for name in BotFactory::NAMES {
        let mut bot = BotFactory::construct_with(name, BotFeatures::default()).unwrap();
        let start = GameStart {
            map: Arc::clone(&map),
            settings: GameSettings::default(),
            perspective: Perspective::solo(ME),
        };
        bot.init(start.clone()).unwrap();
        assert!(bot.init(start).is_err(), "{name} accepted a second init");
    }
}

#[test]
fn pybot_estimates_enemy_income_from_visible_rows() {
    let map = Arc::new(grid());
    let mut bot = BotFactory::construct_with("PYBOT", BotFeatures::default()).unwrap();
    bot.init(GameStart {
        map: Arc::clone(&map),
        settings: GameSettings::with_minimum_army_bonus(5),
        perspective: Perspective::solo(ME),
    })
    .unwrap();

    let mut current = standing(1);
    for id in 7..=9 {
        current.set(
            TerritoryId(id),
            TerritoryStanding::new(TerritoryOwner::OwnedBy(ENEMY), 2),
        );
    }
    bot.play_turn(&TurnContext {
        standing: &current,
        income: 5,
    })
    .unwrap();

    let tracker = bot.enemy_tracker().expect("pybot tracks the enemy");
    assert_eq!(tracker.prob_enemy_controls_id(BonusId(3)).unwrap(), 1.0);
    assert_eq!(tracker.compute_enemy_income().unwrap(), 7.0);
}
