//! Per-turn visibility snapshot as seen by one player.

use crate::map::TerritoryId;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Who holds a territory this turn, from the observer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "player", rename_all = "snake_case")]
pub enum TerritoryOwner {
    OwnedBy(PlayerId),
    Neutral,
    /// Still available for distribution at the start of the game.
    Unclaimed,
    /// Owner not visible this turn.
    Fogged,
}

/// What an owner means for enemy tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    NotEnemy,
    Enemy,
    Hidden,
}

impl TerritoryOwner {
    pub fn classify(self, perspective: &Perspective) -> Observation {
        match self {
            TerritoryOwner::OwnedBy(player) if perspective.is_teammate_or_us(player) => {
                Observation::NotEnemy
            }
            TerritoryOwner::OwnedBy(_) => Observation::Enemy,
            TerritoryOwner::Neutral | TerritoryOwner::Unclaimed => Observation::NotEnemy,
            TerritoryOwner::Fogged => Observation::Hidden,
        }
    }

    pub const fn is_fogged(self) -> bool {
        matches!(self, TerritoryOwner::Fogged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryStanding {
    pub owner: TerritoryOwner,
    #[serde(default)]
    pub armies: Option<u32>,
}

impl TerritoryStanding {
    pub const fn new(owner: TerritoryOwner, armies: u32) -> Self {
        Self {
            owner,
            armies: Some(armies),
        }
    }

    pub const fn fogged() -> Self {
        Self {
            owner: TerritoryOwner::Fogged,
            armies: None,
        }
    }
}

/// Ownership of every territory for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStanding {
    #[serde(default)]
    pub turn: u32,
    pub territories: BTreeMap<TerritoryId, TerritoryStanding>,
}

impl TurnStanding {
    pub fn new(turn: u32) -> Self {
        Self {
            turn,
            territories: BTreeMap::new(),
        }
    }

    pub fn with(mut self, territory: TerritoryId, standing: TerritoryStanding) -> Self {
        self.territories.insert(territory, standing);
        self
    }

    pub fn set(&mut self, territory: TerritoryId, standing: TerritoryStanding) {
        self.territories.insert(territory, standing);
    }

    pub fn get(&self, territory: TerritoryId) -> Option<&TerritoryStanding> {
        self.territories.get(&territory)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TerritoryId, &TerritoryStanding)> {
        self.territories.iter().map(|(id, standing)| (*id, standing))
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories
            .iter()
            .filter(move |(_, standing)| standing.owner == TerritoryOwner::OwnedBy(player))
            .map(|(id, _)| *id)
    }

    pub fn fogged_count(&self) -> usize {
        self.territories
            .values()
            .filter(|standing| standing.owner.is_fogged())
            .count()
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// The observing player and its teammates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    pub me: PlayerId,
    #[serde(default)]
    pub teammates: BTreeSet<PlayerId>,
}

impl Perspective {
    pub fn solo(me: PlayerId) -> Self {
        Self {
            me,
            teammates: BTreeSet::new(),
        }
    }

    pub fn with_teammate(mut self, teammate: PlayerId) -> Self {
        self.teammates.insert(teammate);
        self
    }

    pub fn is_teammate_or_us(&self, player: PlayerId) -> bool {
        player == self.me || self.teammates.contains(&player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ME: PlayerId = PlayerId(100);
    const ALLY: PlayerId = PlayerId(101);
    const ENEMY: PlayerId = PlayerId(200);

    #[test]
    fn classify_covers_every_owner() {
        let view = Perspective::solo(ME).with_teammate(ALLY);
        assert_eq!(
            TerritoryOwner::OwnedBy(ME).classify(&view),
            Observation::NotEnemy
        );
        assert_eq!(
            TerritoryOwner::OwnedBy(ALLY).classify(&view),
            Observation::NotEnemy
        );
        assert_eq!(
            TerritoryOwner::OwnedBy(ENEMY).classify(&view),
            Observation::Enemy
        );
        assert_eq!(TerritoryOwner::Neutral.classify(&view), Observation::NotEnemy);
        assert_eq!(
            TerritoryOwner::Unclaimed.classify(&view),
            Observation::NotEnemy
        );
        assert_eq!(TerritoryOwner::Fogged.classify(&view), Observation::Hidden);
    }

    #[test]
    fn standing_decodes_tagged_owners() {
        let json = r#"{
            "turn": 3,
            "territories": {
                "1": { "owner": { "kind": "owned_by", "player": 200 }, "armies": 4 },
                "2": { "owner": { "kind": "fogged" } },
                "3": { "owner": { "kind": "neutral" }, "armies": 2 }
            }
        }"#;
        let standing = TurnStanding::from_json(json).unwrap();
        assert_eq!(standing.turn, 3);
        assert_eq!(
            standing.get(TerritoryId(1)),
            Some(&TerritoryStanding::new(TerritoryOwner::OwnedBy(ENEMY), 4))
        );
        assert_eq!(standing.get(TerritoryId(2)), Some(&TerritoryStanding::fogged()));
        assert_eq!(standing.fogged_count(), 1);
    }

    #[test]
    fn owned_by_filters_player() {
        let standing = TurnStanding::new(1)
            .with(TerritoryId(1), TerritoryStanding::new(TerritoryOwner::OwnedBy(ME), 2))
            .with(
                TerritoryId(2),
                TerritoryStanding::new(TerritoryOwner::OwnedBy(ENEMY), 2),
            )
            .with(TerritoryId(3), TerritoryStanding::new(TerritoryOwner::OwnedBy(ME), 5));
        let mine: Vec<_> = standing.owned_by(ME).collect();
        assert_eq!(mine, vec![TerritoryId(1), TerritoryId(3)]);
    }

    #[test]
    fn json_line_roundtrip() {
        let standing = TurnStanding::new(2)
            .with(TerritoryId(5), TerritoryStanding::fogged())
            .with(TerritoryId(6), TerritoryStanding::new(TerritoryOwner::Unclaimed, 0));
        let line = standing.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(TurnStanding::from_json(&line).unwrap(), standing);
    }
}
