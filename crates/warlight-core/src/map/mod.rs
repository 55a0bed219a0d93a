//! Static map description: territories, adjacency and bonuses.
//!
//! A [`MapDetails`] is immutable for the length of a match. Construction goes
//! through [`MapDetails::add_territory`], [`MapDetails::connect`] and
//! [`MapDetails::add_bonus`], or through [`MapDetails::from_json`], which
//! validates the decoded map before handing it out.

mod bonus;
mod ids;
mod settings;
mod territory;

pub use bonus::BonusDetails;
pub use ids::{BonusId, TerritoryId};
pub use settings::GameSettings;
pub use territory::TerritoryDetails;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapDetails {
    id: u32,
    name: String,
    territories: BTreeMap<TerritoryId, TerritoryDetails>,
    bonuses: BTreeMap<BonusId, BonusDetails>,
}

impl MapDetails {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            territories: BTreeMap::new(),
            bonuses: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_territory(
        &mut self,
        id: TerritoryId,
        name: impl Into<String>,
    ) -> Result<&mut TerritoryDetails, MapError> {
        if self.territories.contains_key(&id) {
            return Err(MapError::DuplicateTerritory(id));
        }
        Ok(self
            .territories
            .entry(id)
            .or_insert_with(|| TerritoryDetails::new(id, name)))
    }

    /// Connects two territories in both directions.
    pub fn connect(&mut self, a: TerritoryId, b: TerritoryId) -> Result<(), MapError> {
        if a == b {
            return Err(MapError::SelfConnection(a));
        }
        if !self.territories.contains_key(&b) {
            return Err(MapError::UnknownTerritory(b));
        }
        let Some(first) = self.territories.get_mut(&a) else {
            return Err(MapError::UnknownTerritory(a));
        };
        first.connected_to.insert(b);
        if let Some(second) = self.territories.get_mut(&b) {
            second.connected_to.insert(a);
        }
        Ok(())
    }

    /// Registers a bonus and records membership on each of its territories.
    pub fn add_bonus(&mut self, bonus: BonusDetails) -> Result<(), MapError> {
        if self.bonuses.contains_key(&bonus.id) {
            return Err(MapError::DuplicateBonus(bonus.id));
        }
        if bonus.amount < 0 {
            return Err(MapError::NegativeBonus {
                bonus: bonus.id,
                amount: bonus.amount,
            });
        }
        if let Some(missing) = bonus
            .territories
            .iter()
            .find(|territory| !self.territories.contains_key(territory))
        {
            return Err(MapError::UnknownBonusMember {
                bonus: bonus.id,
                territory: *missing,
            });
        }

        for territory in &bonus.territories {
            if let Some(details) = self.territories.get_mut(territory) {
                details.part_of_bonuses.insert(bonus.id);
            }
        }
        self.bonuses.insert(bonus.id, bonus);
        Ok(())
    }

    pub fn territory(&self, id: TerritoryId) -> Option<&TerritoryDetails> {
        self.territories.get(&id)
    }

    pub fn contains_territory(&self, id: TerritoryId) -> bool {
        self.territories.contains_key(&id)
    }

    pub fn territories(&self) -> impl Iterator<Item = &TerritoryDetails> {
        self.territories.values()
    }

    pub fn territory_ids(&self) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories.keys().copied()
    }

    pub fn territory_count(&self) -> usize {
        self.territories.len()
    }

    pub fn neighbors(&self, id: TerritoryId) -> impl Iterator<Item = TerritoryId> + '_ {
        self.territories
            .get(&id)
            .into_iter()
            .flat_map(|details| details.connected_to.iter().copied())
    }

    pub fn bonus(&self, id: BonusId) -> Option<&BonusDetails> {
        self.bonuses.get(&id)
    }

    pub fn bonuses(&self) -> impl Iterator<Item = &BonusDetails> {
        self.bonuses.values()
    }

    pub fn bonus_count(&self) -> usize {
        self.bonuses.len()
    }

    /// Checks the structural invariants a loaded map must satisfy.
    pub fn validate(&self) -> Result<(), MapError> {
        for (id, details) in &self.territories {
            if details.id != *id {
                return Err(MapError::MismatchedId(*id));
            }
            for neighbor in &details.connected_to {
                if neighbor == id {
                    return Err(MapError::SelfConnection(*id));
                }
                let Some(other) = self.territories.get(neighbor) else {
                    return Err(MapError::UnknownTerritory(*neighbor));
                };
                if !other.connected_to.contains(id) {
                    return Err(MapError::AsymmetricConnection {
                        from: *id,
                        to: *neighbor,
                    });
                }
            }
            for bonus in &details.part_of_bonuses {
                let member = self
                    .bonuses
                    .get(bonus)
                    .is_some_and(|details| details.contains(*id));
                if !member {
                    return Err(MapError::InconsistentMembership {
                        bonus: *bonus,
                        territory: *id,
                    });
                }
            }
        }

        for (id, bonus) in &self.bonuses {
            if bonus.amount < 0 {
                return Err(MapError::NegativeBonus {
                    bonus: *id,
                    amount: bonus.amount,
                });
            }
            for territory in &bonus.territories {
                let recorded = self
                    .territories
                    .get(territory)
                    .map(|details| details.part_of_bonuses.contains(id));
                match recorded {
                    None => {
                        return Err(MapError::UnknownBonusMember {
                            bonus: *id,
                            territory: *territory,
                        });
                    }
                    Some(false) => {
                        return Err(MapError::InconsistentMembership {
                            bonus: *id,
                            territory: *territory,
                        });
                    }
                    Some(true) => {}
                }
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&MapFile::capture(self))
    }

    /// Decodes a map and validates it. Bonus membership on territories is
    /// rebuilt from the bonus list, so files may omit `part_of_bonuses`.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let file: MapFile = serde_json::from_str(json)?;
        let map = file.restore()?;
        map.validate()?;
        Ok(map)
    }
}

/// On-disk layout: territory and bonus lists rather than keyed maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapFile {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    territories: Vec<TerritoryDetails>,
    #[serde(default)]
    bonuses: Vec<BonusDetails>,
}

impl MapFile {
    fn capture(map: &MapDetails) -> Self {
        Self {
            id: map.id,
            name: map.name.clone(),
            territories: map.territories.values().cloned().collect(),
            bonuses: map.bonuses.values().cloned().collect(),
        }
    }

    fn restore(self) -> Result<MapDetails, MapError> {
        let mut map = MapDetails::new(self.id, self.name);
        for mut territory in self.territories {
            if map.territories.contains_key(&territory.id) {
                return Err(MapError::DuplicateTerritory(territory.id));
            }
            territory.part_of_bonuses.clear();
            map.territories.insert(territory.id, territory);
        }
        for bonus in self.bonuses {
            map.add_bonus(bonus)?;
        }
        Ok(map)
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("territory {0} is defined more than once")]
    DuplicateTerritory(TerritoryId),
    #[error("bonus {0} is defined more than once")]
    DuplicateBonus(BonusId),
    #[error("unknown territory {0}")]
    UnknownTerritory(TerritoryId),
    #[error("territory {0} cannot connect to itself")]
    SelfConnection(TerritoryId),
    #[error("territory {0} is stored under a different id")]
    MismatchedId(TerritoryId),
    #[error("connection {from} -> {to} has no reverse edge")]
    AsymmetricConnection { from: TerritoryId, to: TerritoryId },
    #[error("bonus {bonus} references unknown territory {territory}")]
    UnknownBonusMember {
        bonus: BonusId,
        territory: TerritoryId,
    },
    #[error("bonus {bonus} and territory {territory} disagree on membership")]
    InconsistentMembership {
        bonus: BonusId,
        territory: TerritoryId,
    },
    #[error("bonus {bonus} has negative amount {amount}")]
    NegativeBonus { bonus: BonusId, amount: i32 },
    #[error("failed to decode map: {0}")]
    Json(#[from] serde_json::Error),
}
