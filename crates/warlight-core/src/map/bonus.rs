use super::ids::{BonusId, TerritoryId};
use serde::{Deserialize, Serialize};

/// A group of territories paying `amount` armies per turn to whoever holds all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusDetails {
    pub id: BonusId,
    #[serde(default)]
    pub name: String,
    pub territories: Vec<TerritoryId>,
    pub amount: i32,
}

impl BonusDetails {
    pub fn new(
        id: BonusId,
        name: impl Into<String>,
        territories: impl IntoIterator<Item = TerritoryId>,
        amount: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            territories: territories.into_iter().collect(),
            amount,
        }
    }

    pub fn contains(&self, territory: TerritoryId) -> bool {
        self.territories.contains(&territory)
    }
}
