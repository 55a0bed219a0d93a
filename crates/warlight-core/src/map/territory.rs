use super::ids::{BonusId, TerritoryId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Static description of a territory: its neighbors and the bonuses it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryDetails {
    pub id: TerritoryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub connected_to: BTreeSet<TerritoryId>,
    #[serde(default)]
    pub part_of_bonuses: BTreeSet<BonusId>,
}

impl TerritoryDetails {
    pub fn new(id: TerritoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            connected_to: BTreeSet::new(),
            part_of_bonuses: BTreeSet::new(),
        }
    }

    pub fn is_connected_to(&self, other: TerritoryId) -> bool {
        self.connected_to.contains(&other)
    }
}
