use serde::{Deserialize, Serialize};

const DEFAULT_MINIMUM_ARMY_BONUS: i32 = 5;

/// Per-match game settings relevant to income estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Armies every player receives per turn regardless of bonuses held.
    #[serde(default = "default_minimum_army_bonus")]
    pub minimum_army_bonus: i32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            minimum_army_bonus: DEFAULT_MINIMUM_ARMY_BONUS,
        }
    }
}

impl GameSettings {
    pub const fn with_minimum_army_bonus(minimum_army_bonus: i32) -> Self {
        Self { minimum_army_bonus }
    }
}

fn default_minimum_army_bonus() -> i32 {
    DEFAULT_MINIMUM_ARMY_BONUS
}

#[cfg(test)]
mod tests {
    use super::GameSettings;

    #[test]
    fn missing_field_uses_default_floor() {
        let settings: GameSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, GameSettings::default());
        assert_eq!(settings.minimum_army_bonus, 5);
    }
}
