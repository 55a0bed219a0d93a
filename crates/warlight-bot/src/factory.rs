//! Name-based construction of the registered bots.

use crate::bot::{BotFeatures, BotKind, Cowzow, Prod, PyBot, Wunderwaffe};
use crate::policy::WarLightAi;
use thiserror::Error;

pub struct BotFactory;

impl BotFactory {
    pub const NAMES: [&'static str; 5] = [
        BotKind::PyBot.name(),
        BotKind::Wunderwaffe.name(),
        BotKind::Prod.name(),
        BotKind::ProdRandom.name(),
        BotKind::Cowzow.name(),
    ];

    /// Builds the bot registered under `name` (any letter case), reading
    /// feature flags from the environment.
    pub fn construct(name: &str) -> Result<Box<dyn WarLightAi>, FactoryError> {
        Self::construct_with(name, BotFeatures::from_env())
    }

    pub fn construct_with(
        name: &str,
        features: BotFeatures,
    ) -> Result<Box<dyn WarLightAi>, FactoryError> {
        let kind = Self::resolve(name)?;
        Ok(Self::build(kind, features))
    }

    /// Checks a configured name without building anything.
    pub fn resolve(name: &str) -> Result<BotKind, FactoryError> {
        BotKind::from_name(name).ok_or_else(|| FactoryError::UnknownBot {
            name: name.to_string(),
            supported: Self::NAMES.join(", "),
        })
    }

    pub fn build(kind: BotKind, features: BotFeatures) -> Box<dyn WarLightAi> {
        match kind {
            BotKind::PyBot => Box::new(PyBot::new(features)),
            BotKind::Wunderwaffe => Box::new(Wunderwaffe::new()),
            BotKind::Prod => Box::new(Prod::new(false, features.seed())),
            BotKind::ProdRandom => Box::new(Prod::new(true, features.seed())),
            BotKind::Cowzow => Box::new(Cowzow::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    #[error("no bot found named {name}, supported names are: {supported}")]
    UnknownBot { name: String, supported: String },
}
