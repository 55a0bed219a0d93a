pub mod bot;
pub mod factory;
pub mod policy;

pub use bot::{BotFeatures, BotKind, Cowzow, Prod, PyBot, Wunderwaffe};
pub use factory::{BotFactory, FactoryError};
pub use policy::{BotError, DeployOrder, GameStart, TurnContext, WarLightAi};
