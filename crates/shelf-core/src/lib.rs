mod app_config;
mod config;
pub mod normalize;
pub mod score;
mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use normalize::{
    normalize_external, normalize_owned, normalize_recommended, ExternalRecord, OwnedDoc,
    RecommendedRecord, DEFAULT_CATEGORY, EXTERNAL_ID_OFFSET,
};
pub use score::{score, DEFAULT_LIMIT};
pub use types::{Origin, Product, PurchaseHistoryEntry, RecommendationResult, Tier};
