pub mod error;
pub mod intent;
pub mod models;
pub mod replies;

pub use error::CoreError;
pub use intent::{
    classify, classify_intent, is_effectively_empty, normalize_message, IntentRule, RuleTable,
};
pub use models::*;
