pub mod database;
pub mod providers;

pub use database::Database;
pub use providers::{FcmProvider, MockPushProvider, ProviderError, PushProvider};
