pub mod alerts;
pub mod health;
pub mod temperature;
pub mod tokens;

pub use alerts::send_all;
pub use health::health_check;
pub use temperature::write_temp;
pub use tokens::register_token;

use service_core::error::AppError;

/// Method fallback shared by the POST endpoints. The wire contract predates
/// 405 semantics; every non-POST request gets 400 "Invalid Method" before any
/// body is read.
pub async fn invalid_method() -> AppError {
    AppError::MethodNotAllowed
}
