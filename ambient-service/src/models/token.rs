use chrono::{DateTime, Utc};

/// A registered push-notification channel for one mobile device.
#[derive(Debug, Clone)]
pub struct DeviceToken {
    pub token: String,
    pub registered_at: DateTime<Utc>,
}

impl DeviceToken {
    pub fn new(token: String) -> Self {
        Self {
            token,
            registered_at: Utc::now(),
        }
    }
}
