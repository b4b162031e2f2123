pub mod ambient;
pub mod temperature;
pub mod token;

pub use ambient::{AlertKind, AmbientReading, NotificationPayload};
pub use temperature::{
    HourlyTemperatureLog, TemperatureSlot, HOURS_PER_DAY, local_hour, truncate_centi,
};
pub use token::DeviceToken;
