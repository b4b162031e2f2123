use chrono::{DateTime, FixedOffset, Timelike, Utc};

/// Slots in the rolling log, one per site-local hour of day.
pub const HOURS_PER_DAY: usize = 24;

// Fixed UTC-6 site offset, deliberately not daylight-saving aware. The
// deployed sensors report against this fixed wall clock.
const SITE_UTC_OFFSET_SECS: i32 = 6 * 3600;

/// One hour slot of the temperature log. Zero means the hour was never
/// written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TemperatureSlot {
    pub avg_temperature: f64,
    pub adj_temperature: f64,
}

pub type HourlyTemperatureLog = [TemperatureSlot; HOURS_PER_DAY];

/// Hour of day (0-23) at the site for the given instant.
pub fn local_hour(now: DateTime<Utc>) -> u8 {
    let offset = FixedOffset::west_opt(SITE_UTC_OFFSET_SECS).expect("fixed offset in range");
    now.with_timezone(&offset).hour() as u8
}

/// Truncate to two decimal places: 23.456 -> 23.45, never 23.46.
pub fn truncate_centi(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}
