use serde::Deserialize;
use std::collections::HashMap;

/// One sensor sample as posted by the site controller. Field names are the
/// controller's wire format; missing fields decode as zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct AmbientReading {
    pub temperature: f64,
    pub humidity: f64,
    #[serde(rename = "heatIndex")]
    pub heat_index: f64,
    #[serde(rename = "move")]
    pub movement_count: i64,
}

/// Which of the two alert classes a payload carries. Exactly one per payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Temperature,
    Movement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub kind: AlertKind,
}

impl NotificationPayload {
    /// Derive the alert for a reading. Movement takes precedence over the
    /// ambient summary.
    pub fn from_reading(reading: &AmbientReading) -> Self {
        if reading.movement_count > 0 {
            Self {
                title: "¡Alguien ha entrado al site!".to_string(),
                body: "Se han detectado lecturas de movimiento.".to_string(),
                kind: AlertKind::Movement,
            }
        } else {
            Self {
                title: "Alerta de Ambiente".to_string(),
                body: format!(
                    "Temperatura: {:.2}°C<br>Humedad: {:.0}%<br>Indice de Calor: {:.2}°C",
                    reading.temperature, reading.humidity, reading.heat_index
                ),
                kind: AlertKind::Temperature,
            }
        }
    }

    /// Data map for the data-only push message: `Title`, `Body`, and one
    /// marker key (`Temp` or `Move`) with an empty value, which is what the
    /// mobile clients key their rendering on.
    pub fn to_data_map(&self) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("Title".to_string(), self.title.clone());
        data.insert("Body".to_string(), self.body.clone());
        let marker = match self.kind {
            AlertKind::Temperature => "Temp",
            AlertKind::Movement => "Move",
        };
        data.insert(marker.to_string(), String::new());
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_reading_selects_movement_alert() {
        let reading = AmbientReading {
            temperature: 45.0,
            humidity: 90.0,
            heat_index: 50.0,
            movement_count: 3,
        };

        let payload = NotificationPayload::from_reading(&reading);

        assert_eq!(payload.kind, AlertKind::Movement);
        assert_eq!(payload.title, "¡Alguien ha entrado al site!");
        assert_eq!(payload.body, "Se han detectado lecturas de movimiento.");
    }

    #[test]
    fn quiet_reading_formats_ambient_summary() {
        let reading = AmbientReading {
            temperature: 23.456,
            humidity: 55.6,
            heat_index: 25.0,
            movement_count: 0,
        };

        let payload = NotificationPayload::from_reading(&reading);

        assert_eq!(payload.kind, AlertKind::Temperature);
        assert_eq!(payload.title, "Alerta de Ambiente");
        assert_eq!(
            payload.body,
            "Temperatura: 23.46°C<br>Humedad: 56%<br>Indice de Calor: 25.00°C"
        );
    }

    #[test]
    fn data_map_carries_exactly_one_marker() {
        let quiet = NotificationPayload::from_reading(&AmbientReading::default());
        let data = quiet.to_data_map();
        assert_eq!(data.get("Temp"), Some(&String::new()));
        assert!(!data.contains_key("Move"));

        let moving = NotificationPayload::from_reading(&AmbientReading {
            movement_count: 1,
            ..Default::default()
        });
        let data = moving.to_data_map();
        assert_eq!(data.get("Move"), Some(&String::new()));
        assert!(!data.contains_key("Temp"));
    }

    #[test]
    fn wire_fields_decode_and_default() {
        let reading: AmbientReading =
            serde_json::from_str(r#"{"temperature":21.5,"heatIndex":22.1,"move":2}"#)
                .expect("valid reading");
        assert_eq!(reading.temperature, 21.5);
        assert_eq!(reading.heat_index, 22.1);
        assert_eq!(reading.movement_count, 2);
        assert_eq!(reading.humidity, 0.0);
    }
}
