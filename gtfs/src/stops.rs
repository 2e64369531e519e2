use metroman::{orig, City};
use serde::Serialize;

pub const TIMEZONE: &str = "Asia/Shanghai";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stop {
    pub stop_id: String,
    /// The simplified Chinese name
    pub stop_code: String,
    pub stop_name: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
    pub zone_id: String,
    pub location_type: u8,
    pub stop_timezone: &'static str,
}

/// Fares only key on zones, so every station is its own.
pub fn zone_id(code: &orig::StationCode) -> String {
    format!("zone_{code}")
}

pub fn generate(city: &City) -> Vec<Stop> {
    city.stations
        .iter()
        .map(|station| Stop {
            stop_id: station.code.to_string(),
            stop_code: station.names.simplified.clone(),
            stop_name: station.names.english.clone(),
            stop_lat: station.pos.lat,
            stop_lon: station.pos.lng,
            zone_id: zone_id(&station.code),
            location_type: 0,
            stop_timezone: TIMEZONE,
        })
        .collect()
}
