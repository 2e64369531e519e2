use metroman::CityInfo;
use serde::Serialize;

use crate::stops::TIMEZONE;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Agency {
    pub agency_id: String,
    pub agency_name: String,
    pub agency_url: &'static str,
    pub agency_timezone: &'static str,
    pub agency_lang: &'static str,
}

/// One agency per city, named after the city if the directory knows it.
pub fn generate(city_code: &str, info: Option<&CityInfo>) -> Agency {
    let name = match info {
        Some(info) if !info.english_name.is_empty() => info.english_name.clone(),
        _ => city_code.to_string(),
    };
    Agency {
        agency_id: city_code.to_string(),
        agency_name: format!("China-GTFS {name}"),
        agency_url: "https://tgrcode.com/",
        agency_timezone: TIMEZONE,
        agency_lang: "zh",
    }
}
