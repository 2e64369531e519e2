use metroman::City;
use serde::Serialize;
use serde_repr::Serialize_repr;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    pub agency_id: String,
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    pub route_type: RouteType,
    /// Hex, no leading '#'
    pub route_color: String,
    pub route_text_color: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize_repr)]
#[repr(u8)]
pub enum RouteType {
    Tram = 0,
    Subway = 1,
    Rail = 2,
    Bus = 3,
    Ferry = 4,
    CableTram = 5,
    AerialLift = 6,
    Funicular = 7,
    Trolleybus = 11,
    Monorail = 12,
}

/// Routes without any trips are left out; nothing would refer to them.
pub fn generate(city_code: &str, city: &City) -> Vec<Route> {
    city.routes
        .iter()
        .filter(|route| route.has_trips())
        .map(|route| Route {
            agency_id: city_code.to_string(),
            route_id: route.code.to_string(),
            route_short_name: route.names.simplified.clone(),
            route_long_name: route.names.english.clone(),
            // Every metro system gets reported as rail
            route_type: RouteType::Rail,
            route_color: route
                .line
                .map(|id| city.lines[id.0].hex_color().to_string())
                .unwrap_or_default(),
            route_text_color: "000000",
        })
        .collect()
}
