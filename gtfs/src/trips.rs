use metroman::{orig, City, Route};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub trip_headsign: String,
    /// Alternates between a line's directional variants. Which one is 0 is arbitrary.
    pub direction_id: u8,
    pub shape_id: String,
}

pub fn trip_id(route: &orig::RouteCode, schedule: &orig::ScheduleCode, n: usize) -> String {
    format!("{route}_trip_{schedule}_{n}")
}

pub fn shape_id(route: &orig::RouteCode) -> String {
    format!("shape_{route}")
}

/// A route's trips under each of its schedules, sorted by the first departure. Trip IDs number
/// trips in this order.
pub fn sorted_trips(route: &Route) -> Vec<(&orig::ScheduleCode, Vec<&metroman::Trip>)> {
    route
        .schedules
        .iter()
        .zip(route.trips.iter())
        .map(|(schedule, trips)| {
            let mut trips: Vec<&metroman::Trip> = trips.iter().collect();
            trips.sort_by_key(|t| t.first_minute());
            (schedule, trips)
        })
        .collect()
}

pub fn generate(city: &City) -> Vec<Trip> {
    let mut result = Vec::new();
    for route in &city.routes {
        for (schedule, trips) in sorted_trips(route) {
            for n in 0..trips.len() {
                result.push(Trip {
                    route_id: route.code.to_string(),
                    service_id: schedule.to_string(),
                    trip_id: trip_id(&route.code, schedule, n),
                    trip_headsign: route.names.english.clone(),
                    direction_id: route.direction_id() as u8,
                    shape_id: shape_id(&route.code),
                });
            }
        }
    }
    result
}
