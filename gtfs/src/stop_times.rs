use metroman::City;
use serde::Serialize;

use crate::trips::{sorted_trips, trip_id};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: usize,
    pub timepoint: u8,
}

/// HH:MM:SS. Trips running past midnight go past 24:00:00.
pub fn format_minute(minute: u32) -> String {
    format!("{:02}:{:02}:00", minute / 60, minute % 60)
}

/// A visit is a single instant, so arrival and departure match.
pub fn generate(city: &City) -> Vec<StopTime> {
    let mut result = Vec::new();
    for route in &city.routes {
        for (schedule, trips) in sorted_trips(route) {
            for (n, trip) in trips.into_iter().enumerate() {
                let id = trip_id(&route.code, schedule, n);
                for (seq, visit) in trip.visits.iter().enumerate() {
                    let time = format_minute(visit.minute);
                    result.push(StopTime {
                        trip_id: id.clone(),
                        arrival_time: time.clone(),
                        departure_time: time,
                        stop_id: city.stations[visit.station.0].code.to_string(),
                        stop_sequence: seq,
                        timepoint: 1,
                    });
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times() {
        assert_eq!(format_minute(0), "00:00:00");
        assert_eq!(format_minute(485), "08:05:00");
        assert_eq!(format_minute(1500), "25:00:00");
    }
}
