use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::timing::{segment, HopTable, TimingRecord};
use crate::{Route, StationID};

/// One vehicle's journey along a route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Always at least 2, in the route's station order
    pub visits: Vec<Visit>,
}

/// The timing tables don't distinguish arrival from departure, so a visit is a single instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub station: StationID,
    pub minute: u32,
}

impl Trip {
    pub fn first_minute(&self) -> u32 {
        self.visits.first().map(|v| v.minute).unwrap_or(0)
    }

    pub fn last_minute(&self) -> u32 {
        self.visits.last().map(|v| v.minute).unwrap_or(0)
    }
}

/// Turns a route's timing dump into trips, one list per schedule position.
pub fn build_trips(route: &Route, records: &[TimingRecord]) -> Vec<Vec<Trip>> {
    let mut per_schedule: Vec<Vec<Trip>> = segment(records, route.num_hops(), route.schedules.len())
        .into_iter()
        .map(|hop_tables| reconstruct(&route.stations, &route.station_to_hop, &hop_tables))
        .collect();
    if per_schedule.len() > route.schedules.len() {
        warn!(
            "Route {} has timing for {} schedules, but only {} are assigned; dropping the rest",
            route.code,
            per_schedule.len(),
            route.schedules.len()
        );
        per_schedule.truncate(route.schedules.len());
    }
    per_schedule
}

/// Chains the hops of one schedule into trips.
///
/// Hops are walked in travel order. A departure continues whichever trip from the previous hop
/// arrived at that same minute; anything else starts a new trip. A trip that isn't continued
/// through some hop is finished for good, which is how trains that turn back early show up.
/// When several trips arrive at the same minute, the last one in arrival order wins.
pub fn reconstruct(
    stations: &[StationID],
    station_to_hop: &BTreeMap<StationID, usize>,
    hop_tables: &[HopTable],
) -> Vec<Trip> {
    let empty = HopTable::new();
    let mut trips: Vec<Trip> = Vec::new();
    let mut ended: Vec<bool> = Vec::new();
    // Arrival minute at the current station to the trip that arrived then
    let mut arrivals: BTreeMap<u32, usize> = BTreeMap::new();

    for pair in stations.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let table = station_to_hop
            .get(&from)
            .and_then(|hop| hop_tables.get(*hop))
            .unwrap_or(&empty);

        for x in &mut ended {
            *x = true;
        }
        let mut next_arrivals = BTreeMap::new();
        for (arrival, departure) in table {
            let idx = match arrivals.get(departure) {
                Some(idx) if ended[*idx] => {
                    trips[*idx].visits.push(Visit {
                        station: to,
                        minute: *arrival,
                    });
                    ended[*idx] = false;
                    *idx
                }
                _ => {
                    trips.push(Trip {
                        visits: vec![
                            Visit {
                                station: from,
                                minute: *departure,
                            },
                            Visit {
                                station: to,
                                minute: *arrival,
                            },
                        ],
                    });
                    ended.push(false);
                    trips.len() - 1
                }
            };
            next_arrivals.insert(*arrival, idx);
        }
        arrivals = next_arrivals;
    }

    trips
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks(stations: &[StationID]) -> BTreeMap<StationID, usize> {
        let mut sorted = stations[..stations.len() - 1].to_vec();
        sorted.sort();
        sorted.into_iter().enumerate().map(|(i, s)| (s, i)).collect()
    }

    fn minutes(trip: &Trip) -> Vec<(usize, u32)> {
        trip.visits.iter().map(|v| (v.station.0, v.minute)).collect()
    }

    #[test]
    fn single_hop() {
        let stations = vec![StationID(0), StationID(1)];
        let trips = reconstruct(
            &stations,
            &ranks(&stations),
            &[HopTable::from([(485, 480)])],
        );
        assert_eq!(trips.len(), 1);
        assert_eq!(minutes(&trips[0]), vec![(0, 480), (1, 485)]);
        assert_eq!(trips[0].first_minute(), 480);
        assert_eq!(trips[0].last_minute(), 485);
    }

    #[test]
    fn continues_matching_arrivals() {
        let stations = vec![StationID(0), StationID(1), StationID(2)];
        let trips = reconstruct(
            &stations,
            &ranks(&stations),
            &[
                HopTable::from([(485, 480), (495, 490)]),
                HopTable::from([(488, 485), (498, 495)]),
            ],
        );
        assert_eq!(trips.len(), 2);
        assert_eq!(minutes(&trips[0]), vec![(0, 480), (1, 485), (2, 488)]);
        assert_eq!(minutes(&trips[1]), vec![(0, 490), (1, 495), (2, 498)]);
    }

    #[test]
    fn unmatched_departure_starts_a_new_trip() {
        let stations = vec![StationID(0), StationID(1), StationID(2)];
        let trips = reconstruct(
            &stations,
            &ranks(&stations),
            &[
                HopTable::from([(485, 480)]),
                HopTable::from([(503, 500)]),
            ],
        );
        assert_eq!(trips.len(), 2);
        assert_eq!(minutes(&trips[0]), vec![(0, 480), (1, 485)]);
        assert_eq!(minutes(&trips[1]), vec![(1, 500), (2, 503)]);
    }

    #[test]
    fn trips_extend_once_per_hop() {
        // Two departures from station 1 at 485. Only the first continues the trip that arrived
        // then; the other is a separate train.
        let stations = vec![StationID(0), StationID(1), StationID(2)];
        let trips = reconstruct(
            &stations,
            &ranks(&stations),
            &[
                HopTable::from([(485, 480)]),
                HopTable::from([(488, 485), (490, 485)]),
            ],
        );
        assert_eq!(trips.len(), 2);
        assert_eq!(minutes(&trips[0]), vec![(0, 480), (1, 485), (2, 488)]);
        assert_eq!(minutes(&trips[1]), vec![(1, 485), (2, 490)]);
    }

    #[test]
    fn ended_trips_stay_ended() {
        // The 480 train turns back at station 1. At station 2, a later departure happens to
        // match its arrival at station 1 from two hops ago, which must not revive it.
        let stations = vec![StationID(0), StationID(1), StationID(2), StationID(3)];
        let trips = reconstruct(
            &stations,
            &ranks(&stations),
            &[
                HopTable::from([(485, 480)]),
                HopTable::from([(602, 600)]),
                HopTable::from([(490, 485)]),
            ],
        );
        assert_eq!(trips.len(), 3);
        assert_eq!(minutes(&trips[0]), vec![(0, 480), (1, 485)]);
        assert_eq!(minutes(&trips[1]), vec![(1, 600), (2, 602)]);
        assert_eq!(minutes(&trips[2]), vec![(2, 485), (3, 490)]);
    }

    #[test]
    fn hops_looked_up_by_station_rank() {
        // Travel order is 5 -> 2 -> 9, but the tables are sorted by station index: the hop
        // departing 2 comes first.
        let stations = vec![StationID(5), StationID(2), StationID(9)];
        let trips = reconstruct(
            &stations,
            &ranks(&stations),
            &[
                HopTable::from([(107, 105)]),
                HopTable::from([(105, 100)]),
            ],
        );
        assert_eq!(trips.len(), 1);
        assert_eq!(minutes(&trips[0]), vec![(5, 100), (2, 105), (9, 107)]);
    }

    #[test]
    fn missing_hops_end_everything() {
        let stations = vec![StationID(0), StationID(1), StationID(2)];
        let trips = reconstruct(&stations, &ranks(&stations), &[HopTable::from([(5, 1)])]);
        assert_eq!(trips.len(), 1);
        assert_eq!(minutes(&trips[0]), vec![(0, 1), (1, 5)]);

        assert!(reconstruct(&[StationID(0)], &BTreeMap::new(), &[]).is_empty());
    }
}
