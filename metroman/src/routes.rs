use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::bundle::Record;
use crate::lines::station_indices;
use crate::{orig, IDMapping, Line, LineID, Names, RouteID, Schedule, StationID, Trip};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKind {
    Metro,
    /// Free transfers between two stations. These never have timing tables.
    Walking,
}

/// One direction of travel along a line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteID,
    pub code: orig::RouteCode,
    pub kind: RouteKind,
    pub names: Names,
    /// In travel order
    pub stations: Vec<StationID>,
    /// Timing tables list hops sorted by the departing station's index, not in travel order.
    /// Every station but the last maps to the position of its hop.
    pub station_to_hop: BTreeMap<StationID, usize>,
    /// Only missing if the route never showed up in `way`
    pub line: Option<LineID>,
    /// Which of the line's directional variants this is
    pub idx_within_line: usize,
    pub schedules: Vec<orig::ScheduleCode>,
    /// Reconstructed trips, one list per schedule position
    pub trips: Vec<Vec<Trip>>,
}

impl Route {
    pub(crate) fn from_record(id: RouteID, kind: RouteKind, rec: &Record) -> Self {
        Self {
            id,
            code: orig::RouteCode::new(rec.get(0)),
            kind,
            names: Names::from_record(rec),
            stations: Vec::new(),
            station_to_hop: BTreeMap::new(),
            line: None,
            idx_within_line: 0,
            schedules: Vec::new(),
            trips: Vec::new(),
        }
    }

    pub(crate) fn set_stations(&mut self, stations: Vec<StationID>) {
        self.station_to_hop.clear();
        if let Some((_, departing)) = stations.split_last() {
            // The final station only ever shows up as an arrival
            let mut sorted = departing.to_vec();
            sorted.sort();
            for (hop, station) in sorted.into_iter().enumerate() {
                self.station_to_hop.insert(station, hop);
            }
        }
        self.stations = stations;
    }

    /// Station adjacency boundaries
    pub fn num_hops(&self) -> usize {
        self.stations.len().saturating_sub(1)
    }

    pub fn has_trips(&self) -> bool {
        self.trips.iter().any(|trips| !trips.is_empty())
    }

    /// 0 or 1, alternating between the directional variants of a line
    pub fn direction_id(&self) -> usize {
        self.idx_within_line % 2
    }
}

/// From `way`: route code, line index, an unused field, then station indices.
pub(crate) fn load_ways(
    records: Vec<Record>,
    routes: &mut [Route],
    route_ids: &IDMapping<orig::RouteCode, RouteID>,
    lines: &[Line],
    num_stations: usize,
) -> Result<()> {
    let mut variants_per_line: BTreeMap<LineID, usize> = BTreeMap::new();
    for rec in records {
        let code = orig::RouteCode::new(rec.get(0));
        let route = match route_ids.get(&code) {
            Some(id) => &mut routes[id.0],
            None => {
                warn!("Station list for unknown route {code}");
                continue;
            }
        };
        route.set_stations(
            station_indices(rec.tail(3), num_stations)
                .map_err(|err| anyhow!("route {code}: {err}"))?,
        );

        let line = match usize::try_from(rec.int(1))
            .ok()
            .and_then(|idx| lines.get(idx))
        {
            Some(line) => line,
            None => {
                warn!("Route {code} refers to unknown line index {}", rec.get(1));
                continue;
            }
        };
        route.line = Some(line.id);
        let counter = variants_per_line.entry(line.id).or_insert(0);
        route.idx_within_line = *counter;
        *counter += 1;

        let on_line: BTreeSet<StationID> = line.stations.iter().cloned().collect();
        if let Some(stray) = route.stations.iter().find(|s| !on_line.contains(s)) {
            warn!(
                "Route {code} visits {:?}, which isn't on line {}",
                stray, line.code
            );
        }
    }
    Ok(())
}

/// From `wayschedule`: route code, an unused field, then schedule codes.
pub(crate) fn load_schedule_assignments(
    records: Vec<Record>,
    routes: &mut [Route],
    route_ids: &IDMapping<orig::RouteCode, RouteID>,
    schedules: &BTreeMap<orig::ScheduleCode, Schedule>,
) {
    for rec in records {
        let code = orig::RouteCode::new(rec.get(0));
        let route = match route_ids.get(&code) {
            Some(id) => &mut routes[id.0],
            None => {
                warn!("Schedules for unknown route {code}");
                continue;
            }
        };
        route.schedules.clear();
        for raw in rec.tail(2) {
            let schedule = orig::ScheduleCode::new(raw.trim());
            if schedule.as_str().is_empty() {
                continue;
            }
            if schedules.contains_key(&schedule) {
                route.schedules.push(schedule);
            } else {
                warn!("Route {code} refers to unknown schedule {schedule}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        Route {
            id: RouteID(0),
            code: orig::RouteCode::new("R"),
            kind: RouteKind::Metro,
            names: Names::default(),
            stations: Vec::new(),
            station_to_hop: BTreeMap::new(),
            line: None,
            idx_within_line: 0,
            schedules: Vec::new(),
            trips: Vec::new(),
        }
    }

    #[test]
    fn hops_are_ranked_by_station_index() {
        let mut r = route();
        r.set_stations(vec![StationID(5), StationID(2), StationID(9), StationID(1)]);
        assert_eq!(r.num_hops(), 3);
        // The last station (1) doesn't depart anywhere
        assert_eq!(
            r.station_to_hop,
            BTreeMap::from([(StationID(2), 0), (StationID(5), 1), (StationID(9), 2)])
        );

        r.set_stations(Vec::new());
        assert_eq!(r.num_hops(), 0);
        assert!(r.station_to_hop.is_empty());
    }
}
