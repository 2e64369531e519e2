//! Loads one city's archive from the subway operator into an entity graph of stations, lines,
//! routes, fares and schedules, and reconstructs the trips of every route.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod bundle;
mod calendar;
mod directory;
mod error;
mod fares;
mod ids;
mod lines;
mod registry;
mod routes;
mod shapes;
mod stations;
mod timing;
mod trips;
mod uno;

use std::collections::BTreeMap;
use std::io::Cursor;

use abstutil::{prettyprint_usize, Timer};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use zip::ZipArchive;

use bundle::{angle_records, comma_records, read_table, text_lines};

pub use bundle::TableSource;
pub use calendar::{Holiday, Schedule};
pub use directory::{CityDirectory, CityInfo};
pub use error::LoadError;
pub use fares::FareMatrix;
pub use ids::{orig, CheapID, IDMapping, LineID, RouteID, StationID};
pub use lines::{Line, LineKind};
pub use registry::{ArchiveSource, Registry, VersionTable};
pub use routes::{Route, RouteKind};
pub use stations::Station;
pub use timing::{segment, HopTable, TimingRecord};
pub use trips::{build_trips, reconstruct, Trip, Visit};

/// Display names. Any of them may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Names {
    pub english: String,
    pub simplified: String,
    pub traditional: String,
    pub japanese: String,
    pub short: String,
}

impl Names {
    fn from_record(rec: &bundle::Record) -> Self {
        Self {
            english: rec.get(2).to_string(),
            simplified: rec.get(3).to_string(),
            traditional: rec.get(4).to_string(),
            japanese: rec.get(5).to_string(),
            short: rec.get(7).to_string(),
        }
    }
}

/// Everything known about one city. Entities refer to each other by ID, indexing into the
/// vectors here. Never modified after loading; a reload builds a whole new one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct City {
    pub version: String,
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
    pub routes: Vec<Route>,
    pub fares: Vec<FareMatrix>,
    pub holidays: Vec<Holiday>,
    pub schedules: BTreeMap<orig::ScheduleCode, Schedule>,

    station_ids: IDMapping<orig::StationCode, StationID>,
    line_ids: IDMapping<orig::LineCode, LineID>,
    route_ids: IDMapping<orig::RouteCode, RouteID>,
}

impl City {
    /// Reads every table under `{version}/`. A missing table fails the whole load, except for
    /// per-route timing tables.
    pub fn load(source: &mut dyn TableSource, version: &str, timer: &mut Timer) -> Result<Self> {
        timer.start("load entities");
        let uno::Entities {
            stations,
            station_ids,
            mut lines,
            line_ids,
            mut routes,
            route_ids,
        } = uno::load(angle_records(&read_table(source, version, "uno")?))?;

        lines::load_stations(
            comma_records(&read_table(source, version, "line")?)?,
            &mut lines,
            &line_ids,
            stations.len(),
        )?;
        routes::load_ways(
            comma_records(&read_table(source, version, "way")?)?,
            &mut routes,
            &route_ids,
            &lines,
            stations.len(),
        )?;
        let fare_records = comma_records(&read_table(source, version, "fare")?)?;
        let fares = fares::load(
            source,
            version,
            fare_records,
            &station_ids,
            &routes,
            &route_ids,
        )?;
        let holidays = calendar::load_holidays(text_lines(&read_table(
            source, version, "holiday",
        )?));
        let schedules =
            calendar::load_schedules(angle_records(&read_table(source, version, "schedule")?));
        routes::load_schedule_assignments(
            comma_records(&read_table(source, version, "wayschedule")?)?,
            &mut routes,
            &route_ids,
            &schedules,
        );
        shapes::load(
            comma_records(&read_table(source, version, "path_latlng")?)?,
            comma_records(&read_table(source, version, "path_rail")?)?,
            &mut lines,
            &line_ids,
        );
        timer.stop("load entities");

        timer.start_iter("reconstruct trips", routes.len());
        for route in &mut routes {
            timer.next();
            let records = match timing::load(source, version, route) {
                Ok(records) => records,
                Err(err) => match err.downcast_ref::<LoadError>() {
                    Some(LoadError::RouteTimingMissing(_)) => {
                        debug!("{err}");
                        continue;
                    }
                    _ => return Err(err),
                },
            };
            route.trips = build_trips(route, &records);
        }

        let num_trips: usize = routes
            .iter()
            .flat_map(|r| r.trips.iter())
            .map(|trips| trips.len())
            .sum();
        info!(
            "Loaded {} stations, {} lines, {} routes, {} trips, {} fare rules from version {version}",
            prettyprint_usize(stations.len()),
            prettyprint_usize(lines.len()),
            prettyprint_usize(routes.len()),
            prettyprint_usize(num_trips),
            prettyprint_usize(fares.len()),
        );

        Ok(Self {
            version: version.to_string(),
            stations,
            lines,
            routes,
            fares,
            holidays,
            schedules,
            station_ids,
            line_ids,
            route_ids,
        })
    }

    /// Loads from the bytes of a zip archive.
    pub fn load_from_zip(bytes: &[u8], version: &str, timer: &mut Timer) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        Self::load(&mut archive, version, timer)
    }

    pub fn station_by_code(&self, code: &str) -> Option<&Station> {
        self.station_ids
            .get(&orig::StationCode::new(code))
            .map(|id| &self.stations[id.0])
    }

    /// Matches the simplified Chinese name
    pub fn station_by_name(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.names.simplified == name)
    }

    pub fn line_by_code(&self, code: &str) -> Option<&Line> {
        self.line_ids
            .get(&orig::LineCode::new(code))
            .map(|id| &self.lines[id.0])
    }

    pub fn route_by_code(&self, code: &str) -> Option<&Route> {
        self.route_ids
            .get(&orig::RouteCode::new(code))
            .map(|id| &self.routes[id.0])
    }

    /// The trips of a route under one of its schedules
    pub fn trips_for(&self, route: RouteID, schedule: &orig::ScheduleCode) -> &[Trip] {
        let route = &self.routes[route.0];
        route
            .schedules
            .iter()
            .position(|s| s == schedule)
            .and_then(|idx| route.trips.get(idx))
            .map(|trips| trips.as_slice())
            .unwrap_or(&[])
    }
}
