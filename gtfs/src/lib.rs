//! Projects a loaded city into GTFS-shaped rows. Every row type derives `Serialize` with GTFS
//! column names, so writing the actual files is just a matter of feeding them to a CSV writer.

#[macro_use]
extern crate log;

mod agency;
mod calendar;
mod fares;
mod routes;
mod shapes;
mod stop_times;
mod stops;
mod trips;

use anyhow::Result;
use metroman::{City, CityDirectory, CityInfo, Registry};

pub use agency::Agency;
pub use calendar::{CalendarDate, ExceptionType, Service};
pub use fares::{FareAttribute, FareRule};
pub use routes::{Route, RouteType};
pub use shapes::{route_shape, ShapePoint};
pub use stop_times::{format_minute, StopTime};
pub use stops::{zone_id, Stop, TIMEZONE};
pub use trips::{shape_id, sorted_trips, trip_id, Trip};

/// Every table of a feed for one city. Rows come out in a stable order: stations, routes and
/// lines in archive order, schedules by code, and trips by first departure.
#[derive(Clone, Debug)]
pub struct Feed {
    pub agency: Vec<Agency>,
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub calendar: Vec<Service>,
    pub calendar_dates: Vec<CalendarDate>,
    pub trips: Vec<Trip>,
    pub shapes: Vec<ShapePoint>,
    pub stop_times: Vec<StopTime>,
    pub fare_rules: Vec<FareRule>,
    pub fare_attributes: Vec<FareAttribute>,
}

impl Feed {
    pub fn from_city(city_code: &str, city: &City, info: Option<&CityInfo>) -> Self {
        let (fare_rules, fare_attributes) = fares::generate(city);
        let feed = Self {
            agency: vec![agency::generate(city_code, info)],
            stops: stops::generate(city),
            routes: routes::generate(city_code, city),
            calendar: calendar::generate(city),
            calendar_dates: calendar::generate_exceptions(city),
            trips: trips::generate(city),
            shapes: shapes::generate(city),
            stop_times: stop_times::generate(city),
            fare_rules,
            fare_attributes,
        };
        info!(
            "Feed for {city_code}: {} stops, {} routes, {} trips, {} stop times, {} fares",
            feed.stops.len(),
            feed.routes.len(),
            feed.trips.len(),
            feed.stop_times.len(),
            feed.fare_rules.len()
        );
        feed
    }

    /// For a city already loaded into the registry. Fails with `CityNotFound` otherwise.
    pub fn from_registry(
        registry: &Registry,
        city_code: &str,
        directory: Option<&CityDirectory>,
    ) -> Result<Self> {
        let city = registry.city(city_code)?;
        let info = directory.and_then(|d| d.by_metroman_code(city_code));
        Ok(Self::from_city(city_code, city, info))
    }
}
