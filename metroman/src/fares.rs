use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::bundle::{comma_records, read_path, Record, TableSource};
use crate::{orig, IDMapping, Route, RouteID, StationID};

/// Prices between every pair of an explicit list of stations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareMatrix {
    /// The routes the rule was declared for. Which lines a rider takes doesn't affect price.
    pub routes: Vec<orig::RouteCode>,
    pub stations: Vec<StationID>,
    /// `prices[origin][destination]`, indexing into `stations`. Always square.
    pub prices: Vec<Vec<i64>>,
}

impl FareMatrix {
    pub fn fixed(routes: Vec<orig::RouteCode>, stations: Vec<StationID>, price: i64) -> Self {
        let n = stations.len();
        Self {
            routes,
            stations,
            prices: vec![vec![price; n]; n],
        }
    }

    pub fn price(&self, origin: usize, destination: usize) -> Option<i64> {
        self.prices.get(origin)?.get(destination).copied()
    }

    pub fn price_between(&self, from: StationID, to: StationID) -> Option<i64> {
        let origin = self.stations.iter().position(|s| *s == from)?;
        let destination = self.stations.iter().position(|s| *s == to)?;
        self.price(origin, destination)
    }

    fn dimensions_match(&self) -> bool {
        self.prices.len() == self.stations.len()
            && self.prices.iter().all(|row| row.len() == self.stations.len())
    }
}

/// From `fare`: an unused field, `|`-separated route codes, a fixed price, the file name of a
/// price matrix, and `|`-separated station codes. With no station codes, the stations of the
/// first route are used. With no matrix file, every pair costs the fixed price.
pub(crate) fn load(
    source: &mut dyn TableSource,
    version: &str,
    records: Vec<Record>,
    station_ids: &IDMapping<orig::StationCode, StationID>,
    routes: &[Route],
    route_ids: &IDMapping<orig::RouteCode, RouteID>,
) -> Result<Vec<FareMatrix>> {
    let mut fares = Vec::new();
    for (idx, rec) in records.into_iter().enumerate() {
        let fare_routes: Vec<orig::RouteCode> = split_list(rec.get(1))
            .map(orig::RouteCode::new)
            .collect();

        let stations = if rec.get(4).trim().is_empty() {
            match fare_routes.first().and_then(|code| route_ids.get(code)) {
                Some(id) => routes[id.0].stations.clone(),
                None => {
                    warn!("Fare rule {idx} has no stations and no known route; skipping");
                    continue;
                }
            }
        } else {
            let mut stations = Vec::new();
            for code in split_list(rec.get(4)) {
                match station_ids.get(&orig::StationCode::new(code)) {
                    Some(id) => stations.push(id),
                    None => warn!("Fare rule {idx} refers to unknown station {code}"),
                }
            }
            stations
        };

        let matrix_file = rec.get(3).trim();
        let fare = if matrix_file.is_empty() {
            FareMatrix::fixed(fare_routes, stations, rec.int(2))
        } else {
            let bytes = read_path(source, &format!("{version}/{matrix_file}"))?;
            FareMatrix {
                routes: fare_routes,
                stations,
                prices: parse_matrix(&bytes)?,
            }
        };

        if !fare.dimensions_match() {
            warn!(
                "Fare rule {idx} has {} stations, but a {}-row price matrix; skipping",
                fare.stations.len(),
                fare.prices.len()
            );
            continue;
        }
        fares.push(fare);
    }
    Ok(fares)
}

fn split_list(x: &str) -> impl Iterator<Item = &str> {
    x.split('|').map(|x| x.trim()).filter(|x| !x.is_empty())
}

fn parse_matrix(bytes: &[u8]) -> Result<Vec<Vec<i64>>> {
    let mut matrix = Vec::new();
    for rec in comma_records(bytes)? {
        let mut row: Vec<&str> = rec.tail(0).iter().map(|x| x.as_str()).collect();
        while row.last().map(|x| x.trim().is_empty()).unwrap_or(false) {
            row.pop();
        }
        matrix.push(row.into_iter().map(crate::bundle::parse_int).collect());
    }
    Ok(matrix)
}
