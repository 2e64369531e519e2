use std::collections::BTreeMap;

use anyhow::Result;
use geometry::Coordinate;
use serde::{Deserialize, Serialize};

use crate::bundle::Record;
use crate::{orig, IDMapping, LineID, Names, StationID};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Metro,
    /// Connects two distinct stations that are free to walk between
    Walking,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Line {
    pub id: LineID,
    pub code: orig::LineCode,
    pub kind: LineKind,
    pub names: Names,
    /// Like "#E4002B", or empty
    pub color: String,
    /// In physical order along the line
    pub stations: Vec<StationID>,
    /// The physical path between adjacent stations, WGS-84. Only stored in one direction.
    pub paths: BTreeMap<(orig::StationCode, orig::StationCode), Vec<Coordinate>>,
}

impl Line {
    pub(crate) fn from_record(id: LineID, kind: LineKind, rec: &Record) -> Self {
        Self {
            id,
            code: orig::LineCode::new(rec.get(0)),
            kind,
            names: Names::from_record(rec),
            color: rec.get(12).to_string(),
            stations: Vec::new(),
            paths: BTreeMap::new(),
        }
    }

    /// The path from one station to the next, reversing a path stored the other way around.
    pub fn path_between(
        &self,
        from: &orig::StationCode,
        to: &orig::StationCode,
    ) -> Option<Vec<Coordinate>> {
        if let Some(pts) = self.paths.get(&(from.clone(), to.clone())) {
            return Some(pts.clone());
        }
        self.paths
            .get(&(to.clone(), from.clone()))
            .map(|pts| pts.iter().rev().cloned().collect())
    }

    /// Color without the leading '#'
    pub fn hex_color(&self) -> &str {
        self.color.strip_prefix('#').unwrap_or(&self.color)
    }
}

/// From `line`: the code of a line, then the indices of every station on it.
pub(crate) fn load_stations(
    records: Vec<Record>,
    lines: &mut [Line],
    line_ids: &IDMapping<orig::LineCode, LineID>,
    num_stations: usize,
) -> Result<()> {
    for rec in records {
        let code = orig::LineCode::new(rec.get(0));
        let line = match line_ids.get(&code) {
            Some(id) => &mut lines[id.0],
            None => {
                warn!("Station list for unknown line {code}");
                continue;
            }
        };
        line.stations = station_indices(rec.tail(1), num_stations)
            .map_err(|err| anyhow!("line {code}: {err}"))?;
    }
    Ok(())
}

pub(crate) fn station_indices(raw: &[String], num_stations: usize) -> Result<Vec<StationID>> {
    let mut stations = Vec::new();
    for x in raw {
        // Trailing commas
        if x.trim().is_empty() {
            continue;
        }
        let idx = crate::bundle::parse_int(x);
        if idx < 0 || idx as usize >= num_stations {
            bail!("station index {idx} out of range; there are only {num_stations} stations");
        }
        stations.push(StationID(idx as usize));
    }
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_work_in_both_directions() {
        let a = orig::StationCode::new("A");
        let b = orig::StationCode::new("B");
        let mut line = Line {
            id: LineID(0),
            code: orig::LineCode::new("L1"),
            kind: LineKind::Metro,
            names: Names::default(),
            color: "#FF0000".to_string(),
            stations: Vec::new(),
            paths: BTreeMap::new(),
        };
        line.paths.insert(
            (a.clone(), b.clone()),
            vec![Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)],
        );

        assert_eq!(
            line.path_between(&a, &b).unwrap(),
            vec![Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)]
        );
        assert_eq!(
            line.path_between(&b, &a).unwrap(),
            vec![Coordinate::new(2.0, 2.0), Coordinate::new(1.0, 1.0)]
        );
        assert!(line
            .path_between(&a, &orig::StationCode::new("C"))
            .is_none());
        assert_eq!(line.hex_color(), "FF0000");
    }

    #[test]
    fn out_of_range_station_indices() {
        let raw = vec![
            "0".to_string(),
            "2".to_string(),
            "junk".to_string(),
            "".to_string(),
        ];
        assert_eq!(
            station_indices(&raw, 3).unwrap(),
            vec![StationID(0), StationID(2), StationID(0)]
        );
        assert!(station_indices(&["3".to_string()], 3).is_err());
        assert!(station_indices(&["-1".to_string()], 3).is_err());
    }
}
