use geometry::{gcj02_to_wgs84, Coordinate};
use serde::{Deserialize, Serialize};

use crate::bundle::Record;
use crate::{orig, Names, StationID};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Station {
    pub id: StationID,
    pub code: orig::StationCode,
    pub names: Names,
    pub english_short_name: String,
    /// WGS-84
    pub pos: Coordinate,
    /// Position on the operator's schematic map
    pub map_x: i64,
    pub map_y: i64,
}

impl Station {
    pub(crate) fn from_record(id: StationID, rec: &Record) -> Self {
        // The archive stores GCJ-02
        let raw = Coordinate::new(rec.float(8), rec.float(9));
        Self {
            id,
            code: orig::StationCode::new(rec.get(0)),
            names: Names::from_record(rec),
            english_short_name: rec.get(6).to_string(),
            pos: gcj02_to_wgs84(raw),
            map_x: rec.int(10),
            map_y: rec.int(11),
        }
    }
}
