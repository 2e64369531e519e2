use anyhow::Result;

use crate::bundle::Record;
use crate::lines::LineKind;
use crate::routes::RouteKind;
use crate::{orig, IDMapping, Line, LineID, Route, RouteID, Station, StationID};

/// Everything declared in `uno`, in file order.
pub(crate) struct Entities {
    pub stations: Vec<Station>,
    pub station_ids: IDMapping<orig::StationCode, StationID>,
    pub lines: Vec<Line>,
    pub line_ids: IDMapping<orig::LineCode, LineID>,
    pub routes: Vec<Route>,
    pub route_ids: IDMapping<orig::RouteCode, RouteID>,
}

/// `uno` mixes stations, lines and routes, told apart by the tag in the second field. Station
/// indices elsewhere in the archive count stations in the order they appear here.
pub(crate) fn load(records: Vec<Record>) -> Result<Entities> {
    let mut entities = Entities {
        stations: Vec::new(),
        station_ids: IDMapping::new(),
        lines: Vec::new(),
        line_ids: IDMapping::new(),
        routes: Vec::new(),
        route_ids: IDMapping::new(),
    };

    for rec in records {
        match rec.get(1) {
            "MS" => {
                let id = entities
                    .station_ids
                    .insert_new(orig::StationCode::new(rec.get(0)))?;
                entities.stations.push(Station::from_record(id, &rec));
            }
            "ML" | "WL" => {
                let kind = if rec.get(1) == "ML" {
                    LineKind::Metro
                } else {
                    LineKind::Walking
                };
                let id = entities
                    .line_ids
                    .insert_new(orig::LineCode::new(rec.get(0)))?;
                entities.lines.push(Line::from_record(id, kind, &rec));
            }
            "MW" | "WW" => {
                let kind = if rec.get(1) == "MW" {
                    RouteKind::Metro
                } else {
                    RouteKind::Walking
                };
                let id = entities
                    .route_ids
                    .insert_new(orig::RouteCode::new(rec.get(0)))?;
                entities.routes.push(Route::from_record(id, kind, &rec));
            }
            tag => {
                warn!("Skipping {} with unknown type {tag:?}", rec.get(0));
            }
        }
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::angle_records;

    #[test]
    fn classify_by_tag() {
        let raw = "\
S1<,>MS<,>Alpha<,>阿尔法<,>阿爾法<,>アルファ<,>Alp<,>阿<,>1.0<,>1.0<,>10<,>20<,>
L1<,>ML<,>Line 1<,>1号线<,>1號線<,>1号線<,><,>1<,><,><,><,><,>#E4002B
S2<,>MS<,>Beta<,>贝塔<,>貝塔<,>ベータ<,>Bet<,>贝<,>2.0<,>2.0<,>30<,>40<,>
R1<,>MW<,>To Beta<,>往贝塔<,>往貝塔<,>ベータ行<,><,><,><,><,><,><,>
X1<,>ZZ<,>Mystery
W1<,>WW<,>Walk<,>步行<,>步行<,>徒歩
";
        let entities = load(angle_records(raw.as_bytes())).unwrap();
        assert_eq!(entities.stations.len(), 2);
        assert_eq!(entities.stations[1].id, StationID(1));
        assert_eq!(entities.stations[1].code.as_str(), "S2");
        assert_eq!(entities.stations[0].names.simplified, "阿尔法");
        assert_eq!(entities.stations[0].english_short_name, "Alp");
        assert_eq!(entities.stations[0].map_y, 20);

        assert_eq!(entities.lines.len(), 1);
        assert_eq!(entities.lines[0].color, "#E4002B");
        assert_eq!(entities.lines[0].names.short, "1");

        assert_eq!(entities.routes.len(), 2);
        assert_eq!(entities.routes[1].kind, RouteKind::Walking);
        assert_eq!(
            entities.route_ids.get(&orig::RouteCode::new("W1")),
            Some(RouteID(1))
        );
    }

    #[test]
    fn duplicate_codes_fail() {
        let raw = "S1<,>MS<,>A\nS1<,>MS<,>B\n";
        assert!(load(angle_records(raw.as_bytes())).is_err());
    }
}
