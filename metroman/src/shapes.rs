use geometry::{gcj02_to_wgs84, Coordinate};

use crate::bundle::Record;
use crate::{orig, IDMapping, Line, LineID};

/// `path_latlng` is one global list of GCJ-02 points; `path_rail` slices it (inclusive on both
/// ends) into the path between two adjacent stations of a line.
pub(crate) fn load(
    latlng: Vec<Record>,
    rail: Vec<Record>,
    lines: &mut [Line],
    line_ids: &IDMapping<orig::LineCode, LineID>,
) {
    let points: Vec<Coordinate> = latlng
        .into_iter()
        .map(|rec| gcj02_to_wgs84(Coordinate::new(rec.float(0), rec.float(1))))
        .collect();

    let mut slices = 0;
    for rec in rail {
        let code = orig::LineCode::new(rec.get(0));
        let line = match line_ids.get(&code) {
            Some(id) => &mut lines[id.0],
            None => {
                warn!("Shape for unknown line {code}");
                continue;
            }
        };
        let (lower, upper) = (rec.int(3), rec.int(4));
        let slice = usize::try_from(lower)
            .ok()
            .zip(usize::try_from(upper).ok())
            .and_then(|(lower, upper)| points.get(lower..=upper));
        let slice = match slice {
            Some(slice) => slice,
            None => {
                warn!(
                    "Shape for line {code} wants points {lower}..={upper}, but there are only {}",
                    points.len()
                );
                continue;
            }
        };
        line.paths.insert(
            (
                orig::StationCode::new(rec.get(1)),
                orig::StationCode::new(rec.get(2)),
            ),
            slice.to_vec(),
        );
        slices += 1;
    }
    debug!(
        "{} shape points sliced into {} station-to-station paths",
        points.len(),
        slices
    );
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::bundle::comma_records;
    use crate::lines::LineKind;
    use crate::Names;

    #[test]
    fn slices_are_inclusive() {
        let mut line_ids = IDMapping::new();
        let id = line_ids.insert_new(orig::LineCode::new("L1")).unwrap();
        let mut lines = vec![Line {
            id,
            code: orig::LineCode::new("L1"),
            kind: LineKind::Metro,
            names: Names::default(),
            color: String::new(),
            stations: Vec::new(),
            paths: BTreeMap::new(),
        }];

        // Outside China, so the datum shift leaves these alone
        let latlng = comma_records(b"1.0,1.0\n2.0,2.0\n3.0,3.0\n4.0,4.0\n").unwrap();
        let rail = comma_records(b"L1,A,B,0,1\nL1,B,C,1,3\nL1,C,D,2,9\nL9,A,B,0,1\n").unwrap();
        load(latlng, rail, &mut lines, &line_ids);

        let a = orig::StationCode::new("A");
        let b = orig::StationCode::new("B");
        let c = orig::StationCode::new("C");
        assert_eq!(lines[0].paths.len(), 2);
        assert_eq!(
            lines[0].path_between(&a, &b).unwrap(),
            vec![Coordinate::new(1.0, 1.0), Coordinate::new(2.0, 2.0)]
        );
        assert_eq!(lines[0].path_between(&c, &b).unwrap().len(), 3);
        assert_eq!(
            lines[0].path_between(&c, &b).unwrap()[0],
            Coordinate::new(4.0, 4.0)
        );
    }
}
