use std::collections::BTreeMap;

use anyhow::Result;

use crate::bundle::{comma_records, table_path, TableSource};
use crate::{LoadError, Route};

/// Every departure across one hop, keyed by the minute the train arrives at the next station.
pub type HopTable = BTreeMap<u32, u32>;

/// One row of a route's timing table. Minutes since midnight, and they may run past 1440.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingRecord {
    pub depart: u32,
    pub arrive_next: u32,
}

/// Reads `{version}/{route}.csv`. A route without one gets `RouteTimingMissing`.
pub(crate) fn load(
    source: &mut dyn TableSource,
    version: &str,
    route: &Route,
) -> Result<Vec<TimingRecord>> {
    let path = table_path(version, route.code.as_str());
    match source.read_table(&path)? {
        Some(bytes) => parse(&bytes).map_err(|err| anyhow!("{path}: {err}")),
        None => Err(LoadError::RouteTimingMissing(route.code.to_string()).into()),
    }
}

pub fn parse(bytes: &[u8]) -> Result<Vec<TimingRecord>> {
    Ok(comma_records(bytes)?
        .into_iter()
        .map(|rec| TimingRecord {
            depart: rec.minute(0),
            arrive_next: rec.minute(1),
        })
        .collect())
}

/// Splits a route's flat timing dump into `[schedule][hop]`.
///
/// The dump doesn't mark where one hop or schedule ends. When there's exactly one record per
/// hop per schedule, they're taken in order. Otherwise, each hop's departures are assumed to be
/// sorted, so a departure earlier than the previous one starts the next hop, or the next
/// schedule once every hop has been filled. A dump that coincidentally has the exact count but
/// really holds several trips per hop gets split wrong; nothing in the data says otherwise.
pub fn segment(records: &[TimingRecord], hops: usize, schedules: usize) -> Vec<Vec<HopTable>> {
    if hops == 0 || records.is_empty() {
        return Vec::new();
    }

    if schedules > 0 && records.len() == hops * schedules {
        return records
            .chunks(hops)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|rec| HopTable::from([(rec.arrive_next, rec.depart)]))
                    .collect()
            })
            .collect();
    }

    let mut result = Vec::new();
    let mut current = vec![HopTable::new()];
    let mut last_depart = 0;
    for rec in records {
        if rec.depart < last_depart {
            if current.len() == hops {
                result.push(std::mem::replace(&mut current, vec![HopTable::new()]));
            } else {
                current.push(HopTable::new());
            }
        }
        if let Some(table) = current.last_mut() {
            table.insert(rec.arrive_next, rec.depart);
        }
        last_depart = rec.depart;
    }
    result.push(current);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(u32, u32)]) -> Vec<TimingRecord> {
        pairs
            .iter()
            .map(|(depart, arrive_next)| TimingRecord {
                depart: *depart,
                arrive_next: *arrive_next,
            })
            .collect()
    }

    #[test]
    fn parse_tolerates_junk() {
        assert_eq!(
            parse(b"480,485\r\nabc,490\r\n\r\n").unwrap(),
            records(&[(480, 485), (0, 490)])
        );
    }

    #[test]
    fn exact_count_takes_one_record_per_hop() {
        // 3 hops, 2 schedules. Departures deliberately aren't sorted, to show no boundary
        // detection happens.
        let dump = records(&[
            (480, 483),
            (470, 475),
            (500, 502),
            (600, 603),
            (590, 595),
            (620, 622),
        ]);
        let segmented = segment(&dump, 3, 2);
        assert_eq!(segmented.len(), 2);
        assert_eq!(segmented[0].len(), 3);
        assert_eq!(segmented[0][1], HopTable::from([(475, 470)]));
        assert_eq!(segmented[1][2], HopTable::from([(622, 620)]));
    }

    #[test]
    fn wraparound_splits_hops_then_schedules() {
        let dump = records(&[
            // Schedule A
            (480, 485),
            (490, 495),
            (485, 488),
            (495, 498),
            // Schedule B
            (300, 305),
            (400, 405),
            (305, 308),
            (405, 408),
        ]);
        let segmented = segment(&dump, 2, 2);
        assert_eq!(
            segmented,
            vec![
                vec![
                    HopTable::from([(485, 480), (495, 490)]),
                    HopTable::from([(488, 485), (498, 495)]),
                ],
                vec![
                    HopTable::from([(305, 300), (405, 400)]),
                    HopTable::from([(308, 305), (408, 405)]),
                ],
            ]
        );
    }

    #[test]
    fn nothing_to_segment() {
        assert!(segment(&[], 3, 1).is_empty());
        assert!(segment(&records(&[(1, 2)]), 0, 1).is_empty());
    }

    #[test]
    fn schedules_dont_have_to_fill_every_hop() {
        // Only 1 of the 2 hops shows up before the dump ends
        let segmented = segment(&records(&[(10, 12), (20, 22), (30, 32)]), 2, 2);
        assert_eq!(
            segmented,
            vec![vec![HopTable::from([(12, 10), (22, 20), (32, 30)])]]
        );
    }
}
