//! Decodes the map provider's compact geometry strings and converts between the provider's
//! Mercator projection, BD-09, GCJ-02 and WGS-84.
//!
//! Everything here is pure. Callers should only ever store the WGS-84 output.

#[macro_use]
extern crate log;

mod codec;
mod geodiff;
mod transform;

use serde::{Deserialize, Serialize};

pub use codec::decode_symbol;
pub use geodiff::{decode_combined, decode_points, fold_delta, Geometry, GeometryKind};
pub use transform::{
    bd09_from_gcj02, bd09_to_gcj02, gcj02_from_wgs84, gcj02_to_wgs84, mercator_to_bd09,
    mercator_to_wgs84, out_of_china,
};

/// A geographic position. Which datum it's in depends on where it came from; see the
/// conversion functions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A point in the provider's projected Mercator space, already divided down by 100.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mercator {
    pub x: f64,
    pub y: f64,
}

impl Mercator {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid symbol {0:?}")]
    InvalidSymbol(char),
    #[error("unknown geometry kind {0:?}")]
    UnknownGeometryKind(char),
    #[error("truncated block: needed {needed} bytes, only {remaining} left")]
    TruncatedBlock { needed: usize, remaining: usize },
}

/// Decodes every segment of a composite geometry string and converts all points to WGS-84.
/// Segments that fail to decode are skipped.
pub fn decode_to_wgs84(encoded: &str) -> Vec<Vec<Coordinate>> {
    decode_combined(encoded)
        .into_iter()
        .map(|geometry| {
            geometry
                .points
                .into_iter()
                .map(mercator_to_wgs84)
                .collect()
        })
        .collect()
}
