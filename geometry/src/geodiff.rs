use serde::{Deserialize, Serialize};

use crate::codec::decode_digits;
use crate::{DecodeError, Mercator};

// A selector byte, then 6 digits of x and 6 digits of y
const ABSOLUTE_BLOCK_LEN: usize = 13;
// 4 digits of delta x, 4 digits of delta y
const DELTA_BLOCK_LEN: usize = 8;
const MAX_DELTA: i64 = 1 << 23;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    Line,
    Area,
}

impl GeometryKind {
    fn from_selector(c: u8) -> Result<Self, DecodeError> {
        match c {
            b'.' => Ok(GeometryKind::Point),
            b'-' => Ok(GeometryKind::Line),
            b'*' => Ok(GeometryKind::Area),
            _ => Err(DecodeError::UnknownGeometryKind(c as char)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub points: Vec<Mercator>,
}

impl Geometry {
    /// Decodes one segment. Any truncated block or bad symbol fails the whole segment.
    pub fn decode(encoded: &str) -> Result<Self, DecodeError> {
        let (selector, data) = match encoded.as_bytes().split_first() {
            Some((selector, data)) => (*selector, data),
            None => {
                return Err(DecodeError::TruncatedBlock {
                    needed: 1,
                    remaining: 0,
                })
            }
        };
        let kind = GeometryKind::from_selector(selector)?;

        let mut points = Vec::new();
        let (mut x, mut y) = (0, 0);
        let mut idx = 0;
        while idx < data.len() {
            match data[idx] {
                b'=' | b'-' => {
                    let block = take_block(data, idx, ABSOLUTE_BLOCK_LEN)?;
                    x = decode_digits(&block[1..7])?;
                    y = decode_digits(&block[7..13])?;
                    idx += ABSOLUTE_BLOCK_LEN;
                    points.push((x, y));
                }
                b';' => {
                    x = 0;
                    y = 0;
                    idx += 1;
                }
                _ => {
                    let block = take_block(data, idx, DELTA_BLOCK_LEN)?;
                    x += fold_delta(decode_digits(&block[0..4])?);
                    y += fold_delta(decode_digits(&block[4..8])?);
                    idx += DELTA_BLOCK_LEN;
                    points.push((x, y));
                }
            }
        }

        Ok(Self {
            kind,
            points: points
                .into_iter()
                .map(|(x, y)| Mercator::new(x as f64 / 100.0, y as f64 / 100.0))
                .collect(),
        })
    }
}

fn take_block(data: &[u8], idx: usize, len: usize) -> Result<&[u8], DecodeError> {
    let remaining = data.len() - idx;
    if remaining < len {
        return Err(DecodeError::TruncatedBlock {
            needed: len,
            remaining,
        });
    }
    Ok(&data[idx..idx + len])
}

/// Deltas are unsigned on the wire; anything from 2^23 up wraps around to a negative offset.
pub fn fold_delta(delta: i64) -> i64 {
    if delta >= MAX_DELTA {
        MAX_DELTA - delta
    } else {
        delta
    }
}

/// Decodes one segment, treating any failure as "no geometry".
pub fn decode_points(encoded: &str) -> Vec<Mercator> {
    match Geometry::decode(encoded) {
        Ok(geometry) => geometry.points,
        Err(err) => {
            debug!("Ignoring geometry segment {encoded:?}: {err}");
            Vec::new()
        }
    }
}

/// Decodes `|`-separated segments independently, keeping the non-empty ones in order.
pub fn decode_combined(encoded: &str) -> Vec<Geometry> {
    let mut result = Vec::new();
    for segment in encoded.split('|') {
        match Geometry::decode(segment) {
            Ok(geometry) => {
                if !geometry.points.is_empty() {
                    result.push(geometry);
                }
            }
            Err(err) => {
                debug!("Ignoring geometry segment {segment:?}: {err}");
            }
        }
    }
    result
}
