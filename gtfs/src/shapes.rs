use geometry::Coordinate;
use metroman::{City, Route};
use serde::Serialize;

use crate::trips::shape_id;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapePoint {
    pub shape_id: String,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: usize,
}

/// Stitches together the line's paths between each pair of consecutive stations. Pairs without
/// a path contribute nothing.
pub fn route_shape(city: &City, route: &Route) -> Vec<Coordinate> {
    let line = match route.line {
        Some(id) => &city.lines[id.0],
        None => return Vec::new(),
    };
    let mut pts = Vec::new();
    for pair in route.stations.windows(2) {
        let from = &city.stations[pair[0].0].code;
        let to = &city.stations[pair[1].0].code;
        match line.path_between(from, to) {
            Some(path) => pts.extend(path),
            None => debug!("Route {} has no path from {from} to {to}", route.code),
        }
    }
    pts
}

pub fn generate(city: &City) -> Vec<ShapePoint> {
    let mut result = Vec::new();
    for route in city.routes.iter().filter(|r| r.has_trips()) {
        let id = shape_id(&route.code);
        for (idx, pt) in route_shape(city, route).into_iter().enumerate() {
            result.push(ShapePoint {
                shape_id: id.clone(),
                shape_pt_lat: pt.lat,
                shape_pt_lon: pt.lng,
                shape_pt_sequence: idx,
            });
        }
    }
    result
}
