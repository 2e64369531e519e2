use std::collections::BTreeSet;

use metroman::City;
use serde::Serialize;

use crate::stops::zone_id;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FareRule {
    pub fare_id: String,
    pub origin_id: String,
    pub destination_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FareAttribute {
    pub fare_id: String,
    pub price: i64,
    pub currency_type: &'static str,
    /// Paid before boarding
    pub payment_method: u8,
    pub transfers: u8,
}

/// One fare per ordered pair of stations, including a station to itself. When several fare
/// rules price the same pair, the first one wins.
pub fn generate(city: &City) -> (Vec<FareRule>, Vec<FareAttribute>) {
    let mut rules = Vec::new();
    let mut attributes = Vec::new();
    let mut seen = BTreeSet::new();
    for fare in &city.fares {
        for (x, origin) in fare.stations.iter().enumerate() {
            for (y, destination) in fare.stations.iter().enumerate() {
                let origin = &city.stations[origin.0].code;
                let destination = &city.stations[destination.0].code;
                let fare_id = format!("fare_{origin}_{destination}");
                let price = match fare.price(x, y) {
                    Some(price) => price,
                    None => continue,
                };
                if !seen.insert(fare_id.clone()) {
                    continue;
                }
                rules.push(FareRule {
                    fare_id: fare_id.clone(),
                    origin_id: zone_id(origin),
                    destination_id: zone_id(destination),
                });
                attributes.push(FareAttribute {
                    fare_id,
                    price,
                    currency_type: "CNY",
                    payment_method: 1,
                    transfers: 0,
                });
            }
        }
    }
    (rules, attributes)
}
