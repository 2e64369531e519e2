use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Identifiers as they appear in the archive.
pub mod orig {
    use std::fmt;

    use serde::{Deserialize, Serialize};

    macro_rules! code {
        ($name:ident) => {
            #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            pub struct $name(pub String);

            impl $name {
                pub fn new(code: impl Into<String>) -> Self {
                    Self(code.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        };
    }

    code!(StationCode);
    code!(LineCode);
    code!(RouteCode);
    code!(ScheduleCode);
}

/// The station index assigned at load time, in file order. This is what the archive's own
/// tables use to refer to stations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationID(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineID(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RouteID(pub usize);

impl CheapID for StationID {
    fn new(x: usize) -> Self {
        Self(x)
    }
}
impl CheapID for LineID {
    fn new(x: usize) -> Self {
        Self(x)
    }
}
impl CheapID for RouteID {
    fn new(x: usize) -> Self {
        Self(x)
    }
}

pub trait CheapID: Copy {
    fn new(x: usize) -> Self;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IDMapping<K: Ord, V> {
    orig_to_cheap: BTreeMap<K, V>,
    // We don't need to store the inverse. It's more convenient for each object to own that.
}

impl<K: Clone + std::fmt::Debug + Ord, V: CheapID> IDMapping<K, V> {
    pub fn new() -> Self {
        Self {
            orig_to_cheap: BTreeMap::new(),
        }
    }

    pub fn insert_new(&mut self, orig: K) -> Result<V> {
        let cheap = V::new(self.orig_to_cheap.len());
        if self.orig_to_cheap.insert(orig.clone(), cheap).is_some() {
            bail!("IDMapping::insert_new has duplicate input for {:?}", orig);
        }
        Ok(cheap)
    }

    pub fn get(&self, orig: &K) -> Option<V> {
        self.orig_to_cheap.get(orig).copied()
    }

    pub fn len(&self) -> usize {
        self.orig_to_cheap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orig_to_cheap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_in_insertion_order() {
        let mut ids: IDMapping<orig::StationCode, StationID> = IDMapping::new();
        assert_eq!(ids.insert_new(orig::StationCode::new("b")).unwrap(), StationID(0));
        assert_eq!(ids.insert_new(orig::StationCode::new("a")).unwrap(), StationID(1));
        assert!(ids.insert_new(orig::StationCode::new("b")).is_err());

        assert_eq!(ids.get(&orig::StationCode::new("a")), Some(StationID(1)));
        assert_eq!(ids.get(&orig::StationCode::new("c")), None);
        assert_eq!(ids.len(), 2);
    }
}
