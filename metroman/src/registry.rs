use std::collections::BTreeMap;
use std::io::Read;

use abstutil::Timer;
use anyhow::Result;

use crate::{City, LoadError};

/// Fetches the raw archive for one city. Network access lives behind this.
pub trait ArchiveSource {
    fn fetch(&self, city: &str, version: &str) -> Result<Vec<u8>>;
}

impl<F: Fn(&str, &str) -> Result<Vec<u8>>> ArchiveSource for F {
    fn fetch(&self, city: &str, version: &str) -> Result<Vec<u8>> {
        self(city, version)
    }
}

/// The current archive version of every city. Built once, before loading any city.
#[derive(Clone, Debug, Default)]
pub struct VersionTable {
    versions: BTreeMap<String, String>,
}

impl VersionTable {
    /// A headerless CSV of (city code, version, something unused). Rows with any other shape
    /// are ignored.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let mut versions = BTreeMap::new();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        for rec in reader.records() {
            let rec = rec?;
            if rec.len() == 3 {
                versions.insert(rec[0].to_string(), rec[1].to_string());
            }
        }
        Ok(Self { versions })
    }

    pub fn from_map(versions: BTreeMap<String, String>) -> Self {
        Self { versions }
    }

    pub fn get(&self, city: &str) -> Option<&str> {
        self.versions.get(city).map(|x| x.as_str())
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(|x| x.as_str())
    }
}

struct LoadedCity {
    archive: Vec<u8>,
    city: City,
}

/// Every city loaded so far. Cities don't share anything, so one failing to load leaves the
/// rest alone.
pub struct Registry {
    versions: VersionTable,
    cities: BTreeMap<String, LoadedCity>,
}

impl Registry {
    pub fn new(versions: VersionTable) -> Self {
        info!(
            "Archives are available for {} cities",
            versions.cities().count()
        );
        Self {
            versions,
            cities: BTreeMap::new(),
        }
    }

    pub fn city_version(&self, code: &str) -> Result<&str> {
        match self.versions.get(code) {
            Some(version) => Ok(version),
            None => Err(LoadError::CityNotFound(code.to_string()).into()),
        }
    }

    /// Fetches and loads a city, replacing whatever was loaded for it before.
    pub fn load_city(
        &mut self,
        code: &str,
        source: &dyn ArchiveSource,
        timer: &mut Timer,
    ) -> Result<&City> {
        let version = self.city_version(code)?.to_string();
        let archive = source.fetch(code, &version)?;
        let city = City::load_from_zip(&archive, &version, timer)
            .map_err(|err| err.context(format!("loading city {code}")))?;
        self.cities
            .insert(code.to_string(), LoadedCity { archive, city });
        self.city(code)
    }

    pub fn city(&self, code: &str) -> Result<&City> {
        match self.cities.get(code) {
            Some(loaded) => Ok(&loaded.city),
            None => Err(LoadError::CityNotFound(code.to_string()).into()),
        }
    }

    /// The archive a city was loaded from, untouched
    pub fn raw_archive(&self, code: &str) -> Result<&[u8]> {
        match self.cities.get(code) {
            Some(loaded) => Ok(&loaded.archive),
            None => Err(LoadError::CityNotFound(code.to_string()).into()),
        }
    }

    pub fn loaded_cities(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(|x| x.as_str())
    }
}
