use std::io::Read;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// How one city is known to the different data providers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityInfo {
    pub baidu_id: String,
    pub metroman_code: String,
    pub chelaile_code: String,
    pub english_name: String,
    pub simplified_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CityDirectory {
    pub cities: Vec<CityInfo>,
}

impl CityDirectory {
    /// A headered CSV. Rows with too few columns are skipped.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let mut cities = Vec::new();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);
        for rec in reader.records() {
            let rec = rec?;
            if rec.len() < 5 {
                warn!("Skipping short city directory row {:?}", rec);
                continue;
            }
            // The header names vary, so go by position
            let (baidu_id, metroman_code, chelaile_code, english_name, simplified_name): (
                String,
                String,
                String,
                String,
                String,
            ) = rec.deserialize(None)?;
            cities.push(CityInfo {
                baidu_id,
                metroman_code,
                chelaile_code,
                english_name,
                simplified_name,
            });
        }
        Ok(Self { cities })
    }

    pub fn by_metroman_code(&self, code: &str) -> Option<&CityInfo> {
        self.cities.iter().find(|c| c.metroman_code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_directory() {
        let raw = "\
baidu_id,metroman_code,chelaile_code,english_name,simplified_name
131,bj,034,Beijing,北京
289,sh
257,gz,040,Guangzhou,广州
";
        let dir = CityDirectory::load(raw.as_bytes()).unwrap();
        assert_eq!(dir.cities.len(), 2);
        assert_eq!(dir.by_metroman_code("bj").unwrap().english_name, "Beijing");
        assert_eq!(dir.by_metroman_code("gz").unwrap().simplified_name, "广州");
        assert!(dir.by_metroman_code("sh").is_none());
    }
}
