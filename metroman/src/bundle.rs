use std::collections::BTreeMap;
use std::io::{Read, Seek};

use anyhow::Result;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::LoadError;

/// Anything that can hand out the raw bytes of a table by its exact path inside an archive.
pub trait TableSource {
    /// `Ok(None)` means there's no such file.
    fn read_table(&mut self, path: &str) -> Result<Option<Vec<u8>>>;
}

impl<R: Read + Seek> TableSource for ZipArchive<R> {
    fn read_table(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => bail!("{path}: {err}"),
        };
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

/// Already unpacked, keyed by path
impl TableSource for BTreeMap<String, Vec<u8>> {
    fn read_table(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(path).cloned())
    }
}

pub(crate) fn table_path(version: &str, table: &str) -> String {
    format!("{version}/{table}.csv")
}

/// Reads `{version}/{table}.csv`, failing with `MissingTable` if it isn't there.
pub(crate) fn read_table(
    source: &mut dyn TableSource,
    version: &str,
    table: &str,
) -> Result<Vec<u8>> {
    read_path(source, &table_path(version, table))
}

pub(crate) fn read_path(source: &mut dyn TableSource, path: &str) -> Result<Vec<u8>> {
    match source.read_table(path)? {
        Some(bytes) => Ok(bytes),
        None => Err(LoadError::MissingTable(path.to_string()).into()),
    }
}

/// One row of a table. Missing fields read as empty, and numbers that don't parse read as
/// zero; the archives are sloppy about fields nobody relies on.
#[derive(Debug)]
pub(crate) struct Record(Vec<String>);

impl Record {
    pub fn get(&self, idx: usize) -> &str {
        self.0.get(idx).map(|x| x.as_str()).unwrap_or("")
    }

    pub fn int(&self, idx: usize) -> i64 {
        parse_int(self.get(idx))
    }

    pub fn minute(&self, idx: usize) -> u32 {
        u32::try_from(self.int(idx)).unwrap_or(0)
    }

    pub fn float(&self, idx: usize) -> f64 {
        self.get(idx).trim().parse().unwrap_or(0.0)
    }

    /// Everything from `idx` onwards
    pub fn tail(&self, idx: usize) -> &[String] {
        self.0.get(idx..).unwrap_or(&[])
    }
}

pub(crate) fn parse_int(x: &str) -> i64 {
    x.trim().parse().unwrap_or(0)
}

/// Plain comma-separated tables. Blank lines are skipped.
pub(crate) fn comma_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(bytes);
    for rec in reader.byte_records() {
        let rec = rec?;
        records.push(Record(
            rec.iter()
                .map(|x| String::from_utf8_lossy(x).into_owned())
                .collect(),
        ));
    }
    Ok(records)
}

/// Tables with free text use `<,>` between fields.
pub(crate) fn angle_records(bytes: &[u8]) -> Vec<Record> {
    text_lines(bytes)
        .into_iter()
        .map(|line| Record(line.split("<,>").map(|x| x.to_string()).collect()))
        .collect()
}

pub(crate) fn text_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_tables() {
        let records = comma_records(b"a,1,2\r\n\r\nb,x\r\nc").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get(0), "a");
        assert_eq!(records[0].int(2), 2);
        assert_eq!(records[1].int(1), 0);
        assert_eq!(records[1].get(5), "");
        assert_eq!(records[0].tail(1), &["1".to_string(), "2".to_string()]);
        assert!(records[2].tail(3).is_empty());
    }

    #[test]
    fn angle_tables() {
        let records = angle_records("X1<,>MS<,>Name, with comma\r\nX2<,>ML\n".as_bytes());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(2), "Name, with comma");
        assert_eq!(records[1].get(1), "ML");
    }

    #[test]
    fn invalid_utf8_reads_as_junk() {
        let records = comma_records(b"483,4\xff6\r\n490,493").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].minute(0), 483);
        assert_eq!(records[0].minute(1), 0);
        assert_eq!(records[1].minute(1), 493);
    }

    #[test]
    fn minutes_never_go_negative() {
        let records = comma_records(b"-5,abc,1500").unwrap();
        assert_eq!(records[0].minute(0), 0);
        assert_eq!(records[0].minute(1), 0);
        assert_eq!(records[0].minute(2), 1500);
    }

    #[test]
    fn missing_tables_are_typed() {
        let mut source: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        source.insert("v1/uno.csv".to_string(), b"x".to_vec());
        assert_eq!(read_table(&mut source, "v1", "uno").unwrap(), b"x".to_vec());

        let err = read_table(&mut source, "v1", "line").unwrap_err();
        assert_eq!(
            err.downcast_ref::<LoadError>(),
            Some(&LoadError::MissingTable("v1/line.csv".to_string()))
        );
    }
}
