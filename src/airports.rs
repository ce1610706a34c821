//! Airport reference dataset
//!
//! Loads the OpenFlights-style airports table once at startup and serves
//! read-only lookups for the rest of the process lifetime. Records carry
//! 14 positional CSV fields with no header row; the `\N` sentinel marks
//! absent values. When no local copy of the dataset exists it is fetched
//! from the configured URL and cached to disk, then parsed from the cache.

use crate::config::AirportsConfig;
use crate::error::AerodeskError;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Upper bound on the one-time dataset download at startup
const DATASET_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// One airport row from the reference dataset
#[derive(Debug, Clone)]
pub struct AirportRecord {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub country: String,
    /// 3-letter code; unique across the table when present
    pub iata: Option<String>,
    /// 4-letter code, alternate identifier
    pub icao: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
    pub tz_offset: Option<f64>,
    pub dst: String,
    pub tzdb: String,
    pub kind: String,
    pub source: String,
}

impl AirportRecord {
    /// ICAO code for display, with a placeholder when absent
    #[must_use]
    pub fn icao_display(&self) -> &str {
        self.icao.as_deref().unwrap_or("n/a")
    }

    /// IATA code for display, with a placeholder when absent
    #[must_use]
    pub fn iata_display(&self) -> &str {
        self.iata.as_deref().unwrap_or("n/a")
    }
}

/// In-memory airport table with indexed lookups.
///
/// Built once at startup and never mutated; shared across request
/// handlers behind an `Arc` with no locking.
pub struct AirportDirectory {
    records: Vec<AirportRecord>,
    iata_index: HashMap<String, usize>,
    iata_codes: HashSet<String>,
    city_lower: Vec<String>,
    name_lower: Vec<String>,
}

impl AirportDirectory {
    /// Parse the dataset from any reader of OpenFlights-style CSV
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AerodeskError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut iata_index = HashMap::new();
        let mut skipped = 0usize;

        for (line, row) in csv_reader.records().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    debug!("Skipping malformed dataset row {line}: {err}");
                    skipped += 1;
                    continue;
                }
            };

            match parse_record(&row) {
                Some(record) => {
                    if let Some(iata) = &record.iata {
                        // IATA codes are unique across the table; keep the
                        // first occurrence if the source violates that
                        if iata_index.contains_key(iata) {
                            debug!("Duplicate IATA code {iata} at dataset row {line}");
                            skipped += 1;
                            continue;
                        }
                        iata_index.insert(iata.clone(), records.len());
                    }
                    records.push(record);
                }
                None => {
                    debug!("Skipping unparsable dataset row {line}");
                    skipped += 1;
                }
            }
        }

        if records.is_empty() {
            return Err(AerodeskError::dataset(
                "airport dataset contained no usable rows",
            ));
        }
        if skipped > 0 {
            warn!("Skipped {skipped} unusable airport dataset rows");
        }

        let city_lower = records.iter().map(|r| r.city.to_lowercase()).collect();
        let name_lower = records.iter().map(|r| r.name.to_lowercase()).collect();
        let iata_codes = iata_index.keys().cloned().collect();

        Ok(Self {
            records,
            iata_index,
            iata_codes,
            city_lower,
            name_lower,
        })
    }

    /// Load the dataset from a local file
    pub fn load_from_path(path: &Path) -> Result<Self, AerodeskError> {
        info!("Loading airport dataset from {}", path.display());
        let file = std::fs::File::open(path)?;
        let directory = Self::from_reader(file)?;
        info!("Loaded {} airports", directory.len());
        Ok(directory)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The set of known IATA codes, for the entity extractor
    #[must_use]
    pub fn iata_codes(&self) -> &HashSet<String> {
        &self.iata_codes
    }

    /// Exact lookup by IATA code (uppercase)
    #[must_use]
    pub fn lookup_code(&self, code: &str) -> Option<&AirportRecord> {
        self.iata_index.get(code).map(|&i| &self.records[i])
    }

    /// Substring lookup in the city field.
    ///
    /// Ties break deterministically: shortest city first, then airport
    /// name lexicographically; never first-in-table order.
    #[must_use]
    pub fn search_city(&self, query: &str) -> Option<&AirportRecord> {
        self.search_field(query, &self.city_lower)
    }

    /// Substring lookup in the airport-name field, same tie-break
    #[must_use]
    pub fn search_name(&self, query: &str) -> Option<&AirportRecord> {
        self.search_field(query, &self.name_lower)
    }

    fn search_field<'a>(&'a self, query: &str, field: &[String]) -> Option<&'a AirportRecord> {
        if query.is_empty() {
            return None;
        }
        self.records
            .iter()
            .zip(field)
            .filter(|(_, value)| value.contains(query))
            .min_by(|(a, va), (b, vb)| {
                va.len()
                    .cmp(&vb.len())
                    .then_with(|| a.name.cmp(&b.name))
            })
            .map(|(record, _)| record)
    }
}

/// Parse one positional CSV row; None when required fields do not parse
fn parse_record(row: &csv::StringRecord) -> Option<AirportRecord> {
    if row.len() < 14 {
        return None;
    }

    Some(AirportRecord {
        id: row.get(0)?.trim().parse().ok()?,
        name: row.get(1)?.trim().to_string(),
        city: row.get(2)?.trim().to_string(),
        country: row.get(3)?.trim().to_string(),
        iata: optional_code(row.get(4)?, 3),
        icao: optional_code(row.get(5)?, 4),
        latitude: row.get(6)?.trim().parse().ok()?,
        longitude: row.get(7)?.trim().parse().ok()?,
        altitude_ft: row.get(8)?.trim().parse().unwrap_or(0.0),
        tz_offset: row.get(9)?.trim().parse().ok(),
        dst: row.get(10)?.trim().to_string(),
        tzdb: row.get(11)?.trim().to_string(),
        kind: row.get(12)?.trim().to_string(),
        source: row.get(13)?.trim().to_string(),
    })
}

/// Treat `\N`, empty and over-length values as absent
fn optional_code(raw: &str, max_len: usize) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == "\\N" || value.len() > max_len {
        return None;
    }
    Some(value.to_uppercase())
}

/// Make sure a local copy of the dataset exists, fetching it once from
/// the configured URL when missing. Returns the path to parse.
pub async fn ensure_dataset(config: &AirportsConfig) -> Result<PathBuf, AerodeskError> {
    let path = PathBuf::from(&config.data_path);
    if path.exists() {
        debug!("Using cached airport dataset at {}", path.display());
        return Ok(path);
    }

    info!("Fetching airport dataset from {}", config.data_url);
    let client = reqwest::Client::builder()
        .timeout(DATASET_FETCH_TIMEOUT)
        .build()
        .map_err(|e| AerodeskError::dataset(format!("dataset client build failed: {e}")))?;
    let body = client
        .get(&config.data_url)
        .send()
        .await
        .map_err(|e| AerodeskError::dataset(format!("dataset download failed: {e}")))?
        .error_for_status()
        .map_err(|e| AerodeskError::dataset(format!("dataset download failed: {e}")))?
        .text()
        .await
        .map_err(|e| AerodeskError::dataset(format!("dataset download failed: {e}")))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &body)?;
    info!(
        "Cached airport dataset at {} ({} bytes)",
        path.display(),
        body.len()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "3670,\"Dallas Fort Worth International Airport\",\"Dallas-Fort Worth\",\"United States\",\"DFW\",\"KDFW\",32.896801,-97.038002,607,-6,\"A\",\"America/Chicago\",\"airport\",\"OurAirports\"\n",
        "3484,\"Los Angeles International Airport\",\"Los Angeles\",\"United States\",\"LAX\",\"KLAX\",33.94250107,-118.4079971,125,-8,\"A\",\"America/Los_Angeles\",\"airport\",\"OurAirports\"\n",
        "2359,\"Haneda Airport\",\"Tokyo\",\"Japan\",\"HND\",\"RJTT\",35.552299,139.779999,35,9,\"U\",\"Asia/Tokyo\",\"airport\",\"OurAirports\"\n",
        "2334,\"Narita International Airport\",\"Tokyo\",\"Japan\",\"NRT\",\"RJAA\",35.764702,140.386002,141,9,\"U\",\"Asia/Tokyo\",\"airport\",\"OurAirports\"\n",
        "9999,\"Heliport Without Codes\",\"Nowhere\",\"Nowhere\",\\N,\\N,0.0,0.0,0,\\N,\"U\",\"UTC\",\"heliport\",\"OurAirports\"\n",
    );

    fn sample_directory() -> AirportDirectory {
        AirportDirectory::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn parses_all_sample_rows() {
        let dir = sample_directory();
        assert_eq!(dir.len(), 5);
        assert_eq!(dir.iata_codes().len(), 4);
    }

    #[test]
    fn code_lookup_is_exact() {
        let dir = sample_directory();
        let dfw = dir.lookup_code("DFW").unwrap();
        assert_eq!(dfw.name, "Dallas Fort Worth International Airport");
        assert_eq!(dfw.icao.as_deref(), Some("KDFW"));
        assert!(dir.lookup_code("XYZ").is_none());
    }

    #[test]
    fn missing_codes_become_none() {
        let dir = sample_directory();
        let heliport = dir.search_city("nowhere").unwrap();
        assert_eq!(heliport.iata, None);
        assert_eq!(heliport.icao, None);
        assert_eq!(heliport.iata_display(), "n/a");
    }

    #[test]
    fn city_tie_break_is_deterministic() {
        // Two Tokyo airports: equal city length, so the name decides
        let dir = sample_directory();
        let tokyo = dir.search_city("tokyo").unwrap();
        assert_eq!(tokyo.name, "Haneda Airport");
    }

    #[test]
    fn name_search_matches_substring() {
        let dir = sample_directory();
        let narita = dir.search_name("narita").unwrap();
        assert_eq!(narita.iata.as_deref(), Some("NRT"));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let dir = sample_directory();
        assert!(dir.search_city("").is_none());
    }

    #[test]
    fn unparsable_rows_are_skipped() {
        let data = "bad,row\n3670,\"Dallas Fort Worth International Airport\",\"Dallas-Fort Worth\",\"United States\",\"DFW\",\"KDFW\",32.9,-97.0,607,-6,\"A\",\"America/Chicago\",\"airport\",\"OurAirports\"\n";
        let dir = AirportDirectory::from_reader(data.as_bytes()).unwrap();
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let result = AirportDirectory::from_reader("".as_bytes());
        assert!(result.is_err());
    }
}
