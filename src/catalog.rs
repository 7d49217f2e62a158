// Catalog store: turns tabular rows into a validated, read-only set of travel offers
use crate::offer::*;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

// Error types for catalog loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("The catalog source is empty")]
    EmptySource,

    #[error("Missing column: {0}")]
    MissingField(String),

    #[error("Invalid date in column {field} at row {row}: {value:?}")]
    DateParse {
        field: String,
        row: usize,
        value: String,
    },

    #[error("Missing value in column {field} at row {row}")]
    NullField { field: String, row: usize },

    #[error("Invalid value in column {field} at row {row}: {reason}")]
    InvalidValue {
        field: String,
        row: usize,
        reason: String,
    },

    #[error("Duplicate travel id: {0}")]
    DuplicateTravelId(String),

    #[error("Source parse error: {0}")]
    SourceParse(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// One source row, keyed by column name
pub type Row = serde_json::Map<String, Value>;

// Anything that can hand over the raw rows of a catalog
pub trait CatalogSource {
    // Stable identity used as the cache key (path, URL, ...)
    fn identity(&self) -> String;

    fn rows(&self) -> Result<Vec<Row>, LoadError>;
}

// Rows already held in memory
#[derive(Debug, Clone)]
pub struct InMemorySource {
    identity: String,
    rows: Vec<Row>,
}

impl InMemorySource {
    pub fn new(identity: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            identity: identity.into(),
            rows,
        }
    }
}

impl CatalogSource for InMemorySource {
    fn identity(&self) -> String {
        self.identity.clone()
    }

    fn rows(&self) -> Result<Vec<Row>, LoadError> {
        Ok(self.rows.clone())
    }
}

// A JSON array of row objects, as exported from the spreadsheet
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for JsonFileSource {
    fn identity(&self) -> String {
        self.path.display().to_string()
    }

    fn rows(&self) -> Result<Vec<Row>, LoadError> {
        let content = std::fs::read_to_string(&self.path)?;
        rows_from_json(&content)
    }
}

pub fn rows_from_json(json: &str) -> Result<Vec<Row>, LoadError> {
    serde_json::from_str(json).map_err(|e| LoadError::SourceParse(e.to_string()))
}

// An XML row export: <Rows><Row><Cell name="Fees">500</Cell>...</Row></Rows>
#[derive(Debug, Clone)]
pub struct XmlFileSource {
    path: PathBuf,
}

impl XmlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for XmlFileSource {
    fn identity(&self) -> String {
        self.path.display().to_string()
    }

    fn rows(&self) -> Result<Vec<Row>, LoadError> {
        let content = std::fs::read_to_string(&self.path)?;
        rows_from_xml(&content)
    }
}

// Pick the reader from the file extension; anything but .xml is read as JSON
pub fn source_for_path(path: impl Into<PathBuf>) -> Box<dyn CatalogSource> {
    let path = path.into();
    let is_xml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("xml"));
    if is_xml {
        Box::new(XmlFileSource::new(path))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

// Sample catalog exports (stored in the samples directory)
pub const SAMPLE_JSON_PATH: &str = "samples/travel_offers.json";
pub const SAMPLE_XML_PATH: &str = "samples/travel_offers.xml";

// Structures for XML deserialization
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename = "Rows")]
struct XmlRows {
    #[serde(rename = "Row")]
    rows: Vec<XmlRow>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlRow {
    #[serde(rename = "Cell")]
    cells: Vec<XmlCell>,
}

#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
struct XmlCell {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "$value")]
    value: String,
}

pub fn rows_from_xml(xml: &str) -> Result<Vec<Row>, LoadError> {
    let parsed: XmlRows =
        quick_xml::de::from_str(xml).map_err(|e| LoadError::SourceParse(e.to_string()))?;

    Ok(parsed
        .rows
        .into_iter()
        .map(|row| {
            row.cells
                .into_iter()
                .map(|cell| {
                    // Empty cells read as missing values, like blank spreadsheet cells
                    let value = if cell.value.trim().is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell.value)
                    };
                    (cell.name, value)
                })
                .collect()
        })
        .collect())
}

// The loaded, immutable catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    source_id: String,
    offers: Vec<TravelOffer>,
}

impl Catalog {
    pub(crate) fn from_offers(source_id: impl Into<String>, offers: Vec<TravelOffer>) -> Self {
        Self {
            source_id: source_id.into(),
            offers,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn offers(&self) -> &[TravelOffer] {
        &self.offers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TravelOffer> {
        self.offers.iter()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn get(&self, travel_id: &str) -> Option<&TravelOffer> {
        self.offers.iter().find(|o| o.travel_id == travel_id)
    }

    // Distinct locations in ascending order
    pub fn locations(&self) -> Vec<String> {
        self.offers
            .iter()
            .map(|o| o.location.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn fee_bounds(&self) -> Option<(f64, f64)> {
        let first = self.offers.first()?.fee;
        Some(self.offers.iter().fold((first, first), |(lo, hi), o| {
            (lo.min(o.fee), hi.max(o.fee))
        }))
    }

    pub fn max_group_size(&self) -> Option<u32> {
        self.offers.iter().map(|o| o.group_size_capacity).max()
    }

    pub fn departure_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        date_bounds(self.offers.iter().map(|o| o.departure_date))
    }

    pub fn return_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        date_bounds(self.offers.iter().map(|o| o.return_date))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TravelOffer;
    type IntoIter = std::slice::Iter<'a, TravelOffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.offers.iter()
    }
}

fn date_bounds(dates: impl Iterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    dates.fold(None, |acc, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })
}

// Load and validate a whole catalog; any bad row aborts the load
pub fn load<S: CatalogSource + ?Sized>(source: &S) -> Result<Catalog, LoadError> {
    let identity = source.identity();
    let rows = source.rows()?;
    let catalog = load_rows(identity, rows)?;
    info!(
        source = catalog.source_id(),
        offers = catalog.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

pub fn load_rows(identity: impl Into<String>, rows: Vec<Row>) -> Result<Catalog, LoadError> {
    if rows.is_empty() {
        return Err(LoadError::EmptySource);
    }

    // The schema is every column seen in any row
    let columns: HashSet<&str> = rows.iter().flat_map(|r| r.keys().map(String::as_str)).collect();
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !columns.contains(*c)) {
        return Err(LoadError::MissingField(missing.to_string()));
    }

    let mut seen_ids = HashSet::new();
    let mut offers = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let offer = offer_from_row(idx, row)?;
        if !seen_ids.insert(offer.travel_id.clone()) {
            return Err(LoadError::DuplicateTravelId(offer.travel_id));
        }
        offers.push(offer);
    }

    debug!(rows = offers.len(), "All rows validated");
    Ok(Catalog::from_offers(identity, offers))
}

fn offer_from_row(idx: usize, row: &Row) -> Result<TravelOffer, LoadError> {
    let group_size_capacity = whole_number(row, COL_GROUP_SIZE, idx)?;
    if group_size_capacity == 0 {
        return Err(invalid(COL_GROUP_SIZE, idx, "must be greater than zero"));
    }

    let fee = number(row, COL_FEES, idx)?;
    if fee < 0.0 {
        return Err(invalid(COL_FEES, idx, "must not be negative"));
    }

    let star_rating = whole_number(row, COL_STAR_RATING, idx)?;
    if !(1..=5).contains(&star_rating) {
        return Err(invalid(COL_STAR_RATING, idx, "must be between 1 and 5"));
    }

    let departure_date = date(row, COL_DEPARTURE, idx)?;
    let return_date = date(row, COL_RETURN, idx)?;
    if return_date < departure_date {
        return Err(invalid(COL_RETURN, idx, "is before the departure date"));
    }

    Ok(TravelOffer {
        company: text(row, COL_COMPANY, idx)?,
        location: text(row, COL_LOCATION, idx)?,
        group_size_capacity,
        fee,
        details: text(row, COL_DETAILS, idx)?,
        departure_date,
        return_date,
        star_rating: star_rating as u8,
        amenities: text(row, COL_AMENITIES, idx)?,
        travel_type: text(row, COL_TRAVEL_TYPE, idx)?,
        image_url: optional_text(row, COL_IMAGE_URL),
        travel_id: text(row, COL_TRAVEL_ID, idx)?,
    })
}

fn invalid(field: &str, row: usize, reason: impl Into<String>) -> LoadError {
    LoadError::InvalidValue {
        field: field.to_string(),
        row,
        reason: reason.into(),
    }
}

// Present, non-null and not blank
fn cell<'a>(row: &'a Row, field: &str, idx: usize) -> Result<&'a Value, LoadError> {
    match row.get(field) {
        None | Some(Value::Null) => Err(LoadError::NullField {
            field: field.to_string(),
            row: idx,
        }),
        Some(Value::String(s)) if s.trim().is_empty() => Err(LoadError::NullField {
            field: field.to_string(),
            row: idx,
        }),
        Some(value) => Ok(value),
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        // 101.0 from a numeric column is the id "101"
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn text(row: &Row, field: &str, idx: usize) -> Result<String, LoadError> {
    cell(row, field, idx).map(value_to_text)
}

fn optional_text(row: &Row, field: &str) -> Option<String> {
    match row.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value_to_text(value)).filter(|s| !s.is_empty()),
    }
}

fn number(row: &Row, field: &str, idx: usize) -> Result<f64, LoadError> {
    let parsed = match cell(row, field, idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(invalid(field, idx, "not a number")),
    }
}

fn whole_number(row: &Row, field: &str, idx: usize) -> Result<u32, LoadError> {
    let n = number(row, field, idx)?;
    if n.fract() != 0.0 || n < 0.0 || n > u32::MAX as f64 {
        return Err(invalid(field, idx, "not a whole number"));
    }
    Ok(n as u32)
}

fn date(row: &Row, field: &str, idx: usize) -> Result<NaiveDate, LoadError> {
    let value = cell(row, field, idx)?;
    let parsed = match value {
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => n.as_f64().and_then(from_serial_date),
        _ => None,
    };
    parsed.ok_or_else(|| LoadError::DateParse {
        field: field.to_string(),
        row: idx,
        value: value_to_text(value),
    })
}

// Accepts the encodings a spreadsheet export typically produces
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // Month first, as pandas reads ambiguous slashed dates
    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

// Spreadsheet serial dates count days from 1899-12-30
fn from_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_465.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
