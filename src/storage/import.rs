//! Engagement import
//!
//! Reads engagement lists from spreadsheet exports (CSV/TSV) or from
//! structured JSON/YAML files.
//!
//! Sheets are located by their header row (the row containing the
//! configured name header), and month cells are normalized leniently:
//! spreadsheets routinely turn `2023-04` into `2023.4`, `2023/04` or a
//! serial date number. Anything that still does not look like a month is
//! passed through untouched so the analysis reports it.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::config::ImportConfig;
use crate::domain::{Engagement, EngagementId, MonthToken};

#[derive(Debug, Error, PartialEq)]
pub enum ImportError {
    #[error("Header row not found: no row contains '{0}'")]
    HeaderNotFound(String),

    #[error("No valid engagements found")]
    NoEngagements,

    #[error("Unsupported input format: '{0}' (expected csv, tsv, json or yaml)")]
    UnsupportedFormat(String),

    #[error("Duplicate engagement id: '{0}'")]
    DuplicateId(String),
}

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Tsv,
    Json,
    Yaml,
}

impl InputFormat {
    /// Picks a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Why a sheet row was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingStartMonth,
    MissingEndMonth,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingStartMonth => "missing start month",
            Self::MissingEndMonth => "missing end month",
        }
    }
}

/// A named row that could not become an engagement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// One-based row number as shown by spreadsheet tools
    pub line: usize,
    pub name: String,
    pub reason: SkipReason,
}

/// Result of reading an input file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub engagements: Vec<Engagement>,
    pub skipped: Vec<SkippedRow>,
    /// Zero-based index of the header row, for sheet inputs
    pub header_row: Option<usize>,
}

/// Reads engagements from a file on disk
pub struct EngagementReader<'a> {
    path: PathBuf,
    format: InputFormat,
    config: &'a ImportConfig,
}

impl<'a> EngagementReader<'a> {
    /// Creates a reader, inferring the format from the extension unless given
    pub fn new(
        path: impl Into<PathBuf>,
        format: Option<InputFormat>,
        config: &'a ImportConfig,
    ) -> Result<Self> {
        let path = path.into();
        let format = match format {
            Some(format) => format,
            None => InputFormat::from_path(&path)?,
        };
        Ok(Self {
            path,
            format,
            config,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    /// Reads and converts the whole file
    pub fn read(&self) -> Result<ImportReport> {
        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open input file: {}", self.path.display()))?;

        let report = match self.format {
            InputFormat::Csv | InputFormat::Tsv => {
                let rows = read_rows(&mut file, self.delimiter())
                    .with_context(|| format!("Failed to read sheet: {}", self.path.display()))?;
                parse_rows(&rows, self.config)?
            }
            InputFormat::Json | InputFormat::Yaml => {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .with_context(|| format!("Failed to read input file: {}", self.path.display()))?;
                parse_records(&content, self.format)
                    .with_context(|| format!("Failed to parse {}", self.path.display()))?
            }
        };

        Ok(report)
    }

    fn delimiter(&self) -> u8 {
        match self.format {
            InputFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Reads every record of a delimited file as raw cells
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", index + 1))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();

        // Spreadsheet CSV exports usually start with a byte order mark
        if index == 0 {
            if let Some(first) = row.first_mut() {
                if let Some(stripped) = first.strip_prefix('\u{feff}') {
                    *first = stripped.to_string();
                }
            }
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Converts sheet rows into engagements
///
/// Rows before the header are ignored. After it, rows with an empty name
/// are skipped, a name containing a stop marker ends the data, and named
/// rows without both months are reported as skipped.
pub fn parse_rows(rows: &[Vec<String>], config: &ImportConfig) -> Result<ImportReport, ImportError> {
    let marker = config.header_marker.trim();
    let header_row = rows
        .iter()
        .position(|row| row.iter().any(|cell| cell.trim() == marker))
        .ok_or_else(|| ImportError::HeaderNotFound(marker.to_string()))?;

    let cols = &config.columns;
    let mut report = ImportReport {
        header_row: Some(header_row),
        ..ImportReport::default()
    };

    for (index, row) in rows.iter().enumerate().skip(header_row + 1) {
        let cell = move |col: usize| row.get(col).map(|c| c.trim()).unwrap_or("");

        let name = cell(cols.name);
        if name.is_empty() {
            continue;
        }
        if config.stop_markers.iter().any(|m| name.contains(m.as_str())) {
            break;
        }

        let start_month = normalize_month(cell(cols.start_month));
        let end_month = normalize_month(cell(cols.end_month));

        let reason = if start_month.is_empty() {
            Some(SkipReason::MissingStartMonth)
        } else if end_month.is_empty() {
            Some(SkipReason::MissingEndMonth)
        } else {
            None
        };
        if let Some(reason) = reason {
            report.skipped.push(SkippedRow {
                line: index + 1,
                name: name.to_string(),
                reason,
            });
            continue;
        }

        let employment_type = cell(cols.employment_type);
        let mut engagement =
            Engagement::new(EngagementId::for_row(index), name, start_month, end_month)
                .with_details(cell(cols.role), cell(cols.client), cell(cols.skills));
        if !employment_type.is_empty() {
            engagement = engagement.with_employment_type(employment_type);
        }

        report.engagements.push(engagement);
    }

    if report.engagements.is_empty() {
        return Err(ImportError::NoEngagements);
    }

    Ok(report)
}

/// Structured input record; `id` is optional and months may be numbers
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EngagementRecord {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(deserialize_with = "month_cell")]
    start_month: String,
    #[serde(deserialize_with = "month_cell")]
    end_month: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    client: String,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    employment_type: Option<String>,
}

fn month_cell<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    match Cell::deserialize(deserializer)? {
        Cell::Text(s) => Ok(s),
        Cell::Integer(n) => Ok(n.to_string()),
        Cell::Float(f) if is_date_serial(f) => Ok(f.to_string()),
        // 2023.10 arrives as 2023.1 and would read as January
        Cell::Float(f) => Err(serde::de::Error::custom(format!(
            "numeric month {} is ambiguous, write it as a \"YYYY-MM\" string",
            f
        ))),
    }
}

/// Parses a JSON or YAML array of engagement records
pub fn parse_records(content: &str, format: InputFormat) -> Result<ImportReport> {
    let records: Vec<EngagementRecord> = match format {
        InputFormat::Yaml => serde_yaml::from_str(content).context("Invalid YAML engagement list")?,
        _ => serde_json::from_str(content).context("Invalid JSON engagement list")?,
    };

    let mut seen = HashSet::new();
    let mut engagements = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let id = record
            .id
            .map(EngagementId::new)
            .unwrap_or_else(|| EngagementId::for_row(index));
        if !seen.insert(id.clone()) {
            return Err(ImportError::DuplicateId(id.to_string()).into());
        }

        engagements.push(Engagement {
            id,
            name: record.name,
            start_month: normalize_month(&record.start_month),
            end_month: normalize_month(&record.end_month),
            role: record.role,
            client: record.client,
            skills: record.skills,
            employment_type: record.employment_type.filter(|t| !t.trim().is_empty()),
        });
    }

    if engagements.is_empty() {
        return Err(ImportError::NoEngagements.into());
    }

    Ok(ImportReport {
        engagements,
        ..ImportReport::default()
    })
}

/// Normalizes spreadsheet month variants to `YYYY-MM`
///
/// Accepts `YYYY-MM`, `YYYY.M`, `YYYY/M`, `YYYY-M` and spreadsheet serial
/// dates. Unrecognized text is returned trimmed but otherwise unchanged.
pub fn normalize_month(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() || value.parse::<MonthToken>().is_ok() {
        return value.to_string();
    }

    if let Some(token) = serial_date_month(value) {
        return token.to_string();
    }

    for (separator, max_month_digits) in [('.', 2), ('/', 2), ('-', 1)] {
        if let Some((year, month)) = value.split_once(separator) {
            let year_ok = year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit());
            let month_ok = (1..=max_month_digits).contains(&month.len())
                && month.bytes().all(|b| b.is_ascii_digit());
            if year_ok && month_ok {
                return format!("{}-{:0>2}", year, month);
            }
        }
    }

    value.to_string()
}

/// Only numbers in this window are plausible date serials (2009..2173)
///
/// Written as a positive range test so `NaN` and infinities fall outside.
fn is_date_serial(serial: f64) -> bool {
    serial > 40_000.0 && serial < 100_000.0
}

/// Converts a spreadsheet serial date (days since 1899-12-30) to its month
fn serial_date_month(value: &str) -> Option<MonthToken> {
    let serial: f64 = value.parse().ok()?;
    if !is_date_serial(serial) {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_days(Days::new(serial.trunc() as u64))?;
    Some(MonthToken::from_date(date))
}
