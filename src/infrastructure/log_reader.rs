//! Contest log readers.
//!
//! Two formats are understood: column-oriented CSV exports and Cabrillo
//! contest logs. Both are reduced to a [`ParsedLog`]: the station callsign
//! plus one [`ContactRecord`] per grid square found.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use crate::domain::{Band, BandClassifier, ContactRecord, GridSquare, ParsedLog};

/// Field offset where the Cabrillo exchange begins: `QSO: freq mode date time mycall ...`.
pub const CABRILLO_EXCHANGE_OFFSET: usize = 6;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("File {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported file format: {}. Use .csv, .cbr, or .log files.", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Failed to read log: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type LogResult<T> = Result<T, LogError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Csv,
    Cabrillo,
}

impl LogFormat {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> LogResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(LogFormat::Csv),
            Some("cbr") | Some("log") => Ok(LogFormat::Cabrillo),
            _ => Err(LogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LogFormat::Csv => "CSV",
            LogFormat::Cabrillo => "Cabrillo",
        }
    }
}

/// Which Cabrillo `QSO:` fields are searched for grid squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeScan {
    /// Only fields at or after the given offset
    AfterOffset(usize),
    /// Every field after the `QSO:` tag
    AllFields,
}

impl Default for ExchangeScan {
    fn default() -> Self {
        ExchangeScan::AfterOffset(CABRILLO_EXCHANGE_OFFSET)
    }
}

/// Header synonyms, tried in order, for CSV column detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSynonyms {
    pub frequency: Vec<String>,
    pub grid: Vec<String>,
    pub callsign: Vec<String>,
}

impl Default for ColumnSynonyms {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|name| name.to_string()).collect();
        Self {
            frequency: owned(&["freq", "frequency", "band", "freq_mhz"]),
            grid: owned(&["grid", "gridsquare", "grid_square", "their_grid", "dx_grid"]),
            callsign: owned(&["call", "callsign", "station_callsign", "my_call"]),
        }
    }
}

/// Column positions chosen for a CSV header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub frequency: Option<usize>,
    pub grid: Option<usize>,
    pub callsign: Option<usize>,
}

/// Matches header names against the synonym lists.
///
/// For each role the first synonym, in list order, that names a header wins.
/// Comparison is case-insensitive and ignores surrounding whitespace.
pub fn detect_columns<S: AsRef<str>>(headers: &[S], synonyms: &ColumnSynonyms) -> ColumnMap {
    let normalized: Vec<String> = headers
        .iter()
        .map(|header| header.as_ref().trim().to_ascii_lowercase())
        .collect();

    let find = |candidates: &[String]| {
        candidates.iter().find_map(|candidate| {
            let candidate = candidate.to_ascii_lowercase();
            normalized.iter().position(|header| *header == candidate)
        })
    };

    ColumnMap {
        frequency: find(&synonyms.frequency),
        grid: find(&synonyms.grid),
        callsign: find(&synonyms.callsign),
    }
}

/// Reads contest logs into [`ParsedLog`] values.
#[derive(Debug, Clone, Default)]
pub struct LogReader {
    bands: BandClassifier,
    columns: ColumnSynonyms,
    exchange: ExchangeScan,
}

impl LogReader {
    pub fn new(bands: BandClassifier, columns: ColumnSynonyms, exchange: ExchangeScan) -> Self {
        Self { bands, columns, exchange }
    }

    /// Reads the log at `path`.
    ///
    /// Unsupported extensions and missing files are errors. Any other read
    /// or parse failure is logged and yields an empty log, so a damaged file
    /// never stops the run.
    pub fn read(&self, path: &Path) -> LogResult<ParsedLog> {
        let format = LogFormat::from_path(path)?;

        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(LogError::NotFound(path.to_path_buf()));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not open log");
                return Ok(ParsedLog::default());
            }
        };

        let parsed = match format {
            LogFormat::Csv => self.parse_csv(file),
            LogFormat::Cabrillo => self.parse_cabrillo(BufReader::new(file)),
        };

        match parsed {
            Ok(log) => {
                debug!(
                    path = %path.display(),
                    format = format.name(),
                    callsign = %log.callsign,
                    records = log.records.len(),
                    "parsed log"
                );
                Ok(log)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "error parsing {} file", format.name());
                Ok(ParsedLog::default())
            }
        }
    }

    /// Parses a CSV log with a header row.
    pub fn parse_csv<R: Read>(&self, reader: R) -> LogResult<ParsedLog> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        let columns = detect_columns(&headers, &self.columns);
        debug!(?columns, "detected CSV columns");

        let mut log = ParsedLog::default();
        let mut callsign: Option<String> = None;

        for row in csv_reader.records() {
            let row = row?;

            if callsign.is_none() {
                callsign = columns
                    .callsign
                    .and_then(|index| row.get(index))
                    .filter(|value| !value.is_empty())
                    .map(str::to_string);
            }

            let band = match columns.frequency.and_then(|index| row.get(index)) {
                Some(value) => self.bands.classify(value),
                None => Band::unknown(),
            };

            match columns.grid {
                Some(index) => {
                    if let Some(grid) = row.get(index).and_then(GridSquare::parse) {
                        log.records.push(ContactRecord::new(band, grid));
                    }
                }
                None => {
                    for grid in row.iter().filter_map(GridSquare::parse) {
                        log.records.push(ContactRecord::new(band.clone(), grid));
                    }
                }
            }
        }

        if let Some(callsign) = callsign {
            log.callsign = callsign;
        }
        Ok(log)
    }

    /// Parses a Cabrillo log.
    ///
    /// The first non-empty `CALLSIGN:` header names the station. Each `QSO:`
    /// line contributes its exchange grid squares under the band of its
    /// frequency field.
    pub fn parse_cabrillo<R: BufRead>(&self, reader: R) -> LogResult<ParsedLog> {
        let mut log = ParsedLog::default();
        let mut callsign: Option<String> = None;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if let Some(value) = line.strip_prefix("CALLSIGN:") {
                let value = value.trim();
                if callsign.is_none() && !value.is_empty() {
                    callsign = Some(value.to_string());
                }
            } else if line.starts_with("QSO:") {
                self.parse_qso_line(line, &mut log.records);
            }
        }

        if let Some(callsign) = callsign {
            log.callsign = callsign;
        }
        Ok(log)
    }

    fn parse_qso_line(&self, line: &str, records: &mut Vec<ContactRecord>) {
        let fields: Vec<&str> = line.split_whitespace().collect();

        let exchange = match self.exchange {
            ExchangeScan::AfterOffset(offset) => {
                if fields.len() < CABRILLO_EXCHANGE_OFFSET {
                    return;
                }
                fields.get(offset..).unwrap_or(&[])
            }
            ExchangeScan::AllFields => {
                if fields.len() < 2 {
                    return;
                }
                &fields[1..]
            }
        };

        let band = self.bands.classify(fields[1]);
        for grid in exchange.iter().filter_map(|field| GridSquare::parse(field)) {
            records.push(ContactRecord::new(band.clone(), grid));
        }
    }
}
