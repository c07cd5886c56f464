//! CSV file market data adapter.
//!
//! One file per pair and timeframe: `<base>/<PAIR>_<TIMEFRAME>.csv`, with `/`
//! in the pair written as `-` (so `EUR/USD` on H1 is `EUR-USD_H1.csv`). The
//! file needs a `close` column; a `date` column, when present, orders rows.

use crate::domain::error::SignaldeskError;
use crate::ports::market_data_port::MarketDataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
    pairs: Vec<String>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf, pairs: Vec<String>) -> Self {
        Self { base_path, pairs }
    }

    fn csv_path(&self, pair: &str, timeframe: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", pair.replace('/', "-"), timeframe))
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_closes(&self, pair: &str, timeframe: &str) -> Result<Vec<f64>, SignaldeskError> {
        let path = self.csv_path(pair, timeframe);
        let closes = read_closes(&path).map_err(|reason| SignaldeskError::MarketData {
            pair: pair.to_string(),
            reason,
        })?;
        tracing::debug!(pair, timeframe, rows = closes.len(), "loaded closes");
        Ok(closes)
    }

    /// Configured pairs, or every pair with a CSV file in the base directory.
    fn list_pairs(&self) -> Result<Vec<String>, SignaldeskError> {
        if !self.pairs.is_empty() {
            return Ok(self.pairs.clone());
        }

        let entries = fs::read_dir(&self.base_path)?;
        let mut pairs: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let stem = name.strip_suffix(".csv")?;
                let (pair, _timeframe) = stem.rsplit_once('_')?;
                Some(pair.replace('-', "/"))
            })
            .collect();
        pairs.sort();
        pairs.dedup();
        Ok(pairs)
    }
}

/// Read the `close` column of a CSV file, ordered by `date` when present.
pub fn read_closes(path: &Path) -> Result<Vec<f64>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_closes(&content)
}

pub fn parse_closes(content: &str) -> Result<Vec<f64>, String> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| format!("CSV header error: {}", e))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let close_idx = column("close").ok_or_else(|| "missing close column".to_string())?;
    let date_idx = column("date");

    let mut rows: Vec<(Option<NaiveDateTime>, f64)> = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| format!("CSV parse error: {}", e))?;
        let raw = record
            .get(close_idx)
            .ok_or_else(|| format!("row {}: missing close value", line + 1))?;
        let close: f64 = raw
            .trim()
            .parse()
            .map_err(|e| format!("row {}: invalid close value '{}': {}", line + 1, raw, e))?;
        let date = match date_idx {
            Some(i) => {
                let date_str = record.get(i).unwrap_or_default().trim();
                let date = parse_date(date_str)
                    .ok_or_else(|| format!("row {}: invalid date '{}'", line + 1, date_str))?;
                Some(date)
            }
            None => None,
        };
        rows.push((date, close));
    }

    if rows.is_empty() {
        return Err("no closing prices".to_string());
    }

    // stable, so equal timestamps keep file order
    rows.sort_by_key(|(date, _)| *date);

    Ok(rows.into_iter().map(|(_, close)| close).collect())
}

/// Intraday timestamps first, then plain `%Y-%m-%d` dates at midnight.
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
