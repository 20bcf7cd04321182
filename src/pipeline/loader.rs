//! Price series loading.
//!
//! Reads a dated price column from delimited text (Yahoo-style
//! `Date,Open,High,Low,Close,Adj Close,Volume` by default) into a
//! [`PriceSeries`]. Dates must be strictly increasing and prices finite;
//! positivity is left to the log transform.
use crate::pipeline::errors::{PipelineError, PipelineResult};
use chrono::NaiveDate;
use ndarray::{Array1, s};
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, ops::Range, path::Path};

/// Column names and parsing rules for the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub date_column: String,
    pub price_column: String,
    /// `chrono` format string for the date column.
    pub date_format: String,
    pub delimiter: char,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        LoaderOptions {
            date_column: "Date".to_string(),
            price_column: "Adj Close".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            delimiter: ',',
        }
    }
}

impl LoaderOptions {
    /// # Errors
    /// `InvalidConfig` for empty column names or a non-ASCII delimiter.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.date_column.is_empty() || self.price_column.is_empty() {
            return Err(PipelineError::InvalidConfig {
                reason: "loader column names must be non-empty".to_string(),
            });
        }
        if !self.delimiter.is_ascii() {
            return Err(PipelineError::InvalidConfig {
                reason: format!("delimiter '{}' is not a single ASCII byte", self.delimiter),
            });
        }
        Ok(())
    }
}

/// Ordered `(date, price)` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    prices: Array1<f64>,
}

impl PriceSeries {
    /// Validating constructor; `line` in errors is the 1-based position.
    ///
    /// # Errors
    /// `DataFormat` for mismatched lengths, an empty series, a non-finite
    /// price or non-increasing dates.
    pub fn new(dates: Vec<NaiveDate>, prices: Array1<f64>) -> PipelineResult<Self> {
        if dates.len() != prices.len() {
            return Err(PipelineError::DataFormat {
                line: 0,
                reason: format!("{} dates but {} prices", dates.len(), prices.len()),
            });
        }
        validate_rows(&dates, &prices.to_vec(), 1)?;
        Ok(PriceSeries { dates, prices })
    }

    /// Parse delimited text from `reader`.
    ///
    /// Line numbers in errors count the header as line 1.
    ///
    /// # Errors
    /// `DataFormat` for a missing column, an unreadable record, an
    /// unparsable date or price, non-increasing dates or no data rows.
    pub fn from_reader<R: Read>(reader: R, opts: &LoaderOptions) -> PipelineResult<Self> {
        opts.validate()?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(opts.delimiter as u8)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader
            .headers()
            .map_err(|e| PipelineError::DataFormat { line: 1, reason: e.to_string() })?
            .clone();
        let column = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| PipelineError::DataFormat {
                line: 1,
                reason: format!("missing column '{name}'"),
            })
        };
        let date_idx = column(&opts.date_column)?;
        let price_idx = column(&opts.price_column)?;

        let mut dates = Vec::new();
        let mut prices = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let line = idx + 2;
            let record =
                record.map_err(|e| PipelineError::DataFormat { line, reason: e.to_string() })?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let date = NaiveDate::parse_from_str(raw_date, &opts.date_format).map_err(|e| {
                PipelineError::DataFormat { line, reason: format!("date '{raw_date}': {e}") }
            })?;
            let raw_price = record.get(price_idx).unwrap_or_default();
            let price = raw_price.parse::<f64>().map_err(|_| PipelineError::DataFormat {
                line,
                reason: format!("price '{raw_price}' is not numeric"),
            })?;
            dates.push(date);
            prices.push(price);
        }
        validate_rows(&dates, &prices, 2)?;
        tracing::debug!(rows = dates.len(), "parsed price table");
        Ok(PriceSeries { dates, prices: Array1::from(prices) })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &Array1<f64> {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Owned sub-series over `range`; indices past the end are truncated.
    pub fn slice(&self, range: Range<usize>) -> PriceSeries {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        PriceSeries {
            dates: self.dates[start..end].to_vec(),
            prices: self.prices.slice(s![start..end]).to_owned(),
        }
    }
}

/// Read a price table from `path`.
///
/// # Errors
/// `Io` when the file cannot be opened, otherwise as
/// [`PriceSeries::from_reader`].
pub fn load_price_csv<P: AsRef<Path>>(path: P, opts: &LoaderOptions) -> PipelineResult<PriceSeries> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PipelineError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let series = PriceSeries::from_reader(file, opts)?;
    tracing::info!(path = %path.display(), rows = series.len(), "loaded price series");
    Ok(series)
}

/// Shared row checks; `first_line` is the line number of row 0.
fn validate_rows(dates: &[NaiveDate], prices: &[f64], first_line: usize) -> PipelineResult<()> {
    if prices.is_empty() {
        return Err(PipelineError::DataFormat {
            line: first_line,
            reason: "no data rows".to_string(),
        });
    }
    if let Some((idx, value)) = prices.iter().enumerate().find(|(_, p)| !p.is_finite()) {
        return Err(PipelineError::DataFormat {
            line: idx + first_line,
            reason: format!("price {value} is not finite"),
        });
    }
    if let Some(idx) = dates.windows(2).position(|w| w[1] <= w[0]) {
        return Err(PipelineError::DataFormat {
            line: idx + 1 + first_line,
            reason: format!("date {} does not follow {}", dates[idx + 1], dates[idx]),
        });
    }
    Ok(())
}
