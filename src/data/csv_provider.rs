use super::{PriceHistory, PriceHistoryProvider};
use crate::error::EngineError;
use crate::Result;
use chrono::NaiveDate;
use std::path::PathBuf;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Reads `<dir>/<TICKER>.csv` files with a `date` and a `close` column
///
/// Column names are matched case-insensitively. Rows that fail to parse are
/// skipped with a warning, and rows are sorted by date before returning.
#[derive(Debug, Clone)]
pub struct CsvPriceProvider {
    dir: PathBuf,
}

impl CsvPriceProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }

    /// Parse price rows from any CSV reader
    pub fn parse<R: std::io::Read>(ticker: &str, reader: R) -> Result<PriceHistory> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let (date_idx, close_idx) = match (column("date"), column("close")) {
            (Some(date), Some(close)) => (date, close),
            (None, _) => return Err(missing_column(ticker, "date")),
            (_, None) => return Err(missing_column(ticker, "close")),
        };

        let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
        let mut skipped = 0usize;

        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let date = record.get(date_idx).and_then(parse_date);
            let close = record
                .get(close_idx)
                .and_then(|field| field.replace(['$', ','], "").parse::<f64>().ok());

            match (date, close) {
                (Some(date), Some(close)) => rows.push((date, close)),
                _ => {
                    skipped += 1;
                    tracing::warn!(
                        "{}: skipping unparsable row {}: {:?}",
                        ticker,
                        line + 2,
                        record
                    );
                }
            }
        }

        // Stable sort keeps file order for duplicate dates
        rows.sort_by_key(|(date, _)| *date);

        tracing::debug!("{}: loaded {} rows ({} skipped)", ticker, rows.len(), skipped);

        let (dates, closes) = rows.into_iter().unzip();
        Ok(PriceHistory {
            ticker: ticker.to_string(),
            dates,
            closes,
        })
    }
}

impl PriceHistoryProvider for CsvPriceProvider {
    fn history(&self, ticker: &str) -> Result<PriceHistory> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(EngineError::UnknownTicker(ticker.to_string()));
        }

        let file = std::fs::File::open(&path)?;
        Self::parse(ticker, std::io::BufReader::new(file))
    }

    fn tickers(&self) -> Result<Vec<String>> {
        let mut tickers = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                tickers.push(stem.to_string());
            }
        }
        tickers.sort();
        Ok(tickers)
    }
}

fn missing_column(ticker: &str, column: &str) -> EngineError {
    EngineError::MissingColumn {
        ticker: ticker.to_string(),
        column: column.to_string(),
    }
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    // Timestamps like "2024-01-02 00:00:00" keep only the date part
    let field = field.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(field, format).ok())
}
