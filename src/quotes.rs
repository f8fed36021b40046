//! Static quote files.
//!
//! A quote file is CSV with a `from,to,rate` header and one directly quoted rate per
//! row, meaning `1 from = rate to`. Lines starting with `#` are skipped. Every row
//! becomes a [`ConvertRate`] backed by its own [`LiveRate`], so the loaded book can
//! seed a converter and still be updated afterwards.

use crate::errors::{QuoteError, Result};
use crate::graph::{ConvertRate, CurrencyId, LiveRate};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of a quote file
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct QuoteRecord {
    pub from: CurrencyId,
    pub to: CurrencyId,
    pub rate: f64,
}

/// Edges loaded from a quote file, with the live cells behind them.
///
/// `live[i]` feeds `rates[i]`.
#[derive(Debug, Clone)]
pub struct QuoteBook {
    pub rates: Vec<ConvertRate>,
    pub live: Vec<LiveRate>,
}

impl QuoteBook {
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Largest currency id referenced, if any
    pub fn max_currency(&self) -> Option<CurrencyId> {
        self.rates.iter().map(|rate| rate.from.max(rate.to)).max()
    }
}

/// Read quotes from any CSV source.
///
/// # Errors
///
/// Returns an error if the CSV is malformed, a rate is negative or not finite,
/// or the source contains no quotes
pub fn load_quotes<R: Read>(reader: R) -> Result<QuoteBook> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut rates = Vec::new();
    let mut live = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());

        let quote: QuoteRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| QuoteError::InvalidQuote { line, reason: e.to_string() })?;

        if !quote.rate.is_finite() || quote.rate < 0.0 {
            return Err(QuoteError::InvalidQuote {
                line,
                reason: format!("rate must be finite and non-negative, got: {}", quote.rate),
            }
            .into());
        }

        tracing::trace!(line = line, from = quote.from, to = quote.to, rate = quote.rate, "Quote loaded");

        let cell = LiveRate::new(quote.rate);
        rates.push(ConvertRate::new(quote.from, quote.to, cell.source()));
        live.push(cell);
    }

    if rates.is_empty() {
        return Err(QuoteError::EmptyQuoteBook.into());
    }

    tracing::debug!(quote_count = rates.len(), "Quote book loaded");

    Ok(QuoteBook { rates, live })
}

/// Read quotes from a CSV file.
pub fn load_quotes_from_path<P: AsRef<Path>>(path: P) -> Result<QuoteBook> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "Loading quote file");

    let file = File::open(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to open quote file");
        e
    })?;
    load_quotes(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConverterError;
    use crate::graph::RateSource;
    use crate::path::{Converter, ConverterFactory, ConverterKind};
    use std::io::Write;

    const BOOK: &str = "\
from,to,rate
# majors
0, 1, 2.0
1,2,3
2,3,4.5
";

    #[test]
    fn test_load_quotes_from_reader() {
        let book = load_quotes(BOOK.as_bytes()).unwrap();
        assert_eq!(book.len(), 3);
        assert_eq!(book.live.len(), 3);
        assert_eq!(book.max_currency(), Some(3));
        assert_eq!((book.rates[0].from, book.rates[0].to), (0, 1));
        assert_eq!(book.rates[2].source.rate(), 4.5);
    }

    #[test]
    fn test_live_cells_feed_converter() {
        let book = load_quotes(BOOK.as_bytes()).unwrap();
        let mut converter = ConverterFactory::new(ConverterKind::Sparse)
            .with_capacity(4)
            .create()
            .unwrap();
        converter.init(&book.rates).unwrap();
        assert_eq!(converter.convert(1.0, 0, 2).unwrap(), 6.0);

        book.live[1].set(5.0);
        assert_eq!(converter.convert(1.0, 0, 2).unwrap(), 10.0);

        book.live[1].mark_unavailable();
        assert_eq!(converter.convert(1.0, 0, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_rows_report_line() {
        let err = load_quotes("from,to,rate\n0,1,2.0\n1,2,abc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ConverterError::Quote(QuoteError::InvalidQuote { line: 3, .. })));

        let err = load_quotes("from,to,rate\n0,1,-2.0\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("non-negative"));

        let err = load_quotes("from,to,rate\n0,1,inf\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("finite"));

        let err = load_quotes("from,to,rate\n-1,1,2.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ConverterError::Quote(QuoteError::InvalidQuote { .. })));
    }

    #[test]
    fn test_empty_book_is_an_error() {
        let err = load_quotes("from,to,rate\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ConverterError::Quote(QuoteError::EmptyQuoteBook)));
    }

    #[test]
    fn test_load_quotes_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BOOK.as_bytes()).unwrap();
        file.flush().unwrap();

        let book = load_quotes_from_path(file.path()).unwrap();
        assert_eq!(book.len(), 3);

        let missing = file.path().with_extension("missing");
        let err = load_quotes_from_path(&missing).unwrap_err();
        assert!(matches!(err, ConverterError::Io(_)));
    }
}
