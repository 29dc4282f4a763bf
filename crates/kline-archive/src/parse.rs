//! Aggregated-trade line parsing.

use rust_decimal::Decimal;
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

use kline_types::{KlineError, Result, Trade};

/// Minimum number of comma-separated fields in a trade line.
///
/// `id, price, quantity, first_trade_id, last_trade_id, transact_time_ms,
/// is_buyer_maker`; any trailing fields are ignored.
pub const FIELD_COUNT: usize = 7;

/// Errors that can occur while parsing a single trade line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line has fewer fields than a trade needs.
    #[error("Expected at least 7 fields, found {0}")]
    MissingFields(usize),

    /// A field could not be parsed.
    #[error("Invalid {field} '{value}'")]
    InvalidField {
        /// Name of the field.
        field: &'static str,
        /// The offending text.
        value: String,
    },

    /// A price and volume whose product does not fit in a decimal.
    #[error("Notional of price '{price}' and volume '{volume}' overflows")]
    Overflow {
        /// The price text.
        price: String,
        /// The volume text.
        volume: String,
    },

    /// A price or volume below zero.
    #[error("Negative {field} '{value}'")]
    Negative {
        /// Name of the field.
        field: &'static str,
        /// The offending text.
        value: String,
    },
}

/// Parses one trade line.
///
/// Decimals may use plain or scientific notation. The side flag accepts
/// `true`/`false` in any case, `t`/`f` and `1`/`0`.
///
/// # Errors
///
/// Returns an error naming the first missing or malformed field.
pub fn parse_trade(line: &str) -> std::result::Result<Trade, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < FIELD_COUNT {
        return Err(ParseError::MissingFields(fields.len()));
    }

    let id = parse_int("id", fields[0])?;
    let price = parse_decimal("price", fields[1])?;
    let volume = parse_decimal("volume", fields[2])?;
    let timestamp_ms = parse_int("timestamp", fields[5])?;
    let is_sell = parse_bool("is_sell", fields[6])?;

    let trade = Trade::from_millis(id, price, volume, timestamp_ms, is_sell);
    if trade.notional().is_none() {
        return Err(ParseError::Overflow {
            price: fields[1].to_string(),
            volume: fields[2].to_string(),
        });
    }
    Ok(trade)
}

/// Returns true if `line` is a column header rather than a record.
///
/// A header is recognised by a first field that is not an integer id.
#[must_use]
pub fn is_header(line: &str) -> bool {
    let first = line.split(',').next().unwrap_or_default().trim();
    first.parse::<u64>().is_err()
}

fn parse_int(field: &'static str, value: &str) -> std::result::Result<u64, ParseError> {
    value.parse().map_err(|_| invalid(field, value))
}

fn parse_decimal(field: &'static str, value: &str) -> std::result::Result<Decimal, ParseError> {
    let decimal = Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid(field, value))?;
    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(ParseError::Negative {
            field,
            value: value.to_string(),
        });
    }
    Ok(decimal.normalize())
}

fn parse_bool(field: &'static str, value: &str) -> std::result::Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(invalid(field, value)),
    }
}

fn invalid(field: &'static str, value: &str) -> ParseError {
    ParseError::InvalidField {
        field,
        value: value.to_string(),
    }
}

/// Iterator over the trades of a line-oriented source.
///
/// The first line is skipped when it is a header; blank lines are ignored.
/// Errors carry the source name and 1-based line number.
#[derive(Debug)]
pub struct TradeLines<R> {
    lines: std::io::Lines<R>,
    source: String,
    line_no: usize,
}

impl<R: BufRead> TradeLines<R> {
    /// Wraps `reader`, naming it `source` in errors.
    pub fn new(reader: R, source: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            source: source.into(),
            line_no: 0,
        }
    }

    /// Returns the number of lines read so far.
    #[must_use]
    pub const fn line_no(&self) -> usize {
        self.line_no
    }

    /// Consumes the source and returns its last trade, if any.
    ///
    /// Only the final non-blank line is parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the last line is malformed.
    pub fn last_trade(mut self) -> Result<Option<Trade>> {
        let mut last: Option<(usize, String)> = None;
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;
            if !line.trim().is_empty() {
                last = Some((self.line_no, line));
            }
        }

        match last {
            None => Ok(None),
            Some((1, line)) if is_header(&line) => Ok(None),
            Some((line_no, line)) => parse_trade(&line)
                .map(Some)
                .map_err(|e| KlineError::parse(format!("{}:{line_no}", self.source), e)),
        }
    }
}

impl<R: BufRead> Iterator for TradeLines<R> {
    type Item = Result<Trade>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() || (self.line_no == 1 && is_header(&line)) {
                continue;
            }

            return Some(
                parse_trade(&line)
                    .map_err(|e| KlineError::parse(format!("{}:{}", self.source, self.line_no), e)),
            );
        }
    }
}
