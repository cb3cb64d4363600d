use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use banktab_core::Transaction;

use crate::description::DescriptionClassifier;

// TAB export positional schema. Positions 0 (account number) and 5 must be
// present but are not consumed.
const CURRENCY_FIELD: usize = 1;
const DATE_FIELD: usize = 2;
const BALANCE_START_FIELD: usize = 3;
const BALANCE_END_FIELD: usize = 4;
const AMOUNT_FIELD: usize = 6;
const DESCRIPTION_FIELD: usize = 7;
const FIELD_COUNT: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    #[error("expected at least 8 tab-separated fields, got {0}")]
    TooFewFields(usize),
    #[error("invalid statement date (want YYYYMMDD): {0:?}")]
    InvalidDate(String),
}

/// A failed line, 1-based. The rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub error: StatementError,
}

/// Result of parsing one statement text block: transactions in input line
/// order plus the lines that failed.
#[derive(Debug, Default)]
pub struct StatementBatch {
    pub transactions: Vec<Transaction>,
    pub line_errors: Vec<LineError>,
}

/// Line-oriented parser for ABN AMRO TAB statement exports: one transaction
/// per non-blank line, fields split on TAB at fixed positions, description
/// classified into a typed sub-format.
pub struct StatementParser {
    classifier: DescriptionClassifier,
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementParser {
    pub fn new() -> Self {
        StatementParser {
            classifier: DescriptionClassifier::new(),
        }
    }

    /// Parse one combined text block. Blank lines are skipped; a malformed
    /// line fails on its own and is reported in `line_errors`.
    pub fn parse(&self, text: &str) -> StatementBatch {
        let mut batch = StatementBatch::default();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_line(line) {
                Ok(tx) => batch.transactions.push(tx),
                Err(error) => {
                    tracing::warn!(line = idx + 1, %error, "skipping statement line");
                    batch.line_errors.push(LineError { line: idx + 1, error });
                }
            }
        }
        batch
    }

    pub fn parse_line(&self, line: &str) -> Result<Transaction, StatementError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < FIELD_COUNT {
            return Err(StatementError::TooFewFields(fields.len()));
        }

        let description = fields[DESCRIPTION_FIELD].trim().to_string();
        let (kind, extra) = self.classifier.classify(&description);

        Ok(Transaction {
            currency: fields[CURRENCY_FIELD].to_string(),
            date: parse_statement_date(fields[DATE_FIELD])?,
            balance_start: parse_dutch_number(fields[BALANCE_START_FIELD]),
            balance_end: parse_dutch_number(fields[BALANCE_END_FIELD]),
            amount: parse_dutch_number(fields[AMOUNT_FIELD]),
            description,
            kind,
            extra,
            labels: Vec::new(),
        })
    }
}

/// Eight digits YYYYMMDD, interpreted as the UTC calendar day.
fn parse_statement_date(s: &str) -> Result<NaiveDate, StatementError> {
    let s = s.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StatementError::InvalidDate(s.to_string()));
    }
    let invalid = || StatementError::InvalidDate(s.to_string());
    let year: i32 = s[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = s[4..6].parse().map_err(|_| invalid())?;
    let day: u32 = s[6..8].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Parse a Dutch-formatted decimal: when a comma is present, '.' is a
/// thousands separator and ',' the decimal separator. Anything that still
/// fails to parse yields zero — legacy behavior the TAB pipeline depends on,
/// kept bit-for-bit.
pub fn parse_dutch_number(value: &str) -> Decimal {
    let value = value.trim();
    if value.is_empty() {
        return Decimal::ZERO;
    }
    let normalized = if value.contains(',') {
        value.replace('.', "").replace(',', ".")
    } else {
        value.to_string()
    };
    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}
