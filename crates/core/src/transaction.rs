use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::label::LabelRef;

/// Transaction categories as they appear on ABN AMRO TAB exports. The TRTP
/// wire format carries free-form type strings, which ride in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Betaalpas,
    BetaalpasTerugboeking,
    GarminPay,
    Overboeking,
    PeriodiekeOverboeking,
    Ideal,
    Incasso,
    IncassoAlgemeenDoorlopend,
    Bankkosten,
    Other(String),
    #[default]
    Unknown,
}

impl TransactionType {
    /// Display string used on the wire and in rule matching.
    /// `Unknown` resolves to the empty string.
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Betaalpas => "Betaalpas",
            TransactionType::BetaalpasTerugboeking => "Betaalpas (terugboekingen)",
            TransactionType::GarminPay => "Garmin Pay",
            TransactionType::Overboeking => "Overboeking",
            TransactionType::PeriodiekeOverboeking => "Periodieke overboeking",
            TransactionType::Ideal => "iDEAL",
            TransactionType::Incasso => "Incasso",
            TransactionType::IncassoAlgemeenDoorlopend => "Incasso algemeen doorlopend",
            TransactionType::Bankkosten => "Bankkosten",
            TransactionType::Other(s) => s,
            TransactionType::Unknown => "",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TransactionType::Unknown)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Betaalpas" => TransactionType::Betaalpas,
            "Betaalpas (terugboekingen)" => TransactionType::BetaalpasTerugboeking,
            "Garmin Pay" => TransactionType::GarminPay,
            "Overboeking" => TransactionType::Overboeking,
            "Periodieke overboeking" => TransactionType::PeriodiekeOverboeking,
            "iDEAL" => TransactionType::Ideal,
            "Incasso" => TransactionType::Incasso,
            "Incasso algemeen doorlopend" => TransactionType::IncassoAlgemeenDoorlopend,
            "Bankkosten" => TransactionType::Bankkosten,
            "" => TransactionType::Unknown,
            _ => TransactionType::Other(s),
        }
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

/// Structured fields extracted from the free-text description. Which fields
/// are populated depends on the transaction type; everything is optional and
/// absent fields stay off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionExtra {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pas_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naam: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omschrijving: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kenmerk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incassant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machtiging: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csid: Option<String>,
}

impl TransactionExtra {
    pub fn is_empty(&self) -> bool {
        *self == TransactionExtra::default()
    }
}

/// One statement line. Built once by the parser; immutable afterwards except
/// for `labels`, which the applicator appends to in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub currency: String,
    /// Statement date, UTC calendar day.
    pub date: NaiveDate,
    pub balance_start: Decimal,
    pub balance_end: Decimal,
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(flatten)]
    pub extra: TransactionExtra,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelRef>,
}
