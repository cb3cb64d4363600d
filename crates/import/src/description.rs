use regex::Regex;

use banktab_core::{TransactionExtra, TransactionType};

const CARD_PATTERN: &str = r"^.+\s{2,}(.+?),PAS0*(\d+)\s+NR:([A-Za-z0-9]+)[, ]+\s*(\d{2}\.\d{2}\.\d{2}[/.]\d{2}[:.]\d{2})\s+(.+?)(?:,\s+Land:\s*([A-Z]{3})(.*))?$";
const TRANSFER_PATTERN: &str = r"IBAN:\s*([A-Z0-9]+)\s+BIC:\s*([A-Z0-9]+)\s+Naam:\s*(.+?)(?:\s+Omschrijving:\s*(.+?))?(?:\s+Kenmerk:\s*(.+?))?$";
// (?s): the Omschrijving field may contain embedded line breaks.
const INCASSO_PATTERN: &str = r"(?s)Incassant:\s*([A-Z0-9]+)\s*Naam:\s*(.+?)\s*Machtiging:\s*(.+)\s*Omschrijving:\s*(.+?)(?:\s*IBAN:\s*([A-Z0-9]+))?(?:\s+Kenmerk:\s*([^\s]+))?(?:\s+Voor:\s*(.+?))?$";
const TRTP_PATTERN: &str = r"/([A-Z]+)/([^/]*)";

const INCASSO_PREFIX: &str = "SEPA Incasso algemeen doorlopend";
const BANK_FEE_PREFIX: &str = "ABN AMRO Bank N.V.";

/// Dispatches a raw transaction description into one of the known sub-formats
/// and extracts its structured fields. Dispatch is a strict, ordered,
/// first-match-wins list over description prefixes; a prefix hit whose detail
/// pattern then fails keeps the type and leaves the extras empty.
pub struct DescriptionClassifier {
    card: Option<Regex>,
    transfer: Option<Regex>,
    incasso: Option<Regex>,
    trtp: Option<Regex>,
}

impl Default for DescriptionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptionClassifier {
    pub fn new() -> Self {
        DescriptionClassifier {
            card: compile(CARD_PATTERN),
            transfer: compile(TRANSFER_PATTERN),
            incasso: compile(INCASSO_PATTERN),
            trtp: compile(TRTP_PATTERN),
        }
    }

    pub fn classify(&self, description: &str) -> (TransactionType, TransactionExtra) {
        if let Some(kind) = card_kind(description) {
            return (kind, self.extract_card(description));
        }
        if let Some(kind) = transfer_kind(description) {
            return (kind, self.extract_transfer(description));
        }
        if let Some(rest) = description.strip_prefix(INCASSO_PREFIX) {
            return (
                TransactionType::IncassoAlgemeenDoorlopend,
                self.extract_incasso(rest.trim()),
            );
        }
        if description.starts_with(BANK_FEE_PREFIX) {
            return (TransactionType::Bankkosten, TransactionExtra::default());
        }
        if description.starts_with("/TRTP/") {
            return self.extract_trtp(description);
        }
        tracing::warn!(description, "unrecognized description format");
        (TransactionType::Unknown, TransactionExtra::default())
    }

    /// Card payments: merchant, masked pas number, NR code, local timestamp,
    /// city, optional country and trailing text.
    fn extract_card(&self, description: &str) -> TransactionExtra {
        let Some(caps) = self.card.as_ref().and_then(|re| re.captures(description)) else {
            tracing::warn!(description, "card description did not match detail pattern");
            return TransactionExtra::default();
        };
        TransactionExtra {
            merchant: caps.get(1).map(|m| m.as_str().trim().to_string()),
            pas_number: caps.get(2).map(|m| m.as_str().to_string()),
            nr: caps.get(3).map(|m| m.as_str().to_string()),
            date_time: caps.get(4).map(|m| m.as_str().to_string()),
            city: caps.get(5).map(|m| m.as_str().to_string()),
            country_code: caps.get(6).map(|m| m.as_str().to_string()),
            extra_info: caps
                .get(7)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            ..Default::default()
        }
    }

    /// SEPA transfers: labeled IBAN/BIC/Naam fields with optional
    /// Omschrijving and Kenmerk, anchored at the end of the string.
    fn extract_transfer(&self, description: &str) -> TransactionExtra {
        let Some(caps) = self.transfer.as_ref().and_then(|re| re.captures(description)) else {
            tracing::warn!(description, "transfer description did not match detail pattern");
            return TransactionExtra::default();
        };
        TransactionExtra {
            iban: caps.get(1).map(|m| m.as_str().to_string()),
            bic: caps.get(2).map(|m| m.as_str().to_string()),
            naam: caps.get(3).map(|m| m.as_str().to_string()),
            omschrijving: caps.get(4).map(|m| m.as_str().to_string()),
            kenmerk: caps.get(5).map(|m| m.as_str().to_string()),
            ..Default::default()
        }
    }

    /// Direct debits, matched against the description with the category
    /// prefix already stripped.
    fn extract_incasso(&self, stripped: &str) -> TransactionExtra {
        let Some(caps) = self.incasso.as_ref().and_then(|re| re.captures(stripped)) else {
            tracing::warn!(description = stripped, "incasso description did not match detail pattern");
            return TransactionExtra::default();
        };
        TransactionExtra {
            incassant: caps.get(1).map(|m| m.as_str().to_string()),
            naam: caps.get(2).map(|m| m.as_str().to_string()),
            machtiging: caps.get(3).map(|m| m.as_str().trim().to_string()),
            omschrijving: caps.get(4).map(|m| m.as_str().to_string()),
            iban: caps.get(5).map(|m| m.as_str().to_string()),
            kenmerk: caps.get(6).map(|m| m.as_str().to_string()),
            voor: caps.get(7).map(|m| m.as_str().to_string()),
            ..Default::default()
        }
    }

    /// Structured `/KEY/value` descriptions. The type is whatever the TRTP
    /// key carries, verbatim; known keys map onto the shared extras.
    fn extract_trtp(&self, description: &str) -> (TransactionType, TransactionExtra) {
        let Some(re) = self.trtp.as_ref() else {
            return (TransactionType::Unknown, TransactionExtra::default());
        };
        let mut kind = TransactionType::Unknown;
        let mut extra = TransactionExtra::default();
        for caps in re.captures_iter(description) {
            let value = caps[2].trim().to_string();
            match &caps[1] {
                "TRTP" => kind = TransactionType::from(value),
                "IBAN" => extra.iban = Some(value),
                "BIC" => extra.bic = Some(value),
                "NAME" => extra.naam = Some(value),
                "REMI" => extra.omschrijving = Some(value),
                "EREF" => extra.kenmerk = Some(value),
                "CSID" => extra.csid = Some(value),
                "MARF" => extra.machtiging = Some(value),
                _ => {}
            }
        }
        (kind, extra)
    }
}

fn card_kind(description: &str) -> Option<TransactionType> {
    if description.starts_with("GEA, Betaalpas") {
        Some(TransactionType::BetaalpasTerugboeking)
    } else if description.starts_with("BEA, Garmin Pay") {
        Some(TransactionType::GarminPay)
    } else if description.starts_with("BEA, Betaalpas") {
        Some(TransactionType::Betaalpas)
    } else {
        None
    }
}

fn transfer_kind(description: &str) -> Option<TransactionType> {
    if description.starts_with("SEPA Overboeking") {
        Some(TransactionType::Overboeking)
    } else if description.starts_with("SEPA iDEAL") {
        Some(TransactionType::Ideal)
    } else if description.starts_with("SEPA Periodieke overb.") {
        Some(TransactionType::PeriodiekeOverboeking)
    } else {
        None
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    // Patterns are fixed literals; a failure here surfaces as empty extras.
    Regex::new(pattern).ok()
}
