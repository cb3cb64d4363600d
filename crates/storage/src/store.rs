use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use banktab_core::{Label, Transaction};

pub const TRANSACTIONS_KEY: &str = "uploaded_tabs_transactions";
pub const LABELS_KEY: &str = "labels";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON document store: one file per string key under a root directory.
/// Dates serialize as ISO-8601 strings and revive on load.
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Store { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    pub fn set_object<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.key_path(key), json)?;
        Ok(())
    }

    /// `None` when the key was never written (or was removed).
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Transaction list as persisted, stamped with the save moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTransactions {
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

pub fn save_transactions(store: &Store, transactions: Vec<Transaction>) -> Result<(), StorageError> {
    let saved = SavedTransactions {
        saved_at: Utc::now(),
        transactions,
    };
    store.set_object(TRANSACTIONS_KEY, &saved)
}

pub fn load_transactions(store: &Store) -> Result<Option<SavedTransactions>, StorageError> {
    store.get_object(TRANSACTIONS_KEY)
}

pub fn save_labels(store: &Store, labels: &[Label]) -> Result<(), StorageError> {
    store.set_object(LABELS_KEY, &labels)
}

pub fn load_labels(store: &Store) -> Result<Option<Vec<Label>>, StorageError> {
    store.get_object(LABELS_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use banktab_core::{TransactionExtra, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("data")).unwrap();
        (dir, store)
    }

    fn sample_tx() -> Transaction {
        Transaction {
            currency: "EUR".to_string(),
            date: NaiveDate::from_ymd_opt(2022, 9, 12).unwrap(),
            balance_start: Decimal::from_str("1000.00").unwrap(),
            balance_end: Decimal::from_str("950.00").unwrap(),
            amount: Decimal::from_str("-50.00").unwrap(),
            description: "SEPA iDEAL".to_string(),
            kind: TransactionType::Ideal,
            extra: TransactionExtra::default(),
            labels: Vec::new(),
        }
    }

    #[test]
    fn set_get_remove_round_trip() {
        let (_dir, store) = store();
        store.set_object("k", &vec![1, 2, 3]).unwrap();
        assert_eq!(store.get_object::<Vec<i32>>("k").unwrap(), Some(vec![1, 2, 3]));
        store.remove("k").unwrap();
        assert_eq!(store.get_object::<Vec<i32>>("k").unwrap(), None);
    }

    #[test]
    fn missing_key_is_none() {
        let (_dir, store) = store();
        assert!(store.get_object::<Vec<i32>>("nope").unwrap().is_none());
    }

    #[test]
    fn removing_missing_key_is_a_no_op() {
        let (_dir, store) = store();
        store.remove("never_written").unwrap();
    }

    #[test]
    fn transactions_round_trip_with_timestamp() {
        let (_dir, store) = store();
        let before = Utc::now();
        save_transactions(&store, vec![sample_tx()]).unwrap();
        let saved = load_transactions(&store).unwrap().unwrap();
        assert!(saved.saved_at >= before);
        assert_eq!(saved.transactions, vec![sample_tx()]);
    }

    #[test]
    fn dates_persist_as_iso_8601() {
        let (_dir, store) = store();
        save_transactions(&store, vec![sample_tx()]).unwrap();
        let raw = fs::read_to_string(store.key_path(TRANSACTIONS_KEY)).unwrap();
        assert!(raw.contains(r#""date": "2022-09-12""#));
    }

    #[test]
    fn labels_round_trip() {
        let (_dir, store) = store();
        assert!(load_labels(&store).unwrap().is_none());
        let labels = vec![Label {
            id: "lbl_1".to_string(),
            name: "One".to_string(),
            color: "#fff".to_string(),
            enabled: true,
            rules: banktab_core::RuleNode::Condition {
                id: "c1".to_string(),
                field: banktab_core::RuleField::Description,
                operator: banktab_core::RuleOperator::Includes,
                value: "x".to_string(),
            },
        }];
        save_labels(&store, &labels).unwrap();
        assert_eq!(load_labels(&store).unwrap(), Some(labels));
    }
}
