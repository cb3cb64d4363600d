pub mod store;

pub use store::{
    load_labels, load_transactions, save_labels, save_transactions, SavedTransactions,
    StorageError, Store, LABELS_KEY, TRANSACTIONS_KEY,
};
