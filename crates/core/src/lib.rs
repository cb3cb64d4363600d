pub mod label;
pub mod transaction;

pub use label::{GroupOperator, Label, LabelRef, RuleField, RuleNode, RuleOperator};
pub use transaction::{Transaction, TransactionExtra, TransactionType};
