pub mod description;
pub mod statement;

pub use description::DescriptionClassifier;
pub use statement::{parse_dutch_number, LineError, StatementBatch, StatementError, StatementParser};
