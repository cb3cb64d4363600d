pub mod applicator;
pub mod catalog;
pub mod rules;

pub use applicator::apply_labels;
pub use catalog::{
    default_labels, export_labels, import_labels, label_options, new_label_id, new_rule_id,
    LabelImportError, LabelOption,
};
pub use rules::evaluate;
