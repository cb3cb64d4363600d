use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use banktab_core::{GroupOperator, Label, RuleField, RuleNode, RuleOperator};

#[derive(Error, Debug)]
pub enum LabelImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of labels")]
    NotAnArray,
    #[error("label at index {0} is missing a string `{1}` field")]
    MissingField(usize, &'static str),
    #[error("label at index {0} is not a valid label: {1}")]
    InvalidLabel(usize, serde_json::Error),
}

/// Read-only `{id, name}` view of the catalog, for hasLabel pickers.
/// Referential integrity of hasLabel targets is deliberately not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelOption {
    pub id: String,
    pub name: String,
}

/// Parse a JSON label export. Atomic: the value must be an array and every
/// element must carry a string `id` and `name`; the first violation rejects
/// the whole import and nothing is produced.
pub fn import_labels(json: &str) -> Result<Vec<Label>, LabelImportError> {
    let value: Value = serde_json::from_str(json)?;
    let items = value.as_array().ok_or(LabelImportError::NotAnArray)?;

    for (idx, item) in items.iter().enumerate() {
        for key in ["id", "name"] {
            if !item.get(key).is_some_and(Value::is_string) {
                return Err(LabelImportError::MissingField(idx, key));
            }
        }
    }

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item.clone()).map_err(|e| LabelImportError::InvalidLabel(idx, e))
        })
        .collect()
}

/// Serialize the label list with the exact wire field names of the Label
/// entity, so exports re-import unchanged.
pub fn export_labels(labels: &[Label]) -> Result<String, LabelImportError> {
    Ok(serde_json::to_string_pretty(labels)?)
}

pub fn label_options(labels: &[Label]) -> Vec<LabelOption> {
    labels
        .iter()
        .map(|l| LabelOption {
            id: l.id.clone(),
            name: l.name.clone(),
        })
        .collect()
}

pub fn new_label_id() -> String {
    format!("lbl_{}", Uuid::new_v4())
}

pub fn new_rule_id() -> String {
    format!("rule_{}", Uuid::new_v4())
}

/// Starter catalog shipped with the app.
pub fn default_labels() -> Vec<Label> {
    vec![
        Label {
            id: "lbl_netflix".to_string(),
            name: "Netflix".to_string(),
            color: "#E50914".to_string(),
            enabled: true,
            // (type is 'Incasso algemeen doorlopend') AND (description includes 'netflix')
            rules: RuleNode::Group {
                id: "g1".to_string(),
                operator: GroupOperator::And,
                children: vec![
                    RuleNode::Condition {
                        id: "r1".to_string(),
                        field: RuleField::Type,
                        operator: RuleOperator::Is,
                        value: "Incasso algemeen doorlopend".to_string(),
                    },
                    RuleNode::Condition {
                        id: "r2".to_string(),
                        field: RuleField::Description,
                        operator: RuleOperator::Includes,
                        value: "netflix".to_string(),
                    },
                ],
            },
        },
        Label {
            id: "lbl_groceries".to_string(),
            name: "Groceries".to_string(),
            color: "#10B981".to_string(),
            enabled: true,
            rules: RuleNode::Condition {
                id: "r3".to_string(),
                field: RuleField::Description,
                operator: RuleOperator::Includes,
                value: "supermarkt".to_string(),
            },
        },
        Label {
            id: "lbl_salary".to_string(),
            name: "Salary".to_string(),
            color: "#3B82F6".to_string(),
            enabled: false,
            rules: RuleNode::Condition {
                id: "r4".to_string(),
                field: RuleField::Description,
                operator: RuleOperator::Includes,
                value: "salary".to_string(),
            },
        },
    ]
}
