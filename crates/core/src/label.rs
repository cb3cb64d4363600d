use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction field a condition can inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleField {
    Description,
    Merchant,
    Naam,
    Type,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOperator {
    Includes,
    Is,
    Gt,
    Lt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOperator {
    And,
    Or,
}

impl fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOperator::And => write!(f, "and"),
            GroupOperator::Or => write!(f, "or"),
        }
    }
}

/// One node of a label's boolean rule tree. Closed union; evaluation sites
/// match exhaustively so a new node kind cannot be silently ignored.
///
/// Node `id`s give editors a stable handle on individual nodes; evaluation
/// never looks at them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleNode {
    /// Atomic test, e.g. "description includes netflix".
    Condition {
        id: String,
        field: RuleField,
        operator: RuleOperator,
        value: String,
    },
    /// True when the referenced label was already applied to the transaction
    /// earlier in the current pass. Referencing a label that runs later (or
    /// no longer exists) simply never matches.
    #[serde(rename_all = "camelCase")]
    HasLabel { id: String, label_id: String },
    /// AND/OR composition of child nodes. An empty group matches nothing.
    Group {
        id: String,
        operator: GroupOperator,
        children: Vec<RuleNode>,
    },
}

/// User-defined classification: a named, colored rule tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    /// Hex or any css color.
    pub color: String,
    pub enabled: bool,
    /// Root of the rule tree deciding whether this label applies.
    pub rules: RuleNode,
}

/// Reference recorded on a transaction once a label matched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRef {
    pub id: String,
    pub name: String,
    pub color: String,
}
