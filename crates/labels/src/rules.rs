use rust_decimal::Decimal;
use std::str::FromStr;

use banktab_core::{GroupOperator, RuleField, RuleNode, RuleOperator, Transaction};

/// Evaluate a rule tree against one transaction. `applied` holds the ids of
/// labels already confirmed for this transaction earlier in the current pass;
/// it is the only state `hasLabel` can see, so ordering decisions stay with
/// the caller. Total: absent fields, mismatched operators and unparsable
/// rule values all come out false.
pub fn evaluate(node: &RuleNode, tx: &Transaction, applied: &[String]) -> bool {
    match node {
        RuleNode::Condition {
            field,
            operator,
            value,
            ..
        } => evaluate_condition(*field, *operator, value, tx),
        RuleNode::HasLabel { label_id, .. } => applied.iter().any(|id| id == label_id),
        RuleNode::Group {
            operator, children, ..
        } => {
            // An empty group matches nothing, for AND as well as OR.
            if children.is_empty() {
                return false;
            }
            match operator {
                GroupOperator::And => children.iter().all(|c| evaluate(c, tx, applied)),
                GroupOperator::Or => children.iter().any(|c| evaluate(c, tx, applied)),
            }
        }
    }
}

fn evaluate_condition(
    field: RuleField,
    operator: RuleOperator,
    value: &str,
    tx: &Transaction,
) -> bool {
    let target: &str = match field {
        RuleField::Description => &tx.description,
        RuleField::Merchant => tx.extra.merchant.as_deref().unwrap_or(""),
        RuleField::Naam => tx.extra.naam.as_deref().unwrap_or(""),
        RuleField::Type => tx.kind.as_str(),
        RuleField::Amount => return evaluate_amount(operator, value, tx.amount),
    };

    let target = target.to_lowercase();
    let wanted = value.to_lowercase();
    match operator {
        RuleOperator::Includes => target.contains(&wanted),
        RuleOperator::Is => target == wanted,
        // Numeric comparisons only make sense on the amount field.
        RuleOperator::Gt | RuleOperator::Lt => false,
    }
}

fn evaluate_amount(operator: RuleOperator, value: &str, amount: Decimal) -> bool {
    let Ok(wanted) = Decimal::from_str(value.trim()) else {
        return false;
    };
    match operator {
        RuleOperator::Gt => amount > wanted,
        RuleOperator::Lt => amount < wanted,
        RuleOperator::Is => amount == wanted,
        // Substring tests have no meaning for numbers.
        RuleOperator::Includes => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::transaction;
    use banktab_core::TransactionType;

    fn condition(field: RuleField, operator: RuleOperator, value: &str) -> RuleNode {
        RuleNode::Condition {
            id: "c".to_string(),
            field,
            operator,
            value: value.to_string(),
        }
    }

    fn group(operator: GroupOperator, children: Vec<RuleNode>) -> RuleNode {
        RuleNode::Group {
            id: "g".to_string(),
            operator,
            children,
        }
    }

    #[test]
    fn includes_is_case_insensitive() {
        let tx = transaction("SEPA Incasso NETFLIX INTERNATIONAL", "-12.99");
        let node = condition(RuleField::Description, RuleOperator::Includes, "netflix");
        assert!(evaluate(&node, &tx, &[]));
    }

    #[test]
    fn is_requires_full_equality() {
        let tx = transaction("Salary", "2500.00");
        assert!(evaluate(
            &condition(RuleField::Description, RuleOperator::Is, "salary"),
            &tx,
            &[]
        ));
        assert!(!evaluate(
            &condition(RuleField::Description, RuleOperator::Is, "sal"),
            &tx,
            &[]
        ));
    }

    #[test]
    fn type_field_matches_display_string() {
        let mut tx = transaction("whatever", "1.00");
        tx.kind = TransactionType::IncassoAlgemeenDoorlopend;
        let node = condition(RuleField::Type, RuleOperator::Is, "incasso algemeen doorlopend");
        assert!(evaluate(&node, &tx, &[]));
    }

    #[test]
    fn missing_merchant_reads_as_empty() {
        let tx = transaction("x", "1.00");
        assert!(!evaluate(
            &condition(RuleField::Merchant, RuleOperator::Includes, "heijn"),
            &tx,
            &[]
        ));
        // includes "" is vacuously true against the empty string
        assert!(evaluate(
            &condition(RuleField::Merchant, RuleOperator::Is, ""),
            &tx,
            &[]
        ));
    }

    #[test]
    fn amount_comparisons() {
        let tx = transaction("x", "-50.00");
        assert!(evaluate(
            &condition(RuleField::Amount, RuleOperator::Lt, "0"),
            &tx,
            &[]
        ));
        assert!(evaluate(
            &condition(RuleField::Amount, RuleOperator::Gt, "-100"),
            &tx,
            &[]
        ));
        assert!(evaluate(
            &condition(RuleField::Amount, RuleOperator::Is, "-50"),
            &tx,
            &[]
        ));
        assert!(!evaluate(
            &condition(RuleField::Amount, RuleOperator::Is, "-50.01"),
            &tx,
            &[]
        ));
    }

    #[test]
    fn unparsable_amount_value_is_false_never_panics() {
        let tx = transaction("x", "10.00");
        for op in [RuleOperator::Is, RuleOperator::Gt, RuleOperator::Lt] {
            assert!(!evaluate(
                &condition(RuleField::Amount, op, "ten euro"),
                &tx,
                &[]
            ));
        }
    }

    #[test]
    fn mismatched_operator_field_pairs_are_false() {
        let tx = transaction("100", "100.00");
        // gt/lt on a non-amount field
        assert!(!evaluate(
            &condition(RuleField::Description, RuleOperator::Gt, "50"),
            &tx,
            &[]
        ));
        // includes on the amount field
        assert!(!evaluate(
            &condition(RuleField::Amount, RuleOperator::Includes, "100"),
            &tx,
            &[]
        ));
    }

    #[test]
    fn empty_group_is_false_for_both_operators() {
        let tx = transaction("anything", "1.00");
        for op in [GroupOperator::And, GroupOperator::Or] {
            assert!(!evaluate(&group(op, vec![]), &tx, &[]));
        }
    }

    #[test]
    fn and_or_semantics() {
        let tx = transaction("netflix payment", "-12.99");
        let hit = condition(RuleField::Description, RuleOperator::Includes, "netflix");
        let miss = condition(RuleField::Description, RuleOperator::Includes, "spotify");

        assert!(evaluate(
            &group(GroupOperator::And, vec![hit.clone(), hit.clone()]),
            &tx,
            &[]
        ));
        assert!(!evaluate(
            &group(GroupOperator::And, vec![hit.clone(), miss.clone()]),
            &tx,
            &[]
        ));
        assert!(evaluate(
            &group(GroupOperator::Or, vec![miss.clone(), hit.clone()]),
            &tx,
            &[]
        ));
        assert!(!evaluate(
            &group(GroupOperator::Or, vec![miss.clone(), miss]),
            &tx,
            &[]
        ));
    }

    #[test]
    fn nested_groups_compose() {
        // (description includes "albert" OR merchant includes "jumbo") AND amount < 0
        let tx = transaction("BEA Albert Heijn", "-23.50");
        let node = group(
            GroupOperator::And,
            vec![
                group(
                    GroupOperator::Or,
                    vec![
                        condition(RuleField::Description, RuleOperator::Includes, "albert"),
                        condition(RuleField::Merchant, RuleOperator::Includes, "jumbo"),
                    ],
                ),
                condition(RuleField::Amount, RuleOperator::Lt, "0"),
            ],
        );
        assert!(evaluate(&node, &tx, &[]));
    }

    #[test]
    fn has_label_mirrors_applied_membership() {
        let tx = transaction("x", "1.00");
        let node = RuleNode::HasLabel {
            id: "h".to_string(),
            label_id: "lbl_a".to_string(),
        };
        assert!(!evaluate(&node, &tx, &[]));
        assert!(evaluate(&node, &tx, &["lbl_a".to_string()]));
        assert!(!evaluate(&node, &tx, &["lbl_b".to_string()]));
    }

    #[test]
    fn evaluation_ignores_transaction_label_refs() {
        // Only the explicit `applied` argument feeds hasLabel, never the
        // refs already sitting on the transaction.
        let mut tx = transaction("x", "1.00");
        tx.labels.push(banktab_core::LabelRef {
            id: "lbl_a".to_string(),
            name: "A".to_string(),
            color: "#000".to_string(),
        });
        let node = RuleNode::HasLabel {
            id: "h".to_string(),
            label_id: "lbl_a".to_string(),
        };
        assert!(!evaluate(&node, &tx, &[]));
    }
}
