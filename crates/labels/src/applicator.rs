use banktab_core::{Label, LabelRef, Transaction};

use crate::rules::evaluate;

/// Run one full labeling pass: for every transaction, decide which enabled
/// labels match, in the order the labels are stored. A label's rule sees only
/// the labels confirmed earlier in this pass (plus refs already on the
/// transaction — re-running is additive; clear `labels` first for a fresh
/// pass). Each label id lands at most once per transaction.
///
/// Deterministic in (labels, transactions, starting refs); label inputs are
/// never mutated, transactions only gain refs, appended in evaluation order.
pub fn apply_labels(labels: &[Label], transactions: &mut [Transaction]) {
    for tx in transactions.iter_mut() {
        let mut applied: Vec<String> = tx.labels.iter().map(|l| l.id.clone()).collect();
        for label in labels {
            // Disabled labels are invisible: they neither match nor count as
            // hasLabel targets.
            if !label.enabled {
                continue;
            }
            if evaluate(&label.rules, tx, &applied) && !applied.contains(&label.id) {
                tx.labels.push(LabelRef {
                    id: label.id.clone(),
                    name: label.name.clone(),
                    color: label.color.clone(),
                });
                applied.push(label.id.clone());
            }
        }
    }
    tracing::debug!(
        labels = labels.len(),
        transactions = transactions.len(),
        "label pass complete"
    );
}
