use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use banktab_core::{Label, Transaction};
use banktab_import::StatementParser;
use banktab_labels::{apply_labels, default_labels, export_labels, import_labels};
use banktab_storage as storage;
use banktab_storage::Store;

pub fn open_store(dir: Option<PathBuf>) -> Result<Store> {
    let dir = match dir {
        Some(dir) => dir,
        None => directories::ProjectDirs::from("nl", "banktab", "banktab")
            .context("could not determine a data directory; pass --data-dir")?
            .data_dir()
            .to_path_buf(),
    };
    Ok(Store::new(dir)?)
}

pub fn import(store: &Store, files: &[PathBuf]) -> Result<()> {
    // Reading and concatenating happens here; the parser only ever sees one
    // combined text block.
    let mut text = String::new();
    for file in files {
        let content =
            fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
        text.push_str(&content);
        if !content.ends_with('\n') {
            text.push('\n');
        }
    }

    let batch = StatementParser::new().parse(&text);
    for err in &batch.line_errors {
        eprintln!("warning: line {}: {}", err.line, err.error);
    }

    let labels = stored_labels(store)?;
    let mut transactions = batch.transactions;
    apply_labels(&labels, &mut transactions);

    println!(
        "Imported {} transactions ({} lines skipped)",
        transactions.len(),
        batch.line_errors.len()
    );
    print_label_tally(&transactions);

    storage::save_transactions(store, transactions)?;
    Ok(())
}

pub fn list(store: &Store) -> Result<()> {
    let Some(saved) = storage::load_transactions(store)? else {
        bail!("no stored transactions; run `banktab import` first");
    };
    println!(
        "{} transactions, saved {}",
        saved.transactions.len(),
        saved.saved_at.format("%Y-%m-%d %H:%M UTC")
    );
    for tx in &saved.transactions {
        let labels = tx
            .labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}  {:>10} {}  {:<28} [{}]",
            tx.date,
            tx.amount,
            tx.currency,
            truncate(tx.description.trim(), 28),
            labels
        );
    }
    Ok(())
}

pub fn relabel(store: &Store) -> Result<()> {
    let Some(saved) = storage::load_transactions(store)? else {
        bail!("no stored transactions; run `banktab import` first");
    };
    let labels = stored_labels(store)?;
    let mut transactions = saved.transactions;
    for tx in &mut transactions {
        tx.labels.clear();
    }
    apply_labels(&labels, &mut transactions);
    print_label_tally(&transactions);
    storage::save_transactions(store, transactions)?;
    Ok(())
}

pub fn labels_show(store: &Store) -> Result<()> {
    let labels = stored_labels(store)?;
    for label in &labels {
        let state = if label.enabled { "enabled" } else { "disabled" };
        println!("{}  {} ({}, {})", label.id, label.name, label.color, state);
    }
    Ok(())
}

pub fn labels_init(store: &Store) -> Result<()> {
    if storage::load_labels(store)?.is_some() {
        bail!("labels already exist; export them first if you want to start over");
    }
    let labels = default_labels();
    storage::save_labels(store, &labels)?;
    println!("Wrote {} default labels", labels.len());
    Ok(())
}

pub fn labels_export(store: &Store, file: &Path) -> Result<()> {
    let labels = stored_labels(store)?;
    fs::write(file, export_labels(&labels)?)
        .with_context(|| format!("writing {}", file.display()))?;
    println!("Exported {} labels to {}", labels.len(), file.display());
    Ok(())
}

pub fn labels_import(store: &Store, file: &Path) -> Result<()> {
    let json =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let labels = import_labels(&json).context("label import rejected")?;
    storage::save_labels(store, &labels)?;
    println!("Imported {} labels", labels.len());
    Ok(())
}

/// Stored labels, or the starter set when nothing was saved yet.
fn stored_labels(store: &Store) -> Result<Vec<Label>> {
    Ok(storage::load_labels(store)?.unwrap_or_else(default_labels))
}

fn print_label_tally(transactions: &[Transaction]) {
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for tx in transactions {
        for label in &tx.labels {
            *tally.entry(label.name.as_str()).or_default() += 1;
        }
    }
    for (name, count) in tally {
        println!("  {name}: {count}");
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
