//! Statement ingestion: raw delimited text in, categorized canonical
//! transactions out. Each call handles one export file as an independent
//! batch; merging batches into the session ledger is the caller's single
//! point of shared state.

pub mod adapter;
pub mod reader;
pub mod rules;

pub use adapter::{adapt, AdaptedRow};
pub use reader::{parse, RawRecord};
pub use rules::{Classification, Rule, Ruleset, RulesError};

use summa_core::{Origin, Transaction};

/// Run one raw text blob through parse, adapt and categorize. Suppressed
/// rows (origin filters or rule vetoes) are silently excluded; any input,
/// however malformed, yields a batch rather than an error.
pub fn ingest(text: &str, origin: Origin, account_label: &str, rules: &Ruleset) -> Vec<Transaction> {
    let records = reader::parse(text);
    let total = records.len();

    let mut batch = Vec::with_capacity(total);
    let mut suppressed = 0usize;
    for record in &records {
        let Some(row) = adapter::adapt(record, origin, account_label) else {
            suppressed += 1;
            continue;
        };
        match rules.categorize(&row.description, row.amount) {
            Classification::Suppressed => suppressed += 1,
            Classification::Classified {
                category,
                sub_category,
                description_override,
            } => batch.push(Transaction {
                date: row.date,
                description: description_override.unwrap_or(row.description),
                category,
                sub_category,
                amount: row.amount,
                account: row.account,
            }),
        }
    }

    tracing::debug!(?origin, total, kept = batch.len(), suppressed, "ingested batch");
    batch
}
