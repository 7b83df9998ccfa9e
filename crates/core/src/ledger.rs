use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dates;
use crate::money::Money;
use crate::transaction::Transaction;

/// The session ledger: every ingested batch merged, sorted newest-first
/// and deduplicated on the composite fingerprint. Grown functionally —
/// `merge` returns a fresh ledger, so callers thread one value through the
/// session instead of mutating shared state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

/// Bounded (description, amount) pair handed to the external summarization
/// collaborator. The collaborator is optional; nothing here depends on it.
#[derive(Debug, Serialize)]
pub struct SampleEntry<'a> {
    pub description: &'a str,
    pub amount: Money,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Merge a newly ingested batch into this ledger. All rows are
    /// concatenated, stable-sorted by date descending and deduplicated on
    /// the fingerprint; the first occurrence in sorted order survives, so
    /// the already-held row's classification wins over a re-import.
    /// Idempotent under re-merge of an identical batch.
    pub fn merge(&self, batch: Vec<Transaction>) -> Ledger {
        let mut all: Vec<Transaction> = self
            .transactions
            .iter()
            .cloned()
            .chain(batch)
            .collect();
        all.sort_by(|a, b| compare_display_dates(&a.date, &b.date));

        let mut seen = HashSet::with_capacity(all.len());
        let transactions = all
            .into_iter()
            .filter(|tx| seen.insert(tx.fingerprint()))
            .collect();
        Ledger { transactions }
    }

    /// First `limit` (description, amount) pairs, for the summarizer.
    pub fn summary_sample(&self, limit: usize) -> Vec<SampleEntry<'_>> {
        self.transactions
            .iter()
            .take(limit)
            .map(|tx| SampleEntry {
                description: &tx.description,
                amount: tx.amount,
            })
            .collect()
    }

    /// Per-category totals, largest magnitude first.
    pub fn category_totals(&self) -> Vec<(String, Money)> {
        let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
        for tx in &self.transactions {
            let entry = totals.entry(tx.category.as_str()).or_insert_with(Money::zero);
            *entry = *entry + tx.amount;
        }
        let mut ranked: Vec<(String, Money)> = totals
            .into_iter()
            .map(|(category, total)| (category.to_string(), total))
            .collect();
        ranked.sort_by(|a, b| b.1.abs().cmp(&a.1.abs()));
        ranked
    }
}

/// Newest first; rows whose date never normalized (verbatim fallback) sort
/// after every real date. Equal keys stay in insertion order, which is what
/// makes the existing ledger win ties against an incoming batch.
fn compare_display_dates(a: &str, b: &str) -> Ordering {
    match (dates::sort_key(a), dates::sort_key(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
