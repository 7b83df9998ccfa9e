//! Canonical CSV rendering of a ledger.

use crate::ledger::Ledger;

pub const HEADER: &str = "Date,Description,Category,SubCategory,Amount,Account/Card";

/// Render the ledger as delimited text: fixed header, `\n`-joined rows,
/// minimal quoting. Only values containing a literal comma are wrapped in
/// double quotes; embedded double quotes are not escaped, a known
/// limitation of the format.
pub fn to_csv(ledger: &Ledger) -> String {
    let mut out = String::from(HEADER);
    for tx in ledger.transactions() {
        let fields = [
            quote(&tx.date),
            quote(&tx.description),
            quote(&tx.category),
            quote(&tx.sub_category),
            quote(&tx.amount.to_string()),
            quote(&tx.account),
        ];
        out.push('\n');
        out.push_str(&fields.join(","));
    }
    out
}

fn quote(field: &str) -> String {
    if field.contains(',') {
        format!("\"{field}\"")
    } else {
        field.to_string()
    }
}
