use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Which institution produced a statement export. Drives origin-specific
/// row filtering, sign correction and account labeling in the adapter.
/// Resolution from filenames is the caller's business; the core only ever
/// sees the resolved tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Rbc,
    Tangerine,
    Amex,
    PayPal,
    Other,
}

/// One normalized, categorized ledger row.
///
/// `date` is either a canonical `Mon D, YYYY` rendering or, when the raw
/// value resisted every normalization rule, the original string passed
/// through verbatim. `amount` carries the economic sign after any
/// origin-specific correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub category: String,
    pub sub_category: String,
    pub amount: Money,
    pub account: String,
}

impl Transaction {
    /// Composite duplicate key: date, description, rendered amount and
    /// account, case-folded and trimmed. Category is deliberately excluded
    /// so a re-import under changed rules collapses onto the already-held
    /// row instead of duplicating it.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.date.trim().to_lowercase(),
            self.description.trim().to_lowercase(),
            self.amount.to_string().to_lowercase(),
            self.account.trim().to_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: &str, desc: &str, amount: &str, account: &str) -> Transaction {
        Transaction {
            date: date.to_string(),
            description: desc.to_string(),
            category: "Other".to_string(),
            sub_category: "Misc".to_string(),
            amount: Money::parse_lossy(amount),
            account: account.to_string(),
        }
    }

    #[test]
    fn fingerprint_ignores_case_and_padding() {
        let a = tx("Jan 5, 2026", "COSTCO WHOLESALE", "-45.00", "Chequing");
        let b = tx("jan 5, 2026", "  costco wholesale ", "-45.00", " CHEQUING ");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_ignores_category() {
        let a = tx("Jan 5, 2026", "COSTCO", "-45.00", "Chequing");
        let mut b = a.clone();
        b.category = "Groceries".to_string();
        b.sub_category = "Warehouse".to_string();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_distinguishes_amount() {
        let a = tx("Jan 5, 2026", "COSTCO", "-45.00", "Chequing");
        let b = tx("Jan 5, 2026", "COSTCO", "-45.01", "Chequing");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
