//! Maps a raw header-keyed record plus its origin tag onto a normalized
//! row, applying origin-specific filtering, sign correction and account
//! labeling. Categorization happens afterwards in the pipeline.

use summa_core::{dates, Money, Origin};

use crate::reader::RawRecord;

/// A normalized row awaiting categorization.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptedRow {
    pub date: String,
    pub description: String,
    pub amount: Money,
    pub account: String,
}

const DESCRIPTION_HEADERS: &[&str] = &[
    "Description",
    "Transaction Description",
    "Description 1",
    "Name",
    "Payee",
    "Merchant",
    "Details",
    "Memo",
];

const AMOUNT_HEADERS: &[&str] = &[
    "Amount",
    "Transaction Amount",
    "Amount (CAD)",
    "Amount (USD)",
    "CAD$",
    "Value",
];

const DATE_HEADERS: &[&str] = &[
    "Date",
    "Transaction Date",
    "Posted Date",
    "Posting Date",
    "Date Posted",
];

const TYPE_HEADERS: &[&str] = &["Type", "Transaction Type"];

const ACCOUNT_HEADERS: &[&str] = &["Account", "Account Name", "Account Type", "Card"];

pub const PLACEHOLDER_DESCRIPTION: &str = "(no description)";
const PAYPAL_LABEL: &str = "PayPal";

/// RBC interleaves internal-transfer bookkeeping rows with real activity;
/// they net to zero across accounts and only pollute the ledger.
const RBC_TRANSFER_BOILERPLATE: &[&str] = &[
    "ONLINE TRANSFER TO DEPOSIT ACCOUNT",
    "ONLINE TRANSFER FROM DEPOSIT ACCOUNT",
    "ONLINE BANKING TRANSFER",
];

/// Adapt one raw record. `None` means the row is suppressed by an
/// origin-specific filter; every other input produces a row, however
/// malformed.
pub fn adapt(record: &RawRecord, origin: Origin, account_label: &str) -> Option<AdaptedRow> {
    let description = record
        .first_of(DESCRIPTION_HEADERS)
        .map(collapse_whitespace)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string());

    match origin {
        Origin::Rbc => {
            let upper = description.to_uppercase();
            if RBC_TRANSFER_BOILERPLATE.iter().any(|b| upper.contains(b)) {
                return None;
            }
        }
        // Amex "Payment" rows are the card bill being paid, not spending.
        Origin::Amex => {
            let is_payment = record
                .first_of(TYPE_HEADERS)
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("payment"));
            if is_payment {
                return None;
            }
        }
        _ => {}
    }

    let mut amount = record
        .first_of(AMOUNT_HEADERS)
        .map(Money::parse_lossy)
        .unwrap_or_else(Money::zero);

    // Amex exports carry unsigned charge amounts; force the debit sign.
    if origin == Origin::Amex {
        amount = -amount.abs();
    }

    let date = record
        .first_of(DATE_HEADERS)
        .map(dates::format_date)
        .unwrap_or_default();

    let paypal_labelled = origin == Origin::PayPal
        || record
            .first_of(ACCOUNT_HEADERS)
            .is_some_and(|a| a.to_lowercase().contains("paypal"));
    let account = if paypal_labelled {
        PAYPAL_LABEL.to_string()
    } else {
        account_label.to_string()
    };

    Some(AdaptedRow {
        date,
        description,
        amount,
        account,
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_description_variants_and_collapses_whitespace() {
        let record = RawRecord::from_pairs(&[
            ("Date", "2026-01-05"),
            ("Payee", "COSTCO   WHOLESALE  #55"),
            ("Amount", "-45.00"),
        ]);
        let row = adapt(&record, Origin::Other, "Chequing").unwrap();
        assert_eq!(row.description, "COSTCO WHOLESALE #55");
    }

    #[test]
    fn missing_description_gets_placeholder() {
        let record = RawRecord::from_pairs(&[("Date", "2026-01-05"), ("Amount", "-45.00")]);
        let row = adapt(&record, Origin::Other, "Chequing").unwrap();
        assert_eq!(row.description, PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn missing_amount_is_zero() {
        let record = RawRecord::from_pairs(&[("Date", "2026-01-05"), ("Description", "MYSTERY")]);
        let row = adapt(&record, Origin::Other, "Chequing").unwrap();
        assert!(row.amount.is_zero());
    }

    #[test]
    fn date_normalized_through_variant_headers() {
        let record = RawRecord::from_pairs(&[
            ("Posted Date", "February 1, 2026"),
            ("Description", "X"),
            ("Amount", "-1.00"),
        ]);
        let row = adapt(&record, Origin::Other, "Chequing").unwrap();
        assert_eq!(row.date, "Feb 1, 2026");
    }

    #[test]
    fn amex_sign_forced_negative() {
        let record = RawRecord::from_pairs(&[
            ("Date", "2026-01-05"),
            ("Description", "COSTCO"),
            ("Amount", "45.00"),
        ]);
        let row = adapt(&record, Origin::Amex, "Amex").unwrap();
        assert_eq!(row.amount.to_string(), "-$45.00");
    }

    #[test]
    fn amex_payment_rows_suppressed() {
        let record = RawRecord::from_pairs(&[
            ("Date", "2026-01-05"),
            ("Description", "PAYMENT RECEIVED"),
            ("Type", "Payment"),
            ("Amount", "500.00"),
        ]);
        assert!(adapt(&record, Origin::Amex, "Amex").is_none());
        // Same record under another origin survives.
        assert!(adapt(&record, Origin::Other, "Amex").is_some());
    }

    #[test]
    fn rbc_internal_transfer_suppressed() {
        let record = RawRecord::from_pairs(&[
            ("Date", "2026-01-05"),
            ("Description", "Online Transfer to Deposit Account 1234"),
            ("Amount", "-200.00"),
        ]);
        assert!(adapt(&record, Origin::Rbc, "Chequing").is_none());
        assert!(adapt(&record, Origin::Other, "Chequing").is_some());
    }

    #[test]
    fn paypal_origin_overrides_account_label() {
        let record = RawRecord::from_pairs(&[
            ("Date", "2026-01-05"),
            ("Description", "X"),
            ("Amount", "-1.00"),
        ]);
        let row = adapt(&record, Origin::PayPal, "whatever").unwrap();
        assert_eq!(row.account, "PayPal");
    }

    #[test]
    fn paypal_account_field_overrides_label_too() {
        let record = RawRecord::from_pairs(&[
            ("Date", "2026-01-05"),
            ("Description", "X"),
            ("Amount", "-1.00"),
            ("Account", "PayPal Balance"),
        ]);
        let row = adapt(&record, Origin::Other, "Chequing").unwrap();
        assert_eq!(row.account, "PayPal");
    }

    #[test]
    fn caller_label_used_otherwise() {
        let record = RawRecord::from_pairs(&[
            ("Date", "2026-01-05"),
            ("Description", "X"),
            ("Amount", "-1.00"),
        ]);
        let row = adapt(&record, Origin::Tangerine, "Tangerine Chequing").unwrap();
        assert_eq!(row.account, "Tangerine Chequing");
    }
}
