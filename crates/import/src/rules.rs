//! Ordered categorization rule table. A rule is a conjunction of
//! predicates over the lower-cased description and the signed amount;
//! rules are evaluated in document order and the first full match wins.
//!
//! Ordering is load-bearing: rules keyed on an exact counterparty plus an
//! amount fingerprint sit above the broad keyword rules that superset them
//! (the government-benefit deposits must land before the generic
//! "transfer" keyword, "uber eats" before "uber"). Reordering silently
//! reclassifies transactions.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use summa_core::Money;

/// Descriptions carrying this prefix are card-bill or bookkeeping rows,
/// not user spending; they are vetoed outright.
const NON_SPENDING_PREFIX: &str = "payment - thank you";

const FALLBACK_CATEGORY: &str = "Other";
const FALLBACK_SUBCATEGORY: &str = "Misc";

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Classified {
        category: String,
        sub_category: String,
        /// Optional display-name rewrite when a known counterparty alias
        /// was detected. Purely cosmetic, never a category side effect.
        description_override: Option<String>,
    },
    /// The caller must drop the row; a suppressed transaction is never
    /// stored with an empty category.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountSign {
    /// Negative amount: money leaving the account.
    Debit,
    /// Non-negative amount: money arriving.
    Credit,
}

#[derive(Debug, Clone)]
pub enum Predicate {
    /// Description starts with the (lower-cased) needle.
    Prefix(String),
    /// Description contains the needle.
    Contains(String),
    /// Description equals the needle exactly.
    Exact(String),
    /// Amount lies within half a cent of some member of the set.
    AmountNear(Vec<Decimal>),
    Sign(AmountSign),
}

impl Predicate {
    fn matches(&self, text: &str, amount: Money) -> bool {
        match self {
            Predicate::Prefix(p) => text.starts_with(p.as_str()),
            Predicate::Contains(p) => text.contains(p.as_str()),
            Predicate::Exact(p) => text == p.as_str(),
            Predicate::AmountNear(set) => amount.approx_in(set),
            Predicate::Sign(AmountSign::Debit) => amount.is_negative(),
            Predicate::Sign(AmountSign::Credit) => !amount.is_negative(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Classify {
        category: String,
        sub_category: String,
        rename: Option<String>,
    },
    Suppress,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub predicates: Vec<Predicate>,
    pub outcome: Outcome,
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to parse rules TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("rule '{0}' has no predicate")]
    EmptyRule(String),
    #[error("rule '{0}' names no category")]
    MissingCategory(String),
}

/// The ordered rule table. Pure: classification depends only on the
/// description text and signed amount passed in.
#[derive(Debug, Clone)]
pub struct Ruleset {
    rules: Vec<Rule>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Ruleset {
            rules: default_rules(),
        }
    }
}

impl Ruleset {
    pub fn new(rules: Vec<Rule>) -> Self {
        Ruleset { rules }
    }

    /// Load a user-supplied rule table. Document order is preserved as
    /// evaluation order.
    pub fn from_toml(toml_content: &str) -> Result<Self, RulesError> {
        let file: RuleFile = toml::from_str(toml_content)?;
        let rules = file
            .rules
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Ruleset { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify one transaction. Total except for the explicit
    /// `Suppressed` case: when no rule matches, the fixed fallback pair is
    /// returned.
    pub fn categorize(&self, description: &str, amount: Money) -> Classification {
        let text = description.trim().to_lowercase();
        for rule in &self.rules {
            if rule.predicates.iter().all(|p| p.matches(&text, amount)) {
                return match &rule.outcome {
                    Outcome::Suppress => Classification::Suppressed,
                    Outcome::Classify {
                        category,
                        sub_category,
                        rename,
                    } => Classification::Classified {
                        category: category.clone(),
                        sub_category: sub_category.clone(),
                        description_override: rename.clone(),
                    },
                };
            }
        }
        Classification::Classified {
            category: FALLBACK_CATEGORY.to_string(),
            sub_category: FALLBACK_SUBCATEGORY.to_string(),
            description_override: None,
        }
    }
}

fn rule(name: &str, predicates: Vec<Predicate>, category: &str, sub: &str) -> Rule {
    Rule {
        name: name.to_string(),
        predicates,
        outcome: Outcome::Classify {
            category: category.to_string(),
            sub_category: sub.to_string(),
            rename: None,
        },
    }
}

fn renaming_rule(
    name: &str,
    predicates: Vec<Predicate>,
    category: &str,
    sub: &str,
    rename: &str,
) -> Rule {
    Rule {
        name: name.to_string(),
        predicates,
        outcome: Outcome::Classify {
            category: category.to_string(),
            sub_category: sub.to_string(),
            rename: Some(rename.to_string()),
        },
    }
}

fn contains(needle: &str) -> Predicate {
    Predicate::Contains(needle.to_string())
}

fn prefix(needle: &str) -> Predicate {
    Predicate::Prefix(needle.to_string())
}

fn amounts(values: &[(i64, u32)]) -> Predicate {
    Predicate::AmountNear(values.iter().map(|&(n, s)| Decimal::new(n, s)).collect())
}

/// Built-in table, tuned to the observed bank exports.
fn default_rules() -> Vec<Rule> {
    vec![
        // Veto first: card-bill rows are not spending.
        Rule {
            name: "non-spending veto".to_string(),
            predicates: vec![prefix(NON_SPENDING_PREFIX)],
            outcome: Outcome::Suppress,
        },
        // Amount-fingerprinted counterparty rules. These must precede the
        // keyword rules below; "transfer" in particular would swallow the
        // benefit deposits.
        rule(
            "gst/hst credit",
            vec![contains("canada"), amounts(&[(19403, 2), (9701, 2)])],
            "Income",
            "Benefits",
        ),
        rule(
            "climate action incentive",
            vec![contains("canada"), amounts(&[(22400, 2), (11200, 2)])],
            "Income",
            "Benefits",
        ),
        rule(
            "rent e-transfer",
            vec![contains("e-transfer"), amounts(&[(-120000, 2)])],
            "Housing",
            "Rent",
        ),
        // Income.
        rule("payroll", vec![contains("payroll")], "Income", "Salary"),
        rule(
            "direct deposit",
            vec![contains("direct deposit"), Predicate::Sign(AmountSign::Credit)],
            "Income",
            "Salary",
        ),
        rule(
            "interest earned",
            vec![prefix("interest"), Predicate::Sign(AmountSign::Credit)],
            "Income",
            "Interest",
        ),
        rule(
            "refund",
            vec![contains("refund"), Predicate::Sign(AmountSign::Credit)],
            "Income",
            "Refunds",
        ),
        // Counterparty alias with a display rewrite.
        renaming_rule(
            "amazon marketplace alias",
            vec![contains("amzn mktp")],
            "Shopping",
            "Amazon",
            "Amazon",
        ),
        rule("amazon", vec![contains("amazon")], "Shopping", "Amazon"),
        // Groceries.
        rule("costco", vec![contains("costco")], "Groceries", "Warehouse"),
        rule("safeway", vec![contains("safeway")], "Groceries", "Supermarket"),
        rule(
            "superstore",
            vec![contains("superstore")],
            "Groceries",
            "Supermarket",
        ),
        rule("save-on", vec![contains("save-on")], "Groceries", "Supermarket"),
        rule("walmart", vec![contains("walmart")], "Groceries", "Supermarket"),
        // Dining. "uber eats" sits above the bare "uber" transport rule.
        rule("uber eats", vec![contains("uber eats")], "Dining", "Delivery"),
        rule("doordash", vec![contains("doordash")], "Dining", "Delivery"),
        rule(
            "skip the dishes",
            vec![contains("skipthedishes")],
            "Dining",
            "Delivery",
        ),
        rule("starbucks", vec![contains("starbucks")], "Dining", "Coffee"),
        rule("tim hortons", vec![contains("tim hortons")], "Dining", "Coffee"),
        rule("mcdonald", vec![contains("mcdonald")], "Dining", "Fast Food"),
        rule("restaurant", vec![contains("restaurant")], "Dining", "Restaurant"),
        // Transport.
        rule("uber", vec![contains("uber")], "Transport", "Rideshare"),
        rule("lyft", vec![contains("lyft")], "Transport", "Rideshare"),
        rule("petro-canada", vec![contains("petro-canada")], "Transport", "Fuel"),
        rule("shell", vec![contains("shell")], "Transport", "Fuel"),
        rule("esso", vec![contains("esso")], "Transport", "Fuel"),
        rule("translink", vec![contains("translink")], "Transport", "Transit"),
        // Subscriptions.
        rule("netflix", vec![contains("netflix")], "Subscriptions", "Streaming"),
        rule("spotify", vec![contains("spotify")], "Subscriptions", "Streaming"),
        rule("disney", vec![contains("disney plus")], "Subscriptions", "Streaming"),
        rule(
            "apple services",
            vec![contains("apple.com/bill")],
            "Subscriptions",
            "Apple",
        ),
        // Utilities & bills.
        rule("hydro", vec![contains("hydro")], "Utilities", "Electricity"),
        rule("fortisbc", vec![contains("fortisbc")], "Utilities", "Gas"),
        rule("telus", vec![contains("telus")], "Utilities", "Phone/Internet"),
        rule("rogers", vec![contains("rogers")], "Utilities", "Phone/Internet"),
        // Health.
        rule(
            "pharmacy",
            vec![contains("shoppers drug mart")],
            "Health",
            "Pharmacy",
        ),
        rule("dental", vec![contains("dental")], "Health", "Dental"),
        // Bank fees.
        rule(
            "monthly account fee",
            vec![contains("monthly fee"), Predicate::Sign(AmountSign::Debit)],
            "Fees",
            "Bank",
        ),
        rule(
            "overdraft fee",
            vec![contains("overdraft"), Predicate::Sign(AmountSign::Debit)],
            "Fees",
            "Bank",
        ),
        // Broad keyword rules last; each is a strict superset of one of the
        // fingerprinted rules above.
        rule("e-transfer", vec![contains("e-transfer")], "Transfers", "E-Transfer"),
        rule("transfer", vec![contains("transfer")], "Transfers", "Transfer"),
    ]
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
struct RuleSpec {
    name: String,
    prefix: Option<String>,
    contains: Option<String>,
    exact: Option<String>,
    amounts: Option<Vec<f64>>,
    sign: Option<AmountSign>,
    #[serde(default)]
    suppress: bool,
    category: Option<String>,
    subcategory: Option<String>,
    rename: Option<String>,
}

impl TryFrom<RuleSpec> for Rule {
    type Error = RulesError;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        let mut predicates = Vec::new();
        if let Some(p) = spec.prefix {
            predicates.push(Predicate::Prefix(p.to_lowercase()));
        }
        if let Some(p) = spec.contains {
            predicates.push(Predicate::Contains(p.to_lowercase()));
        }
        if let Some(p) = spec.exact {
            predicates.push(Predicate::Exact(p.to_lowercase()));
        }
        if let Some(values) = spec.amounts {
            let set = values
                .into_iter()
                .map(|v| Decimal::from_f64(v).unwrap_or_default().round_dp(2))
                .collect();
            predicates.push(Predicate::AmountNear(set));
        }
        if let Some(sign) = spec.sign {
            predicates.push(Predicate::Sign(sign));
        }
        if predicates.is_empty() {
            return Err(RulesError::EmptyRule(spec.name));
        }

        let outcome = if spec.suppress {
            Outcome::Suppress
        } else {
            let category = spec
                .category
                .ok_or_else(|| RulesError::MissingCategory(spec.name.clone()))?;
            Outcome::Classify {
                category,
                sub_category: spec.subcategory.unwrap_or_else(|| FALLBACK_SUBCATEGORY.to_string()),
                rename: spec.rename,
            }
        };

        Ok(Rule {
            name: spec.name,
            predicates,
            outcome,
        })
    }
}
