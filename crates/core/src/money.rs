use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// A signed dollar amount. Statement exports spell amounts a dozen ways
/// (`($198.52)`, `−$45.00`, `$1,234.56 CAD`); `parse_lossy` accepts them all
/// and falls back to zero rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn amount(self) -> Decimal {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// True when this amount sits within half a cent of any member of `set`.
    pub fn approx_in(self, set: &[Decimal]) -> bool {
        let tolerance = Decimal::new(5, 3);
        set.iter().any(|a| (self.0 - a).abs() <= tolerance)
    }

    /// Parse a raw statement amount. Never fails: accounting parentheses mark
    /// a negative, Unicode minus variants become ASCII `-`, currency symbols,
    /// codes, grouping commas and whitespace are stripped, and anything still
    /// unparseable collapses to zero. The parenthesis negation is applied
    /// after the numeric parse.
    pub fn parse_lossy(raw: &str) -> Money {
        let s = raw.trim();
        if s.is_empty() {
            return Money::zero();
        }

        let (paren_negative, s) = if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
            (true, s[1..s.len() - 1].trim())
        } else {
            (false, s)
        };

        let cleaned: String = s
            .chars()
            .map(|c| match c {
                '\u{2212}' | '\u{2013}' | '\u{2014}' => '-',
                other => other,
            })
            .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
            .collect();

        let mut value = Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO);
        if paren_negative {
            value = -value;
        }
        Money(value)
    }

    /// Display variant with thousands grouping: `-$1,234.56`.
    pub fn to_display_grouped(self) -> String {
        let plain = format!("{:.2}", self.0.round_dp(2).abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
        let mut grouped = String::new();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{sign}${grouped}.{frac_part}")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-${:.2}", rounded.abs())
        } else {
            write!(f, "${:.2}", rounded.abs())
        }
    }
}

impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn parse_plain() {
        assert_eq!(Money::parse_lossy("123.45").amount(), dec(12345));
    }

    #[test]
    fn parse_dollar_sign() {
        assert_eq!(Money::parse_lossy("$99.99").amount(), dec(9999));
    }

    #[test]
    fn parse_accounting_parens() {
        assert_eq!(Money::parse_lossy("($198.52)").amount(), dec(-19852));
    }

    #[test]
    fn parse_thousands_and_currency_code() {
        assert_eq!(Money::parse_lossy("$1,234.56 CAD").amount(), dec(123456));
    }

    #[test]
    fn parse_unicode_minus() {
        assert_eq!(Money::parse_lossy("\u{2212}$45.00").amount(), dec(-4500));
    }

    #[test]
    fn parse_empty_is_zero() {
        assert_eq!(Money::parse_lossy(""), Money::zero());
        assert_eq!(Money::parse_lossy("   "), Money::zero());
    }

    #[test]
    fn parse_garbage_is_zero() {
        assert_eq!(Money::parse_lossy("garbage"), Money::zero());
        assert_eq!(Money::parse_lossy("--"), Money::zero());
    }

    #[test]
    fn display_two_decimals_sign_outside_symbol() {
        assert_eq!(Money::parse_lossy("5").to_string(), "$5.00");
        assert_eq!(Money::parse_lossy("-0.5").to_string(), "-$0.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn display_grouped() {
        assert_eq!(
            Money::parse_lossy("-1234567.89").to_display_grouped(),
            "-$1,234,567.89"
        );
        assert_eq!(Money::parse_lossy("999").to_display_grouped(), "$999.00");
    }

    #[test]
    fn approx_in_tolerates_half_cent() {
        let set = [dec(19403)];
        assert!(Money::parse_lossy("194.03").approx_in(&set));
        assert!(Money::parse_lossy("194.034").approx_in(&set));
        assert!(!Money::parse_lossy("194.04").approx_in(&set));
    }

    #[test]
    fn negative_checks() {
        assert!(Money::parse_lossy("-1").is_negative());
        assert!(!Money::zero().is_negative());
        assert!(!Money::parse_lossy("1").is_negative());
    }
}
