//! Tolerant delimited-text reader with a repair pass for a known export
//! defect: some statement generators leave dates and thousands-grouped
//! amounts unquoted, so their embedded commas split one field into two.

/// One data row keyed by the header row's column names. Scoped to a single
/// ingested file; the adapter consumes it immediately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn get(&self, header: &str) -> Option<&str> {
        let wanted = header.trim();
        self.fields
            .iter()
            .find(|(h, _)| h.eq_ignore_ascii_case(wanted))
            .map(|(_, v)| v.as_str())
    }

    /// First value present under any of the given header names.
    pub fn first_of(&self, headers: &[&str]) -> Option<&str> {
        headers.iter().find_map(|h| self.get(h))
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        RawRecord {
            fields: pairs
                .iter()
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Tokenize raw statement text into header-keyed records. CR/LF tolerant;
/// the first non-empty line is the header. Rows with fewer tokens than
/// headers pad the trailing fields with empty strings; no row is ever
/// dropped for shape alone.
pub fn parse(text: &str) -> Vec<RawRecord> {
    let mut lines = text.lines();
    let headers = loop {
        match lines.next() {
            Some(line) if line.trim().is_empty() => continue,
            Some(line) => break split_line(line),
            None => return Vec::new(),
        }
    };
    if headers.iter().all(|h| h.is_empty()) {
        return Vec::new();
    }

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut tokens = split_line(line);
            repair(&headers, &mut tokens);
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), tokens.get(i).cloned().unwrap_or_default()))
                .collect();
            RawRecord { fields }
        })
        .collect()
}

/// Comma split with a quote scanner: a `"` toggles the in-quotes flag,
/// commas inside quotes do not split, and quote characters themselves are
/// stripped. Fields come out trimmed.
fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                tokens.push(current.trim().to_string());
                current.clear();
            }
            other => current.push(other),
        }
    }
    tokens.push(current.trim().to_string());
    tokens
}

/// Heal the unquoted-comma defect. Fires only for the one observed shape:
/// exactly 4 declared headers and exactly 5 raw tokens. First a bare
/// 4-digit token[1] is folded back into token[0] as the year half of a
/// `Mon D, YYYY` date; then, if the row still has 5 tokens, a split
/// thousands amount (currency symbol in token[2], or a currency code or
/// purely numeric token[3]) is folded back together. Every other malformed
/// shape passes through unrepaired.
fn repair(headers: &[String], tokens: &mut Vec<String>) {
    if headers.len() != 4 || tokens.len() != 5 {
        return;
    }

    if tokens[1].len() == 4 && tokens[1].chars().all(|c| c.is_ascii_digit()) {
        let year = tokens.remove(1);
        tokens[0] = format!("{}, {}", tokens[0], year);
    }

    if tokens.len() == 5 {
        let split_amount = tokens[2].chars().any(is_currency_symbol)
            || has_currency_code(&tokens[3])
            || is_purely_numeric(&tokens[3]);
        if split_amount {
            let tail = tokens.remove(3);
            tokens[2] = format!("{},{}", tokens[2], tail);
        }
    }
}

fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '€' | '£' | '¥')
}

fn has_currency_code(s: &str) -> bool {
    ["CAD", "USD", "EUR", "GBP"].iter().any(|code| s.contains(code))
}

fn is_purely_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}
