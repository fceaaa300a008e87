//! Row-level helpers for GDF parsing.

use crate::types::AttrValue;

/// Parse a `nodedef>` / `edgedef>` declaration into attribute names.
///
/// Each comma-separated field contributes its first whitespace token, cut at
/// the first `:` (so `name VARCHAR`, `name:string` and `name` all give `name`).
pub fn parse_header(def: &str) -> Vec<String> {
    def.split(',')
        .map(|field| {
            let first = field.split_whitespace().next().unwrap_or("");
            first.split(':').next().unwrap_or("").to_string()
        })
        .collect()
}

/// Split a data row on commas, honoring single-quoted values.
///
/// Whitespace right after a delimiter is skipped, so `1, 'a,b'` yields
/// `["1", "a,b"]`. A doubled quote inside a quoted value is a literal quote.
pub fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    current.push('\'');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut current));
                field_start = true;
                continue;
            }
            c if field_start && c.is_whitespace() => continue,
            '\'' if field_start => in_quotes = true,
            _ => current.push(c),
        }
        field_start = false;
    }
    fields.push(current);

    fields
}

/// Remove one pair of surrounding single quotes.
pub fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Coerce a raw value to its typed form.
///
/// Digits with optional `-` become an integer; if a `.` is present, a float.
/// Anything that fails to parse stays a string.
pub fn coerce_value(value: &str) -> AttrValue {
    let mut has_digit = false;
    let numeric_shape = value.chars().all(|c| match c {
        '.' | '-' => true,
        c if c.is_ascii_digit() => {
            has_digit = true;
            true
        }
        _ => false,
    });

    if numeric_shape && has_digit {
        if value.contains('.') {
            if let Ok(f) = value.parse::<f64>() {
                return AttrValue::Float(f);
            }
        } else if let Ok(i) = value.parse::<i64>() {
            return AttrValue::Integer(i);
        }
    }

    AttrValue::String(value.to_string())
}

/// Clean and coerce one field: trim, strip quotes, coerce.
pub fn clean_value(raw: &str) -> AttrValue {
    coerce_value(strip_quotes(raw.trim()))
}
