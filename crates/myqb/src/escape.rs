//! MySQL escaping and template substitution.
//!
//! - Identifiers are wrapped in backticks with embedded backticks doubled.
//!   Dotted names are quoted per segment (`db.users` -> `` `db`.`users` ``), and a
//!   bare `*` segment is left unquoted (`u.*` -> `` `u`.* ``).
//! - Text literals are single-quoted and backslash-escaped.
//! - Templates use `?` / `??` (positional literal / identifier) or `:name`
//!   (named literal) placeholders.
//!
//! # Example
//! ```
//! use myqb::escape::{escape_identifier, format_positional};
//! use myqb::Value;
//!
//! assert_eq!(escape_identifier("db.users"), "`db`.`users`");
//! assert_eq!(
//!     format_positional("?? = ?", &[Value::from("name"), Value::from("o'hara")]),
//!     r"`name` = 'o\'hara'"
//! );
//! ```

use crate::value::{Fields, Params, Value};

/// Row count used for `LIMIT offset,count` when only an offset is wanted.
///
/// MySQL requires a row count whenever an offset is given; the largest
/// unsigned 64-bit value means "no upper bound".
pub const MAX_ROW_COUNT: u64 = u64::MAX;

/// Quote an identifier with backticks.
pub fn escape_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_identifier(name, &mut out);
    out
}

pub(crate) fn write_identifier(name: &str, out: &mut String) {
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if segment == "*" {
            out.push('*');
            continue;
        }
        out.push('`');
        for ch in segment.chars() {
            if ch == '`' {
                out.push_str("``");
            } else {
                out.push(ch);
            }
        }
        out.push('`');
    }
}

/// Render a value as a SQL literal.
pub fn escape_literal(value: &Value) -> String {
    let mut out = String::new();
    write_literal(value, &mut out);
    out
}

pub(crate) fn write_literal(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::UInt(u) => out.push_str(&u.to_string()),
        Value::Float(f) if f.is_finite() => out.push_str(&f.to_string()),
        Value::Float(_) => out.push_str("NULL"),
        #[cfg(feature = "rust_decimal")]
        Value::Decimal(d) => out.push_str(&d.to_string()),
        Value::Text(s) => write_text(s, out),
        Value::Bytes(bytes) => {
            out.push_str("X'");
            for b in bytes {
                out.push_str(&format!("{b:02x}"));
            }
            out.push('\'');
        }
        Value::Date(d) => write_text(&d.format("%Y-%m-%d").to_string(), out),
        Value::Time(t) => write_text(&t.format("%H:%M:%S").to_string(), out),
        Value::DateTime(dt) => write_text(&dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), out),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if let Value::Array(_) = item {
                    out.push('(');
                    write_literal(item, out);
                    out.push(')');
                } else {
                    write_literal(item, out);
                }
            }
        }
        Value::Raw(sql) => out.push_str(sql),
    }
}

fn write_text(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

/// Render a value for a `??` placeholder.
///
/// Text becomes an identifier, arrays of text become a comma-separated
/// identifier list; anything else falls back to a literal.
fn write_identifier_value(value: &Value, out: &mut String) {
    match value {
        Value::Text(name) => write_identifier(name, out),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_identifier_value(item, out);
            }
        }
        other => write_literal(other, out),
    }
}

/// Substitute `?` (literal) and `??` (identifier) placeholders left to right.
///
/// Placeholders beyond the supplied values are left untouched; surplus values
/// are ignored.
pub fn format_positional(template: &str, values: &[Value]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut values = values.iter();
    let mut rest = template;

    while let Some(pos) = rest.find('?') {
        out.push_str(&rest[..pos]);
        let is_ident = rest[pos + 1..].starts_with('?');
        let token_len = if is_ident { 2 } else { 1 };
        match values.next() {
            Some(value) if is_ident => write_identifier_value(value, &mut out),
            Some(value) => write_literal(value, &mut out),
            None => out.push_str(&rest[pos..pos + token_len]),
        }
        rest = &rest[pos + token_len..];
    }
    out.push_str(rest);
    out
}

/// Substitute `:name` placeholders from a mapping.
///
/// Names are `[A-Za-z0-9_]+`. Unknown names are left untouched, as is a `:`
/// not followed by a name character (so `:$fields` survives). Text inside
/// `'...'` or `"..."` literals is copied as-is, so `'12:30'` is never
/// treated as a placeholder.
pub fn format_named(template: &str, values: &Fields) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find([':', '\'', '"']) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if rest.as_bytes()[pos] != b':' {
            let quote = rest.as_bytes()[pos];
            let len = quoted_len(after, quote);
            out.push_str(&rest[pos..pos + 1 + len]);
            rest = &after[len..];
            continue;
        }

        let name_len = after
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        let name = &after[..name_len];
        match values.get(name).filter(|_| name_len > 0) {
            Some(value) => write_literal(value, &mut out),
            None => {
                out.push(':');
                out.push_str(name);
            }
        }
        rest = &after[name_len..];
    }
    out.push_str(rest);
    out
}

/// Length of a quoted literal body plus its closing quote; an unterminated
/// literal runs to the end.
fn quoted_len(body: &str, quote: u8) -> usize {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => {
                // A doubled quote is an escaped quote.
                if bytes.get(i + 1) == Some(&quote) {
                    i += 2;
                } else {
                    return i + 1;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Substitute placeholders according to the kind of `params`.
pub fn format(template: &str, params: &Params) -> String {
    match params {
        Params::None => template.to_string(),
        Params::Positional(values) => format_positional(template, values),
        Params::Named(fields) => format_named(template, fields),
    }
}

/// Render one `` `column`=literal `` pair.
pub fn column_equals(column: &str, value: &Value) -> String {
    let mut out = String::with_capacity(column.len() + 8);
    write_identifier(column, &mut out);
    out.push('=');
    write_literal(value, &mut out);
    out
}

/// Render a mapping as `` `a`=1, `b`=2 ``.
pub fn update_assignments(fields: &Fields) -> String {
    fields
        .iter()
        .map(|(column, value)| column_equals(column, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the MySQL `LIMIT` clause for an offset/row-count pair.
///
/// A `limit` of zero means "unbounded"; an offset without a bound uses
/// [`MAX_ROW_COUNT`].
pub fn limit_clause(skip: u64, limit: u64) -> String {
    match (skip, limit) {
        (0, 0) => String::new(),
        (0, limit) => format!("LIMIT {limit}"),
        (skip, 0) => format!("LIMIT {skip},{MAX_ROW_COUNT}"),
        (skip, limit) => format!("LIMIT {skip},{limit}"),
    }
}
