use crate::error::QbError;
use std::fmt;
use std::str::FromStr;

/// The shape of statement a builder renders.
///
/// A builder starts with no kind; the first statement-establishing call
/// (`select`, `count`, `insert`, `update`, `delete`, `sql`) fixes it for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `SELECT {fields} FROM ...`
    Select,
    /// `SELECT COUNT(*) AS {alias} FROM ...`
    Count,
    /// `INSERT INTO ... VALUES ...`
    Insert,
    /// `UPDATE ... SET ...`
    Update,
    /// `DELETE FROM ...`
    Delete,
    /// Caller-supplied SQL with `:$fields` / `:$orderBy` / `:$limit` placeholders
    Custom,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Count => "COUNT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Custom => "CUSTOM",
        }
    }

    /// Whether statements of this kind never write.
    ///
    /// `Custom` is conservatively `false`; use [`is_read_only_sql`] on the
    /// rendered text to classify it.
    pub fn is_read_only(&self) -> bool {
        matches!(self, StatementKind::Select | StatementKind::Count)
    }

    /// Detect the kind of a rendered statement from its leading keyword.
    ///
    /// Returns `None` for anything that is not a plain SELECT/INSERT/UPDATE/DELETE.
    /// `SELECT COUNT(*)` is reported as `Select`.
    pub fn from_sql(sql: &str) -> Option<Self> {
        let trimmed = strip_sql_prefix(sql);
        [
            ("SELECT", StatementKind::Select),
            ("INSERT", StatementKind::Insert),
            ("UPDATE", StatementKind::Update),
            ("DELETE", StatementKind::Delete),
        ]
        .into_iter()
        .find(|(kw, _)| starts_with_keyword(trimmed, kw))
        .map(|(_, kind)| kind)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = QbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SELECT" => Ok(StatementKind::Select),
            "COUNT" => Ok(StatementKind::Count),
            "INSERT" => Ok(StatementKind::Insert),
            "UPDATE" => Ok(StatementKind::Update),
            "DELETE" => Ok(StatementKind::Delete),
            "CUSTOM" | "SQL" => Ok(StatementKind::Custom),
            _ => Err(QbError::unsupported_kind(s)),
        }
    }
}

/// Whether a SQL string only reads data (safe to route to a replica).
///
/// Locking reads (`FOR UPDATE`, `FOR SHARE`, `LOCK IN SHARE MODE`) and
/// `SELECT ... INTO` must run on the primary, so they are not read-only.
pub fn is_read_only_sql(sql: &str) -> bool {
    let trimmed = strip_sql_prefix(sql);
    ["SELECT", "SHOW", "DESCRIBE", "DESC", "EXPLAIN"]
        .iter()
        .any(|kw| starts_with_keyword(trimmed, kw))
        && !has_write_clause(trimmed)
}

/// Scan the words of a statement for a locking or `INTO` clause.
///
/// Quoted text is not skipped, so a keyword inside a string literal also
/// counts; that only errs towards the primary.
fn has_write_clause(sql: &str) -> bool {
    let words: Vec<String> = sql
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_uppercase)
        .collect();

    words.iter().enumerate().any(|(i, word)| {
        let next = words.get(i + 1).map(String::as_str);
        match word.as_str() {
            "INTO" => true,
            "FOR" => matches!(next, Some("UPDATE" | "SHARE")),
            "LOCK" => next == Some("IN"),
            _ => false,
        }
    })
}

/// Skip leading whitespace, comments (`--`, `#`, `/* */`) and parentheses.
fn strip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if s.starts_with("--") || s.starts_with('#') {
            match s.find('\n') {
                Some(pos) => {
                    s = &s[pos + 1..];
                    continue;
                }
                None => return "",
            }
        }
        if s.starts_with("/*") {
            match s.find("*/") {
                Some(pos) => {
                    s = &s[pos + 2..];
                    continue;
                }
                None => return "",
            }
        }
        if let Some(rest) = s.strip_prefix('(') {
            s = rest;
            continue;
        }
        if s == before {
            break;
        }
    }
    s
}

/// Case-insensitive keyword match on a whole word (`DESC` does not match
/// `DESCRIPTION`).
fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    let Some(prefix) = s.get(..keyword.len()) else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case(keyword) {
        return false;
    }
    !s[keyword.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}
