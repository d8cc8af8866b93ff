use super::kind::StatementKind;
use super::query::QueryBuilder;
use crate::error::{QbError, QbResult};
use crate::macros::builder_trace;

/// Builder placeholders understood in custom SQL.
const FIELDS_PLACEHOLDER: &str = "fields";
const ORDER_BY_PLACEHOLDER: &str = "orderBy";
const LIMIT_PLACEHOLDER: &str = "limit";

impl<E> QueryBuilder<E> {
    /// Render the statement.
    ///
    /// Segments are joined with a single space even when a segment is empty,
    /// then only the ends are trimmed, so a missing ORDER BY between WHERE and
    /// LIMIT leaves a double space. The output is deterministic for a given
    /// builder state.
    pub fn build(&self) -> QbResult<String> {
        let kind = self.kind.ok_or_else(|| {
            QbError::invalid_state(
                "query type is not set, call select/count/insert/update/delete/sql first",
            )
        })?;

        let sql = match kind {
            StatementKind::Select => self.render_select(),
            StatementKind::Count => self.render_count(),
            StatementKind::Insert => self.render_insert(),
            StatementKind::Update => self.render_update()?,
            StatementKind::Delete => self.render_delete(),
            StatementKind::Custom => self.render_custom(),
        };

        builder_trace!(table = %self.table, kind = %kind, sql = %sql, "built");
        Ok(sql)
    }

    fn projection_sql(&self) -> String {
        if self.projection.is_empty() {
            "*".to_string()
        } else {
            self.projection.join(", ")
        }
    }

    fn where_segment(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn order_segment(&self) -> &str {
        self.order_clause.as_deref().unwrap_or("")
    }

    fn render_select(&self) -> String {
        let head = format!("SELECT {} FROM {}", self.projection_sql(), self.table_sql);
        join_segments(&[
            &head,
            &self.where_segment(),
            self.order_segment(),
            &self.limit_clause,
        ])
    }

    fn render_count(&self) -> String {
        let alias = self.count_alias.as_deref().unwrap_or("`count`");
        let head = format!("SELECT COUNT(*) AS {} FROM {}", alias, self.table_sql);
        join_segments(&[&head, &self.where_segment(), &self.limit_clause])
    }

    fn render_insert(&self) -> String {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table_sql,
            self.insert_columns.join(", "),
            self.insert_rows.join(",\n")
        );
        join_segments(&[&sql])
    }

    fn render_update(&self) -> QbResult<String> {
        if self.update_fragments.is_empty() {
            return Err(QbError::validation("update data cannot be empty"));
        }
        let head = format!(
            "UPDATE {} SET {}",
            self.table_sql,
            self.update_fragments.join(", ")
        );
        Ok(join_segments(&[&head, &self.where_segment(), &self.limit_clause]))
    }

    fn render_delete(&self) -> String {
        let head = format!("DELETE FROM {}", self.table_sql);
        join_segments(&[&head, &self.where_segment(), &self.limit_clause])
    }

    fn render_custom(&self) -> String {
        let template = self.custom_template.as_deref().unwrap_or("");
        let sql = resolve_placeholders(template, |name| match name {
            FIELDS_PLACEHOLDER => Some(self.projection_sql()),
            ORDER_BY_PLACEHOLDER => Some(self.order_segment().to_string()),
            LIMIT_PLACEHOLDER => Some(self.limit_clause.clone()),
            _ => None,
        });
        sql.trim().to_string()
    }
}

fn join_segments(segments: &[&str]) -> String {
    segments.join(" ").trim().to_string()
}

/// Replace `:$name` tokens in one pass.
///
/// Unknown names are kept literally, and replacement text is never rescanned.
fn resolve_placeholders(template: &str, mut lookup: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(":$") {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let name_len = after
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        let name = &after[..name_len];
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str(":$");
                out.push_str(name);
            }
        }
        rest = &after[name_len..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_and_unknown() {
        let sql = resolve_placeholders("SELECT :$fields FROM t :$other :$limit", |name| {
            match name {
                "fields" => Some("`a`".into()),
                "limit" => Some("LIMIT 1".into()),
                _ => None,
            }
        });
        assert_eq!(sql, "SELECT `a` FROM t :$other LIMIT 1");
    }

    #[test]
    fn resolve_does_not_rescan_replacements() {
        let sql = resolve_placeholders(":$fields :$limit", |name| match name {
            "fields" => Some("`:$limit`".into()),
            "limit" => Some("LIMIT 5".into()),
            _ => None,
        });
        assert_eq!(sql, "`:$limit` LIMIT 5");
    }

    #[test]
    fn join_keeps_inner_empty_segments() {
        assert_eq!(join_segments(&["A", "", "B", ""]), "A  B");
    }
}
