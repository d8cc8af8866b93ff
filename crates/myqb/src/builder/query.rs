use super::clause::{Clause, QueryOptions, Template};
use super::kind::{StatementKind, is_read_only_sql};
use crate::error::{QbError, QbResult};
use crate::escape;
use crate::executor::NoExecutor;
use crate::macros::builder_trace;
use crate::value::{Fields, Params};

/// Construction options for [`QueryBuilder::from_options`].
#[derive(Debug, Clone)]
pub struct BuilderOptions<E = NoExecutor> {
    /// Table the statement targets (required, non-empty)
    pub table: String,
    /// Runs the rendered SQL for `exec()`
    pub executor: Option<E>,
}

impl BuilderOptions {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            executor: None,
        }
    }
}

impl<E> BuilderOptions<E> {
    pub fn executor<E2>(self, executor: E2) -> BuilderOptions<E2> {
        BuilderOptions {
            table: self.table,
            executor: Some(executor),
        }
    }
}

/// Fluent, single-table SQL statement builder (MySQL dialect).
///
/// One builder renders one statement. Exactly one statement-establishing call
/// (`select`, `count`, `insert`/`insert_many`, `update`/`update_with`, `delete`,
/// `sql`) fixes the kind; modifiers can be applied any number of times and in
/// any order before [`build`](QueryBuilder::build) or `exec`.
///
/// # Example
///
/// ```
/// use myqb::{QueryBuilder, fields};
///
/// let mut qb = QueryBuilder::new("users")?;
/// qb.select(["name", "age"])?
///     .and_where(fields! { "status" => "active" })
///     .order("created_at DESC")
///     .limit(10);
/// assert_eq!(
///     qb.build()?,
///     "SELECT `name`, `age` FROM `users` WHERE `status`='active' ORDER BY created_at DESC LIMIT 10"
/// );
/// # Ok::<(), myqb::QbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder<E = NoExecutor> {
    /// Raw table name
    pub(crate) table: String,
    /// Escaped table name
    pub(crate) table_sql: String,
    pub(crate) executor: Option<E>,
    /// `None` until a statement-establishing call
    pub(crate) kind: Option<StatementKind>,
    /// Escaped columns; empty means `*`
    pub(crate) projection: Vec<String>,
    /// WHERE fragments, joined with AND
    pub(crate) conditions: Vec<String>,
    /// Escaped COUNT alias
    pub(crate) count_alias: Option<String>,
    /// SET fragments, joined with ", "
    pub(crate) update_fragments: Vec<String>,
    /// Escaped INSERT columns (from the first row)
    pub(crate) insert_columns: Vec<String>,
    /// Pre-rendered `(v1, v2, ...)` tuples
    pub(crate) insert_rows: Vec<String>,
    /// Raw SQL for CUSTOM statements
    pub(crate) custom_template: Option<String>,
    /// Full `ORDER BY ...` clause
    pub(crate) order_clause: Option<String>,
    pub(crate) skip_rows: u64,
    /// 0 = unbounded
    pub(crate) limit_rows: u64,
    /// Recomputed on every skip/limit change
    pub(crate) limit_clause: String,
}

impl QueryBuilder {
    /// Create a builder for `table` without an executor.
    pub fn new(table: &str) -> QbResult<Self> {
        Self::bound(table, None)
    }
}

impl<E> QueryBuilder<E> {
    /// Create a builder whose `exec()` runs through `executor`.
    pub fn with_executor(table: &str, executor: E) -> QbResult<Self> {
        Self::bound(table, Some(executor))
    }

    pub fn from_options(options: BuilderOptions<E>) -> QbResult<Self> {
        Self::bound(&options.table, options.executor)
    }

    pub(crate) fn bound(table: &str, executor: Option<E>) -> QbResult<Self> {
        check_identifier(table, "table name")?;
        Ok(Self::for_table(table, executor))
    }

    /// Caller guarantees `table` passed [`check_identifier`].
    pub(crate) fn for_table(table: &str, executor: Option<E>) -> Self {
        Self {
            table: table.to_string(),
            table_sql: escape::escape_identifier(table),
            executor,
            kind: None,
            projection: Vec::new(),
            conditions: Vec::new(),
            count_alias: None,
            update_fragments: Vec::new(),
            insert_columns: Vec::new(),
            insert_rows: Vec::new(),
            custom_template: None,
            order_clause: None,
            skip_rows: 0,
            limit_rows: 0,
            limit_clause: String::new(),
        }
    }

    // ==================== Accessors ====================

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The established statement kind, if any.
    pub fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    pub fn has_executor(&self) -> bool {
        self.executor.is_some()
    }

    pub fn skip_rows(&self) -> u64 {
        self.skip_rows
    }

    pub fn limit_rows(&self) -> u64 {
        self.limit_rows
    }

    /// Whether the statement only reads data and may run on a replica.
    ///
    /// Custom statements are classified by their leading keyword; a builder
    /// without a kind is not read-only.
    pub fn is_read_only(&self) -> bool {
        match self.kind {
            Some(StatementKind::Custom) => self
                .custom_template
                .as_deref()
                .is_some_and(is_read_only_sql),
            Some(kind) => kind.is_read_only(),
            None => false,
        }
    }

    // ==================== Statement kind ====================

    fn ensure_unset(&self, requested: StatementKind) -> QbResult<()> {
        match self.kind {
            None => Ok(()),
            Some(current) => Err(QbError::invalid_state(format!(
                "query type is already {current}, cannot change it to {requested}"
            ))),
        }
    }

    fn establish(&mut self, kind: StatementKind) {
        builder_trace!(table = %self.table, kind = %kind, "statement kind established");
        self.kind = Some(kind);
    }

    /// Start a SELECT.
    ///
    /// An empty column list leaves the projection undecided: it can be supplied
    /// later through [`fields`](Self::fields) or [`options`](Self::options),
    /// and renders as `*` otherwise.
    pub fn select<I, S>(&mut self, columns: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_unset(StatementKind::Select)?;
        let projection = escape_columns(columns)?;
        self.establish(StatementKind::Select);
        if !projection.is_empty() {
            self.projection = projection;
        }
        Ok(self)
    }

    /// Start a SELECT with the projection left undecided (see [`select`](Self::select)).
    pub fn select_all(&mut self) -> QbResult<&mut Self> {
        self.select(std::iter::empty::<&str>())
    }

    /// Start a `SELECT COUNT(*) AS alias`.
    pub fn count(&mut self, alias: &str) -> QbResult<&mut Self> {
        self.ensure_unset(StatementKind::Count)?;
        check_identifier(alias, "count alias")?;
        self.establish(StatementKind::Count);
        self.count_alias = Some(escape::escape_identifier(alias));
        Ok(self)
    }

    /// Start a single-row INSERT.
    pub fn insert(&mut self, row: Fields) -> QbResult<&mut Self> {
        self.insert_many([row])
    }

    /// Start a multi-row INSERT.
    ///
    /// Columns come from the first row, in its key order. Every other row must
    /// have exactly the same column set (any order); a missing or extra column
    /// fails with a validation error before any state changes.
    pub fn insert_many<I>(&mut self, rows: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = Fields>,
    {
        self.ensure_unset(StatementKind::Insert)?;

        let mut rows = rows.into_iter();
        let first = rows
            .next()
            .ok_or_else(|| QbError::validation("insert data cannot be empty"))?;
        if first.is_empty() {
            return Err(QbError::validation("insert row must have at least one column"));
        }

        let columns: Vec<&str> = first.columns().collect();
        let mut rendered = vec![render_row(&first, &columns, 0)?];
        for (i, row) in rows.enumerate() {
            rendered.push(render_row(&row, &columns, i + 1)?);
        }

        self.insert_columns = columns.iter().map(|c| escape::escape_identifier(c)).collect();
        self.insert_rows = rendered;
        self.establish(StatementKind::Insert);
        Ok(self)
    }

    /// Start an UPDATE with no assignments yet; add them with [`set`](Self::set).
    pub fn update(&mut self) -> QbResult<&mut Self> {
        self.ensure_unset(StatementKind::Update)?;
        self.establish(StatementKind::Update);
        Ok(self)
    }

    /// Start an UPDATE with an initial payload.
    ///
    /// A template (`"hits = hits + ?"`, values) becomes one assignment
    /// fragment; a mapping becomes one `` `col`=value `` fragment per entry.
    pub fn update_with(&mut self, data: impl Into<Clause>) -> QbResult<&mut Self> {
        self.ensure_unset(StatementKind::Update)?;
        self.establish(StatementKind::Update);
        self.update_fragments.extend(data.into().fragments());
        Ok(self)
    }

    /// Add assignments to an UPDATE.
    pub fn set(&mut self, data: Fields) -> QbResult<&mut Self> {
        if self.kind != Some(StatementKind::Update) {
            return Err(QbError::invalid_state("query type must be UPDATE"));
        }
        self.update_fragments
            .extend(Clause::Fields(data).fragments());
        Ok(self)
    }

    /// Start a DELETE.
    pub fn delete(&mut self) -> QbResult<&mut Self> {
        self.ensure_unset(StatementKind::Delete)?;
        self.establish(StatementKind::Delete);
        Ok(self)
    }

    /// Start a custom statement from raw SQL.
    ///
    /// `:$fields`, `:$orderBy` and `:$limit` are resolved at build time from
    /// whatever projection/order/pagination the builder holds then, so
    /// modifiers applied after this call still take effect.
    ///
    /// # Safety
    ///
    /// The template is used as-is. The caller must ensure it is safe.
    pub fn sql(&mut self, template: impl Into<String>) -> QbResult<&mut Self> {
        self.ensure_unset(StatementKind::Custom)?;
        self.establish(StatementKind::Custom);
        self.custom_template = Some(template.into());
        Ok(self)
    }

    // ==================== Modifiers ====================

    /// Add WHERE conditions (joined with AND).
    ///
    /// Accepts a template (`"age > ?"` with values) or a [`Fields`] mapping
    /// (`` `a`=1 AND `b`=2 ``). Blank templates and empty mappings are no-ops.
    pub fn and_where(&mut self, condition: impl Into<Clause>) -> &mut Self {
        let fragments = condition.into().fragments();
        builder_trace!(table = %self.table, added = fragments.len(), "where");
        self.conditions.extend(fragments);
        self
    }

    /// Alias of [`and_where`](Self::and_where).
    pub fn and(&mut self, condition: impl Into<Clause>) -> &mut Self {
        self.and_where(condition)
    }

    /// Set the ORDER BY body; the last call wins. A blank template clears it.
    pub fn order(&mut self, order: impl Into<Template>) -> &mut Self {
        let order = order.into();
        self.order_clause = (!order.is_blank()).then(|| format!("ORDER BY {}", order.render()));
        self
    }

    /// Replace the projection; an empty list resets it to `*`.
    pub fn fields<I, S>(&mut self, columns: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.projection = escape_columns(columns)?;
        Ok(self)
    }

    /// Rows to skip.
    pub fn skip(&mut self, rows: u64) -> &mut Self {
        self.skip_rows = rows;
        self.refresh_limit();
        self
    }

    /// Maximum rows; 0 means unbounded.
    pub fn limit(&mut self, rows: u64) -> &mut Self {
        self.limit_rows = rows;
        self.refresh_limit();
        self
    }

    fn refresh_limit(&mut self) {
        self.limit_clause = escape::limit_clause(self.skip_rows, self.limit_rows);
    }

    /// Apply a batch of modifiers in the order fields, order, skip, limit.
    pub fn options(&mut self, options: QueryOptions) -> QbResult<&mut Self> {
        if let Some(fields) = options.fields {
            self.fields(fields)?;
        }
        if let Some(order) = options.order {
            self.order(order);
        }
        if let Some(skip) = options.skip {
            self.skip(skip);
        }
        if let Some(limit) = options.limit {
            self.limit(limit);
        }
        Ok(self)
    }

    /// Substitute placeholders in `template` (see [`escape::format`]).
    ///
    /// Handy for assembling the raw SQL passed to [`sql`](Self::sql).
    pub fn format(&self, template: &str, params: impl Into<Params>) -> String {
        escape::format(template, &params.into())
    }
}

fn escape_columns<I, S>(columns: I) -> QbResult<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    columns
        .into_iter()
        .map(|column| {
            let column = column.as_ref();
            check_identifier(column, "column name")?;
            Ok(escape::escape_identifier(column))
        })
        .collect()
}

/// Reject names that would quote into something other than what was meant:
/// blank names, surrounding whitespace, and empty dotted segments (`a..b`).
pub(crate) fn check_identifier(name: &str, what: &str) -> QbResult<()> {
    if name.trim().is_empty() {
        return Err(QbError::validation(format!("{what} cannot be empty")));
    }
    if name.trim() != name {
        return Err(QbError::validation(format!(
            "{what} '{name}' has leading or trailing whitespace"
        )));
    }
    if name.split('.').any(str::is_empty) {
        return Err(QbError::validation(format!(
            "{what} '{name}' has an empty segment"
        )));
    }
    Ok(())
}

/// Render `row` as `(v1, v2, ...)` in `columns` order.
fn render_row(row: &Fields, columns: &[&str], index: usize) -> QbResult<String> {
    let mut values = Vec::with_capacity(columns.len());
    for column in columns {
        let value = row.get(column).ok_or_else(|| {
            QbError::validation(format!("insert row {index} is missing column '{column}'"))
        })?;
        values.push(escape::escape_literal(value));
    }
    if row.len() != columns.len() {
        let extra = row
            .columns()
            .find(|c| !columns.contains(c))
            .unwrap_or_default();
        return Err(QbError::validation(format!(
            "insert row {index} has unexpected column '{extra}'"
        )));
    }
    Ok(format!("({})", values.join(", ")))
}
