use super::clause::Clause;
use super::query::{QueryBuilder, check_identifier};
use crate::error::QbResult;
use crate::executor::NoExecutor;
use crate::value::Fields;

/// Handle for one table that hands out fresh builders.
///
/// Builders are single-use; a `Table` is the reusable part. It carries the
/// table name and, optionally, an executor that every builder it creates
/// gets a clone of.
///
/// # Example
///
/// ```rust
/// use myqb::{Table, fields};
///
/// let users = Table::new("users")?;
///
/// let sql = users.select(["id", "name"])?.and_where(fields! { "id" => 1 }).build()?;
/// assert_eq!(sql, "SELECT `id`, `name` FROM `users` WHERE `id`=1");
///
/// let sql = users.count("total")?.build()?;
/// assert_eq!(sql, "SELECT COUNT(*) AS `total` FROM `users`");
/// # Ok::<(), myqb::QbError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Table<E = NoExecutor> {
    name: String,
    executor: Option<E>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> QbResult<Self> {
        let name = name.into();
        check_identifier(&name, "table name")?;
        Ok(Self {
            name,
            executor: None,
        })
    }
}

impl<E> Table<E> {
    /// Attach an executor; builders created afterwards can `exec()`.
    pub fn with_executor<E2>(self, executor: E2) -> Table<E2> {
        Table {
            name: self.name,
            executor: Some(executor),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<E: Clone> Table<E> {
    /// A fresh builder with no statement kind yet.
    pub fn query(&self) -> QueryBuilder<E> {
        QueryBuilder::for_table(&self.name, self.executor.clone())
    }

    pub fn select<I, S>(&self, columns: I) -> QbResult<QueryBuilder<E>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut qb = self.query();
        qb.select(columns)?;
        Ok(qb)
    }

    pub fn count(&self, alias: &str) -> QbResult<QueryBuilder<E>> {
        let mut qb = self.query();
        qb.count(alias)?;
        Ok(qb)
    }

    pub fn insert(&self, row: Fields) -> QbResult<QueryBuilder<E>> {
        let mut qb = self.query();
        qb.insert(row)?;
        Ok(qb)
    }

    pub fn insert_many<I>(&self, rows: I) -> QbResult<QueryBuilder<E>>
    where
        I: IntoIterator<Item = Fields>,
    {
        let mut qb = self.query();
        qb.insert_many(rows)?;
        Ok(qb)
    }

    pub fn update(&self) -> QbResult<QueryBuilder<E>> {
        let mut qb = self.query();
        qb.update()?;
        Ok(qb)
    }

    pub fn update_with(&self, data: impl Into<Clause>) -> QbResult<QueryBuilder<E>> {
        let mut qb = self.query();
        qb.update_with(data)?;
        Ok(qb)
    }

    pub fn delete(&self) -> QbResult<QueryBuilder<E>> {
        let mut qb = self.query();
        qb.delete()?;
        Ok(qb)
    }

    pub fn sql(&self, template: impl Into<String>) -> QbResult<QueryBuilder<E>> {
        let mut qb = self.query();
        qb.sql(template)?;
        Ok(qb)
    }
}
