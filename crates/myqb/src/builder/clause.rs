use crate::escape;
use crate::value::{Fields, Params};
use serde::{Deserialize, Serialize};

/// Raw SQL text plus the values for its placeholders.
///
/// ```
/// use myqb::{Template, fields, values};
///
/// let t = Template::from(("age > ? AND name = ?", values![18, "bob"]));
/// assert_eq!(t.render(), "age > 18 AND name = 'bob'");
///
/// let t = Template::from(("id = :id", fields! { "id" => 7 }));
/// assert_eq!(t.render(), "id = 7");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    text: String,
    params: Params,
}

impl Template {
    /// Template without values; rendered verbatim.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Params::None,
        }
    }

    pub fn with_params(text: impl Into<String>, params: impl Into<Params>) -> Self {
        Self {
            text: text.into(),
            params: params.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Substitute the placeholders.
    pub fn render(&self) -> String {
        escape::format(&self.text, &self.params)
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::new(text)
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::new(text)
    }
}

impl<S: Into<String>, P: Into<Params>> From<(S, P)> for Template {
    fn from((text, params): (S, P)) -> Self {
        Template::with_params(text, params)
    }
}

/// A condition or assignment payload: either a raw template or a column
/// mapping.
///
/// - In `WHERE`, a mapping renders as `` `a`=1 AND `b`=2 ``.
/// - In `SET`, a mapping renders as `` `a`=1, `b`=2 ``.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Template(Template),
    Fields(Fields),
}

impl Clause {
    /// Pre-rendered fragments: one per mapping entry, or one for a non-blank
    /// template. Blank templates and empty mappings produce nothing.
    pub(crate) fn fragments(&self) -> Vec<String> {
        match self {
            Clause::Template(t) if t.is_blank() => Vec::new(),
            Clause::Template(t) => vec![t.render()],
            Clause::Fields(fields) => fields
                .iter()
                .map(|(column, value)| escape::column_equals(column, value))
                .collect(),
        }
    }
}

impl From<Template> for Clause {
    fn from(t: Template) -> Self {
        Clause::Template(t)
    }
}

impl From<Fields> for Clause {
    fn from(fields: Fields) -> Self {
        Clause::Fields(fields)
    }
}

impl From<&str> for Clause {
    fn from(text: &str) -> Self {
        Clause::Template(text.into())
    }
}

impl From<String> for Clause {
    fn from(text: String) -> Self {
        Clause::Template(text.into())
    }
}

impl<S: Into<String>, P: Into<Params>> From<(S, P)> for Clause {
    fn from(pair: (S, P)) -> Self {
        Clause::Template(pair.into())
    }
}

/// Batch of modifiers applied by `QueryBuilder::options`.
///
/// Present options are applied in the order fields, order, skip, limit.
/// Deserializable so request-level paging options can be passed straight in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub order: Option<String>,
    pub fields: Option<Vec<String>>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}
