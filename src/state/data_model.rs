use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type Row = BTreeMap<String, Value>;
pub type RowSet = Vec<Row>;

/// Placeholder for null, missing or whitespace-only cell content.
pub const BLANKS: &str = "(Blanks)";

pub const INDEX_COLUMN: &str = "#";
pub const ACTION_COLUMN: &str = "actions";

/// Formats a JSON value for display in a table cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Resolves a dotted path (`owner.name`) against a row.
pub fn lookup<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = row.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

pub fn row_id(row: &Row, id_field: &str) -> Option<String> {
    lookup(row, id_field)
        .map(display_value)
        .filter(|id| !id.trim().is_empty())
}

pub fn is_blank(values: &[String]) -> bool {
    values.len() == 1 && values[0] == BLANKS
}

/// Joins extracted values into the single string used for sorting and rendering.
pub fn display_text(values: &[String]) -> String {
    values.join(", ")
}

#[derive(Clone)]
pub struct CustomExtractor(Arc<dyn Fn(&Row) -> Vec<String> + Send + Sync>);

impl CustomExtractor {
    pub fn new(f: impl Fn(&Row) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }
}

impl fmt::Debug for CustomExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomExtractor(..)")
    }
}

impl PartialEq for CustomExtractor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extractor {
    /// The value at a dotted path. Arrays yield one value per element.
    Field { path: String },
    /// One value per element of an array field, optionally reading `key`
    /// from each element object.
    Each {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },
    /// The `YYYY-MM-DD` part of an ISO timestamp.
    Date { path: String },
    #[serde(skip)]
    Custom(CustomExtractor),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<Extractor>,
    #[serde(default = "default_true")]
    pub sortable: bool,
}

fn default_true() -> bool {
    true
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            extractor: None,
            sortable: true,
        }
    }

    pub fn index() -> Self {
        Self::new(INDEX_COLUMN, INDEX_COLUMN)
    }

    pub fn action(title: impl Into<String>) -> Self {
        Self::new(ACTION_COLUMN, title)
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn is_reserved(&self) -> bool {
        is_reserved_column(&self.id)
    }

    pub fn is_filterable(&self) -> bool {
        !self.is_reserved()
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable && !self.is_reserved()
    }
}

pub fn is_reserved_column(id: &str) -> bool {
    id == INDEX_COLUMN || id == ACTION_COLUMN
}

/// Normalized string values of `column` for `row`.
///
/// Never empty: missing, null and whitespace-only content all collapse to
/// a single [`BLANKS`] entry. Reserved columns always extract as blank.
pub fn extract(row: &Row, column: &Column) -> Vec<String> {
    if column.is_reserved() {
        return vec![BLANKS.to_string()];
    }

    let raw = match &column.extractor {
        None => field_values(row, &column.id),
        Some(Extractor::Field { path }) => field_values(row, path),
        Some(Extractor::Each { path, key }) => each_values(row, path, key.as_deref()),
        Some(Extractor::Date { path }) => lookup(row, path)
            .map(|value| vec![date_part(&display_value(value))])
            .unwrap_or_default(),
        Some(Extractor::Custom(f)) => (f.0)(row),
    };

    normalize(raw)
}

fn field_values(row: &Row, path: &str) -> Vec<String> {
    match lookup(row, path) {
        Some(Value::Array(items)) => items.iter().map(display_value).collect(),
        Some(value) => vec![display_value(value)],
        None => Vec::new(),
    }
}

fn each_values(row: &Row, path: &str, key: Option<&str>) -> Vec<String> {
    let Some(Value::Array(items)) = lookup(row, path) else {
        return field_values(row, path);
    };

    items
        .iter()
        .filter_map(|item| match key {
            Some(key) => item.get(key).map(display_value),
            None => Some(display_value(item)),
        })
        .collect()
}

fn date_part(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.split_once('T') {
        Some((date, _)) if date.len() == 10 => date.to_string(),
        _ => trimmed.to_string(),
    }
}

fn normalize(raw: Vec<String>) -> Vec<String> {
    let mut values: Vec<String> = Vec::with_capacity(raw.len());
    for value in raw {
        let value = value.trim();
        if value.is_empty() || values.iter().any(|v| v == value) {
            continue;
        }
        values.push(value.to_string());
    }

    if values.is_empty() {
        values.push(BLANKS.to_string());
    }
    values
}
