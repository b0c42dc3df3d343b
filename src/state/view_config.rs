use serde::{Deserialize, Serialize};

use crate::state::data_model::{Column, Extractor};
use crate::state::geometry::PopupMetrics;
use crate::state::sort::{SortOrder, SortSpec};

/// Ordering used while no column sort is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultOrder {
    #[default]
    Load,
    Descending { column: String },
}

/// What to do with filter values that vanish after a row reload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleFilterPolicy {
    /// Keep them; they match nothing until the filter is re-applied.
    #[default]
    Keep,
    Drop,
}

/// Everything that distinguishes one table screen from another.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub title: String,
    pub id_field: String,
    pub columns: Vec<Column>,
    pub search_column: Option<String>,
    pub default_order: DefaultOrder,
    pub default_sort: Option<SortSpec>,
    pub popup: PopupMetrics,
    pub drag_threshold: f64,
    pub column_toggle: bool,
    pub hidden_columns: Vec<String>,
    pub stale_filters: StaleFilterPolicy,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            id_field: "id".to_string(),
            columns: Vec::new(),
            search_column: None,
            default_order: DefaultOrder::Load,
            default_sort: None,
            popup: PopupMetrics::default(),
            drag_threshold: 5.0,
            column_toggle: false,
            hidden_columns: Vec::new(),
            stale_filters: StaleFilterPolicy::Keep,
        }
    }
}

impl ViewConfig {
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// The document register screen, used when no configuration file is given.
    pub fn document_register() -> Self {
        Self {
            title: "Documents".to_string(),
            columns: vec![
                Column::index(),
                Column::new("title", "Title"),
                Column::new("owner", "Owner").with_extractor(Extractor::Field {
                    path: "owner.name".to_string(),
                }),
                Column::new("status", "Status"),
                Column::new("version", "Version"),
                Column::new("tags", "Tags").with_extractor(Extractor::Each {
                    path: "tags".to_string(),
                    key: None,
                }),
                Column::new("updated", "Updated").with_extractor(Extractor::Date {
                    path: "updated_at".to_string(),
                }),
                Column::action("Actions"),
            ],
            search_column: Some("title".to_string()),
            default_order: DefaultOrder::Descending {
                column: "updated".to_string(),
            },
            column_toggle: true,
            hidden_columns: vec!["tags".to_string()],
            ..Self::default()
        }
    }

    pub fn with_default_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.default_sort = Some(SortSpec::new(column, order));
        self
    }
}
