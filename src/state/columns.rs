use std::collections::BTreeSet;

use crate::state::data_model::Column;

/// Which columns are shown. Independent of filtering and sorting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnVisibility {
    visible: BTreeSet<String>,
}

impl ColumnVisibility {
    pub fn new(columns: &[Column], hidden: &[String]) -> Self {
        let visible = columns
            .iter()
            .filter(|column| column.is_reserved() || !hidden.contains(&column.id))
            .map(|column| column.id.clone())
            .collect();
        Self { visible }
    }

    pub fn is_visible(&self, column: &str) -> bool {
        self.visible.contains(column)
    }

    /// Reserved columns cannot be hidden.
    pub fn toggle(&mut self, column: &Column) -> bool {
        if column.is_reserved() {
            return false;
        }
        if !self.visible.remove(&column.id) {
            self.visible.insert(column.id.clone());
        }
        true
    }

    pub fn show_all(&mut self, columns: &[Column]) {
        self.visible = columns.iter().map(|column| column.id.clone()).collect();
    }

    pub fn hidden(&self, columns: &[Column]) -> Vec<String> {
        columns
            .iter()
            .filter(|column| !self.visible.contains(&column.id))
            .map(|column| column.id.clone())
            .collect()
    }

    pub fn visible_columns<'a>(&self, columns: &'a [Column]) -> Vec<&'a Column> {
        columns
            .iter()
            .filter(|column| self.visible.contains(&column.id))
            .collect()
    }
}
