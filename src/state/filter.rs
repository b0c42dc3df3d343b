use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::state::data_model::{self, Column, Row, BLANKS};
use crate::state::sort;

/// Accepted values per column. A column without an entry is unrestricted,
/// so presence in the map is exactly "this column is filtered".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(column)
    }

    pub fn is_active(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.entries.iter()
    }

    pub fn set(&mut self, column: impl Into<String>, accepted: BTreeSet<String>) {
        self.entries.insert(column.into(), accepted);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Stores `selection` for `column`, keeping only values that are still
    /// candidates. Selecting every candidate removes the entry instead.
    pub fn commit(&mut self, column: &str, selection: &BTreeSet<String>, candidates: &[String]) {
        if candidates.iter().all(|value| selection.contains(value)) {
            self.entries.remove(column);
            return;
        }

        let accepted = candidates
            .iter()
            .filter(|value| selection.contains(*value))
            .cloned()
            .collect();
        self.entries.insert(column.to_string(), accepted);
    }

    /// Drops accepted values that no longer occur in `rows`. Entries emptied
    /// by the pruning, or covering every remaining value, are removed.
    pub fn prune_stale(&mut self, rows: &[Row], columns: &[Column]) -> usize {
        let mut pruned = 0;
        self.entries.retain(|column_id, accepted| {
            let Some(column) = columns.iter().find(|c| &c.id == column_id) else {
                pruned += accepted.len();
                return false;
            };
            let candidates = distinct_values(rows, column);
            let before = accepted.len();
            accepted.retain(|value| candidates.contains(value));
            pruned += before - accepted.len();
            if before > 0 && accepted.is_empty() {
                return false;
            }
            !candidates.iter().all(|value| accepted.contains(value))
        });
        pruned
    }

    /// True when the row passes every active column filter.
    pub fn accepts(&self, row: &Row, columns: &[Column]) -> bool {
        self.entries.iter().all(|(column_id, accepted)| {
            match columns.iter().find(|c| &c.id == column_id) {
                Some(column) => data_model::extract(row, column)
                    .iter()
                    .any(|value| accepted.contains(value)),
                // Unknown columns constrain nothing.
                None => true,
            }
        })
    }
}

/// Every distinct extracted value of `column` across `rows`, in ascending
/// collation order with the blank sentinel last.
pub fn distinct_values(rows: &[Row], column: &Column) -> Vec<String> {
    let mut seen = BTreeSet::new();
    for row in rows {
        seen.extend(data_model::extract(row, column));
    }

    let has_blank = seen.remove(BLANKS);
    let mut values: Vec<String> = seen.into_iter().collect();
    values.sort_by(|a, b| sort::compare_text(a, b));
    if has_blank {
        values.push(BLANKS.to_string());
    }
    values
}
