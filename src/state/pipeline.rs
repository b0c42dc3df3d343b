use std::cmp::Ordering;

use crate::state::data_model::{self, Column, Row};
use crate::state::filter::FilterState;
use crate::state::sort::{self, SortOrder, SortState};
use crate::state::view_config::{DefaultOrder, ViewConfig};

/// Derives the ordered list of row indices to render.
///
/// Search, then column filters (AND across columns), then sort. Pure: the
/// same inputs always give the same output.
pub fn compute(
    rows: &[Row],
    config: &ViewConfig,
    search_query: &str,
    filters: &FilterState,
    sort_state: &SortState,
) -> Vec<usize> {
    let needle = search_query.trim().to_lowercase();
    let search_columns: Vec<&Column> = match config.search_column.as_deref() {
        Some(id) => config.column(id).into_iter().collect(),
        None => config.columns.iter().filter(|c| !c.is_reserved()).collect(),
    };

    let mut visible: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matches_search(row, &search_columns, &needle))
        .filter(|(_, row)| filters.accepts(row, &config.columns))
        .map(|(idx, _)| idx)
        .collect();

    let sort_key = match sort_state.spec() {
        Some(spec) => config
            .column(&spec.column)
            .filter(|column| column.is_sortable())
            .map(|column| (column, spec.order)),
        None => match &config.default_order {
            DefaultOrder::Load => None,
            DefaultOrder::Descending { column } => {
                config.column(column).map(|column| (column, SortOrder::Desc))
            }
        },
    };

    if let Some((column, order)) = sort_key {
        let keys: Vec<Option<String>> = rows.iter().map(|row| sort_text(row, column)).collect();
        visible.sort_by(|a, b| compare_keys(keys[*a].as_deref(), keys[*b].as_deref(), order));
    }

    visible
}

fn matches_search(row: &Row, columns: &[&Column], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    columns.iter().any(|column| {
        data_model::extract(row, column)
            .iter()
            .filter(|value| value.as_str() != data_model::BLANKS)
            .any(|value| value.to_lowercase().contains(needle))
    })
}

/// `None` for blank cells.
fn sort_text(row: &Row, column: &Column) -> Option<String> {
    let values = data_model::extract(row, column);
    (!data_model::is_blank(&values)).then(|| data_model::display_text(&values))
}

/// Blanks go last in either direction.
pub fn compare_keys(a: Option<&str>, b: Option<&str>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => order.apply(sort::compare_text(a, b)),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct MemoKey {
    generation: u64,
    search_query: String,
    filters: FilterState,
    sort_state: SortState,
}

/// Caches the last [`compute`] result for a row generation and query state.
#[derive(Clone, Debug, Default)]
pub struct ViewMemo {
    key: Option<MemoKey>,
    rows: Vec<usize>,
}

impl ViewMemo {
    pub fn get_or_compute(
        &mut self,
        generation: u64,
        rows: &[Row],
        config: &ViewConfig,
        search_query: &str,
        filters: &FilterState,
        sort_state: &SortState,
    ) -> &[usize] {
        let hit = self.key.as_ref().is_some_and(|key| {
            key.generation == generation
                && key.search_query == search_query
                && &key.filters == filters
                && &key.sort_state == sort_state
        });

        if !hit {
            self.rows = compute(rows, config, search_query, filters, sort_state);
            self.key = Some(MemoKey {
                generation,
                search_query: search_query.to_string(),
                filters: filters.clone(),
                sort_state: sort_state.clone(),
            });
        }
        &self.rows
    }
}
