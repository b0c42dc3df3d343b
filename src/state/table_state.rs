use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::state::columns::ColumnVisibility;
use crate::state::data_model::{self, Column, Row, RowSet};
use crate::state::drag::DragScroll;
use crate::state::filter::{self, FilterState};
use crate::state::geometry::{self, ElementRef, GeometryProvider, PopupPosition, Rect, Viewport};
use crate::state::pipeline::ViewMemo;
use crate::state::popup::{DismissGuard, FilterPopup, ListenerHost};
use crate::state::sort::{SortOrder, SortSpec, SortState};
use crate::state::view_config::{StaleFilterPolicy, ViewConfig};

/// User preferences that outlive a row set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPrefs {
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_columns: Vec<String>,
}

/// Owns the filter, sort, popup and drag state of one table view and
/// exposes them through a small command interface.
pub struct TableController {
    config: ViewConfig,
    rows: RowSet,
    generation: u64,
    search_query: String,
    filters: FilterState,
    sort: SortState,
    popup: Option<FilterPopup>,
    visibility: Option<ColumnVisibility>,
    drag: DragScroll,
    listener_host: Option<Rc<dyn ListenerHost>>,
    memo: RefCell<ViewMemo>,
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("title", &self.config.title)
            .field("rows", &self.rows.len())
            .field("generation", &self.generation)
            .field("search_query", &self.search_query)
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("popup", &self.popup)
            .finish_non_exhaustive()
    }
}

impl TableController {
    pub fn new(config: ViewConfig) -> Self {
        let visibility = config
            .column_toggle
            .then(|| ColumnVisibility::new(&config.columns, &config.hidden_columns));
        let sort = SortState::new(config.default_sort.clone());
        let drag = DragScroll::new(config.drag_threshold);

        Self {
            config,
            rows: Vec::new(),
            generation: 0,
            search_query: String::new(),
            filters: FilterState::new(),
            sort,
            popup: None,
            visibility,
            drag,
            listener_host: None,
            memo: RefCell::new(ViewMemo::default()),
        }
    }

    pub fn from_rows(config: ViewConfig, rows: RowSet) -> Self {
        let mut controller = Self::new(config);
        controller.replace_rows(rows);
        controller
    }

    /// Popups opened from now on register their dismiss listeners here.
    pub fn set_listener_host(&mut self, host: Rc<dyn ListenerHost>) {
        self.listener_host = Some(host);
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_id(&self, index: usize) -> Option<String> {
        self.rows
            .get(index)
            .and_then(|row| data_model::row_id(row, &self.config.id_field))
    }

    /// Swaps in a freshly fetched row set. Filters and sort are kept.
    pub fn replace_rows(&mut self, rows: RowSet) {
        self.rows = rows;
        self.generation += 1;
        self.close_popup();
        self.apply_stale_policy();
        debug!(
            rows = self.rows.len(),
            generation = self.generation,
            "row set replaced"
        );
    }

    /// Swaps in the rows of a newly opened file. Saved preferences, when the
    /// file has them, replace the current ones; otherwise the current filters
    /// and sort carry over.
    pub fn load_rows(&mut self, rows: RowSet, prefs: Option<ViewPrefs>) {
        self.replace_rows(rows);
        if let Some(prefs) = prefs {
            self.restore_prefs(prefs);
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search(&mut self, query: String) {
        self.search_query = query.trim().to_string();
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn is_filter_active(&self, column: &str) -> bool {
        self.filters.is_active(column)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.spec()
    }

    pub fn toggle_sort(&mut self, column: &str, order: SortOrder) -> bool {
        if !self.config.column(column).is_some_and(Column::is_sortable) {
            return false;
        }
        self.sort.toggle(column, order);
        trace!(column, ?order, state = ?self.sort.spec(), "sort toggled");
        true
    }

    /// Ordered indices into [`Self::rows`] after search, filters and sort.
    pub fn visible_row_indices(&self) -> Vec<usize> {
        self.memo
            .borrow_mut()
            .get_or_compute(
                self.generation,
                &self.rows,
                &self.config,
                &self.search_query,
                &self.filters,
                &self.sort,
            )
            .to_vec()
    }

    pub fn distinct_values(&self, column: &str) -> Vec<String> {
        self.config
            .column(column)
            .map(|column| filter::distinct_values(&self.rows, column))
            .unwrap_or_default()
    }

    pub fn popup(&self) -> Option<&FilterPopup> {
        self.popup.as_ref()
    }

    pub fn popup_mut(&mut self) -> Option<&mut FilterPopup> {
        self.popup.as_mut()
    }

    /// Opens the value selector for `column` below `anchor`. Any popup
    /// already open is cancelled first.
    pub fn open_filter(&mut self, column: &str, anchor: Rect, viewport: Viewport) -> bool {
        let Some(column_def) = self.config.column(column).filter(|c| c.is_filterable()) else {
            return false;
        };

        let candidates = filter::distinct_values(&self.rows, column_def);
        let position = geometry::initial_position(anchor, viewport, &self.config.popup);
        self.close_popup();

        let listeners = self.listener_host.clone().map(DismissGuard::acquire);
        self.popup = Some(FilterPopup::open(
            column,
            anchor,
            position,
            candidates,
            self.filters.get(column),
            listeners,
        ));
        debug!(column, ?position, "filter popup opened");
        true
    }

    /// Like [`Self::open_filter`], measuring the header through `geometry`.
    /// Nothing opens while the header cannot be measured.
    pub fn open_filter_at(&mut self, column: &str, geometry: &impl GeometryProvider) -> bool {
        let Some(anchor) = geometry.bounding_rect(&ElementRef::Header(column.to_string())) else {
            trace!(column, "filter header not mounted, not opening");
            return false;
        };
        self.open_filter(column, anchor, geometry.viewport())
    }

    /// Commits the working selection and closes the popup.
    pub fn apply_filter(&mut self) -> bool {
        let Some(popup) = self.popup.take() else {
            return false;
        };

        self.filters
            .commit(popup.column(), popup.selection(), popup.candidates());
        debug!(
            column = popup.column(),
            active = self.filters.is_active(popup.column()),
            "filter applied"
        );
        true
    }

    pub fn cancel_filter(&mut self) -> bool {
        let closed = self.close_popup();
        if closed {
            debug!("filter popup cancelled");
        }
        closed
    }

    /// Primary-button presses outside the popup close it.
    pub fn pointer_down_outside_popup(&mut self) -> bool {
        self.cancel_filter()
    }

    /// Scrolls whose target is outside the popup close it.
    pub fn scroll_outside_popup(&mut self) -> bool {
        self.cancel_filter()
    }

    /// The position the correction pass would move the open popup to, if any.
    pub fn popup_correction(&self, geometry: &impl GeometryProvider) -> Option<PopupPosition> {
        let popup = self.popup.as_ref()?;
        let Some(measured) = geometry.bounding_rect(&ElementRef::Popup) else {
            trace!("popup not mounted, skipping relayout");
            return None;
        };
        geometry::correct_position(
            popup.position(),
            popup.anchor(),
            measured,
            geometry.viewport(),
            &self.config.popup,
        )
    }

    /// Post-layout correction pass. Skipped while the popup cannot be measured.
    pub fn relayout_popup(&mut self, geometry: &impl GeometryProvider) -> bool {
        let Some(position) = self.popup_correction(geometry) else {
            return false;
        };
        let Some(popup) = self.popup.as_mut() else {
            return false;
        };
        trace!(?position, "popup repositioned");
        popup.set_position(position);
        true
    }

    pub fn drag(&self) -> &DragScroll {
        &self.drag
    }

    pub fn drag_mut(&mut self) -> &mut DragScroll {
        &mut self.drag
    }

    pub fn column_toggle_enabled(&self) -> bool {
        self.visibility.is_some()
    }

    pub fn is_column_visible(&self, column: &str) -> bool {
        self.visibility
            .as_ref()
            .map_or(true, |visibility| visibility.is_visible(column))
    }

    pub fn toggle_column(&mut self, column: &str) -> bool {
        let Some(column) = self.config.column(column) else {
            return false;
        };
        match self.visibility.as_mut() {
            Some(visibility) => visibility.toggle(column),
            None => false,
        }
    }

    pub fn show_all_columns(&mut self) {
        if let Some(visibility) = self.visibility.as_mut() {
            visibility.show_all(&self.config.columns);
        }
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        match &self.visibility {
            Some(visibility) => visibility.visible_columns(&self.config.columns),
            None => self.config.columns.iter().collect(),
        }
    }

    pub fn prefs(&self) -> ViewPrefs {
        ViewPrefs {
            filters: self.filters.clone(),
            sort: self.sort.spec().cloned(),
            hidden_columns: self
                .visibility
                .as_ref()
                .map(|visibility| visibility.hidden(&self.config.columns))
                .unwrap_or_default(),
        }
    }

    /// Restores saved preferences, skipping columns this view cannot use.
    pub fn restore_prefs(&mut self, prefs: ViewPrefs) {
        let mut filters = FilterState::new();
        for (column, accepted) in prefs.filters.iter() {
            if self.config.column(column).is_some_and(Column::is_filterable) {
                filters.set(column.clone(), accepted.clone());
            }
        }
        self.filters = filters;
        self.apply_stale_policy();

        let sort = prefs.sort.filter(|spec| {
            self.config
                .column(&spec.column)
                .is_some_and(Column::is_sortable)
        });
        self.sort.set(sort);

        if self.visibility.is_some() {
            self.visibility = Some(ColumnVisibility::new(
                &self.config.columns,
                &prefs.hidden_columns,
            ));
        }
    }

    fn apply_stale_policy(&mut self) {
        if self.config.stale_filters != StaleFilterPolicy::Drop {
            return;
        }
        let pruned = self.filters.prune_stale(&self.rows, &self.config.columns);
        if pruned > 0 {
            debug!(pruned, "dropped stale filter values");
        }
    }

    fn close_popup(&mut self) -> bool {
        self.popup.take().is_some()
    }
}
