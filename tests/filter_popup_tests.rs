use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde_json::{json, Value};

use autofilter::state::data_model::{Column, Row, BLANKS};
use autofilter::state::filter::{self, FilterState};
use autofilter::state::geometry::{Rect, Viewport};
use autofilter::state::popup::{DismissListener, ListenerHost};
use autofilter::state::table_state::TableController;
use autofilter::state::view_config::{StaleFilterPolicy, ViewConfig};

fn rows(values: Value) -> Vec<Row> {
    serde_json::from_value(values).unwrap()
}

fn sample_rows() -> Vec<Row> {
    rows(json!([
        { "id": 1, "title": "Beta", "date": "2024-03-01" },
        { "id": 2, "title": "Alpha", "date": "2024-01-01" },
        { "id": 3, "title": "", "date": "2024-02-01" },
    ]))
}

fn sample_config() -> ViewConfig {
    ViewConfig {
        columns: vec![
            Column::index(),
            Column::new("title", "Title"),
            Column::new("date", "Date"),
            Column::action("Actions"),
        ],
        ..ViewConfig::default()
    }
}

fn controller() -> TableController {
    TableController::from_rows(sample_config(), sample_rows())
}

fn anchor() -> Rect {
    Rect::new(100.0, 40.0, 120.0, 28.0)
}

fn viewport() -> Viewport {
    Viewport::new(1280.0, 800.0)
}

fn ids(state: &TableController) -> Vec<i64> {
    state
        .visible_row_indices()
        .iter()
        .map(|idx| state.rows()[*idx]["id"].as_i64().unwrap())
        .collect()
}

fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Default)]
struct RecordingHost {
    events: RefCell<Vec<(&'static str, DismissListener)>>,
}

impl RecordingHost {
    fn live(&self) -> i32 {
        self.events
            .borrow()
            .iter()
            .map(|(kind, _)| if *kind == "attach" { 1 } else { -1 })
            .sum()
    }

    fn attaches(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == "attach")
            .count()
    }
}

impl ListenerHost for RecordingHost {
    fn attach(&self, listener: DismissListener) {
        self.events.borrow_mut().push(("attach", listener));
    }

    fn detach(&self, listener: DismissListener) {
        self.events.borrow_mut().push(("detach", listener));
    }
}

#[test]
fn test_distinct_values_sorted_with_blanks_last() {
    let data = sample_rows();
    let values = filter::distinct_values(&data, &Column::new("title", "Title"));
    assert_eq!(values, vec!["Alpha", "Beta", BLANKS]);
}

#[test]
fn test_distinct_values_numeric_order() {
    let data = rows(json!([{ "v": "10" }, { "v": "9" }, { "v": "100" }, { "v": "9" }]));
    let values = filter::distinct_values(&data, &Column::new("v", "V"));
    assert_eq!(values, vec!["9", "10", "100"]);
}

#[test]
fn test_open_seeds_every_candidate_when_unfiltered() {
    let mut state = controller();
    assert!(state.open_filter("title", anchor(), viewport()));

    let popup = state.popup().unwrap();
    assert_eq!(popup.column(), "title");
    assert_eq!(popup.candidates(), ["Alpha", "Beta", BLANKS]);
    assert_eq!(popup.selection(), &set(&["Alpha", "Beta", BLANKS]));
    assert!(popup.selects_everything());
}

#[test]
fn test_open_rejects_reserved_and_unknown_columns() {
    let mut state = controller();
    assert!(!state.open_filter("#", anchor(), viewport()));
    assert!(!state.open_filter("actions", anchor(), viewport()));
    assert!(!state.open_filter("missing", anchor(), viewport()));
    assert!(state.popup().is_none());
}

#[test]
fn test_candidates_come_from_all_rows_not_filtered_subset() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value("Alpha");
    state.apply_filter();
    assert_eq!(ids(&state), vec![1, 3]);

    state.open_filter("title", anchor(), viewport());
    let popup = state.popup().unwrap();
    assert_eq!(popup.candidates(), ["Alpha", "Beta", BLANKS]);
    assert_eq!(popup.selection(), &set(&["Beta", BLANKS]));
}

#[test]
fn test_edits_do_not_touch_committed_filter_until_apply() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value(BLANKS);

    assert!(state.filters().is_empty());
    assert_eq!(ids(&state), vec![1, 2, 3]);

    assert!(state.apply_filter());
    assert!(state.popup().is_none());
    assert_eq!(state.filters().get("title"), Some(&set(&["Alpha", "Beta"])));
    assert_eq!(ids(&state), vec![1, 2]);
}

#[test]
fn test_cancel_discards_working_selection() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value("Alpha");

    assert!(state.cancel_filter());
    assert!(state.popup().is_none());
    assert!(state.filters().is_empty());
    assert!(!state.cancel_filter());
    assert!(!state.apply_filter());
}

#[test]
fn test_outside_pointer_and_scroll_close_without_commit() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value("Alpha");
    assert!(state.pointer_down_outside_popup());
    assert!(state.filters().is_empty());

    state.open_filter("date", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value("2024-01-01");
    assert!(state.scroll_outside_popup());
    assert!(state.popup().is_none());
    assert!(state.filters().is_empty());
}

#[test]
fn test_apply_with_everything_selected_removes_entry() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value("Alpha");
    state.apply_filter();
    assert!(state.is_filter_active("title"));

    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value("Alpha");
    state.apply_filter();

    assert!(!state.is_filter_active("title"));
    assert_eq!(state.filters().get("title"), None);
    assert_eq!(ids(&state), vec![1, 2, 3]);
}

#[test]
fn test_reapplying_remaining_values_after_reload_canonicalizes() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value(BLANKS);
    state.apply_filter();
    assert_eq!(state.filters().get("title"), Some(&set(&["Alpha", "Beta"])));
    assert_eq!(ids(&state), vec![1, 2]);

    // The blank row goes away with the next fetch.
    let remaining: Vec<Row> = sample_rows().into_iter().take(2).collect();
    state.replace_rows(remaining);

    state.open_filter("title", anchor(), viewport());
    assert!(state.popup().unwrap().selects_everything());
    state.apply_filter();
    assert_eq!(state.filters().get("title"), None);
}

#[test]
fn test_popup_search_narrows_display_not_selection() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    let popup = state.popup_mut().unwrap();

    popup.set_search("ALP");
    assert_eq!(popup.visible_candidates(), vec!["Alpha"]);
    assert_eq!(popup.selection().len(), 3);

    popup.set_search("");
    assert_eq!(popup.visible_candidates().len(), 3);
}

#[test]
fn test_select_all_visible_toggles_only_visible_candidates() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    let popup = state.popup_mut().unwrap();

    popup.set_search("alp");
    assert!(popup.all_visible_selected());
    popup.toggle_all_visible();
    assert_eq!(popup.selection(), &set(&["Beta", BLANKS]));
    assert!(!popup.all_visible_selected());

    popup.toggle_all_visible();
    assert_eq!(popup.selection(), &set(&["Alpha", "Beta", BLANKS]));

    popup.set_search("");
    popup.toggle_all_visible();
    assert!(popup.selection().is_empty());
    popup.toggle_value("Beta");
    assert!(!popup.all_visible_selected());
    popup.toggle_all_visible();
    assert!(popup.selects_everything());
}

#[test]
fn test_select_all_with_no_visible_candidates_is_a_no_op() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    let popup = state.popup_mut().unwrap();

    popup.set_search("zzz");
    assert!(popup.visible_candidates().is_empty());
    assert!(!popup.all_visible_selected());
    popup.toggle_all_visible();
    assert!(popup.selects_everything());
}

#[test]
fn test_opening_another_popup_cancels_the_first() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    state.popup_mut().unwrap().toggle_value("Alpha");

    state.open_filter("date", anchor(), viewport());
    assert_eq!(state.popup().unwrap().column(), "date");
    state.apply_filter();
    assert!(state.filters().is_empty());
}

#[test]
fn test_dismiss_listeners_live_only_while_open() {
    let host = Rc::new(RecordingHost::default());
    let mut state = controller();
    state.set_listener_host(host.clone());
    assert_eq!(host.live(), 0);

    state.open_filter("title", anchor(), viewport());
    assert_eq!(host.live(), 2);
    assert_eq!(host.attaches(), 2);

    state.open_filter("date", anchor(), viewport());
    assert_eq!(host.live(), 2);
    assert_eq!(host.attaches(), 4);

    state.apply_filter();
    assert_eq!(host.live(), 0);

    state.open_filter("title", anchor(), viewport());
    state.cancel_filter();
    assert_eq!(host.live(), 0);

    state.open_filter("title", anchor(), viewport());
    state.replace_rows(sample_rows());
    assert!(state.popup().is_none());
    assert_eq!(host.live(), 0);

    state.open_filter("title", anchor(), viewport());
    drop(state);
    assert_eq!(host.live(), 0);
}

#[test]
fn test_stale_values_stay_inert_by_default() {
    let mut state = controller();
    state.open_filter("title", anchor(), viewport());
    let popup = state.popup_mut().unwrap();
    popup.toggle_all_visible();
    popup.toggle_value("Alpha");
    state.apply_filter();
    assert_eq!(ids(&state), vec![2]);

    state.replace_rows(rows(json!([
        { "id": 1, "title": "Beta" },
        { "id": 2, "title": "Alpha v2" },
    ])));
    assert_eq!(state.filters().get("title"), Some(&set(&["Alpha"])));
    assert!(state.visible_row_indices().is_empty());

    // Reopening and applying drops the value that no longer exists.
    state.open_filter("title", anchor(), viewport());
    assert!(state.popup().unwrap().is_selected("Alpha"));
    state.popup_mut().unwrap().toggle_value("Alpha v2");
    state.apply_filter();
    assert_eq!(state.filters().get("title"), Some(&set(&["Alpha v2"])));
    assert_eq!(ids(&state), vec![2]);
}

#[test]
fn test_stale_values_dropped_when_configured() {
    let config = ViewConfig {
        stale_filters: StaleFilterPolicy::Drop,
        ..sample_config()
    };
    let mut state = TableController::from_rows(config, sample_rows());
    state.open_filter("title", anchor(), viewport());
    let popup = state.popup_mut().unwrap();
    popup.toggle_all_visible();
    popup.toggle_value("Alpha");
    popup.toggle_value("Beta");
    state.apply_filter();
    state.open_filter("date", anchor(), viewport());
    let popup = state.popup_mut().unwrap();
    popup.toggle_value("2024-01-01");
    state.apply_filter();
    assert_eq!(state.filters().len(), 2);

    state.replace_rows(rows(json!([
        { "id": 1, "title": "Beta", "date": "2024-03-01" },
        { "id": 2, "title": "Gamma", "date": "2024-02-01" },
    ])));

    assert_eq!(state.filters().get("title"), Some(&set(&["Beta"])));
    // Every remaining date is still accepted, so the entry is canonical again.
    assert!(!state.is_filter_active("date"));
    assert_eq!(ids(&state), vec![1]);
}

#[test]
fn test_commit_keeps_only_known_candidates() {
    let mut filters = FilterState::new();
    let candidates = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    filters.commit("col", &set(&["a", "zombie"]), &candidates);
    assert_eq!(filters.get("col"), Some(&set(&["a"])));

    filters.commit("col", &set(&["a", "b", "c", "zombie"]), &candidates);
    assert!(!filters.is_active("col"));
}
