use std::cmp::Ordering;

use autofilter::state::data_model::Column;
use autofilter::state::sort::{self, SortOrder, SortSpec, SortState};
use autofilter::state::table_state::TableController;
use autofilter::state::view_config::ViewConfig;

#[test]
fn test_toggle_sets_then_clears() {
    let mut state = SortState::default();

    state.toggle("title", SortOrder::Asc);
    assert_eq!(state.spec(), Some(&SortSpec::new("title", SortOrder::Asc)));

    state.toggle("title", SortOrder::Asc);
    assert_eq!(state.spec(), None);
}

#[test]
fn test_toggle_other_direction_replaces() {
    let mut state = SortState::default();
    state.toggle("title", SortOrder::Asc);
    state.toggle("title", SortOrder::Desc);
    assert_eq!(state.order_for("title"), Some(SortOrder::Desc));
}

#[test]
fn test_toggle_other_column_replaces_outright() {
    let mut state = SortState::new(Some(SortSpec::new("title", SortOrder::Asc)));
    state.toggle("date", SortOrder::Desc);
    assert_eq!(state.spec(), Some(&SortSpec::new("date", SortOrder::Desc)));
    assert_eq!(state.order_for("title"), None);
}

#[test]
fn test_initial_default_can_be_toggled_off() {
    let mut state = SortState::new(Some(SortSpec::new("title", SortOrder::Asc)));
    state.toggle("title", SortOrder::Asc);
    assert_eq!(state.spec(), None);
}

#[test]
fn test_controller_starts_from_configured_sort() {
    let config = ViewConfig {
        columns: vec![Column::new("title", "Title")],
        ..ViewConfig::default()
    }
    .with_default_sort("title", SortOrder::Desc);
    let mut state = TableController::new(config);

    assert_eq!(state.sort_spec(), Some(&SortSpec::new("title", SortOrder::Desc)));
    assert!(state.toggle_sort("title", SortOrder::Desc));
    assert_eq!(state.sort_spec(), None);
}

#[test]
fn test_parse_number() {
    assert_eq!(sort::parse_number("10"), Some(10.0));
    assert_eq!(sort::parse_number(" -3.5 "), Some(-3.5));
    assert_eq!(sort::parse_number("1,234,567"), Some(1_234_567.0));
    assert_eq!(sort::parse_number("1,234.25"), Some(1234.25));
    assert_eq!(sort::parse_number(".5"), Some(0.5));

    assert_eq!(sort::parse_number(""), None);
    assert_eq!(sort::parse_number("-"), None);
    assert_eq!(sort::parse_number("12,34"), None);
    assert_eq!(sort::parse_number("2024-03-01"), None);
    assert_eq!(sort::parse_number("1e5"), None);
    assert_eq!(sort::parse_number("inf"), None);
    assert_eq!(sort::parse_number("NaN"), None);
    assert_eq!(sort::parse_number("v2"), None);
}

#[test]
fn test_compare_text_numeric_before_lexicographic() {
    assert_eq!(sort::compare_text("9", "10"), Ordering::Less);
    assert_eq!(sort::compare_text("1,000", "999"), Ordering::Greater);
    assert_eq!(sort::compare_text("-2", "1"), Ordering::Less);
}

#[test]
fn test_natural_cmp_is_case_insensitive() {
    assert_eq!(sort::natural_cmp("alpha", "Beta"), Ordering::Less);
    assert_eq!(sort::natural_cmp("Beta", "alpha"), Ordering::Greater);
}

#[test]
fn test_natural_cmp_digit_runs() {
    assert_eq!(sort::natural_cmp("file2", "file10"), Ordering::Less);
    assert_eq!(sort::natural_cmp("v1.10", "v1.9"), Ordering::Greater);
    assert_eq!(sort::natural_cmp("2024-01-15", "2024-02-20"), Ordering::Less);
}

fn mixed_values() -> Vec<String> {
    let mut values = Vec::new();
    for i in 0..150u32 {
        values.push(i.to_string());
        values.push(format!("{},{:03}", i % 7 + 1, (i * 37) % 1000));
        values.push(format!("{},000x", i % 10 + 1));
        values.push(format!("Item {i}"));
        values.push(format!("-{}.{}", i / 3, i % 10));
    }
    values
}

#[test]
fn test_compare_text_numbers_before_text() {
    assert_eq!(sort::compare_text("999", "1,000"), Ordering::Less);
    assert_eq!(sort::compare_text("1,000", "1,000x"), Ordering::Less);
    assert_eq!(sort::compare_text("999", "1,000x"), Ordering::Less);
    assert_eq!(sort::compare_text("1,000x", "999"), Ordering::Greater);
    assert_eq!(sort::compare_text("100", "Alpha"), Ordering::Less);
}

#[test]
fn test_compare_text_is_consistent_over_mixed_values() {
    let mut values = mixed_values();
    values.sort_by(|a, b| sort::compare_text(a, b));

    for (i, a) in values.iter().enumerate() {
        for b in &values[i + 1..] {
            assert_ne!(
                sort::compare_text(a, b),
                Ordering::Greater,
                "{a:?} sorted before {b:?}"
            );
            assert_eq!(sort::compare_text(a, b), sort::compare_text(b, a).reverse());
        }
    }
}

#[test]
fn test_natural_cmp_is_total() {
    assert_ne!(sort::natural_cmp("Alpha", "alpha"), Ordering::Equal);
    assert_eq!(sort::natural_cmp("same", "same"), Ordering::Equal);
    assert_eq!(
        sort::natural_cmp("Alpha", "alpha"),
        sort::natural_cmp("alpha", "Alpha").reverse()
    );
}

#[test]
fn test_sort_order_apply() {
    assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
    assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
}
