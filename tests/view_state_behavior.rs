//! Behavior-driven tests for the view state
//!
//! These tests walk through what a user sees while searching, selecting and
//! sorting: which rows are shown, which checkbox is ticked, which value
//! records belong to the selection.

use stockview_core::{
    decode_export_uri, InstrumentSortCriteria, SortOrder, ValueSortCriteria,
};
use stockview_tests::*;

fn shown_ids(view: &ViewState) -> Vec<i64> {
    view.filtered_instruments()
        .iter()
        .map(|entry| entry.id().get())
        .collect()
}

fn base_ids(view: &ViewState) -> Vec<i64> {
    view.instruments()
        .iter()
        .map(|entry| entry.id().get())
        .collect()
}

fn selected_ids(entries: &[stockview_core::SelectableInstrument]) -> Vec<i64> {
    entries
        .iter()
        .filter(|entry| entry.selected)
        .map(|entry| entry.id().get())
        .collect()
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn when_both_collections_load_everything_is_shown_unselected() {
    // Given: A source serving four instruments and five value records
    let source = StaticSource::new(instruments(), value_records());

    // When: The view state is loaded
    let view = ViewState::load(&source, SelectionScope::default())
        .await
        .expect("load succeeds");

    // Then: Every instrument is shown, none selected, and nothing is exported yet
    assert_eq!(shown_ids(&view), vec![1, 2, 3, 4]);
    assert!(selected_ids(view.instruments()).is_empty());
    assert_eq!(view.value_records().len(), 5);
    assert!(view.filtered_value_records().is_empty());
    assert!(view.export_uri().is_none());
    assert!(view.load_report().is_complete());
}

#[tokio::test]
async fn when_instruments_fail_to_load_the_list_stays_empty_and_failure_is_reported() {
    // Given: A source whose instrument endpoint is down
    let source = StaticSource::new(instruments(), value_records())
        .with_instruments_error(SourceError::network("connection refused", true));

    // When: The view state is loaded
    let view = ViewState::load(&source, SelectionScope::default())
        .await
        .expect("load still completes");

    // Then: The instrument list is empty, value records are intact, and the failure is visible
    assert!(view.instruments().is_empty());
    assert_eq!(view.value_records().len(), 5);

    let failures = view.load_report().failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, Collection::Instruments);
    assert_eq!(failures[0].1.kind(), SourceErrorKind::Network);
}

#[test]
fn when_value_records_arrive_after_selection_the_selection_picks_them_up() {
    // Given: Instruments are loaded and BASF is selected before any values arrive
    let mut view = ViewState::default();
    view.apply_instruments(instruments());
    view.toggle_selection(InstrumentId::new(3), true)
        .expect("toggle succeeds");
    assert!(view.filtered_value_records().is_empty());

    // When: The value records arrive
    view.apply_value_records(value_records())
        .expect("records apply");

    // Then: The selection shows BASF's three records and the export follows
    assert_eq!(view.filtered_value_records().len(), 3);
    let exported = decode_export_uri(view.export_uri().expect("uri").as_str()).expect("decodes");
    assert_eq!(exported, view.filtered_value_records());
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn when_user_searches_by_currency_matching_instruments_remain() {
    // Given: A loaded view
    let mut view = loaded_view(SelectionScope::default());

    // When: The user searches for "eur" in lowercase
    let matches = view.apply_search_term("eur");

    // Then: The two EUR instruments remain, in base order
    assert_eq!(matches, 2);
    assert_eq!(shown_ids(&view), vec![1, 3]);
    assert_eq!(base_ids(&view), vec![1, 2, 3, 4]);
}

#[test]
fn when_user_clears_the_search_every_instrument_returns() {
    // Given: A view narrowed to chemicals
    let mut view = loaded_view(SelectionScope::default());
    view.apply_search_term("CHEM");
    assert_eq!(shown_ids(&view), vec![3]);

    // When: The search box is cleared
    view.apply_search_term("");

    // Then: The full list is shown again
    assert_eq!(shown_ids(&view), vec![1, 2, 3, 4]);
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn when_user_checks_a_second_instrument_the_first_is_unchecked() {
    // Given: Siemens is selected
    let mut view = loaded_view(SelectionScope::default());
    view.toggle_selection(InstrumentId::new(1), true)
        .expect("toggle succeeds");

    // When: The user checks BASF
    let state = view
        .toggle_selection(InstrumentId::new(3), true)
        .expect("toggle succeeds");

    // Then: Only BASF is selected and its records are shown in load order
    assert_eq!(state, SelectionState::OneSelected(InstrumentId::new(3)));
    assert_eq!(selected_ids(view.filtered_instruments()), vec![3]);
    assert_eq!(selected_ids(view.instruments()), vec![3]);

    let dates: Vec<&str> = view
        .filtered_value_records()
        .iter()
        .map(|record| record.date.as_str())
        .collect();
    assert_eq!(dates, vec!["2024-03-02", "2024-03-01", "2024-03-03"]);
}

#[test]
fn when_user_unchecks_the_selection_no_values_are_shown() {
    // Given: BASF is selected
    let mut view = loaded_view(SelectionScope::default());
    view.toggle_selection(InstrumentId::new(3), true)
        .expect("toggle succeeds");

    // When: The user unchecks it
    let state = view
        .toggle_selection(InstrumentId::new(3), false)
        .expect("toggle succeeds");

    // Then: Nothing is selected and the export holds an empty array
    assert_eq!(state, SelectionState::NoSelection);
    assert!(view.selected_instrument().is_none());
    assert!(view.filtered_value_records().is_empty());
    assert!(view
        .export_uri()
        .expect("uri regenerated")
        .as_str()
        .ends_with("%5B%5D"));
}

#[test]
fn when_a_hidden_instrument_is_checked_nothing_is_selected() {
    // Given: The list is narrowed to EUR instruments
    let mut view = loaded_view(SelectionScope::default());
    view.apply_search_term("eur");

    // When: Toyota (not shown) is checked
    let state = view
        .toggle_selection(InstrumentId::new(4), true)
        .expect("toggle succeeds");

    // Then: There is no selection and no values
    assert_eq!(state, SelectionState::NoSelection);
    assert!(view.filtered_value_records().is_empty());
}

#[test]
fn when_scope_is_projection_hidden_selections_survive() {
    // Given: Apple is selected, then the list is narrowed to EUR instruments
    let mut view = loaded_view(SelectionScope::Projection);
    view.toggle_selection(InstrumentId::new(2), true)
        .expect("toggle succeeds");
    view.apply_search_term("eur");

    // When: BASF is checked in the narrowed list
    view.toggle_selection(InstrumentId::new(3), true)
        .expect("toggle succeeds");

    // Then: The hidden Apple row keeps its flag; the current selection is BASF
    assert_eq!(selected_ids(view.instruments()), vec![2, 3]);
    assert_eq!(view.selection_state(), SelectionState::OneSelected(InstrumentId::new(3)));
}

#[test]
fn when_scope_is_all_hidden_selections_are_cleared() {
    // Given: Same steps as above, with whole-list scope
    let mut view = loaded_view(SelectionScope::All);
    view.toggle_selection(InstrumentId::new(2), true)
        .expect("toggle succeeds");
    view.apply_search_term("eur");

    // When: BASF is checked
    view.toggle_selection(InstrumentId::new(3), true)
        .expect("toggle succeeds");

    // Then: Exactly one instrument is flagged anywhere
    assert_eq!(selected_ids(view.instruments()), vec![3]);

    view.apply_search_term("");
    assert_eq!(selected_ids(view.filtered_instruments()), vec![3]);
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn when_user_sorts_by_stock_ordering_ignores_case() {
    // Given: A loaded view with mixed-case names
    let mut view = loaded_view(SelectionScope::default());

    // When: Sorting by stock ascending, then descending
    view.sort_instruments(InstrumentSortCriteria::Stock, SortOrder::Asc);
    let ascending = shown_ids(&view);
    view.sort_instruments(InstrumentSortCriteria::Stock, SortOrder::Desc);
    let descending = shown_ids(&view);

    // Then: apple < BASF < Siemens < Toyota
    assert_eq!(ascending, vec![2, 3, 1, 4]);
    assert_eq!(descending, vec![4, 1, 3, 2]);
}

#[test]
fn when_user_sorts_by_sector_the_shown_list_changes_only_after_next_search() {
    // Given: A loaded view
    let mut view = loaded_view(SelectionScope::default());

    // When: Sorting by sector
    view.sort_instruments(InstrumentSortCriteria::Sector, SortOrder::Asc);

    // Then: The shown list is untouched but the base list is reordered
    assert_eq!(shown_ids(&view), vec![1, 2, 3, 4]);
    assert_eq!(base_ids(&view), vec![4, 1, 2, 3]);

    // And: The next search recompute reveals the sector order
    view.apply_search_term("");
    assert_eq!(shown_ids(&view), vec![4, 1, 2, 3]);
}

#[test]
fn when_user_sorts_by_an_unknown_column_nothing_changes() {
    // Given: A view sorted by stock
    let mut view = loaded_view(SelectionScope::default());
    view.sort_instruments(InstrumentSortCriteria::Stock, SortOrder::Asc);

    // When: An unrecognised criteria name is requested
    let sorted = view.sort_instruments_by_name("market cap", SortOrder::Desc);

    // Then: It is ignored
    assert!(!sorted);
    assert_eq!(shown_ids(&view), vec![2, 3, 1, 4]);
}

#[test]
fn when_user_sorts_values_the_export_follows_the_new_order() {
    // Given: BASF is selected
    let mut view = loaded_view(SelectionScope::default());
    view.toggle_selection(InstrumentId::new(3), true)
        .expect("toggle succeeds");

    // When: Values are sorted by value ascending
    view.sort_value_records(ValueSortCriteria::Value, SortOrder::Asc)
        .expect("sort succeeds");

    // Then: Records and export are both ordered by value
    let values: Vec<f64> = view
        .filtered_value_records()
        .iter()
        .map(|record| record.value)
        .collect();
    assert_eq!(values, vec![46.0, 47.5, 48.25]);

    let exported = decode_export_uri(view.export_uri().expect("uri").as_str()).expect("decodes");
    assert_eq!(exported, view.filtered_value_records());

    // When: Values are sorted by date descending
    view.sort_value_records(ValueSortCriteria::Date, SortOrder::Desc)
        .expect("sort succeeds");

    // Then: The newest record comes first
    assert_eq!(view.filtered_value_records()[0].date.as_str(), "2024-03-03");
}
