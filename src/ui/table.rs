use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use std::collections::HashMap;
use std::rc::Rc;

use crate::state::data_model::{self, Column, Row, ACTION_COLUMN, INDEX_COLUMN};
use crate::state::drag::{MoveEffect, PointerTarget};
use crate::state::geometry::{MeasuredGeometry, Rect, Viewport};
use crate::state::sort::SortOrder;
use crate::state::table_state::TableController;
use crate::ui::actions::{self, RowCommand, RowCommandKind};
use crate::ui::filter_popup::FilterPopupView;

const SCROLL_ID: &str = "table-scroll";

#[component]
pub fn Table(
    mut controller: Signal<TableController>,
    dismiss_armed: Signal<bool>,
    last_command: Signal<Option<RowCommand>>,
) -> Element {
    let mut headers = use_signal(HashMap::<String, Rc<MountedData>>::new);
    let mut viewport_sizer = use_signal::<Option<Rc<MountedData>>>(|| None);
    let mut scroll_area = use_signal::<Option<Rc<MountedData>>>(|| None);
    let mut scroll_left = use_signal(|| 0.0_f64);
    let selected_row = use_signal::<Option<usize>>(|| None);

    let state = controller.read();
    let columns: Vec<Column> = state.visible_columns().into_iter().cloned().collect();
    let visible_rows = state.visible_row_indices();
    let rows: Vec<(usize, Row, Option<String>)> = visible_rows
        .iter()
        .filter_map(|idx| {
            let row = state.rows().get(*idx)?.clone();
            Some((*idx, row, state.row_id(*idx)))
        })
        .collect();
    let has_rows = !state.rows().is_empty();
    let no_match = rows.is_empty();
    let column_count = columns.len();
    let popup_open = state.popup().is_some();
    drop(state);

    let open_filter = move |column: String| {
        let anchor_ref = headers.read().get(&column).cloned();
        let sizer = viewport_sizer.read().clone();
        spawn(async move {
            let anchor = match anchor_ref {
                Some(mounted) => mounted.get_client_rect().await.ok().map(to_rect),
                None => None,
            };
            let geometry = MeasuredGeometry {
                viewport: measure_viewport(sizer).await,
                popup: None,
                headers: anchor.map(|rect| (column.clone(), rect)).into_iter().collect(),
            };
            controller.with_mut(|state| {
                state.open_filter_at(&column, &geometry);
            });
        });
    };

    rsx! {
        div {
            class: "viewport-sizer",
            onmounted: move |evt| viewport_sizer.set(Some(evt.data())),
        }
        if *dismiss_armed.read() {
            div {
                class: "popup-backdrop",
                onpointerdown: move |evt| {
                    if evt.trigger_button() == Some(MouseButton::Primary) {
                        controller.with_mut(|state| state.pointer_down_outside_popup());
                    }
                },
                onwheel: move |_| {
                    controller.with_mut(|state| state.scroll_outside_popup());
                },
            }
        }
        if popup_open {
            FilterPopupView { controller, viewport_sizer }
        }
        if !has_rows {
            p { class: "empty-message", id: "empty-message", "No rows loaded. Click \"Open\" to load a row file." }
        } else {
            div {
                class: "table-container",
                id: SCROLL_ID,
                onmounted: move |evt| scroll_area.set(Some(evt.data())),
                onscroll: move |_| {
                    if *dismiss_armed.peek() {
                        controller.with_mut(|state| state.scroll_outside_popup());
                    }
                    let area = scroll_area.read().clone();
                    spawn(async move {
                        if let Some(area) = area {
                            if let Ok(offset) = area.get_scroll_offset().await {
                                scroll_left.set(offset.x);
                            }
                        }
                    });
                },
                onpointerdown: move |evt| {
                    if evt.trigger_button() != Some(MouseButton::Primary) {
                        return;
                    }
                    let x = evt.client_coordinates().x;
                    let start = *scroll_left.peek();
                    controller.with_mut(|state| {
                        state.drag_mut().pointer_down(x, start, PointerTarget::Plain);
                    });
                },
                onpointermove: move |evt| {
                    let x = evt.client_coordinates().x;
                    let effect = controller.with_mut(|state| state.drag_mut().pointer_move(x));
                    if let MoveEffect::Scroll { scroll_left: next, capture } = effect {
                        evt.prevent_default();
                        let capture_js = if capture {
                            format!("el.setPointerCapture({});", evt.pointer_id())
                        } else {
                            String::new()
                        };
                        let _ = document::eval(&format!(
                            "const el = document.getElementById('{SCROLL_ID}'); if (el) {{ el.scrollLeft = {next}; {capture_js} }}"
                        ));
                        scroll_left.set(next);
                    }
                },
                onpointerup: move |_| {
                    controller.with_mut(|state| {
                        state.drag_mut().pointer_up();
                    });
                },
                onpointerleave: move |_| {
                    controller.with_mut(|state| state.drag_mut().pointer_leave());
                },
                table {
                    thead {
                        tr {
                            for column in columns.iter() {
                                HeaderCell {
                                    key: "{column.id}",
                                    column: column.clone(),
                                    controller,
                                    headers,
                                    on_open_filter: open_filter,
                                }
                            }
                        }
                    }
                    tbody {
                        if no_match {
                            tr {
                                td { class: "no-match", colspan: "{column_count}", "No rows match the current filters." }
                            }
                        }
                        for (display_index, (data_index, row, row_id)) in rows.into_iter().enumerate() {
                            TableRow {
                                key: "{data_index}",
                                display_index,
                                data_index,
                                row,
                                row_id,
                                columns: columns.clone(),
                                controller,
                                selected_row,
                                last_command,
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn HeaderCell(
    column: Column,
    controller: Signal<TableController>,
    mut headers: Signal<HashMap<String, Rc<MountedData>>>,
    on_open_filter: EventHandler<String>,
) -> Element {
    if column.is_reserved() {
        return rsx! {
            th { class: "reserved-col", "{column.title}" }
        };
    }

    let state = controller.read();
    let filter_active = state.is_filter_active(&column.id);
    let order = state.sort_state().order_for(&column.id);
    drop(state);

    let sortable = column.is_sortable();
    let id = column.id.clone();
    let filter_class = if filter_active {
        "filter-btn filter-active"
    } else {
        "filter-btn"
    };

    rsx! {
        th {
            class: header_class(filter_active, order),
            id: format!("col-{}", sanitize_id(&column.id)),
            onmounted: {
                let id = id.clone();
                move |evt: MountedEvent| {
                    headers.with_mut(|map| {
                        map.insert(id.clone(), evt.data());
                    });
                }
            },
            span { class: "col-title", "{column.title}" }
            if sortable {
                SortButton { column: id.clone(), order: SortOrder::Asc, active: order == Some(SortOrder::Asc), controller }
                SortButton { column: id.clone(), order: SortOrder::Desc, active: order == Some(SortOrder::Desc), controller }
            }
            button {
                class: filter_class,
                onpointerdown: move |evt| evt.stop_propagation(),
                onclick: {
                    let id = id.clone();
                    move |evt: MouseEvent| {
                        evt.stop_propagation();
                        on_open_filter.call(id.clone());
                    }
                },
                "\u{25BE}"
            }
        }
    }
}

#[component]
fn SortButton(
    column: String,
    order: SortOrder,
    active: bool,
    mut controller: Signal<TableController>,
) -> Element {
    let glyph = match order {
        SortOrder::Asc => "\u{25B2}",
        SortOrder::Desc => "\u{25BC}",
    };
    let class = if active { "sort-btn sort-active" } else { "sort-btn" };

    rsx! {
        button {
            class,
            onpointerdown: move |evt| evt.stop_propagation(),
            onclick: move |_| {
                controller.with_mut(|state| state.toggle_sort(&column, order));
            },
            "{glyph}"
        }
    }
}

#[component]
fn TableRow(
    display_index: usize,
    data_index: usize,
    row: Row,
    row_id: Option<String>,
    columns: Vec<Column>,
    controller: Signal<TableController>,
    mut selected_row: Signal<Option<usize>>,
    last_command: Signal<Option<RowCommand>>,
) -> Element {
    let is_selected = *selected_row.read() == Some(data_index);
    let mut row_class = if display_index % 2 == 0 {
        "even"
    } else {
        "odd"
    }
    .to_string();
    if is_selected {
        row_class.push_str(" selected-row");
    }

    rsx! {
        tr {
            class: "{row_class}",
            id: format!("row-{data_index}"),
            onclick: move |_| {
                if !controller.read().drag().click_suppressed() {
                    selected_row.set(Some(data_index));
                }
            },
            for column in columns.iter() {
                if column.id == INDEX_COLUMN {
                    td { class: "row-number", "{display_index + 1}" }
                } else if column.id == ACTION_COLUMN {
                    td { class: "row-actions",
                        if let Some(row_id) = row_id.clone() {
                            for kind in RowCommandKind::all().iter().copied() {
                                button {
                                    class: "row-action-btn",
                                    onpointerdown: move |evt| evt.stop_propagation(),
                                    onclick: {
                                        let row_id = row_id.clone();
                                        move |evt: MouseEvent| {
                                            evt.stop_propagation();
                                            actions::dispatch_row_command(
                                                RowCommand { kind, row_id: row_id.clone() },
                                                last_command,
                                            );
                                        }
                                    },
                                    "{kind.label()}"
                                }
                            }
                        }
                    }
                } else {
                    td { class: "cell", "{cell_text(&row, column)}" }
                }
            }
        }
    }
}

fn cell_text(row: &Row, column: &Column) -> String {
    let values = data_model::extract(row, column);
    if data_model::is_blank(&values) {
        String::new()
    } else {
        data_model::display_text(&values)
    }
}

fn header_class(filter_active: bool, order: Option<SortOrder>) -> String {
    let sort_class = match order {
        Some(SortOrder::Asc) => "sorted-asc",
        Some(SortOrder::Desc) => "sorted-desc",
        None => "",
    };
    let filter_class = if filter_active { "filtered" } else { "" };
    join_classes(sort_class, filter_class)
}

fn join_classes(a: &str, b: &str) -> String {
    if a.is_empty() {
        return b.to_string();
    }
    if b.is_empty() {
        return a.to_string();
    }
    format!("{a} {b}")
}

fn sanitize_id(value: &str) -> String {
    value
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect()
}

pub(crate) fn to_rect(rect: dioxus::html::geometry::PixelsRect) -> Rect {
    Rect::new(
        rect.origin.x,
        rect.origin.y,
        rect.size.width,
        rect.size.height,
    )
}

/// Size of the fixed, full-window sizer element. The app root never
/// scrolls, so page scroll offsets stay zero.
pub(crate) async fn measure_viewport(sizer: Option<Rc<MountedData>>) -> Viewport {
    let Some(sizer) = sizer else {
        return Viewport::default();
    };
    match sizer.get_client_rect().await {
        Ok(rect) => Viewport::new(rect.size.width, rect.size.height),
        Err(_) => Viewport::default(),
    }
}
