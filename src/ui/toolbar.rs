use dioxus::prelude::*;
use std::path::PathBuf;

use crate::state::table_state::TableController;
use crate::ui::actions::{self, RowCommand};

#[component]
pub fn Toolbar(
    mut controller: Signal<TableController>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
    last_command: Signal<Option<RowCommand>>,
    mut save_success: Signal<bool>,
) -> Element {
    let mut columns_open = use_signal(|| false);

    let state = controller.read();
    let search_value = state.search_query().to_string();
    let active_filters = state.filters().len();
    let column_toggle = state.column_toggle_enabled();
    let column_choices: Vec<(String, String, bool)> = state
        .config()
        .columns
        .iter()
        .filter(|column| !column.is_reserved())
        .map(|column| {
            (
                column.id.clone(),
                column.title.clone(),
                state.is_column_visible(&column.id),
            )
        })
        .collect();
    drop(state);

    rsx! {
        div { class: "toolbar",
            div { class: "toolbar-group",
                button {
                    class: "toolbar-btn",
                    id: "btn-open",
                    onclick: move |_| {
                        spawn(async move {
                            actions::open_rows(controller, file_path, error_message).await;
                        });
                    },
                    "\u{1F4C2} Open"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-save-view",
                    disabled: file_path.read().is_none(),
                    onclick: move |_| {
                        if actions::save_prefs(controller, file_path, error_message) {
                            save_success.set(true);
                            spawn(async move {
                                tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                                save_success.set(false);
                            });
                        }
                    },
                    "\u{1F4BE} Save view"
                }
                if *save_success.read() {
                    span { class: "save-success", "\u{2714} Saved" }
                }
            }
            div { class: "toolbar-separator" }

            div { class: "toolbar-group",
                input {
                    class: "toolbar-input",
                    id: "input-search",
                    r#type: "search",
                    placeholder: "Search…",
                    value: "{search_value}",
                    oninput: move |evt| {
                        controller.with_mut(|state| state.set_search(evt.value()));
                    },
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-clear-filters",
                    disabled: active_filters == 0,
                    onclick: move |_| {
                        controller.with_mut(|state| state.clear_filters());
                    },
                    "Clear filters ({active_filters})"
                }
            }

            if column_toggle {
                div { class: "toolbar-separator" }
                div { class: "toolbar-group column-menu",
                    button {
                        class: "toolbar-btn",
                        id: "btn-columns",
                        onclick: move |_| {
                            let open = *columns_open.read();
                            columns_open.set(!open);
                        },
                        "Columns"
                    }
                    if *columns_open.read() {
                        div { class: "column-menu-list",
                            for (id, title, visible) in column_choices {
                                label { key: "{id}", class: "column-menu-item",
                                    input {
                                        r#type: "checkbox",
                                        checked: visible,
                                        onchange: {
                                            let id = id.clone();
                                            move |_| {
                                                controller.with_mut(|state| state.toggle_column(&id));
                                            }
                                        },
                                    }
                                    "{title}"
                                }
                            }
                            button {
                                class: "toolbar-btn",
                                onclick: move |_| {
                                    controller.with_mut(|state| state.show_all_columns());
                                },
                                "Show all"
                            }
                        }
                    }
                }
            }

            if let Some(command) = last_command.read().as_ref() {
                span { class: "last-command",
                    "{command.kind.label()} requested for {command.row_id}"
                }
            }
            if let Some(error) = error_message.read().as_ref() {
                span { class: "error-message", "{error}" }
            }
        }
    }
}
