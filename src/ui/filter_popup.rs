use dioxus::prelude::*;
use std::rc::Rc;

use crate::state::data_model::BLANKS;
use crate::state::geometry::MeasuredGeometry;
use crate::state::table_state::TableController;
use crate::ui::table::{measure_viewport, to_rect};

#[component]
pub fn FilterPopupView(
    mut controller: Signal<TableController>,
    viewport_sizer: Signal<Option<Rc<MountedData>>>,
) -> Element {
    let mut popup_ref = use_signal(|| None::<Rc<MountedData>>);

    // Re-measures after every render that can change the popup's size, such
    // as the search box narrowing the list.
    use_effect(move || {
        let open = controller.read().popup().map(|popup| popup.visible_candidates().len());
        let Some(node) = popup_ref.read().clone() else {
            return;
        };
        if open.is_none() {
            return;
        }
        let sizer = viewport_sizer.peek().clone();
        spawn(async move {
            let geometry = MeasuredGeometry {
                viewport: measure_viewport(sizer).await,
                popup: node.get_client_rect().await.ok().map(to_rect),
                headers: Vec::new(),
            };
            if controller.peek().popup_correction(&geometry).is_some() {
                controller.with_mut(|state| state.relayout_popup(&geometry));
            }
        });
    });

    let state = controller.read();
    let Some(popup) = state.popup() else {
        return rsx! {};
    };

    let title = state
        .config()
        .column(popup.column())
        .map(|column| column.title.clone())
        .unwrap_or_else(|| popup.column().to_string());
    let position = popup.position();
    let search = popup.search().to_string();
    let all_visible_selected = popup.all_visible_selected();
    let items: Vec<(String, bool, &'static str)> = popup
        .visible_candidates()
        .into_iter()
        .map(|value| {
            let class = if value == BLANKS {
                "filter-popup-item blanks"
            } else {
                "filter-popup-item"
            };
            (value.to_string(), popup.is_selected(value), class)
        })
        .collect();
    let style = format!(
        "top: {}px; left: {}px; width: {}px;",
        position.top, position.left, position.width
    );
    drop(state);

    rsx! {
        div {
            class: "filter-popup",
            id: "filter-popup",
            style: "{style}",
            onmounted: move |evt| popup_ref.set(Some(evt.data())),
            div { class: "filter-popup-title", "{title}" }
            input {
                class: "filter-popup-search",
                r#type: "search",
                placeholder: "Search values…",
                value: "{search}",
                autofocus: true,
                oninput: move |evt| {
                    controller.with_mut(|state| {
                        if let Some(popup) = state.popup_mut() {
                            popup.set_search(evt.value());
                        }
                    });
                },
            }
            label { class: "filter-popup-item select-all",
                input {
                    r#type: "checkbox",
                    checked: all_visible_selected,
                    onchange: move |_| {
                        controller.with_mut(|state| {
                            if let Some(popup) = state.popup_mut() {
                                popup.toggle_all_visible();
                            }
                        });
                    },
                }
                "(Select all)"
            }
            div { class: "filter-popup-list",
                for (value, checked, class) in items {
                    label {
                        key: "{value}",
                        class,
                        input {
                            r#type: "checkbox",
                            checked,
                            onchange: {
                                let value = value.clone();
                                move |_| {
                                    controller.with_mut(|state| {
                                        if let Some(popup) = state.popup_mut() {
                                            popup.toggle_value(&value);
                                        }
                                    });
                                }
                            },
                        }
                        "{value}"
                    }
                }
            }
            div { class: "filter-popup-actions",
                button {
                    class: "toolbar-btn primary",
                    id: "btn-filter-apply",
                    onclick: move |_| {
                        controller.with_mut(|state| state.apply_filter());
                    },
                    "Apply"
                }
                button {
                    class: "toolbar-btn",
                    id: "btn-filter-cancel",
                    onclick: move |_| {
                        controller.with_mut(|state| state.cancel_filter());
                    },
                    "Cancel"
                }
            }
        }
    }
}
