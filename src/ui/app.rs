use dioxus::prelude::*;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::warn;

use crate::io::view_io;
use crate::state::popup::{DismissListener, ListenerHost};
use crate::state::table_state::TableController;
use crate::state::view_config::ViewConfig;
use crate::ui::actions::{self, RowCommand};
use crate::ui::table::Table;
use crate::ui::toolbar::Toolbar;

const STYLES: Asset = asset!("/assets/styles.css");

/// Arms the table's outside-click and outside-scroll handlers while a
/// popup holds its dismiss guard.
struct SignalListenerHost(Signal<bool>);

impl ListenerHost for SignalListenerHost {
    fn attach(&self, _listener: DismissListener) {
        let mut armed = self.0;
        if let Ok(mut armed) = armed.try_write() {
            *armed = true;
        };
    }

    fn detach(&self, _listener: DismissListener) {
        // The signal may already be gone when the view itself is torn down.
        let mut armed = self.0;
        if let Ok(mut armed) = armed.try_write() {
            *armed = false;
        };
    }
}

fn initial_config() -> (ViewConfig, Option<String>) {
    let Ok(path) = std::env::var("AUTOFILTER_CONFIG") else {
        return (ViewConfig::document_register(), None);
    };

    match view_io::load_view_config(&PathBuf::from(&path)) {
        Ok(config) => (config, None),
        Err(err) => {
            warn!(%path, %err, "falling back to the document register view");
            (ViewConfig::document_register(), Some(err.to_string()))
        }
    }
}

#[component]
pub fn App() -> Element {
    let (config, startup_error) = use_hook(initial_config);
    let dismiss_armed = use_signal(|| false);
    let error_message = use_signal(|| startup_error);
    let controller = use_signal(|| {
        let mut controller = TableController::new(config);
        controller.set_listener_host(Rc::new(SignalListenerHost(dismiss_armed)));
        controller
    });
    let file_path = use_signal::<Option<PathBuf>>(|| None);
    let last_command = use_signal::<Option<RowCommand>>(|| None);
    let save_success = use_signal(|| false);

    use_effect(move || {
        if let Ok(path) = std::env::var("AUTOFILTER_OPEN") {
            actions::load_rows_into(&PathBuf::from(path), controller, file_path, error_message);
        }
    });

    let title = controller.read().config().title.clone();

    rsx! {
        document::Stylesheet { href: STYLES }
        div { class: "app",
            if !title.is_empty() {
                h1 { class: "view-title", "{title}" }
            }
            Toolbar { controller, file_path, error_message, last_command, save_success }
            Table { controller, dismiss_armed, last_command }
        }
    }
}
