use dioxus::prelude::*;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::io::view_io;
use crate::state::table_state::TableController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowCommandKind {
    Delete,
    Restore,
    Download,
}

impl RowCommandKind {
    pub fn all() -> &'static [Self] {
        &[Self::Download, Self::Restore, Self::Delete]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Delete => "Delete",
            Self::Restore => "Restore",
            Self::Download => "Download",
        }
    }
}

/// A row-level request handed to whoever owns the row source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowCommand {
    pub kind: RowCommandKind,
    pub row_id: String,
}

pub fn dispatch_row_command(command: RowCommand, mut last_command: Signal<Option<RowCommand>>) {
    info!(kind = ?command.kind, row_id = %command.row_id, "row command requested");
    last_command.set(Some(command));
}

pub fn load_rows_into(
    path: &Path,
    mut controller: Signal<TableController>,
    mut file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
) {
    match view_io::load_rows_and_prefs(path) {
        Ok((rows, prefs)) => {
            controller.with_mut(|state| state.load_rows(rows, prefs));
            file_path.set(Some(path.to_path_buf()));
            error_message.set(None);
        }
        Err(err) => {
            error_message.set(Some(err.to_string()));
        }
    }
}

pub async fn open_rows(
    controller: Signal<TableController>,
    file_path: Signal<Option<PathBuf>>,
    error_message: Signal<Option<String>>,
) {
    let task = rfd::AsyncFileDialog::new()
        .add_filter("JSON rows", &["json"])
        .pick_file()
        .await;

    if let Some(handle) = task {
        load_rows_into(handle.path(), controller, file_path, error_message);
    }
}

pub fn save_prefs(
    controller: Signal<TableController>,
    file_path: Signal<Option<PathBuf>>,
    mut error_message: Signal<Option<String>>,
) -> bool {
    let path = {
        let read = file_path.read();
        let Some(path) = read.as_ref() else {
            return false;
        };
        path.clone()
    };

    let prefs = controller.read().prefs();
    if let Err(err) = view_io::save_prefs(&path, &prefs) {
        error_message.set(Some(err.to_string()));
        return false;
    }
    true
}
