use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::state::geometry::{PopupPosition, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DismissListener {
    OutsidePointer,
    OutsideScroll,
}

/// Host environment that can install the outside-click and outside-scroll
/// listeners of an open popup.
pub trait ListenerHost {
    fn attach(&self, listener: DismissListener);
    fn detach(&self, listener: DismissListener);
}

/// Holds the dismiss listeners for exactly as long as it lives.
pub struct DismissGuard {
    host: Rc<dyn ListenerHost>,
}

impl DismissGuard {
    pub fn acquire(host: Rc<dyn ListenerHost>) -> Self {
        host.attach(DismissListener::OutsidePointer);
        host.attach(DismissListener::OutsideScroll);
        Self { host }
    }
}

impl Drop for DismissGuard {
    fn drop(&mut self) {
        self.host.detach(DismissListener::OutsideScroll);
        self.host.detach(DismissListener::OutsidePointer);
    }
}

impl fmt::Debug for DismissGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DismissGuard")
    }
}

/// The Excel-style value selector for one column.
///
/// Edits go to a working selection; the committed filter is only touched
/// when the owning controller applies the popup.
#[derive(Debug)]
pub struct FilterPopup {
    column: String,
    anchor: Rect,
    position: PopupPosition,
    candidates: Vec<String>,
    selection: BTreeSet<String>,
    search: String,
    _listeners: Option<DismissGuard>,
}

impl FilterPopup {
    pub fn open(
        column: impl Into<String>,
        anchor: Rect,
        position: PopupPosition,
        candidates: Vec<String>,
        committed: Option<&BTreeSet<String>>,
        listeners: Option<DismissGuard>,
    ) -> Self {
        let selection = match committed {
            Some(accepted) => accepted.clone(),
            None => candidates.iter().cloned().collect(),
        };

        Self {
            column: column.into(),
            anchor,
            position,
            candidates,
            selection,
            search: String::new(),
            _listeners: listeners,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    pub fn position(&self) -> PopupPosition {
        self.position
    }

    pub fn set_position(&mut self, position: PopupPosition) {
        self.position = position;
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Candidates matching the popup's own search box.
    pub fn visible_candidates(&self) -> Vec<&str> {
        let needle = self.search.trim().to_lowercase();
        self.candidates
            .iter()
            .map(String::as_str)
            .filter(|value| needle.is_empty() || value.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selection.contains(value)
    }

    pub fn toggle_value(&mut self, value: &str) {
        if !self.selection.remove(value) {
            self.selection.insert(value.to_string());
        }
    }

    pub fn all_visible_selected(&self) -> bool {
        let visible = self.visible_candidates();
        !visible.is_empty() && visible.iter().all(|value| self.selection.contains(*value))
    }

    /// Deselects every visible candidate when all are selected, otherwise
    /// selects them all. Hidden candidates keep their state.
    pub fn toggle_all_visible(&mut self) {
        let visible: Vec<String> = self
            .visible_candidates()
            .into_iter()
            .map(str::to_string)
            .collect();

        if self.all_visible_selected() {
            for value in &visible {
                self.selection.remove(value);
            }
        } else {
            self.selection.extend(visible);
        }
    }

    pub fn selects_everything(&self) -> bool {
        self.candidates
            .iter()
            .all(|value| self.selection.contains(value))
    }
}
