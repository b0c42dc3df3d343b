/// Raw gesture state for one pointer-down to pointer-up interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub has_dragged: bool,
    pub start_x: f64,
    pub start_scroll_left: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    /// Pointer is down but has not moved past the threshold.
    Pending,
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    /// Buttons, links, inputs: never start a pan.
    Interactive,
    Plain,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveEffect {
    /// Let the event propagate untouched.
    None,
    /// Scroll the container, suppress the default gesture. `capture` is set
    /// on the move that crossed the threshold.
    Scroll { scroll_left: f64, capture: bool },
}

/// Horizontal pan over the table body that still lets plain clicks through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragScroll {
    state: DragState,
    threshold: f64,
    suppress_click: bool,
}

impl DragScroll {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: DragState::default(),
            threshold: threshold.max(0.0),
            suppress_click: false,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn phase(&self) -> DragPhase {
        match (self.state.active, self.state.has_dragged) {
            (false, _) => DragPhase::Idle,
            (true, false) => DragPhase::Pending,
            (true, true) => DragPhase::Dragging,
        }
    }

    /// Returns whether a gesture was armed.
    pub fn pointer_down(&mut self, x: f64, scroll_left: f64, target: PointerTarget) -> bool {
        self.suppress_click = false;
        if target == PointerTarget::Interactive {
            self.state = DragState::default();
            return false;
        }

        self.state = DragState {
            active: true,
            has_dragged: false,
            start_x: x,
            start_scroll_left: scroll_left,
        };
        true
    }

    pub fn pointer_move(&mut self, x: f64) -> MoveEffect {
        if !self.state.active {
            return MoveEffect::None;
        }

        let dx = x - self.state.start_x;
        let crossed = !self.state.has_dragged && dx.abs() >= self.threshold;
        if !self.state.has_dragged && !crossed {
            return MoveEffect::None;
        }

        if crossed {
            self.state.has_dragged = true;
            tracing::trace!(start_x = self.state.start_x, "drag scroll started");
        }

        MoveEffect::Scroll {
            scroll_left: (self.state.start_scroll_left - dx).max(0.0),
            capture: crossed,
        }
    }

    /// Ends the gesture. Returns `true` if a click from this interaction
    /// should still run.
    pub fn pointer_up(&mut self) -> bool {
        let dragged = self.state.active && self.state.has_dragged;
        self.state = DragState::default();
        self.suppress_click = dragged;
        !dragged
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Whether the click that follows the last pointer-up came from a pan.
    pub fn click_suppressed(&self) -> bool {
        self.suppress_click
    }
}

impl Default for DragScroll {
    fn default() -> Self {
        Self::new(5.0)
    }
}
