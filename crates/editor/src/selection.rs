//! Selection state machine.
//!
//! Bounds are text-space points, so a selection survives re-wrapping.

use linedit_buffer::{Point, Range};

/// Input that placed a pending bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSource {
    Keyboard,
    Mouse,
}

/// Selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected
    #[default]
    Idle,
    /// First bound placed, waiting for the second
    PendingBound { point: Point, source: BoundSource },
    /// Completed, normalized and non-empty selection
    Active(Range),
}

/// Selection between two bounds: `Idle` if they coincide
fn complete(bound: Point, point: Point) -> Selection {
    if bound == point {
        Selection::Idle
    } else {
        Selection::Active(Range::new(bound, point).normalized())
    }
}

impl Selection {
    /// Keyboard mark: places the first bound or completes a keyboard one
    pub fn mark(&mut self, point: Point) {
        *self = match *self {
            Selection::PendingBound {
                point: bound,
                source: BoundSource::Keyboard,
            } => complete(bound, point),
            // A mouse bound in progress is replaced
            _ => Selection::PendingBound {
                point,
                source: BoundSource::Keyboard,
            },
        };
    }

    /// Mouse button pressed: always starts a new pending bound
    pub fn mouse_press(&mut self, point: Point) {
        *self = Selection::PendingBound {
            point,
            source: BoundSource::Mouse,
        };
    }

    /// Mouse button released: completes a mouse bound, otherwise ignored
    pub fn mouse_release(&mut self, point: Point) {
        if let Selection::PendingBound {
            point: bound,
            source: BoundSource::Mouse,
        } = *self
        {
            *self = complete(bound, point);
        }
    }

    /// Back to `Idle` from any state
    pub fn reset(&mut self) {
        *self = Selection::Idle;
    }

    /// Range of an active selection
    pub fn active_range(&self) -> Option<Range> {
        match self {
            Selection::Active(range) => Some(*range),
            _ => None,
        }
    }

    /// Select a range directly (empty ranges give `Idle`)
    pub fn select(&mut self, range: Range) {
        let range = range.normalized();
        *self = complete(range.begin, range.end);
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Selection::Active(_))
    }
}
