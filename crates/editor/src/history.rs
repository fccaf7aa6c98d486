use unicode_segmentation::UnicodeSegmentation;

/// Action for undo/redo.
///
/// Positions are absolute byte offsets into the document. Grapheme columns
/// shift when an edit joins or splits clusters, byte offsets do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Text insertion
    Insert { at: usize, text: String },
    /// Text deletion
    Delete { at: usize, text: String },
    /// Actions undone and redone as one step
    Group { actions: Vec<Action> },
}

/// Single grapheme that is not a line break
fn is_single_grapheme(text: &str) -> bool {
    !text.contains('\n') && text.graphemes(true).count() == 1
}

impl Action {
    /// Get inverse action
    pub fn inverse(&self) -> Action {
        match self {
            Action::Insert { at, text } => Action::Delete {
                at: *at,
                text: text.clone(),
            },
            Action::Delete { at, text } => Action::Insert {
                at: *at,
                text: text.clone(),
            },
            Action::Group { actions } => Action::Group {
                actions: actions.iter().rev().map(|a| a.inverse()).collect(),
            },
        }
    }

    /// Check if can merge with another action
    pub fn can_merge_with(&self, other: &Action) -> bool {
        match (self, other) {
            // Consecutive typing on one line
            (
                Action::Insert {
                    at: pos1,
                    text: text1,
                },
                Action::Insert {
                    at: pos2,
                    text: text2,
                },
            ) => is_single_grapheme(text2) && !text1.contains('\n') && *pos2 == pos1 + text1.len(),
            (
                Action::Delete {
                    at: pos1,
                    text: text1,
                },
                Action::Delete {
                    at: pos2,
                    text: text2,
                },
            ) => {
                let backspace = pos2 + text2.len() == *pos1;
                let forward = pos2 == pos1;
                is_single_grapheme(text2) && !text1.contains('\n') && (backspace || forward)
            }
            _ => false,
        }
    }

    /// Merge with another action
    pub fn merge(&mut self, other: Action) {
        match (self, other) {
            (Action::Insert { text: text1, .. }, Action::Insert { text: text2, .. }) => {
                text1.push_str(&text2);
            }
            (
                Action::Delete { at, text: text1 },
                Action::Delete {
                    at: pos2,
                    text: text2,
                },
            ) => {
                if pos2 == *at {
                    // Forward delete - add character to end
                    text1.push_str(&text2);
                } else {
                    // Backspace - add character to beginning
                    *at = pos2;
                    text1.insert_str(0, &text2);
                }
            }
            _ => {}
        }
    }
}

/// Edit history for undo/redo
#[derive(Debug, Clone)]
pub struct History {
    /// Action stack for undo
    undo_stack: Vec<Action>,
    /// Action stack for redo
    redo_stack: Vec<Action>,
    /// Maximum history size
    max_size: usize,
    /// Current accumulated action
    pending_action: Option<Action>,
    /// Undo depth matching the last loaded/saved document, if still reachable
    save_point: Option<usize>,
}

impl History {
    /// Create a new history
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    /// Create history with specified size
    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            pending_action: None,
            save_point: Some(0),
        }
    }

    /// Record action to history
    pub fn push(&mut self, action: Action) {
        // Clear redo stack on new action
        self.redo_stack.clear();

        // Try to merge with previous action
        if let Some(pending) = &mut self.pending_action {
            if pending.can_merge_with(&action) {
                pending.merge(action);
                return;
            }
        }

        // Cannot merge - save accumulated action
        self.commit_pending();

        // Saved state was undone and is now overwritten
        if self
            .save_point
            .is_some_and(|depth| depth > self.undo_stack.len())
        {
            self.save_point = None;
        }

        // Start new accumulation
        self.pending_action = Some(action);
    }

    /// Complete current action group (e.g., on cursor movement)
    pub fn commit_pending(&mut self) {
        if let Some(action) = self.pending_action.take() {
            self.undo_stack.push(action);

            // Limit history size
            if self.undo_stack.len() > self.max_size {
                self.undo_stack.remove(0);
                self.save_point = self.save_point.and_then(|depth| depth.checked_sub(1));
            }
        }
    }

    /// Undo last action, returning the action that reverses it
    pub fn undo(&mut self) -> Option<Action> {
        // First complete current action
        self.commit_pending();

        let action = self.undo_stack.pop()?;
        let inverse = action.inverse();
        self.redo_stack.push(action);
        Some(inverse)
    }

    /// Redo undone action
    pub fn redo(&mut self) -> Option<Action> {
        // Complete current action before redo
        self.commit_pending();

        // Return original action (not inverse)
        let action = self.redo_stack.pop()?;
        self.undo_stack.push(action.clone());
        Some(action)
    }

    /// Check if undo is possible
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending_action.is_some()
    }

    /// Check if redo is possible
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps (pending accumulation included)
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len() + usize::from(self.pending_action.is_some())
    }

    /// Undo steps separating the current state from the save point.
    ///
    /// `None` when the save point fell off the history or was overwritten.
    pub fn steps_to_save_point(&self) -> Option<usize> {
        let depth = self.undo_depth();
        self.save_point
            .and_then(|saved| depth.checked_sub(saved))
    }

    /// Redo steps leading forward to the save point.
    ///
    /// `Some` only when the save point was undone past and is still on the
    /// redo stack.
    pub fn redo_steps_to_save_point(&self) -> Option<usize> {
        let steps = self.save_point?.checked_sub(self.undo_depth())?;
        (steps > 0 && steps <= self.redo_stack.len()).then_some(steps)
    }

    /// Current state matches the last loaded/saved document
    pub fn is_at_save_point(&self) -> bool {
        self.save_point == Some(self.undo_depth())
    }

    /// Mark the current state as saved
    pub fn mark_saved(&mut self) {
        self.commit_pending();
        self.save_point = Some(self.undo_stack.len());
    }

    /// Clear history; the current state becomes the save point
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending_action = None;
        self.save_point = Some(0);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(at: usize, text: &str) -> Action {
        Action::Insert {
            at,
            text: text.to_string(),
        }
    }

    fn delete(at: usize, text: &str) -> Action {
        Action::Delete {
            at,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_simple_undo_redo() {
        let mut history = History::new();

        history.push(insert(0, "hello"));
        history.commit_pending();

        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert_eq!(history.undo(), Some(delete(0, "hello")));

        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(), Some(insert(0, "hello")));
    }

    #[test]
    fn test_merge_inserts() {
        let mut history = History::new();

        // Insert characters one by one
        history.push(insert(0, "h"));
        history.push(insert(1, "e"));
        history.push(insert(2, "l"));
        history.commit_pending();

        // Should be one action in stack
        assert_eq!(history.undo_stack.len(), 1);
        assert_eq!(history.undo(), Some(delete(0, "hel")));
    }

    #[test]
    fn test_merge_follows_bytes() {
        let mut history = History::new();
        history.push(insert(0, "e\u{301}"));
        history.push(insert(3, "x"));
        history.commit_pending();
        assert_eq!(history.undo_stack.len(), 1);

        // Not adjacent to the previous insertion
        history.push(insert(0, "a"));
        history.push(insert(2, "b"));
        history.commit_pending();
        assert_eq!(history.undo_stack.len(), 3);
    }

    #[test]
    fn test_merge_backspaces() {
        let mut history = History::new();

        // Consecutive backspace
        history.push(delete(3, "l"));
        history.push(delete(2, "l"));
        history.push(delete(1, "e"));
        history.commit_pending();

        assert_eq!(history.undo(), Some(insert(1, "ell")));
    }

    #[test]
    fn test_merge_backspaces_multibyte() {
        let mut history = History::new();
        history.push(delete(5, "\u{e9}"));
        history.push(delete(2, "\u{65e5}"));
        history.commit_pending();

        assert_eq!(history.undo(), Some(insert(2, "\u{65e5}\u{e9}")));
    }

    #[test]
    fn test_merge_forward_deletes() {
        let mut history = History::new();

        history.push(delete(1, "b"));
        history.push(delete(1, "c"));
        history.commit_pending();

        assert_eq!(history.undo(), Some(insert(1, "bc")));
    }

    #[test]
    fn test_newline_breaks_merge() {
        let mut history = History::new();

        history.push(insert(0, "h"));
        history.push(insert(1, "\n"));
        history.commit_pending();

        // Newline should break merging
        assert_eq!(history.undo_stack.len(), 2);
    }

    #[test]
    fn test_group_inverse_reverses_order() {
        let group = Action::Group {
            actions: vec![delete(0, "old"), insert(0, "new")],
        };
        assert_eq!(
            group.inverse(),
            Action::Group {
                actions: vec![delete(0, "new"), insert(0, "old")],
            }
        );
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::with_capacity(2);
        history.push(insert(0, "a\n"));
        history.push(insert(2, "b\n"));
        history.push(insert(4, "c\n"));
        history.commit_pending();

        assert_eq!(history.undo_stack.len(), 2);
        // Loaded state is no longer reachable
        assert_eq!(history.steps_to_save_point(), None);
        assert_eq!(history.redo_steps_to_save_point(), None);
    }

    #[test]
    fn test_save_point_tracking() {
        let mut history = History::new();
        assert!(history.is_at_save_point());

        history.push(insert(0, "a"));
        assert!(!history.is_at_save_point());
        assert_eq!(history.steps_to_save_point(), Some(1));

        history.mark_saved();
        assert!(history.is_at_save_point());

        history.push(insert(1, "\n"));
        history.push(insert(2, "c"));
        assert_eq!(history.steps_to_save_point(), Some(2));

        history.undo();
        history.undo();
        assert!(history.is_at_save_point());
        history.undo();
        assert!(!history.is_at_save_point());
        assert_eq!(history.steps_to_save_point(), None);
        assert_eq!(history.redo_steps_to_save_point(), Some(1));

        // New edit after undoing past the save point
        history.push(insert(0, "z"));
        assert_eq!(history.steps_to_save_point(), None);
        assert_eq!(history.redo_steps_to_save_point(), None);
        assert!(!history.is_at_save_point());
    }

    #[test]
    fn test_clear_resets_save_point() {
        let mut history = History::new();
        history.push(insert(0, "a"));
        history.clear();
        assert!(!history.can_undo());
        assert!(history.is_at_save_point());
    }
}
