use linedit_buffer::Point;

/// Viewport over window space.
///
/// Tracks which wrapped rows (and, without wrapping, which columns) are
/// on screen. Viewport space is window space minus this offset.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// First visible row (0-based)
    pub top_row: usize,
    /// Number of visible rows
    pub height: usize,
    /// Horizontal scroll (left column)
    pub left_column: usize,
    /// Width of visible area
    pub width: usize,
}

impl Viewport {
    /// Create a new viewport
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            top_row: 0,
            height,
            left_column: 0,
            width,
        }
    }

    /// Update viewport dimensions
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Index past the last visible row
    pub fn bottom_row(&self) -> usize {
        self.top_row + self.height
    }

    /// Index past the last visible column
    pub fn right_column(&self) -> usize {
        self.left_column + self.width
    }

    /// Check if row is visible
    pub fn is_row_visible(&self, row: usize) -> bool {
        row >= self.top_row && row < self.bottom_row()
    }

    /// Check if column is visible
    pub fn is_column_visible(&self, column: usize) -> bool {
        column >= self.left_column && column < self.right_column()
    }

    /// Check if a window-space cursor is visible
    pub fn is_cursor_visible(&self, cursor: &Point) -> bool {
        self.is_row_visible(cursor.line) && self.is_column_visible(cursor.column)
    }

    /// Scroll vertically so `row` is visible.
    /// Returns true if viewport was changed
    pub fn ensure_row_visible(&mut self, row: usize, total_rows: usize) -> bool {
        let mut changed = false;

        if row < self.top_row {
            // Row above viewport - scroll up
            self.top_row = row;
            changed = true;
        } else if row >= self.bottom_row() {
            // Row below viewport - scroll down
            self.top_row = row.saturating_sub(self.height.saturating_sub(1));
            changed = true;
        }

        // Limit top_row to avoid empty space at bottom
        let max_top = total_rows.saturating_sub(self.height);
        if self.top_row > max_top {
            self.top_row = max_top;
            changed = true;
        }

        changed
    }

    /// Scroll horizontally so `column` is visible.
    /// Returns true if viewport was changed
    pub fn ensure_column_visible(&mut self, column: usize) -> bool {
        if column < self.left_column {
            self.left_column = column;
            true
        } else if column >= self.right_column() {
            self.left_column = column.saturating_sub(self.width.saturating_sub(1));
            true
        } else {
            false
        }
    }

    /// Scroll viewport to make cursor visible
    /// Returns true if viewport was changed
    pub fn ensure_cursor_visible(&mut self, cursor: &Point, total_rows: usize) -> bool {
        let vertical = self.ensure_row_visible(cursor.line, total_rows);
        let horizontal = self.ensure_column_visible(cursor.column);
        vertical || horizontal
    }

    /// Scroll up by N rows
    pub fn scroll_up(&mut self, rows: usize) -> bool {
        if self.top_row > 0 {
            self.top_row = self.top_row.saturating_sub(rows);
            true
        } else {
            false
        }
    }

    /// Scroll down by N rows
    pub fn scroll_down(&mut self, rows: usize, total_rows: usize) -> bool {
        let max_top = total_rows.saturating_sub(self.height);
        if self.top_row < max_top {
            self.top_row = (self.top_row + rows).min(max_top);
            true
        } else {
            false
        }
    }

    /// Scroll to document start
    pub fn scroll_to_top(&mut self) -> bool {
        let changed = self.top_row != 0 || self.left_column != 0;
        self.top_row = 0;
        self.left_column = 0;
        changed
    }

    /// Center viewport on a row
    pub fn center_on_row(&mut self, row: usize, total_rows: usize) -> bool {
        let target_top = row.saturating_sub(self.height / 2);
        let max_top = total_rows.saturating_sub(self.height);
        let new_top = target_top.min(max_top);

        if self.top_row != new_top {
            self.top_row = new_top;
            true
        } else {
            false
        }
    }

    /// Window point relative to viewport start, if visible
    pub fn window_to_viewport(&self, cursor: &Point) -> Option<Point> {
        if !self.is_cursor_visible(cursor) {
            return None;
        }

        Some(Point::at(
            cursor.line - self.top_row,
            cursor.column - self.left_column,
        ))
    }

    /// Convert viewport position to window position
    pub fn viewport_to_window(&self, position: Point) -> Point {
        Point::at(
            self.top_row + position.line,
            self.left_column + position.column,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
