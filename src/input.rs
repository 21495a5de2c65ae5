//! Input normalisation and click targets.
//!
//! Keyboard, mouse and touch all arrive as [`InputEvent`]s. Clicks are
//! resolved against the [`ClickTarget`]s the last frame registered, so a tap
//! always hits exactly what was drawn under it.

use ratzilla::ratatui::layout::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A typed character, case preserved.
    Key(char),
    /// Escape.
    Back,
    /// A tap on a registered target, identified by its action ID.
    Click(u16),
    /// Enter.
    Submit,
    /// Tab.
    NextField,
    /// Backspace.
    Erase,
}

impl InputEvent {
    /// The event as a screen command: letters fold to lowercase and
    /// Backspace means back. Text fields read the raw event instead.
    pub fn command(&self) -> InputEvent {
        match self {
            InputEvent::Key(c) => InputEvent::Key(c.to_ascii_lowercase()),
            InputEvent::Erase => InputEvent::Back,
            other => other.clone(),
        }
    }
}

/// A screen region that triggers an action when tapped.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared between the draw loop (which registers targets) and the mouse handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame at the given terminal size.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Full-width target on one row of `area`; rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a row of tab labels.
    ///
    /// `tab_widths` holds `(display_width, action_id)` per padded label. Each
    /// tab owns its label plus half of the separator on either side; the
    /// first and last tabs stretch to the edges of `total_width`.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        let n = tab_widths.len();
        if n == 0 || total_width == 0 {
            return;
        }

        let mut spans: Vec<(u16, u16)> = Vec::with_capacity(n);
        let mut cursor = 0u16;
        for (i, &(w, _)) in tab_widths.iter().enumerate() {
            if i > 0 {
                cursor += separator_width;
            }
            spans.push((cursor, cursor + w));
            cursor += w;
        }

        for (i, &(_, action_id)) in tab_widths.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let gap_start = spans[i - 1].1;
                gap_start + (spans[i].0 - gap_start) / 2
            };
            let right = if i == n - 1 {
                total_width
            } else {
                let gap_start = spans[i].1;
                gap_start + (spans[i + 1].0 - gap_start) / 2
            };
            let width = right.min(total_width).saturating_sub(left);
            self.add_click_target(Rect::new(x + left, y, width, height), action_id);
        }
    }

    /// Action under a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }

    /// Map a pixel position inside a grid of `grid_width × grid_height` pixels to an action.
    pub fn hit_test_pixels(&self, x: f64, y: f64, grid_width: f64, grid_height: f64) -> Option<u16> {
        let col = pixel_to_cell(x, grid_width, self.terminal_cols)?;
        let row = pixel_to_cell(y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

/// Narrow screens (phones) stack panels vertically.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Cell index along one axis, or `None` outside the grid.
pub fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}
