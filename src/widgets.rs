//! Clickable UI components.
//!
//! Each component draws itself and registers the click targets for what it
//! drew, so the two cannot drift apart.
//!
//! - [`TabBar`]: one row of tabs with a highlighted active tab.
//! - [`ClickableList`]: lines of text, some of which are buttons.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Daily", PERIOD_DAILY)
///     .tab("Weekly", PERIOD_WEEKLY)
///     .active(1)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, u16)>,
    active: Option<usize>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, action_id: u16) -> Self {
        self.tabs.push((label.into(), action_id));
        self
    }

    pub fn active(mut self, index: usize) -> Self {
        self.active = Some(index);
        self
    }

    /// Borders are accounted for when placing click targets.
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn style_for(&self, index: usize) -> Style {
        if self.active == Some(index) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let sep_width = Line::from(self.separator).width() as u16;
        let mut spans: Vec<Span> = Vec::new();
        let mut tab_widths: Vec<(u16, u16)> = Vec::with_capacity(self.tabs.len());

        for (i, (label, action_id)) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.separator,
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let padded = format!(" {label} ");
            tab_widths.push((Line::from(padded.as_str()).width() as u16, *action_id));
            spans.push(Span::styled(padded, self.style_for(i)));
        }

        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };
        let paragraph = match self.block {
            Some(block) => Paragraph::new(Line::from(spans)).block(block),
            None => Paragraph::new(Line::from(spans)),
        };
        f.render_widget(paragraph, area);

        // inner x/width for column accuracy, outer y/height for tap tolerance
        cs.register_tab_targets(
            &tab_widths,
            sep_width,
            inner.x,
            area.y,
            inner.width,
            area.height.max(1),
        );
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines paired with the actions of the ones that are buttons.
///
/// A target is bound to its line, not to a row number, so inserting lines
/// above a button moves its target with it.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    /// Button line rendered as `" [key] label"`.
    pub fn push_choice(&mut self, key: char, label: impl Into<String>, action_id: u16) {
        self.push_choice_styled(key, label, action_id, Style::default().fg(Color::White));
    }

    /// Button line that is shown but currently unavailable.
    pub fn push_choice_dim(&mut self, key: char, label: impl Into<String>, action_id: u16) {
        self.push_choice_styled(key, label, action_id, Style::default().fg(Color::DarkGray));
    }

    fn push_choice_styled(&mut self, key: char, label: impl Into<String>, action_id: u16, style: Style) {
        let line = Line::from(vec![
            Span::styled(
                format!(" [{}] ", key.to_ascii_uppercase()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(label.into(), style),
        ]);
        self.push_clickable(line, action_id);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register targets for every button line.
    ///
    /// * `top_offset` / `bottom_offset`: rows taken by borders or padding.
    /// * `inner_width`: content width when the paragraph wraps, `0` when it
    ///   does not (one line per row).
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let mut row_of_line: Vec<(u16, u16)> = Vec::with_capacity(self.lines.len());
        let mut cursor = 0u16;
        for line in &self.lines {
            let width = line.width();
            let rows = if inner_width == 0 || width <= inner_width as usize {
                1
            } else {
                width.div_ceil(inner_width as usize) as u16
            };
            row_of_line.push((cursor, rows));
            cursor += rows;
        }

        for &(line_idx, action_id) in &self.actions {
            let Some(&(start, rows)) = row_of_line.get(line_idx as usize) else {
                continue;
            };
            for r in start..start + rows {
                let screen_row = content_y + r;
                if screen_row >= content_end {
                    break;
                }
                cs.add_row_target(area, screen_row, action_id);
            }
        }
    }
}
