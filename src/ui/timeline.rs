//! Timeline View
//!
//! Renders the successful dataset as a vertical sequence of borderless
//! summary cards. Wide terminals get the alternating left/right layout
//! around a center line with one node per figure; narrow terminals collapse
//! to a single column. Scrolling is row-based over a virtual canvas; the
//! widget records the on-screen rectangle of every visible card so mouse
//! clicks can be hit-tested by the app.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{Philosopher, Timeline};
use crate::theme;

/// Below this width the alternating layout collapses to one column
pub const WIDE_BREAKPOINT: u16 = 70;

/// Rows of content per card: years, name, school, two summary lines, hint
pub const CARD_ROWS: u16 = 6;

/// Card rows plus the blank spacer row
pub const CARD_STRIDE: u16 = 7;

/// Rows taken by the introductory quotation
pub const INTRO_ROWS: u16 = 3;

const INTRO_QUOTE: &str = "“法学是关于神事和人事的事情的知识，是正义和非正义的科学。”";
const INTRO_ATTRIBUTION: &str = "— 查士丁尼《法学阶梯》";

/// Which side of the center line a card occupies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Even positions in wide layouts
    Left,
    /// Odd positions in wide layouts
    Right,
    /// Narrow layouts: full width, no center line
    Full,
}

/// Placement by position parity: even left, odd right, narrow always full
pub fn card_side(index: usize, width: u16) -> Side {
    if width < WIDE_BREAKPOINT {
        Side::Full
    } else if index % 2 == 0 {
        Side::Left
    } else {
        Side::Right
    }
}

/// Mutable view state: scroll position and click targets
#[derive(Default)]
pub struct TimelineViewState {
    /// Scroll offset in rows from the top of the virtual canvas
    pub scroll: u16,
    /// Total virtual rows, refreshed on every render
    pub total_rows: u16,
    /// On-screen rectangle and dataset index of every visible card
    pub hits: Vec<(Rect, usize)>,
}

impl TimelineViewState {
    /// Scroll by delta rows (positive = down); clamped on next render
    pub fn scroll_by(&mut self, delta: i32) {
        let next = self.scroll as i32 + delta;
        self.scroll = next.clamp(0, self.total_rows.saturating_sub(1) as i32) as u16;
    }

    /// Scroll back to the top
    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Adjust scroll so the card at `index` is fully visible
    pub fn ensure_visible(&mut self, index: usize, viewport: u16) {
        let first = INTRO_ROWS + index as u16 * CARD_STRIDE;
        let last = first + CARD_ROWS;
        if first < self.scroll {
            self.scroll = first;
        } else if last > self.scroll + viewport {
            self.scroll = last.saturating_sub(viewport);
        }
    }

    /// Card index under an absolute screen position, if any
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        self.hits
            .iter()
            .find(|(rect, _)| rect.contains(ratatui::layout::Position { x, y }))
            .map(|(_, index)| *index)
    }
}

/// The timeline widget for one frame
pub struct TimelineView<'a> {
    timeline: &'a Timeline,
    focused: Option<usize>,
}

impl<'a> TimelineView<'a> {
    pub fn new(timeline: &'a Timeline) -> Self {
        Self {
            timeline,
            focused: None,
        }
    }

    /// Highlight the keyboard-focused card
    pub fn focused(mut self, index: Option<usize>) -> Self {
        self.focused = index;
        self
    }
}

impl StatefulWidget for TimelineView<'_> {
    type State = TimelineViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.hits.clear();
        if area.width < 20 || area.height < 4 {
            return;
        }

        let count = self.timeline.len() as u16;
        // Intro, one stride per card, one row for the end mark
        state.total_rows = INTRO_ROWS + count * CARD_STRIDE + 1;
        let max_scroll = state.total_rows.saturating_sub(area.height);
        state.scroll = state.scroll.min(max_scroll);

        let wide = area.width >= WIDE_BREAKPOINT;
        let mid = area.width / 2;
        let scroll = state.scroll;
        let total_rows = state.total_rows;

        // Maps a virtual row to a screen row inside `area`
        let screen_row = move |virtual_row: u16| -> Option<u16> {
            let row = virtual_row.checked_sub(scroll)?;
            (row < area.height).then_some(area.y + row)
        };

        self.render_intro(area, buf, &screen_row);

        if wide {
            self.render_center_line(area, buf, mid, total_rows, &screen_row);
        }

        for (index, figure) in self.timeline.philosophers.iter().enumerate() {
            let first = INTRO_ROWS + index as u16 * CARD_STRIDE;
            let is_focused = self.focused == Some(index);
            let region = card_region(area, card_side(index, area.width), mid);

            let lines = card_lines(figure, region.width as usize, is_focused);
            let align_right = matches!(card_side(index, area.width), Side::Left);

            let mut first_visible: Option<u16> = None;
            let mut visible_rows = 0u16;

            for (offset, (text, style)) in lines.iter().enumerate() {
                let Some(y) = screen_row(first + offset as u16) else {
                    continue;
                };
                if first_visible.is_none() {
                    first_visible = Some(y);
                }
                visible_rows += 1;

                let clipped = truncate_width(text, region.width as usize);
                let x = if align_right {
                    region.x + region.width - clipped.width() as u16
                } else {
                    region.x
                };
                buf.set_string(x, y, &clipped, *style);
            }

            // Node marker on the center line at the card's first row
            if wide {
                if let Some(y) = screen_row(first) {
                    let glyph = if is_focused { "◆" } else { "●" };
                    buf.set_string(area.x + mid, y, glyph, Style::default().fg(theme::ACCENT));
                }
            }

            if let Some(y) = first_visible {
                state
                    .hits
                    .push((Rect::new(region.x, y, region.width, visible_rows), index));
            }
        }

        // End mark below the last card
        if let Some(y) = screen_row(INTRO_ROWS + count * CARD_STRIDE) {
            let x = if wide { area.x + mid } else { area.x + area.width / 2 };
            buf.set_string(x, y, "◆", Style::default().fg(theme::DIM_GRAY));
        }
    }
}

impl TimelineView<'_> {
    fn render_intro(&self, area: Rect, buf: &mut Buffer, screen_row: &dyn Fn(u16) -> Option<u16>) {
        let quote_style = Style::default()
            .fg(theme::STONE)
            .add_modifier(Modifier::ITALIC);
        if let Some(y) = screen_row(0) {
            set_centered(buf, area, y, INTRO_QUOTE, quote_style);
        }
        if let Some(y) = screen_row(1) {
            set_centered(
                buf,
                area,
                y,
                INTRO_ATTRIBUTION,
                Style::default().fg(theme::STONE).add_modifier(Modifier::BOLD),
            );
        }
    }

    fn render_center_line(
        &self,
        area: Rect,
        buf: &mut Buffer,
        mid: u16,
        total_rows: u16,
        screen_row: &dyn Fn(u16) -> Option<u16>,
    ) {
        let style = Style::default().fg(theme::TIMELINE_LINE);
        let last_row = total_rows.saturating_sub(1);
        for virtual_row in INTRO_ROWS..last_row {
            if let Some(y) = screen_row(virtual_row) {
                buf.set_string(area.x + mid, y, "│", style);
            }
        }
    }
}

/// Horizontal region a card's text occupies
fn card_region(area: Rect, side: Side, mid: u16) -> Rect {
    match side {
        Side::Left => Rect::new(area.x + 1, area.y, mid.saturating_sub(4), area.height),
        Side::Right => Rect::new(
            area.x + mid + 3,
            area.y,
            area.width.saturating_sub(mid + 4),
            area.height,
        ),
        Side::Full => Rect::new(area.x + 2, area.y, area.width.saturating_sub(4), area.height),
    }
}

/// The six content rows of one card
fn card_lines(figure: &Philosopher, width: usize, focused: bool) -> Vec<(String, Style)> {
    let name_style = if focused {
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::INK).add_modifier(Modifier::BOLD)
    };

    let summary = wrap_bounded(&figure.short_summary, width, 2);
    let hint = if focused {
        "⏎ 点击查看详情".to_string()
    } else {
        String::new()
    };

    vec![
        (
            figure.years.clone(),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
        (figure.name.clone(), name_style),
        (
            format!("⟨{}⟩", figure.school_of_thought),
            Style::default().fg(theme::SCHOOL_TAG),
        ),
        (
            summary.first().cloned().unwrap_or_default(),
            Style::default().fg(theme::STONE),
        ),
        (
            summary.get(1).cloned().unwrap_or_default(),
            Style::default().fg(theme::STONE),
        ),
        (hint, Style::default().fg(theme::ACCENT)),
    ]
}

/// Wrap text to at most `max_lines`, ellipsizing the last line on overflow
pub fn wrap_bounded(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }
    let wrapped = wrap(text, width);
    let mut lines: Vec<String> = wrapped
        .iter()
        .take(max_lines)
        .map(|cow| cow.to_string())
        .collect();
    if wrapped.len() > max_lines {
        if let Some(last) = lines.last_mut() {
            *last = format!("{}…", truncate_width(last, width.saturating_sub(2)));
        }
    }
    lines
}

/// Truncate a string to a display width, CJK-aware
pub fn truncate_width(text: &str, max_width: usize) -> String {
    let mut taken = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        taken.push(ch);
    }
    taken
}

/// Write a line centered within `area` at row `y`
fn set_centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let clipped = truncate_width(text, area.width as usize);
    let pad = (area.width as usize).saturating_sub(clipped.width()) / 2;
    buf.set_string(area.x + pad as u16, y, &clipped, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_figure;
    use pretty_assertions::assert_eq;

    fn timeline(n: u32) -> Timeline {
        Timeline {
            philosophers: (0..n).map(|i| sample_figure(i + 1, &format!("F{i}"))).collect(),
        }
    }

    // ========================================================================
    // Placement
    // ========================================================================

    #[test]
    fn test_card_side_alternates_in_wide_layout() {
        assert_eq!(card_side(0, 100), Side::Left);
        assert_eq!(card_side(1, 100), Side::Right);
        assert_eq!(card_side(2, 100), Side::Left);
        assert_eq!(card_side(3, 100), Side::Right);
    }

    #[test]
    fn test_card_side_collapses_when_narrow() {
        assert_eq!(card_side(0, 60), Side::Full);
        assert_eq!(card_side(1, 60), Side::Full);
        assert_eq!(card_side(0, WIDE_BREAKPOINT), Side::Left);
        assert_eq!(card_side(0, WIDE_BREAKPOINT - 1), Side::Full);
    }

    // ========================================================================
    // Text Bounds
    // ========================================================================

    #[test]
    fn test_truncate_width_ascii() {
        assert_eq!(truncate_width("hello world", 5), "hello");
        assert_eq!(truncate_width("hi", 5), "hi");
    }

    #[test]
    fn test_truncate_width_cjk_counts_double_cells() {
        // Each CJK glyph occupies two cells
        assert_eq!(truncate_width("法哲学史", 4), "法哲");
        assert_eq!(truncate_width("法哲学史", 5), "法哲");
    }

    #[test]
    fn test_wrap_bounded_limits_lines() {
        let lines = wrap_bounded("one two three four five six seven eight", 10, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
    }

    #[test]
    fn test_wrap_bounded_short_text_untouched() {
        let lines = wrap_bounded("short", 20, 2);
        assert_eq!(lines, vec!["short"]);
    }

    // ========================================================================
    // Scrolling and Hit Testing
    // ========================================================================

    #[test]
    fn test_ensure_visible_scrolls_down_and_up() {
        let mut state = TimelineViewState {
            total_rows: 100,
            ..Default::default()
        };

        state.ensure_visible(5, 20);
        let first = INTRO_ROWS + 5 * CARD_STRIDE;
        assert_eq!(state.scroll, first + CARD_ROWS - 20);

        state.ensure_visible(0, 20);
        assert_eq!(state.scroll, INTRO_ROWS);
    }

    #[test]
    fn test_render_registers_hits_in_dataset_order() {
        let data = timeline(2);
        let area = Rect::new(0, 0, 100, 40);
        let mut buf = Buffer::empty(area);
        let mut state = TimelineViewState::default();

        TimelineView::new(&data).render(area, &mut buf, &mut state);

        assert_eq!(state.hits.len(), 2);
        assert_eq!(state.hits[0].1, 0);
        assert_eq!(state.hits[1].1, 1);
        // Even index left of the center line, odd index right of it
        assert!(state.hits[0].0.x < 50);
        assert!(state.hits[1].0.x > 50);

        let (first_rect, _) = state.hits[0];
        assert_eq!(
            state.hit_test(first_rect.x + 1, first_rect.y + 1),
            Some(0)
        );
        assert_eq!(state.hit_test(99, 39), None);
    }

    #[test]
    fn test_render_narrow_uses_full_width_cards() {
        let data = timeline(2);
        let area = Rect::new(0, 0, 50, 40);
        let mut buf = Buffer::empty(area);
        let mut state = TimelineViewState::default();

        TimelineView::new(&data).render(area, &mut buf, &mut state);

        assert_eq!(state.hits.len(), 2);
        assert_eq!(state.hits[0].0.x, state.hits[1].0.x);
        assert_eq!(state.hits[0].0.width, 46);
    }

    #[test]
    fn test_render_clamps_scroll() {
        let data = timeline(3);
        let area = Rect::new(0, 0, 100, 40);
        let mut buf = Buffer::empty(area);
        let mut state = TimelineViewState {
            scroll: 500,
            ..Default::default()
        };

        TimelineView::new(&data).render(area, &mut buf, &mut state);
        assert!(state.scroll <= state.total_rows);
        assert_eq!(state.total_rows, INTRO_ROWS + 3 * CARD_STRIDE + 1);
    }

    #[test]
    fn test_scroll_by_clamps_at_zero() {
        let mut state = TimelineViewState {
            total_rows: 50,
            scroll: 2,
            ..Default::default()
        };
        state.scroll_by(-10);
        assert_eq!(state.scroll, 0);
        state.scroll_by(3);
        assert_eq!(state.scroll, 3);
    }
}
