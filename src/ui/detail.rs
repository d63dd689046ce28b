//! Detail Overlay
//!
//! Modal surface for one selected figure: full theory paragraph, major
//! works, and key quotes, rendered above the timeline. Lines are pre-wrapped
//! to the inner width so the scroll clamp is exact. The rendered rectangle
//! is recorded in the state for outside-click dismissal.

use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, StatefulWidget, Widget};
use textwrap::wrap;

use crate::model::Philosopher;
use crate::theme;

/// Overlay scroll position and last rendered geometry
#[derive(Default)]
pub struct DetailViewState {
    /// Scroll offset in lines
    pub scroll: u16,
    /// Rectangle the overlay occupied on the last frame
    pub area: Rect,
    /// Wrapped content line count from the last frame
    pub total_lines: u16,
}

impl DetailViewState {
    /// Scroll by delta lines (positive = down)
    pub fn scroll_by(&mut self, delta: i32) {
        let next = self.scroll as i32 + delta;
        self.scroll = next.clamp(0, self.total_lines.saturating_sub(1) as i32) as u16;
    }

    /// Reset for a fresh selection
    pub fn reset(&mut self) {
        self.scroll = 0;
        self.total_lines = 0;
    }

    /// Whether an absolute screen position falls outside the overlay
    pub fn is_outside(&self, x: u16, y: u16) -> bool {
        !self.area.contains(Position { x, y })
    }
}

/// The overlay widget for one selected figure
pub struct DetailView<'a> {
    figure: &'a Philosopher,
}

impl<'a> DetailView<'a> {
    pub fn new(figure: &'a Philosopher) -> Self {
        Self { figure }
    }
}

impl StatefulWidget for DetailView<'_> {
    type State = DetailViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let overlay = overlay_rect(area);
        state.area = overlay;

        Clear.render(overlay, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(format!(" {} ", self.figure.name))
            .title_bottom(" Esc 关闭 / ↑↓ 滚动 ");
        let inner = block.inner(overlay);
        block.render(overlay, buf);

        if inner.width < 8 || inner.height == 0 {
            return;
        }

        let lines = detail_lines(self.figure, inner.width as usize);
        state.total_lines = lines.len() as u16;
        let max_scroll = state.total_lines.saturating_sub(inner.height);
        state.scroll = state.scroll.min(max_scroll);

        Paragraph::new(lines)
            .scroll((state.scroll, 0))
            .render(inner, buf);
    }
}

/// Centered overlay rectangle: ~80% of the view, capped for readability
pub fn overlay_rect(area: Rect) -> Rect {
    let width = (area.width * 4 / 5).clamp(20, 72).min(area.width);
    let height = (area.height * 4 / 5).max(8).min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Build the full, pre-wrapped content for one figure
fn detail_lines(figure: &Philosopher, width: usize) -> Vec<Line<'static>> {
    let header_style = Style::default()
        .fg(theme::INK)
        .add_modifier(Modifier::BOLD);
    let body_style = Style::default().fg(theme::STONE);

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled(
            figure.years.clone(),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("⟨{}⟩", figure.school_of_thought),
            Style::default().fg(theme::SCHOOL_TAG),
        ),
    ]));
    lines.push(Line::default());

    lines.push(Line::styled("理论核心 (Core Theory)", header_style));
    for wrapped in wrap(&figure.detailed_theory, width) {
        lines.push(Line::styled(wrapped.to_string(), body_style));
    }
    lines.push(Line::default());

    lines.push(Line::styled("代表著作 (Major Works)", header_style));
    if figure.major_works.is_empty() {
        lines.push(Line::styled("—", body_style));
    }
    for work in &figure.major_works {
        for (i, wrapped) in wrap(work, width.saturating_sub(2)).iter().enumerate() {
            let prefix = if i == 0 { "• " } else { "  " };
            lines.push(Line::styled(
                format!("{prefix}{wrapped}"),
                body_style.add_modifier(Modifier::ITALIC),
            ));
        }
    }
    lines.push(Line::default());

    lines.push(Line::styled("名言 (Key Quotes)", header_style));
    if figure.key_quotes.is_empty() {
        lines.push(Line::styled("—", body_style));
    }
    for quote in &figure.key_quotes {
        for wrapped in wrap(&format!("“{quote}”"), width.saturating_sub(2)) {
            lines.push(Line::styled(
                format!("│ {wrapped}"),
                Style::default()
                    .fg(theme::STONE)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
    }

    lines
}
