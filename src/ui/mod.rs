//! Presentation Layer
//!
//! Pure projections from application state to the frame: the three mutually
//! exclusive top-level screens (loading, error, timeline), the detail
//! overlay, and the header/status chrome.

pub mod detail;
pub mod timeline;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::theme;

/// Localized "generating" message shown while a request is in flight
pub const LOADING_MESSAGE: &str = "正在构建历史长河... Generating Timeline...";

/// Heading above the fixed error message
pub const ERROR_HEADING: &str = "Something went wrong";

/// Retry affordance shown in the error screen
pub const RETRY_HINT: &str = "[r] Retry / 重试";

/// Application title
pub const TITLE: &str = "法哲学史 Jurisprudence Timeline";

/// Spinner frames for the indeterminate progress indicator
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Indeterminate loading screen
pub struct LoadingScreen {
    /// Frame counter driving the spinner
    pub tick: u64,
}

impl Widget for LoadingScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }
        let mid = area.y + area.height / 2;
        let frame = SPINNER_FRAMES[(self.tick as usize) % SPINNER_FRAMES.len()];

        centered(buf, area, mid.saturating_sub(1), frame, Style::default().fg(theme::SPINNER));
        centered(
            buf,
            area,
            mid + 1,
            LOADING_MESSAGE,
            Style::default().fg(theme::STONE).add_modifier(Modifier::ITALIC),
        );
    }
}

/// Error screen: fixed message plus the retry affordance
pub struct ErrorScreen<'a> {
    /// The one fixed user-displayable message
    pub message: &'a str,
}

impl Widget for ErrorScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 5 {
            return;
        }
        let mid = area.y + area.height / 2;

        centered(buf, area, mid.saturating_sub(2), "📜", Style::default());
        centered(
            buf,
            area,
            mid.saturating_sub(1),
            ERROR_HEADING,
            Style::default().fg(theme::ERROR_RED).add_modifier(Modifier::BOLD),
        );
        centered(buf, area, mid, self.message, Style::default().fg(theme::STONE));
        centered(
            buf,
            area,
            mid + 2,
            RETRY_HINT,
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        );
    }
}

/// Render the one-row header: title left, provider note right
pub fn render_header(area: Rect, buf: &mut Buffer) {
    buf.set_string(
        area.x + 1,
        area.y,
        TITLE,
        Style::default().fg(theme::INK).add_modifier(Modifier::BOLD),
    );

    let note = "Powered by Gemini 2.5";
    let note_w = note.width() as u16;
    if area.width > note_w + TITLE.width() as u16 + 4 {
        buf.set_string(
            area.x + area.width - note_w - 1,
            area.y,
            note,
            Style::default().fg(theme::DIM_GRAY),
        );
    }
}

/// Render the one-row status line: phase, key hints, transient note
pub fn render_status(area: Rect, buf: &mut Buffer, phase: &str, hints: &str, note: Option<&str>) {
    let status = match note {
        Some(note) => format!(" {phase} | {hints} | {note}"),
        None => format!(" {phase} | {hints}"),
    };
    buf.set_string(
        area.x,
        area.y,
        crate::ui::timeline::truncate_width(&status, area.width as usize),
        Style::default().fg(theme::DIM_GRAY),
    );
}

/// Write one centered line
fn centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    if y < area.y || y >= area.y + area.height {
        return;
    }
    let clipped = timeline::truncate_width(text, area.width as usize);
    let pad = (area.width as usize).saturating_sub(clipped.width()) / 2;
    buf.set_string(area.x + pad as u16, y, &clipped, style);
}
