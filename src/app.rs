//! Main Application
//!
//! The App owns the TUI lifecycle:
//! - Event loop (keyboard, mouse, resize) over crossterm's async stream
//! - The acquisition state machine plus the single in-flight fetch
//! - Rendering of the three top-level screens and the detail overlay
//!
//! All state mutation happens here, serialized by the one loop: initial
//! mount, request settlement, retry, select, dismiss. Triggers that arrive
//! while a request is in flight are ignored by the state machine, so there
//! is never more than one outstanding request.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::export;
use crate::fetch::Fetcher;
use crate::provider::{FetchOutcome, TimelineProvider};
use crate::state::{AppState, LoadPhase};
use crate::ui::detail::{DetailView, DetailViewState};
use crate::ui::timeline::{TimelineView, TimelineViewState};
use crate::ui::{ErrorScreen, LoadingScreen};

/// Rows reserved for chrome: one header, one status line
const CHROME_ROWS: u16 = 2;

/// How long the transient export note stays in the status line
const NOTE_TTL: Duration = Duration::from_secs(3);

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Acquisition phase and selection
    state: AppState,
    /// Spawns fetch attempts and delivers settlements
    fetcher: Fetcher,
    /// Timeline scroll and click targets
    timeline_view: TimelineViewState,
    /// Overlay scroll and geometry
    detail_view: DetailViewState,
    /// Keyboard-focused card
    focused: usize,
    /// Frame counter for the spinner
    tick: u64,
    /// Terminal size
    size: (u16, u16),
    /// Transient status-line note (export feedback)
    note: Option<(String, Instant)>,
}

impl App {
    /// Create a new App around an injected provider
    pub fn new(provider: Arc<dyn TimelineProvider>) -> Self {
        Self {
            running: true,
            state: AppState::new(),
            fetcher: Fetcher::new(provider),
            timeline_view: TimelineViewState::default(),
            detail_view: DetailViewState::default(),
            focused: 0,
            tick: 0,
            size: (0, 0),
            note: None,
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~10 FPS keeps the spinner smooth without burning CPU
        let frame_duration = Duration::from_millis(100);
        let mut event_stream = EventStream::new();

        let size = terminal.size()?;
        self.size = (size.width, size.height);

        // Initial mount: the one automatic Idle -> Loading transition
        if self.state.begin_load() {
            self.fetcher.spawn();
        }
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        match event {
                            // Only Press events, not Release or Repeat
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key)
                            }
                            Event::Mouse(mouse) => self.handle_mouse(mouse),
                            Event::Resize(w, h) => self.size = (w, h),
                            _ => {}
                        }
                    }
                }

                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            // Apply any settled fetch; at most one can ever be pending
            while let Some(outcome) = self.fetcher.try_settle() {
                self.apply_settlement(outcome);
            }

            self.tick = self.tick.wrapping_add(1);
            if let Some((_, since)) = &self.note {
                if since.elapsed() > NOTE_TTL {
                    self.note = None;
                }
            }

            self.render(terminal)?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Apply one request settlement to the state machine
    fn apply_settlement(&mut self, outcome: FetchOutcome) {
        self.state.settle(outcome);
        self.focused = 0;
        self.timeline_view.scroll_to_top();
        self.detail_view.reset();
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: event::KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        // The overlay captures input while a figure is selected
        if self.state.has_selection() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => self.dismiss(),
                KeyCode::Up => self.detail_view.scroll_by(-1),
                KeyCode::Down => self.detail_view.scroll_by(1),
                KeyCode::PageUp => self.detail_view.scroll_by(-10),
                KeyCode::PageDown => self.detail_view.scroll_by(10),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.running = false,

            // Manual retry; ignored by the state machine unless in Error
            KeyCode::Char('r') => self.retry(),
            KeyCode::Enter if matches!(self.state.phase, LoadPhase::Error(_)) => self.retry(),

            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),
            KeyCode::PageUp => self.timeline_view.scroll_by(-(self.body_height() as i32 / 2)),
            KeyCode::PageDown => self.timeline_view.scroll_by(self.body_height() as i32 / 2),
            KeyCode::Home => {
                self.focused = 0;
                self.timeline_view.scroll_to_top();
            }
            KeyCode::End => {
                if let Some(timeline) = self.state.timeline() {
                    self.focused = timeline.len().saturating_sub(1);
                    self.timeline_view.ensure_visible(self.focused, self.body_height());
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => self.select(self.focused),
            KeyCode::Char('p') | KeyCode::Char('s') => self.export(),

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        if self.state.has_selection() {
            match mouse.kind {
                MouseEventKind::ScrollUp => self.detail_view.scroll_by(-3),
                MouseEventKind::ScrollDown => self.detail_view.scroll_by(3),
                MouseEventKind::Down(MouseButton::Left)
                    if self.detail_view.is_outside(mouse.column, mouse.row) =>
                {
                    self.dismiss()
                }
                _ => {}
            }
            return;
        }

        match mouse.kind {
            MouseEventKind::ScrollUp => self.timeline_view.scroll_by(-3),
            MouseEventKind::ScrollDown => self.timeline_view.scroll_by(3),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.timeline_view.hit_test(mouse.column, mouse.row) {
                    self.focused = index;
                    self.select(index);
                }
            }
            _ => {}
        }
    }

    /// Retry from Error; begin_load gates out every other phase
    fn retry(&mut self) {
        if self.state.begin_load() {
            self.fetcher.spawn();
        }
    }

    /// Move keyboard focus and keep the focused card on screen
    fn move_focus(&mut self, delta: i32) {
        let Some(timeline) = self.state.timeline() else {
            return;
        };
        if timeline.is_empty() {
            return;
        }
        let last = timeline.len() - 1;
        let next = (self.focused as i32 + delta).clamp(0, last as i32) as usize;
        self.focused = next;
        self.timeline_view.ensure_visible(next, self.body_height());
    }

    /// Open the overlay for the figure at `index`
    fn select(&mut self, index: usize) {
        if self.state.select(index) {
            self.detail_view.reset();
        }
    }

    /// Close the overlay; background scrolling resumes immediately
    fn dismiss(&mut self) {
        self.state.dismiss();
        self.detail_view.reset();
    }

    /// Export the current successful view; no state transition
    fn export(&mut self) {
        let Some(timeline) = self.state.timeline() else {
            return;
        };
        let note = match export::write_export(timeline, Path::new(export::EXPORT_FILE)) {
            Ok(()) => format!("已保存 {}", export::EXPORT_FILE),
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                "导出失败 Export failed".to_string()
            }
        };
        self.note = Some((note, Instant::now()));
    }

    /// Rows available to the timeline body
    fn body_height(&self) -> u16 {
        self.size.1.saturating_sub(CHROME_ROWS)
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            if area.height < 3 {
                return;
            }

            let header = Rect::new(area.x, area.y, area.width, 1);
            let body = Rect::new(area.x, area.y + 1, area.width, area.height - CHROME_ROWS);
            let status = Rect::new(area.x, area.y + area.height - 1, area.width, 1);

            crate::ui::render_header(header, frame.buffer_mut());

            match &self.state.phase {
                LoadPhase::Idle | LoadPhase::Loading => {
                    frame.render_widget(LoadingScreen { tick: self.tick }, body);
                }
                LoadPhase::Error(message) => {
                    frame.render_widget(ErrorScreen { message }, body);
                }
                LoadPhase::Success(timeline) => {
                    let focused = (!timeline.is_empty()).then_some(self.focused);
                    frame.render_stateful_widget(
                        TimelineView::new(timeline).focused(focused),
                        body,
                        &mut self.timeline_view,
                    );
                }
            }

            if let Some(figure) = self.state.selected_figure() {
                frame.render_stateful_widget(DetailView::new(figure), body, &mut self.detail_view);
            }

            let hints = if self.state.has_selection() {
                "↑/↓ 滚动 | Esc 关闭"
            } else {
                match self.state.phase {
                    LoadPhase::Error(_) => "r 重试 | q 退出",
                    LoadPhase::Success(_) => "↑/↓ 选择 | ⏎ 详情 | p 保存 | q 退出",
                    _ => "q 退出",
                }
            };
            crate::ui::render_status(
                status,
                frame.buffer_mut(),
                self.state.phase.description(),
                hints,
                self.note.as_ref().map(|(n, _)| n.as_str()),
            );
        })?;

        Ok(())
    }
}
