//! Acquisition and Selection State
//!
//! Owns the lifecycle of the single fetch attempt (idle/loading/success/error
//! with manual retry) and the overlay selection. All mutation goes through
//! the methods here, driven by the one event loop; nothing else touches it.

use crate::model::{Philosopher, Timeline};
use crate::provider::{FetchOutcome, ProviderError};

/// The one message users ever see for a failed load, regardless of cause
pub const LOAD_ERROR_MESSAGE: &str = "无法加载数据。请检查 API Key 配置或网络连接。";

/// Lifecycle status of the current fetch attempt.
///
/// Exactly one phase holds at any time. `Success` is terminal: there is no
/// auto-refresh, and the only way out is restarting the application.
#[derive(Debug, Default)]
pub enum LoadPhase {
    /// Before the initial load kicks off; transient
    #[default]
    Idle,
    /// One request is in flight; further start/retry triggers are ignored
    Loading,
    /// The validated dataset, shown until the session ends
    Success(Timeline),
    /// Fixed user-displayable message; full detail went to the log
    Error(String),
}

impl LoadPhase {
    /// Short status-line description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Idle => "starting",
            Self::Loading => "generating",
            Self::Success(_) => "ready",
            Self::Error(_) => "error",
        }
    }
}

/// Top-level application state: acquisition phase plus selection.
///
/// Selection is an index into the current dataset and only meaningful while
/// the phase is `Success`.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current acquisition phase
    pub phase: LoadPhase,
    /// Index of the figure shown in the detail overlay, if any
    selected: Option<usize>,
}

impl AppState {
    /// Fresh state: `Idle`, nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to enter `Loading`.
    ///
    /// Returns true when a request should actually be issued. Triggers while
    /// already `Loading` are ignored, and `Success` is terminal, so both
    /// return false.
    pub fn begin_load(&mut self) -> bool {
        match self.phase {
            LoadPhase::Idle | LoadPhase::Error(_) => {
                self.phase = LoadPhase::Loading;
                true
            }
            LoadPhase::Loading | LoadPhase::Success(_) => false,
        }
    }

    /// Apply the settlement of the in-flight request.
    ///
    /// Any provider error collapses to the one fixed user message; the real
    /// error is logged in full for diagnostics.
    pub fn settle(&mut self, outcome: FetchOutcome) {
        if !matches!(self.phase, LoadPhase::Loading) {
            tracing::warn!("settlement received outside Loading; dropped");
            return;
        }

        match outcome {
            Ok(timeline) => {
                tracing::info!(figures = timeline.len(), "timeline acquired");
                self.phase = LoadPhase::Success(timeline);
            }
            Err(error) => {
                log_failure(&error);
                self.phase = LoadPhase::Error(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        self.selected = None;
    }

    /// Whether a request is currently in flight
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading)
    }

    /// The dataset, present only in `Success`
    pub fn timeline(&self) -> Option<&Timeline> {
        match &self.phase {
            LoadPhase::Success(timeline) => Some(timeline),
            _ => None,
        }
    }

    /// The fixed error message, present only in `Error`
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Select the figure at `index` for the detail overlay.
    ///
    /// Only meaningful with a dataset present; out-of-range or phase-invalid
    /// selections are ignored. Returns whether the selection took effect.
    pub fn select(&mut self, index: usize) -> bool {
        match self.timeline() {
            Some(timeline) if index < timeline.len() => {
                self.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Clear the selection, closing the overlay
    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    /// Index of the selected figure, if any
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The selected figure, if any
    pub fn selected_figure(&self) -> Option<&Philosopher> {
        let index = self.selected?;
        self.timeline()?.get(index)
    }

    /// Whether the detail overlay is open (background scroll is locked)
    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }
}

/// Log one failed acquisition with full detail; users only ever see
/// [`LOAD_ERROR_MESSAGE`].
fn log_failure(error: &ProviderError) {
    match error {
        ProviderError::MissingApiKey => {
            tracing::error!("timeline acquisition failed: no API key configured")
        }
        ProviderError::Transport(e) => {
            tracing::error!(error = %e, "timeline acquisition failed: transport")
        }
        ProviderError::EmptyResponse => {
            tracing::error!("timeline acquisition failed: empty response body")
        }
        ProviderError::Parse(detail) => {
            tracing::error!(%detail, "timeline acquisition failed: schema violation")
        }
    }
}
