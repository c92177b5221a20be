//! State machine for Desktop Agent

use export::SavedCapture;

/// Application state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Ready to capture
    Idle,
    /// Capture sent to the worker
    Capturing,
}

impl AppState {
    /// Get display text for current state
    pub fn display_text(&self) -> &'static str {
        match self {
            AppState::Idle => "Ready",
            AppState::Capturing => "Capturing...",
        }
    }

    /// Check if capture button should be enabled
    pub fn can_capture(&self) -> bool {
        matches!(self, AppState::Idle)
    }
}

/// State machine transitions
pub struct StateMachine {
    state: AppState,
    last_saved: Option<SavedCapture>,
    capture_count: usize,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: AppState::Idle,
            last_saved: None,
            capture_count: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Most recent successful capture
    pub fn last_saved(&self) -> Option<&SavedCapture> {
        self.last_saved.as_ref()
    }

    /// Captures saved this run
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Transition to capturing state
    pub fn start_capture(&mut self) -> bool {
        if self.state.can_capture() {
            self.state = AppState::Capturing;
            true
        } else {
            false
        }
    }

    /// Capture written, back to idle
    pub fn finish_capture(&mut self, saved: SavedCapture) -> bool {
        if matches!(self.state, AppState::Capturing) {
            self.last_saved = Some(saved);
            self.capture_count += 1;
            self.state = AppState::Idle;
            true
        } else {
            false
        }
    }

    /// Capture failed or was cancelled, back to idle
    pub fn cancel_capture(&mut self) -> bool {
        if matches!(self.state, AppState::Capturing) {
            self.state = AppState::Idle;
            true
        } else {
            false
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
