//! UI-specific state (ephemeral)

use std::collections::VecDeque;

use cmconv_core::ThemePreference;

const MAX_LOG_ENTRIES: usize = 200;

/// Window state that is not part of the conversion flow
pub struct UiState {
    pub theme: ThemePreference,

    /// Technical log visibility
    pub technical_log_expanded: bool,

    /// Technical log entries, oldest first
    pub technical_log: VecDeque<LogEntry>,

    /// Model info panel visibility
    pub model_info_expanded: bool,
}

impl UiState {
    pub fn new(theme: ThemePreference) -> Self {
        Self {
            theme,
            technical_log_expanded: false,
            technical_log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            model_info_expanded: true,
        }
    }

    /// Add a log entry, dropping the oldest past the cap
    pub fn add_log_entry(&mut self, entry: LogEntry) {
        if self.technical_log.len() >= MAX_LOG_ENTRIES {
            self.technical_log.pop_front();
        }
        self.technical_log.push_back(entry);
    }

    pub fn log_capacity(&self) -> usize {
        MAX_LOG_ENTRIES
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        };
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(ThemePreference::default())
    }
}

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

/// Log level for coloring
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: "00:00:00".to_string(),
            level: LogLevel::Info,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_log_is_capped() {
        let mut state = UiState::default();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            state.add_log_entry(entry(&i.to_string()));
        }
        assert_eq!(state.technical_log.len(), MAX_LOG_ENTRIES);
        assert_eq!(state.technical_log.front().unwrap().message, "5");
    }

    #[test]
    fn test_toggle_theme() {
        let mut state = UiState::new(ThemePreference::Dark);
        state.toggle_theme();
        assert_eq!(state.theme, ThemePreference::Light);
        state.toggle_theme();
        assert_eq!(state.theme, ThemePreference::Dark);
    }
}
