//! Pipeline notification events and the verbosity filter applied to them.

use std::str::FromStr;

use crate::error::CoreError;

/// Which events are forwarded to the notification channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyMode {
    /// Every success and every error.
    #[default]
    All,
    /// Successes of the first (base) variant only, plus every error.
    BaseOnly,
    /// Errors only.
    ErrorsOnly,
    /// Nothing.
    Off,
}

impl NotifyMode {
    /// Whether `event` passes this mode's filter.
    pub fn allows(&self, event: &Notification) -> bool {
        match (self, event) {
            (NotifyMode::Off, _) => false,
            (NotifyMode::All, _) => true,
            (NotifyMode::BaseOnly, Notification::ImageReady { is_base, .. }) => *is_base,
            (NotifyMode::ErrorsOnly, Notification::ImageReady { .. }) => false,
            (_, Notification::GenerationFailed { .. }) => true,
        }
    }
}

impl FromStr for NotifyMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(NotifyMode::All),
            "base_only" => Ok(NotifyMode::BaseOnly),
            "errors_only" => Ok(NotifyMode::ErrorsOnly),
            "off" => Ok(NotifyMode::Off),
            other => Err(CoreError::Configuration(format!(
                "Invalid notify mode '{other}'. Must be one of: all, base_only, errors_only, off"
            ))),
        }
    }
}

/// An event emitted by the row processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A variant was generated, uploaded and recorded.
    ImageReady {
        spreadsheet_id: String,
        row_number: u32,
        index: String,
        file_id: String,
        prompt: String,
        /// First variant of a normal run (the one written to the base row).
        is_base: bool,
    },
    /// A variant failed; the row was rewritten to ERROR.
    GenerationFailed {
        spreadsheet_id: String,
        row_number: u32,
        index: String,
        prompt: String,
        error: String,
    },
}

impl Notification {
    pub fn row_number(&self) -> u32 {
        match self {
            Notification::ImageReady { row_number, .. }
            | Notification::GenerationFailed { row_number, .. } => *row_number,
        }
    }
}
