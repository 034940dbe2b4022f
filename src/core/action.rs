//! Actions that modules can return to communicate with the app

/// Actions returned by modules to communicate state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Validate the form and fetch samples
    Submit,

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Copy text to the system clipboard
    Copy(String),

    /// Write the last result to disk (optional target path)
    Export(Option<String>),

    /// Move focus to the next widget
    FocusNext,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
