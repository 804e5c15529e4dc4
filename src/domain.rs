use std::io::Error;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::style::{Color, Modifier, Style};
use thiserror::Error;

/// Raised when a field name does not decompose into capitalized word runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot humanize field name {field:?}: no word run at byte {position}")]
pub struct FormatError {
    pub field: String,
    pub position: usize,
}

#[derive(Debug, Error)]
pub enum DTError {
    #[error("IO error: {0}")]
    IoError(#[from] Error),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Invalid JSON dataset: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    FormatError(#[from] FormatError),
    #[error("First record has no fields")]
    NoFields,
    #[error("Loading failed: {0}")]
    LoadingFailed(String),
    #[error("File not found")]
    FileNotFound,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Unknown file type")]
    UnknownFileType,
    #[error("Logging setup failed: {0}")]
    LoggingFailed(String),
}

/// What to do with a field name that fails to humanize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Abort the render with the `FormatError`.
    #[default]
    Strict,
    /// Use the raw field name as label.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub header_policy: HeaderPolicy,
    /// Records carry one trailing field that is never displayed.
    pub drop_trailing_field: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            header_policy: HeaderPolicy::Strict,
            drop_trailing_field: true,
        }
    }
}

/// Visual parameters shared by all output targets.
#[derive(Debug, Clone, PartialEq, Setters)]
pub struct TableStyle {
    pub header: Style,
    pub row: Style,
    pub highlight: Style,
    #[setters(into)]
    pub highlight_symbol: String,
    pub column_spacing: u16,
    pub max_column_width: usize,
    #[setters(strip_option, into)]
    pub html_class: Option<String>,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            row: Style::default(),
            highlight: Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            highlight_symbol: "▶ ".to_string(),
            column_spacing: 1,
            max_column_width: 40,
            html_class: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub event_poll_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    CopyRow,
    Resize(usize, usize),
}
