//! Error types for the browser session layer

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the session layer Error
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No Chrome or Chromium installation found")]
    BrowserNotFound,

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Page file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out after {ms}ms waiting for '{selector}'")]
    SelectorTimeout { selector: String, ms: u64 },

    #[error("Fill of '{selector}' read back '{actual}', expected '{expected}'")]
    FillReadback {
        selector: String,
        expected: String,
        actual: String,
    },

    #[error("Script evaluation failed: {0}")]
    Evaluate(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
