//! Error types for the verification run

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using VerifyError
pub type Result<T> = std::result::Result<T, VerifyError>;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Page not found: {}", .0.display())]
    PageNotFound(PathBuf),

    #[error("Browser error: {0}")]
    Browser(#[from] tiltshot_browser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
