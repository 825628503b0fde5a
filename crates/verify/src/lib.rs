//! Capture verification for the 3D tilt page
//!
//! Drives one headless browser session through a fixed sequence: load the
//! page, wait for the tile grid, capture the default 45/45 perspective,
//! retarget the perspective fields to 70/30 through the page's own update
//! hook, and capture again. The two captures land in the working directory
//! and are pixel-compared so a run that produced no visible change is
//! flagged on stderr.

pub mod capture;
pub mod error;
pub mod sequence;

pub use capture::{compare_captures, CaptureDiff};
pub use error::{Result, VerifyError};
pub use sequence::{run, VerifyConfig, VerifyReport};
