//! The capture sequence: one browser session, two captures

use std::path::PathBuf;
use std::time::Duration;

use tiltshot_browser::{BrowserSession, SessionConfig};
use tracing::{debug, info, warn};

use crate::capture::{self, CaptureDiff};
use crate::error::{Result, VerifyError};

/// Perspective origin X input field
const PERSP_X_FIELD: &str = "#perspX";

/// Perspective origin Y input field
const PERSP_Y_FIELD: &str = "#perspY";

/// Page hook that re-applies the perspective from the fields
const UPDATE_HOOK: &str = "updatePerspective()";

/// Settings for one verification run
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Page to load, resolved relative to the working directory
    pub page: PathBuf,

    /// Selector whose presence marks the page as rendered
    pub ready_selector: String,

    /// Viewport width in pixels
    pub viewport_width: u32,

    /// Viewport height in pixels
    pub viewport_height: u32,

    /// Value written to the perspective X field
    pub persp_x: String,

    /// Value written to the perspective Y field
    pub persp_y: String,

    /// Pause after the perspective update before the second capture
    pub settle: Duration,

    /// How long to wait for the ready selector
    pub ready_timeout: Duration,

    /// Output path of the first capture
    pub first_capture: PathBuf,

    /// Output path of the second capture
    pub second_capture: PathBuf,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            page: PathBuf::from("index.html"),
            ready_selector: ".tile".to_string(),
            viewport_width: 1200,
            viewport_height: 800,
            persp_x: "70".to_string(),
            persp_y: "30".to_string(),
            settle: Duration::from_millis(500),
            ready_timeout: Duration::from_secs(10),
            first_capture: PathBuf::from("3d_tilt_45.png"),
            second_capture: PathBuf::from("3d_tilt_70_rot_30.png"),
        }
    }
}

/// What a completed run produced
#[derive(Debug)]
pub struct VerifyReport {
    pub first_capture: PathBuf,
    pub second_capture: PathBuf,
    pub diff: CaptureDiff,
}

/// Run the full sequence: launch, load, capture, retarget, capture again.
pub async fn run(config: VerifyConfig) -> Result<VerifyReport> {
    if !config.page.exists() {
        return Err(VerifyError::PageNotFound(config.page));
    }

    let session = BrowserSession::launch(SessionConfig {
        viewport_width: config.viewport_width,
        viewport_height: config.viewport_height,
        ..SessionConfig::default()
    })
    .await?;

    let report = drive(&session, &config).await;

    match report {
        Ok(report) => {
            session.close().await?;
            Ok(report)
        }
        Err(e) => {
            // A failed close on the error path must not mask the original error
            if let Err(close_err) = session.close().await {
                warn!("Browser close failed after error: {}", close_err);
            }
            Err(e)
        }
    }
}

async fn drive(session: &BrowserSession, config: &VerifyConfig) -> Result<VerifyReport> {
    info!("Loading {}", config.page.display());
    session.goto_file(&config.page).await?;
    session
        .wait_for_selector(&config.ready_selector, config.ready_timeout)
        .await?;

    session.screenshot_to_file(&config.first_capture).await?;
    println!("Captured {}", config.first_capture.display());

    info!(
        "Retargeting perspective to ({}, {})",
        config.persp_x, config.persp_y
    );
    session.fill(PERSP_X_FIELD, &config.persp_x).await?;
    session.fill(PERSP_Y_FIELD, &config.persp_y).await?;
    session.invoke(UPDATE_HOOK).await?;

    // Fixed pause for the transform to settle; the page exposes no
    // render-complete signal to wait on.
    tokio::time::sleep(config.settle).await;

    session.screenshot_to_file(&config.second_capture).await?;
    println!("Captured {}", config.second_capture.display());

    let diff = capture::compare_captures(&config.first_capture, &config.second_capture)?;
    if diff.identical {
        warn!("Captures are pixel-identical; the perspective change had no visible effect");
    } else {
        debug!(
            "{} of {} pixels differ ({:.2}%)",
            diff.diff_pixels, diff.total_pixels, diff.diff_percent
        );
    }

    Ok(VerifyReport {
        first_capture: config.first_capture.clone(),
        second_capture: config.second_capture.clone(),
        diff,
    })
}
