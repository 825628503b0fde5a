//! Headless Chrome session driving a single page over CDP
//!
//! One session owns one browser process and one page. All operations are
//! async and fail with typed errors carrying the engine's diagnostics.

use std::path::Path;
use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::detect::detect_browser;
use crate::error::{Error, Result};

/// Interval between attempts while polling for a selector.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a browser session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub headless: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            headless: true,
        }
    }
}

/// A running headless browser with a single open page.
///
/// Dropping a session without calling [`close`](Self::close) still
/// terminates the child process; the CDP library kills it on drop. The
/// explicit close is the clean path.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a browser and open a blank page at the configured viewport.
    pub async fn launch(config: SessionConfig) -> Result<Self> {
        let executable = detect_browser().ok_or(Error::BrowserNotFound)?;
        debug!("Using browser executable: {}", executable.display());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(Error::Launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        // Pump CDP messages until the connection drops
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    trace!("CDP handler stream ended");
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        // The window size alone does not fix the emulated viewport;
        // screenshots follow the device metrics override.
        page.execute(
            SetDeviceMetricsOverrideParams::builder()
                .width(i64::from(config.viewport_width))
                .height(i64::from(config.viewport_height))
                .device_scale_factor(1.0)
                .mobile(false)
                .build()
                .map_err(Error::Launch)?,
        )
        .await?;

        info!(
            "Browser session ready ({}x{} viewport)",
            config.viewport_width, config.viewport_height
        );

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Navigate to a URL and wait for the navigation to finish.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.page.goto(url).await.map_err(|e| Error::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        self.page.wait_for_navigation().await?;

        Ok(())
    }

    /// Navigate to a local file.
    pub async fn goto_file(&self, path: &Path) -> Result<()> {
        let absolute = path
            .canonicalize()
            .map_err(|_| Error::FileNotFound(path.to_path_buf()))?;
        let url = format!("file://{}", absolute.display());
        self.goto(&url).await
    }

    /// Wait for an element matching a CSS selector to appear in the DOM.
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        debug!(
            "Waiting for '{}' (timeout {}ms)",
            selector,
            timeout.as_millis()
        );

        let start = Instant::now();
        loop {
            if self.page.find_element(selector).await.is_ok() {
                trace!(
                    "Selector '{}' present after {}ms",
                    selector,
                    start.elapsed().as_millis()
                );
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(Error::SelectorTimeout {
                    selector: selector.to_string(),
                    ms: timeout.as_millis() as u64,
                });
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Set a form field's value, dispatching a bubbling `input` event, and
    /// verify the value the element actually holds afterwards.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        debug!("Filling '{}' with '{}'", selector, value);

        let script = fill_script(selector, value)?;
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| Error::Evaluate(e.to_string()))?;

        interpret_readback(selector, value, result.value())
    }

    /// Evaluate an expression on the page and decode its result.
    ///
    /// Page-side exceptions (including calls to undefined functions)
    /// surface as [`Error::Evaluate`].
    pub async fn eval<R: DeserializeOwned>(&self, expr: &str) -> Result<R> {
        trace!("Evaluating: {}", expr);

        let result = self
            .page
            .evaluate(expr)
            .await
            .map_err(|e| Error::Evaluate(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| Error::Evaluate(format!("result decode failed: {}", e)))
    }

    /// Evaluate an expression for its effect, discarding the result.
    pub async fn invoke(&self, expr: &str) -> Result<()> {
        trace!("Invoking: {}", expr);

        self.page
            .evaluate(expr)
            .await
            .map_err(|e| Error::Evaluate(format!("{}: {}", expr, e)))?;

        Ok(())
    }

    /// Capture the viewport as a PNG, overwriting any existing file.
    pub async fn screenshot_to_file(&self, path: &Path) -> Result<()> {
        debug!("Capturing screenshot to {}", path.display());

        let bytes = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
            )
            .await
            .map_err(|e| Error::Screenshot(e.to_string()))?;

        std::fs::write(path, &bytes)?;
        trace!("Wrote {} bytes to {}", bytes.len(), path.display());

        Ok(())
    }

    /// Close the browser and stop the event pump.
    pub async fn close(mut self) -> Result<()> {
        debug!("Closing browser session");

        let closed = self.browser.close().await;
        self.handler_task.abort();
        closed?;

        Ok(())
    }
}

/// Build the page script for [`BrowserSession::fill`].
///
/// The selector and value are spliced in as JSON string literals so
/// quoting in either cannot break out of the script. Returns the element's
/// value after assignment, or `null` when no element matches.
fn fill_script(selector: &str, value: &str) -> Result<String> {
    let selector_lit = serde_json::to_string(selector)?;
    let value_lit = serde_json::to_string(value)?;

    Ok(format!(
        r#"(() => {{
            const el = document.querySelector({selector});
            if (!el) return null;
            el.focus();
            el.value = {value};
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            return el.value;
        }})()"#,
        selector = selector_lit,
        value = value_lit,
    ))
}

/// Interpret what [`fill_script`] handed back.
///
/// A `querySelector` miss returns JSON `null`, which the protocol layer may
/// report as a result with no value at all; both shapes mean the element
/// was not found.
fn interpret_readback(
    selector: &str,
    expected: &str,
    readback: Option<&serde_json::Value>,
) -> Result<()> {
    let actual = match readback {
        None | Some(serde_json::Value::Null) => {
            return Err(Error::ElementNotFound(selector.to_string()));
        }
        Some(raw) => raw
            .as_str()
            .ok_or_else(|| Error::Evaluate(format!("readback decode failed: {}", raw)))?,
    };

    if actual != expected {
        return Err(Error::FillReadback {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    Ok(())
}
