//! TiltShot browser session layer
//!
//! A typed async client over headless Chrome, speaking the Chrome DevTools
//! Protocol through chromiumoxide. One session owns one browser process and
//! one page:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  BrowserSession                                      │
//! │    ├── launch(SessionConfig)  spawn + viewport       │
//! │    ├── goto / goto_file       navigate, await load   │
//! │    ├── wait_for_selector      poll until present     │
//! │    ├── fill                   value + input event,   │
//! │    │                          readback verified      │
//! │    ├── eval / invoke          page-side scripting    │
//! │    ├── screenshot_to_file     viewport PNG to disk   │
//! │    └── close                  teardown               │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! The CDP event stream is drained on a background task for the life of
//! the session. Dropping an unclosed session still terminates the browser
//! process.

pub mod detect;
pub mod error;
pub mod session;

pub use detect::detect_browser;
pub use error::{Error, Result};
pub use session::{BrowserSession, SessionConfig};
