//! Runtime detection of a Chrome/Chromium installation
//!
//! Probes well-known install paths for the current platform. The session
//! launcher starts the detected executable, and integration tests skip
//! when none is present.

use std::path::PathBuf;

/// Locate an installed Chrome or Chromium executable.
///
/// Checks common installation paths on macOS, Linux, and Windows. Returns
/// the first existing candidate, or `None` if no browser could be located.
pub fn detect_browser() -> Option<PathBuf> {
    browser_candidate_paths().into_iter().find(|p| p.exists())
}

/// Candidate Chrome/Chromium executable paths for the current platform.
fn browser_candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "macos")]
    {
        paths.push(PathBuf::from(
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        ));
        paths.push(PathBuf::from(
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ));
        paths.push(PathBuf::from(
            "/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
        ));
        paths.push(PathBuf::from(
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ));
        // User-level installations
        if let Some(home) = std::env::var_os("HOME") {
            let home = PathBuf::from(home);
            paths.push(home.join("Applications/Google Chrome.app/Contents/MacOS/Google Chrome"));
            paths.push(home.join("Applications/Chromium.app/Contents/MacOS/Chromium"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        paths.push(PathBuf::from("/usr/bin/google-chrome"));
        paths.push(PathBuf::from("/usr/bin/google-chrome-stable"));
        paths.push(PathBuf::from("/usr/bin/chromium-browser"));
        paths.push(PathBuf::from("/usr/bin/chromium"));
        paths.push(PathBuf::from("/usr/local/bin/google-chrome"));
        paths.push(PathBuf::from("/usr/local/bin/chromium"));
        paths.push(PathBuf::from("/snap/bin/chromium"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(program_files) = std::env::var("ProgramFiles") {
            paths.push(PathBuf::from(format!(
                "{}\\Google\\Chrome\\Application\\chrome.exe",
                program_files
            )));
            paths.push(PathBuf::from(format!(
                "{}\\Chromium\\Application\\chrome.exe",
                program_files
            )));
            paths.push(PathBuf::from(format!(
                "{}\\Microsoft\\Edge\\Application\\msedge.exe",
                program_files
            )));
        }
        if let Ok(program_files_x86) = std::env::var("ProgramFiles(x86)") {
            paths.push(PathBuf::from(format!(
                "{}\\Google\\Chrome\\Application\\chrome.exe",
                program_files_x86
            )));
        }
        if let Ok(local_app_data) = std::env::var("LOCALAPPDATA") {
            paths.push(PathBuf::from(format!(
                "{}\\Google\\Chrome\\Application\\chrome.exe",
                local_app_data
            )));
        }
    }

    paths
}
