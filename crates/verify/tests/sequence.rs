//! End-to-end runs of the capture sequence against a local tilt page.
//!
//! These tests launch a real headless browser and are skipped when no
//! Chrome or Chromium installation is present.

use std::time::Duration;

use tempfile::TempDir;
use tiltshot_verify::{VerifyConfig, VerifyError};

macro_rules! skip_if_no_browser {
    () => {
        if tiltshot_browser::detect_browser().is_none() {
            eprintln!("Skipping test: no Chrome or Chromium installation found");
            return;
        }
    };
}

const TILT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Tilt Fixture</title>
<style>
  body { margin: 0; background: #202030; }
  .scene { width: 600px; height: 400px; margin: 100px auto; perspective: 800px; }
  .grid {
    width: 100%;
    height: 100%;
    transform-style: preserve-3d;
    transform: rotateX(45deg) rotateY(45deg);
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 10px;
  }
  .tile { background: #4caf50; border: 2px solid #ffffff; }
  .controls { position: fixed; top: 10px; left: 10px; }
</style>
</head>
<body>
  <div class="scene">
    <div class="grid" id="grid">
      <div class="tile"></div>
      <div class="tile"></div>
      <div class="tile"></div>
      <div class="tile"></div>
      <div class="tile"></div>
      <div class="tile"></div>
      <div class="tile"></div>
      <div class="tile"></div>
    </div>
  </div>
  <div class="controls">
    <input id="perspX" type="number" value="45">
    <input id="perspY" type="number" value="45">
  </div>
  <script>
    function updatePerspective() {
      const x = document.getElementById('perspX').value;
      const y = document.getElementById('perspY').value;
      const grid = document.getElementById('grid');
      grid.style.transform = 'rotateX(' + x + 'deg) rotateY(' + y + 'deg)';
    }
  </script>
</body>
</html>
"#;

fn fixture_config(dir: &TempDir, page_html: &str) -> VerifyConfig {
    let page = dir.path().join("index.html");
    std::fs::write(&page, page_html).unwrap();
    VerifyConfig {
        page,
        first_capture: dir.path().join("3d_tilt_45.png"),
        second_capture: dir.path().join("3d_tilt_70_rot_30.png"),
        ..VerifyConfig::default()
    }
}

fn assert_png_1200x800(path: &std::path::Path) {
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.len() > 8, "{} is empty", path.display());
    assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47], "{} is not a PNG", path.display());
    let (width, height) = image::image_dimensions(path).unwrap();
    assert_eq!((width, height), (1200, 800));
}

#[tokio::test]
async fn test_full_sequence_produces_two_distinct_captures() {
    skip_if_no_browser!();

    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(&dir, TILT_PAGE);
    let first = config.first_capture.clone();
    let second = config.second_capture.clone();

    let report = tiltshot_verify::run(config).await.unwrap();

    assert_eq!(report.first_capture, first);
    assert_eq!(report.second_capture, second);
    assert_png_1200x800(&first);
    assert_png_1200x800(&second);

    assert!(!report.diff.identical);
    assert!(report.diff.diff_pixels > 0);
}

#[tokio::test]
async fn test_missing_page_fails_before_any_capture() {
    let dir = tempfile::tempdir().unwrap();
    let config = VerifyConfig {
        page: dir.path().join("index.html"),
        first_capture: dir.path().join("3d_tilt_45.png"),
        second_capture: dir.path().join("3d_tilt_70_rot_30.png"),
        ..VerifyConfig::default()
    };
    let first = config.first_capture.clone();
    let second = config.second_capture.clone();

    let result = tiltshot_verify::run(config).await;

    match result {
        Err(VerifyError::PageNotFound(path)) => {
            assert_eq!(path, dir.path().join("index.html"));
        }
        other => panic!("expected PageNotFound, got {:?}", other),
    }
    assert!(!first.exists());
    assert!(!second.exists());
}

#[tokio::test]
async fn test_page_without_tiles_times_out_before_any_capture() {
    skip_if_no_browser!();

    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture_config(&dir, "<html><body><p>no tiles here</p></body></html>");
    config.ready_timeout = Duration::from_secs(1);
    let first = config.first_capture.clone();

    let result = tiltshot_verify::run(config).await;

    match result {
        Err(VerifyError::Browser(tiltshot_browser::Error::SelectorTimeout {
            selector, ..
        })) => {
            assert_eq!(selector, ".tile");
        }
        other => panic!("expected SelectorTimeout, got {:?}", other),
    }
    assert!(!first.exists());
}

#[tokio::test]
async fn test_rerun_overwrites_stale_captures() {
    skip_if_no_browser!();

    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(&dir, TILT_PAGE);
    let first = config.first_capture.clone();
    let second = config.second_capture.clone();

    // Leftovers from an earlier run must be replaced, not appended to
    std::fs::write(&first, b"stale garbage").unwrap();
    std::fs::write(&second, b"stale garbage").unwrap();

    tiltshot_verify::run(config).await.unwrap();

    assert_png_1200x800(&first);
    assert_png_1200x800(&second);
}

#[tokio::test]
async fn test_report_paths_match_config() {
    skip_if_no_browser!();

    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture_config(&dir, TILT_PAGE);
    config.first_capture = dir.path().join("before.png");
    config.second_capture = dir.path().join("after.png");

    let report = tiltshot_verify::run(config).await.unwrap();

    assert_eq!(report.first_capture, dir.path().join("before.png"));
    assert_eq!(report.second_capture, dir.path().join("after.png"));
    assert!(report.first_capture.exists());
    assert!(report.second_capture.exists());
}
