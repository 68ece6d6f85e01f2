//! Integration tests for PNG export and the clipboard hand-off.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;

use conceptmap::domain;
use conceptmap::export::{self, ExportOptions};
use conceptmap::infrastructure::{ClipboardWriter, CommandClipboard, CommandRunner, InfraError};
use conceptmap::layout::Canvas;
use conceptmap::util::testing::init_test_setup;
use conceptmap::view::{Viewer, ZoomBounds};

fn sample_viewer() -> Viewer {
    let tree = domain::normalize(&json!({
        "central": "Water Cycle",
        "branches": [
            { "name": "Evaporation", "children": [] },
            { "name": "Condensation", "children": [] }
        ]
    }));
    Viewer::new(
        tree,
        Canvas {
            width: 300.0,
            height: 240.0,
        },
        ZoomBounds::default(),
    )
}

/// Pulls (width, height) out of a PNG IHDR chunk.
fn png_dimensions(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n", "not a PNG stream");
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (width, height)
}

#[test]
fn given_scene_when_to_png_then_dimensions_follow_pixel_ratio() {
    init_test_setup();
    let viewer = sample_viewer();
    let options = ExportOptions {
        pixel_ratio: 2.0,
        font_path: None,
    };

    let png = export::to_png(viewer.scene(), &options).expect("export");

    assert_eq!(png_dimensions(&png), (600, 480));
}

#[test]
fn given_zero_pixel_ratio_when_to_png_then_default_of_two_applies() {
    init_test_setup();
    let viewer = sample_viewer();
    let options = ExportOptions::default();

    let png = export::to_png(viewer.scene(), &options).expect("export");

    assert_eq!(png_dimensions(&png), (600, 480));
}

#[test]
fn given_missing_font_file_when_to_png_then_degrades_to_unlabeled_export() {
    init_test_setup();
    let viewer = sample_viewer();
    let options = ExportOptions {
        pixel_ratio: 1.0,
        font_path: Some("/nonexistent/font.ttf".into()),
    };

    let png = export::to_png(viewer.scene(), &options).expect("export");

    assert_eq!(png_dimensions(&png), (300, 240));
}

#[test]
fn given_export_when_to_png_then_viewer_state_is_untouched() {
    init_test_setup();
    let mut viewer = sample_viewer();
    viewer.zoom_by(2.0);
    viewer.pan_by(15.0, -10.0);

    let _ = export::to_png(viewer.scene(), &ExportOptions::default()).expect("export");

    assert_eq!(viewer.zoom(), 2.0);
    assert_eq!(viewer.scene().transform.pan, (15.0, -10.0));
}

#[test]
fn given_png_bytes_when_write_png_file_then_file_matches() {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("map.png");
    let viewer = sample_viewer();
    let png = export::to_png(viewer.scene(), &ExportOptions::default()).expect("export");

    export::write_png_file(&png, &path).expect("write");

    assert_eq!(std::fs::read(&path).unwrap(), png);
}

// ============================================================
// Clipboard hand-off through a scripted command runner
// ============================================================

/// Scripted runner: maps command names to canned outcomes and records the
/// bytes piped to them.
struct ScriptedRunner {
    outcomes: Vec<(&'static str, io::Result<Output>)>,
    received: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

fn exit(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

fn ok_output() -> Output {
    Output {
        status: exit(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

impl ScriptedRunner {
    fn new(outcomes: Vec<(&'static str, io::Result<Output>)>) -> Self {
        Self {
            outcomes,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn received(&self) -> Arc<Mutex<Vec<(String, Vec<u8>)>>> {
        Arc::clone(&self.received)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        self.run_with_stdin(cmd, args, &[])
    }

    fn run_with_stdin(&self, cmd: &str, _args: &[&str], stdin: &[u8]) -> io::Result<Output> {
        self.received
            .lock()
            .unwrap()
            .push((cmd.to_string(), stdin.to_vec()));
        for (name, outcome) in &self.outcomes {
            if *name == cmd {
                return match outcome {
                    Ok(output) => Ok(output.clone()),
                    Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
                };
            }
        }
        Err(io::Error::new(io::ErrorKind::NotFound, "no such command"))
    }
}

#[test]
fn given_working_tool_when_copy_to_clipboard_then_png_bytes_are_piped() {
    init_test_setup();
    let runner = ScriptedRunner::new(vec![("wl-copy", Ok(ok_output()))]);
    let received = runner.received();
    let clipboard = CommandClipboard::new(Box::new(runner), None);

    export::copy_to_clipboard(&[1, 2, 3, 4], &clipboard).expect("copy");

    let calls = received.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "wl-copy");
    assert_eq!(calls[0].1, vec![1, 2, 3, 4]);
}

#[test]
fn given_first_tool_missing_when_copy_then_next_candidate_is_probed() {
    init_test_setup();
    let clipboard = CommandClipboard::new(
        Box::new(ScriptedRunner::new(vec![("xclip", Ok(ok_output()))])),
        None,
    );

    export::copy_to_clipboard(&[0xCA, 0xFE], &clipboard).expect("copy");
}

#[test]
fn given_no_tool_available_when_copy_then_no_clipboard_tool_error() {
    init_test_setup();
    let clipboard = CommandClipboard::new(Box::new(ScriptedRunner::new(vec![])), None);

    let result = clipboard.write_png(&[1]);

    assert!(matches!(result, Err(InfraError::NoClipboardTool { .. })));
}

#[test]
fn given_tool_exits_nonzero_when_copy_then_clipboard_error_with_code() {
    init_test_setup();
    let failing = Output {
        status: exit(1),
        stdout: Vec::new(),
        stderr: b"cannot open display".to_vec(),
    };
    let clipboard = CommandClipboard::new(
        Box::new(ScriptedRunner::new(vec![("wl-copy", Ok(failing))])),
        None,
    );

    let result = clipboard.write_png(&[1]);

    assert!(matches!(
        result,
        Err(InfraError::Clipboard {
            exit_code: Some(1),
            ..
        })
    ));
}

#[test]
fn given_explicit_command_when_copy_then_configured_tool_is_used() {
    init_test_setup();
    let clipboard = CommandClipboard::new(
        Box::new(ScriptedRunner::new(vec![("my-clip", Ok(ok_output()))])),
        Some("my-clip --png".into()),
    );

    clipboard.write_png(&[9, 9]).expect("copy");
}
