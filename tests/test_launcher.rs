mod common;

use std::path::PathBuf;

use common::*;
use OutputStream::{Stderr, Stdout};
use futures::StreamExt;
use time::macros::datetime;

fn weights_path(dir: &tempfile::TempDir) -> String {
    dir.path().join(TEST_WEIGHTS).to_string_lossy().replace('\\', "/")
}

#[test]
fn test_initial_fields_come_from_workspace() {
    let (launcher, dir) = create_test_launcher();
    let form = launcher.form();
    assert_eq!(form.weights_path, weights_path(&dir));
    assert!(form.source_path.ends_with(TEST_SOURCE));
    assert_eq!(form.threshold, "0.25");
    assert!(!launcher.is_running());
}

#[test]
fn test_run_detection_starts_once_with_expected_args() {
    let (mut launcher, dir) = create_test_launcher();
    let out_dir = dir.path().join("out");

    let events = launcher
        .run_detection_at(Some(out_dir.clone()), datetime!(2024-03-07 09:05:01 UTC))
        .unwrap()
        .expect("a run should have been started");
    drop(events);

    let started = &launcher.bridge().started;
    assert_eq!(started.len(), 1);
    let invocation = &started[0];
    assert_eq!(invocation.program, PathBuf::from("/usr/bin/python3"));
    assert_eq!(invocation.args[0], "./yolov7/detect.py");

    let project = format!(
        "{}/yolov7_x_640_sgd_best_detections",
        out_dir.to_string_lossy()
    );
    let form = launcher.form();
    let expected = vec![
        "--weights".to_string(),
        form.weights_path.clone(),
        "--conf".to_string(),
        "0.25".to_string(),
        "--img-size".to_string(),
        "640".to_string(),
        "--source".to_string(),
        form.source_path.clone(),
        "--no-trace".to_string(),
        "--save-txt".to_string(),
        "--project".to_string(),
        project,
        "--name".to_string(),
        "detection_03_07_2024__09_05_01".to_string(),
    ];
    assert_eq!(&invocation.args[1..], expected.as_slice());
    assert!(launcher.is_running());
}

#[tokio::test]
async fn test_started_event_resets_output_once() {
    let (mut launcher, dir) = create_test_launcher();
    launcher.on_output_available(Stdout, b"left over from last run\n");

    launcher.bridge_mut().script = vec![
        ProcessEvent::Started { pid: Some(42) },
        ProcessEvent::Output {
            stream: Stdout,
            bytes: b"image 1/1 data/example.jpg: 2 cars, Done.\n".to_vec(),
        },
        ProcessEvent::Finished { code: Some(0) },
    ];
    let events: Vec<ProcessEvent> = launcher
        .run_detection(Some(dir.path().to_path_buf()))
        .unwrap()
        .unwrap()
        .collect()
        .await;
    assert_eq!(
        events.iter().filter(|e| matches!(e, ProcessEvent::Started { .. })).count(),
        1
    );

    for event in events {
        launcher.handle_event(event);
    }
    assert_eq!(
        launcher.form().output.text(),
        format!(
            "{}image 1/1 data/example.jpg: 2 cars, Done.\n",
            strings::DETECTION_STARTED
        )
    );
    assert!(!launcher.is_running());
}

#[test]
fn test_end_to_end_project_path() {
    let (mut launcher, _dir) = create_test_launcher();
    assert_eq!(launcher.edit_threshold("0.25".to_string()), Validity::Acceptable);

    launcher
        .run_detection(Some(PathBuf::from("/tmp/out")))
        .unwrap()
        .expect("a run should have been started");

    let args = &launcher.bridge().started[0].args;
    let project = args.iter().position(|a| a == "--project").unwrap();
    assert_eq!(args[project + 1], "/tmp/out/yolov7_x_640_sgd_best_detections");
    let name = args.iter().position(|a| a == "--name").unwrap();
    assert!(args[name + 1].starts_with("detection_"));
    assert_eq!(args[name + 1].len(), "detection_MM_DD_YYYY__HH_MM_SS".len());
}

#[test]
fn test_cancelled_pickers_change_nothing() {
    let (mut launcher, _dir) = create_test_launcher();
    launcher.on_output_available(Stdout, b"previous output");
    let before = launcher.form().clone();

    assert!(!launcher.choose_weights_file(None));
    assert!(!launcher.choose_source_file(None));
    assert!(launcher.run_detection(None).unwrap().is_none());

    let after = launcher.form();
    assert_eq!(after.weights_path, before.weights_path);
    assert_eq!(after.source_path, before.source_path);
    assert_eq!(after.threshold, before.threshold);
    assert_eq!(after.output.text(), before.output.text());
    assert!(launcher.bridge().started.is_empty());
}

#[test]
fn test_missing_picked_files_are_ignored() {
    let (mut launcher, dir) = create_test_launcher();
    let before = launcher.form().clone();

    assert!(!launcher.choose_weights_file(Some(dir.path().join("gone.pt"))));
    assert!(!launcher.choose_source_file(Some(PathBuf::new())));
    assert_eq!(launcher.form().weights_path, before.weights_path);
    assert_eq!(launcher.form().source_path, before.source_path);
}

#[test]
fn test_existing_picked_files_are_stored() {
    let (mut launcher, dir) = create_test_launcher();
    let other = dir.path().join("other.pt");
    std::fs::write(&other, b"w").unwrap();

    assert!(launcher.choose_weights_file(Some(other.clone())));
    assert_eq!(launcher.form().weights_path, other.to_string_lossy());

    let video = dir.path().join("clip.mp4");
    std::fs::write(&video, b"v").unwrap();
    assert!(launcher.choose_source_file(Some(video.clone())));
    assert_eq!(launcher.form().source_path, video.to_string_lossy());
}

#[test]
fn test_threshold_mask() {
    let (mut launcher, _dir) = create_test_launcher();

    assert_eq!(launcher.edit_threshold("0.5".to_string()), Validity::Acceptable);
    assert_eq!(launcher.form().threshold, "0.5");

    assert_eq!(launcher.edit_threshold("0".to_string()), Validity::Intermediate);
    assert_eq!(launcher.form().threshold, "0");

    assert_eq!(launcher.edit_threshold("x".to_string()), Validity::Invalid);
    assert_eq!(launcher.form().threshold, "0");
}

#[test]
fn test_undecodable_output_replaces_buffer() {
    let (mut launcher, _dir) = create_test_launcher();
    launcher.on_process_started(Some(1));
    assert!(launcher.on_output_available(Stdout, b"fine\n"));

    assert!(!launcher.on_output_available(Stdout, &[0xc3, 0x28]));
    assert_eq!(launcher.form().output.text(), strings::DECODE_ERROR);

    // Every failed read yields the message once, it never accumulates.
    assert!(!launcher.on_output_available(Stdout, &[0xff]));
    assert_eq!(launcher.form().output.text(), strings::DECODE_ERROR);

    assert!(launcher.on_output_available(Stdout, b" more"));
    assert_eq!(
        launcher.form().output.text(),
        format!("{} more", strings::DECODE_ERROR)
    );
}

#[test]
fn test_second_run_is_rejected_while_active() {
    let (mut launcher, dir) = create_test_launcher();
    let out = Some(dir.path().to_path_buf());

    assert!(launcher.run_detection(out.clone()).unwrap().is_some());
    let err = launcher.run_detection(out.clone()).err().unwrap();
    assert!(matches!(err, LauncherError::AlreadyRunning));
    assert_eq!(launcher.bridge().started.len(), 1);
    assert!(launcher.status().is_some());

    launcher.on_process_finished(Some(0));
    assert!(launcher.run_detection(out).unwrap().is_some());
    assert_eq!(launcher.bridge().started.len(), 2);
    assert!(launcher.status().is_none());
}

#[test]
fn test_failed_start_releases_run() {
    let (mut launcher, dir) = create_test_launcher();
    launcher.on_output_available(Stdout, b"kept");
    assert!(launcher.run_detection(Some(dir.path().to_path_buf())).unwrap().is_some());

    launcher.handle_event(ProcessEvent::FailedToStart("no such file".to_string()));
    assert!(!launcher.is_running());
    assert_eq!(launcher.status(), Some("no such file"));
    assert_eq!(launcher.form().output.text(), "kept");
}

#[test]
fn test_stderr_between_halves_of_a_character() {
    let (mut launcher, _dir) = create_test_launcher();
    launcher.handle_event(ProcessEvent::Started { pid: Some(7) });

    // "é" is 0xc3 0xa9; stdout is cut between the two bytes.
    assert!(launcher.on_output_available(Stdout, b"ok \xc3"));
    assert!(launcher.on_output_available(Stderr, b"warn\n"));
    assert!(launcher.on_output_available(Stdout, b"\xa9\n"));

    assert_eq!(
        launcher.form().output.text(),
        format!("{}ok warn\né\n", strings::DETECTION_STARTED)
    );
}

#[test]
fn test_exit_with_incomplete_character_shows_decode_error() {
    let (mut launcher, dir) = create_test_launcher();
    assert!(launcher.run_detection(Some(dir.path().to_path_buf())).unwrap().is_some());
    launcher.handle_event(ProcessEvent::Started { pid: Some(7) });
    assert!(launcher.on_output_available(Stdout, b"done \xd0"));

    launcher.handle_event(ProcessEvent::Finished { code: Some(0) });
    assert_eq!(launcher.form().output.text(), strings::DECODE_ERROR);
    assert!(!launcher.is_running());
}

#[test]
fn test_clean_exit_keeps_output() {
    let (mut launcher, _dir) = create_test_launcher();
    launcher.handle_event(ProcessEvent::Started { pid: Some(7) });
    assert!(launcher.on_output_available(Stdout, b"Done.\n"));

    launcher.handle_event(ProcessEvent::Finished { code: Some(0) });
    assert_eq!(
        launcher.form().output.text(),
        format!("{}Done.\n", strings::DETECTION_STARTED)
    );
}

#[test]
fn test_can_start_follows_active_run() {
    let (mut launcher, dir) = create_test_launcher();
    assert!(launcher.can_start());

    assert!(launcher.run_detection(Some(dir.path().to_path_buf())).unwrap().is_some());
    assert!(!launcher.can_start());

    launcher.handle_event(ProcessEvent::Finished { code: Some(1) });
    assert!(launcher.can_start());
}
