//! End-to-end update check and apply against a mock release host.

mod common;

use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

use lcu_events::LcuEventsError;
use lcu_events::events::{self, RecordingEmitter};
use lcu_events::updater::{UpdateChecker, Updater, current_installer_asset_name};

use common::{MockAsset, MockRelease, entries, hooks, mock_download, mock_latest, release_client};

fn updater_for(
    server: &MockServer,
    emitter: &Arc<RecordingEmitter>,
    dir: &TempDir,
) -> (
    Updater,
    Arc<common::RecordingLauncher>,
    Arc<common::RecordingExit>,
) {
    let (launcher, exit) = hooks();
    let updater = Updater::new(release_client(server), "1.0.0", emitter.clone())
        .with_download_dir(Some(dir.path().to_path_buf()))
        .with_launcher(launcher.clone())
        .with_exit(exit.clone());
    (updater, launcher, exit)
}

// =========================================================================
// Update checker
// =========================================================================

#[test]
fn check_same_tag_reports_no_update() {
    let server = MockServer::start();
    let latest = mock_latest(&server, &MockRelease::new("1.0.0"));
    let emitter = Arc::new(RecordingEmitter::new());

    UpdateChecker::new(release_client(&server), "1.0.0", emitter.clone()).check_for_updates();

    latest.assert();
    assert_eq!(
        emitter.payloads(events::VERSION_INFO),
        vec![json!({"version": "1.0.0", "hasUpdate": false, "updateAvailable": ""})]
    );
}

#[test]
fn check_new_tag_reports_update() {
    let server = MockServer::start();
    mock_latest(&server, &MockRelease::new("1.1.0"));
    let emitter = Arc::new(RecordingEmitter::new());

    UpdateChecker::new(release_client(&server), "1.0.0", emitter.clone())
        .spawn()
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(
        emitter.payloads(events::VERSION_INFO),
        vec![json!({"version": "1.0.0", "hasUpdate": true, "updateAvailable": "1.1.0"})]
    );
}

#[test]
fn check_failure_emits_nothing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(common::LATEST_PATH);
        then.status(500);
    });
    let emitter = Arc::new(RecordingEmitter::new());

    UpdateChecker::new(release_client(&server), "1.0.0", emitter.clone()).check_for_updates();

    assert!(emitter.events().is_empty());
}

// =========================================================================
// Release query
// =========================================================================

#[test]
fn release_query_sends_github_headers() {
    let server = MockServer::start();
    let latest = server.mock(|when, then| {
        when.method(GET)
            .path(common::LATEST_PATH)
            .header("accept", "application/vnd.github+json")
            .header_exists("user-agent");
        then.status(200).json_body(json!({"tag_name": "1.0.0", "assets": []}));
    });

    let release = release_client(&server).get_latest_release().unwrap();

    latest.assert();
    assert_eq!(release.tag_name, "1.0.0");
}

#[test]
fn release_query_rejects_malformed_json() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(common::LATEST_PATH);
        then.status(200).body("<html>rate limited</html>");
    });

    let err = release_client(&server).get_latest_release().unwrap_err();
    assert!(matches!(err, LcuEventsError::Json(_)));
}

#[test]
fn release_404_fails_without_temp_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(common::LATEST_PATH);
        then.status(404).json_body(json!({"message": "Not Found"}));
    });
    let emitter = Arc::new(RecordingEmitter::new());
    let dir = TempDir::new().unwrap();
    let (updater, launcher, exit) = updater_for(&server, &emitter, &dir);

    let err = updater.update_application().unwrap_err();

    assert!(matches!(err, LcuEventsError::ReleaseQuery(_)));
    assert!(err.to_string().contains("404"));
    assert_eq!(entries(dir.path()), 0);
    assert!(launcher.launched().is_empty());
    assert!(exit.codes().is_empty());
    assert!(emitter.events().is_empty());
}

// =========================================================================
// Update applier
// =========================================================================

#[test]
fn full_update_downloads_launches_and_exits() {
    let server = MockServer::start();
    let asset_name = current_installer_asset_name("1.0.0");
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let download = mock_download(&server, "/download/installer.exe", data.clone());
    mock_latest(
        &server,
        &MockRelease::new("1.1.0")
            .with_asset(MockAsset::new(1, "lcu-events_1.0.0_plan9_mips.exe", "http://unused"))
            .with_asset(MockAsset::new(
                2,
                &asset_name,
                &server.url("/download/installer.exe"),
            )),
    );
    let emitter = Arc::new(RecordingEmitter::new());
    let dir = TempDir::new().unwrap();
    let (updater, launcher, exit) = updater_for(&server, &emitter, &dir);

    updater.update_application().unwrap();

    download.assert();

    let progress: Vec<u64> = emitter
        .payloads(events::UPDATE_PROGRESS)
        .iter()
        .map(|p| p.as_u64().unwrap())
        .collect();
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
    assert!(progress.iter().all(|&p| p <= 100));
    assert_eq!(progress.last(), Some(&100));

    let names = emitter.names();
    assert_eq!(names.last().map(String::as_str), Some(events::UPDATE_COMPLETE));
    assert_eq!(emitter.payloads(events::UPDATE_COMPLETE), vec![Value::Null]);

    let launched = launcher.launched();
    assert_eq!(launched.len(), 1);
    let installer = &launched[0];
    assert!(installer.starts_with(dir.path()));
    let file_name = installer.file_name().unwrap().to_string_lossy().into_owned();
    assert!(file_name.starts_with("update-"));
    assert!(file_name.ends_with(".exe"));
    // Kept after launch, with the full payload.
    assert_eq!(std::fs::read(installer).unwrap(), data);

    assert_eq!(exit.codes(), vec![0]);
}

#[test]
fn missing_platform_asset_skips_download() {
    let server = MockServer::start();
    let download = mock_download(&server, "/download/other.exe", vec![1, 2, 3]);
    mock_latest(
        &server,
        &MockRelease::new("1.1.0").with_asset(MockAsset::new(
            1,
            "lcu-events_1.0.0_plan9_mips.exe",
            &server.url("/download/other.exe"),
        )),
    );
    let emitter = Arc::new(RecordingEmitter::new());
    let dir = TempDir::new().unwrap();
    let (updater, launcher, exit) = updater_for(&server, &emitter, &dir);

    let err = updater.update_application().unwrap_err();

    assert!(matches!(err, LcuEventsError::NoSuitableAsset));
    assert_eq!(err.to_string(), "no suitable update found for your platform");
    download.assert_calls(0);
    assert_eq!(entries(dir.path()), 0);
    assert!(launcher.launched().is_empty());
    assert!(exit.codes().is_empty());
}

#[test]
fn asset_is_matched_on_running_version_not_tag() {
    let server = MockServer::start();
    // Named after the new tag, which the applier does not look for.
    mock_latest(
        &server,
        &MockRelease::new("1.1.0").with_asset(MockAsset::new(
            1,
            &current_installer_asset_name("1.1.0"),
            &server.url("/download/new.exe"),
        )),
    );
    let emitter = Arc::new(RecordingEmitter::new());
    let dir = TempDir::new().unwrap();
    let (updater, _, _) = updater_for(&server, &emitter, &dir);

    let err = updater.update_application().unwrap_err();
    assert!(matches!(err, LcuEventsError::NoSuitableAsset));
}

#[test]
fn failed_download_status_is_returned() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/download/installer.exe");
        then.status(500);
    });
    mock_latest(
        &server,
        &MockRelease::new("1.1.0").with_asset(MockAsset::new(
            1,
            &current_installer_asset_name("1.0.0"),
            &server.url("/download/installer.exe"),
        )),
    );
    let emitter = Arc::new(RecordingEmitter::new());
    let dir = TempDir::new().unwrap();
    let (updater, launcher, _) = updater_for(&server, &emitter, &dir);

    let err = updater.update_application().unwrap_err();

    assert!(matches!(err, LcuEventsError::Download(_)));
    assert_eq!(entries(dir.path()), 0);
    assert!(launcher.launched().is_empty());
}

#[test]
fn launch_failure_removes_installer_and_does_not_exit() {
    let server = MockServer::start();
    mock_download(&server, "/download/installer.exe", vec![0u8; 4096]);
    mock_latest(
        &server,
        &MockRelease::new("1.1.0").with_asset(MockAsset::new(
            1,
            &current_installer_asset_name("1.0.0"),
            &server.url("/download/installer.exe"),
        )),
    );
    let emitter = Arc::new(RecordingEmitter::new());
    let dir = TempDir::new().unwrap();
    let launcher = Arc::new(common::RecordingLauncher::failing());
    let exit = Arc::new(common::RecordingExit::default());
    let updater = Updater::new(release_client(&server), "1.0.0", emitter.clone())
        .with_download_dir(Some(dir.path().to_path_buf()))
        .with_launcher(launcher.clone())
        .with_exit(exit.clone());

    let err = updater.update_application().unwrap_err();

    assert!(matches!(err, LcuEventsError::Launch { .. }));
    assert_eq!(launcher.launched().len(), 1);
    assert_eq!(entries(dir.path()), 0);
    assert!(emitter.payloads(events::UPDATE_COMPLETE).is_empty());
    assert!(exit.codes().is_empty());
}

#[test]
fn unwritable_download_dir_fails_before_launch() {
    let server = MockServer::start();
    mock_download(&server, "/download/installer.exe", vec![0u8; 16]);
    mock_latest(
        &server,
        &MockRelease::new("1.1.0").with_asset(MockAsset::new(
            1,
            &current_installer_asset_name("1.0.0"),
            &server.url("/download/installer.exe"),
        )),
    );
    let emitter = Arc::new(RecordingEmitter::new());
    let dir = TempDir::new().unwrap();
    let (launcher, exit) = hooks();
    let updater = Updater::new(release_client(&server), "1.0.0", emitter.clone())
        .with_download_dir(Some(dir.path().join("missing")))
        .with_launcher(launcher.clone())
        .with_exit(exit.clone());

    let err = updater.update_application().unwrap_err();

    assert!(matches!(err, LcuEventsError::Io(_)));
    assert!(launcher.launched().is_empty());
    assert!(exit.codes().is_empty());
}
