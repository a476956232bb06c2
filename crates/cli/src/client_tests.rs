// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use drv_core::ErrorKind;
use tokio::net::UnixListener;

fn spawn_control_server<F>(socket_path: std::path::PathBuf, responder: F)
where
    F: Fn(ControlRequest) -> ControlResponse + Send + 'static,
{
    tokio::spawn(async move {
        let listener = UnixListener::bind(&socket_path).expect("bind");
        let (mut stream, _) = listener.accept().await.expect("accept");
        let payload = read_message(&mut stream, MAX_MESSAGE_BYTES).await.expect("read");
        let request: ControlRequest = drv_wire::decode(&payload).expect("decode");
        let response = responder(request);
        let encoded = drv_wire::encode(&response).expect("encode");
        write_message(&mut stream, &encoded).await.expect("write");
    });
}

#[tokio::test]
async fn call_control_round_trips_driver_states() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ctl.sock");
    spawn_control_server(path.clone(), |_| ControlResponse::DriverStates(vec![]));
    let response =
        call_control("unix", path.to_str().expect("utf8 path"), &ControlRequest::DriverStates).await.expect("call");
    assert!(matches!(response, ControlResponse::DriverStates(entries) if entries.is_empty()));
}

#[tokio::test]
async fn call_control_rejects_unknown_network() {
    let err = call_control("quic", "whatever", &ControlRequest::DriverStates).await.unwrap_err();
    assert!(matches!(err, CliError::Usage(_)));
}

#[tokio::test]
async fn call_control_wraps_connect_failure() {
    let err = call_control("unix", "/nonexistent/path/drvd-ctl.sock", &ControlRequest::DriverStates)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Connect { .. }));
}

#[test]
fn reject_control_error_surfaces_remote_error() {
    let response = ControlResponse::Error { kind: ErrorKind::MissingDriver, message: "nope".into() };
    let err = reject_control_error(response).unwrap_err();
    assert!(matches!(err, CliError::Remote { kind: ErrorKind::MissingDriver, .. }));
}

#[test]
fn reject_control_error_passes_through_ok_responses() {
    let response = reject_control_error(ControlResponse::Ok).expect("ok passes through");
    assert!(matches!(response, ControlResponse::Ok));
}
