// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::client::MAX_MESSAGE_BYTES;
use drv_core::ErrorKind;
use drv_wire::{read_message, write_message, ControlResponse};
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

fn endpoint(dir: &tempfile::TempDir, name: &str) -> ControlEndpoint {
    ControlEndpoint { network: "unix".to_string(), address: dir.path().join(name).to_string_lossy().into_owned() }
}

#[tokio::test]
async fn install_succeeds_on_ok_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "ctl.sock");
    spawn_control_server(std::path::PathBuf::from(&ep.address), |request| match request {
        ControlRequest::InstallDriver { language, reference, update } => {
            assert_eq!(language, "python");
            assert_eq!(reference, "docker://bblfsh/python-driver:latest");
            assert!(!update);
            ControlResponse::Ok
        }
        other => panic!("unexpected request: {other:?}"),
    });
    install(&ep, "python", "docker://bblfsh/python-driver:latest", false).await.expect("install");
}

#[tokio::test]
async fn install_surfaces_already_installed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "ctl.sock");
    spawn_control_server(std::path::PathBuf::from(&ep.address), |_| {
        ControlResponse::Error { kind: ErrorKind::AlreadyInstalled, message: "already there".into() }
    });
    let err = install(&ep, "python", "ref", false).await.unwrap_err();
    assert!(matches!(err, CliError::Remote { kind: ErrorKind::AlreadyInstalled, .. }));
}

#[tokio::test]
async fn remove_succeeds_on_ok_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "ctl.sock");
    spawn_control_server(std::path::PathBuf::from(&ep.address), |request| match request {
        ControlRequest::RemoveDriver { language } => {
            assert_eq!(language, "ruby");
            ControlResponse::Ok
        }
        other => panic!("unexpected request: {other:?}"),
    });
    remove(&ep, "ruby").await.expect("remove");
}

#[tokio::test]
async fn list_renders_driver_states() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "ctl.sock");
    spawn_control_server(std::path::PathBuf::from(&ep.address), |_| ControlResponse::DriverStates(vec![]));
    list(&ep, OutputFormat::Json).await.expect("list");
}

#[tokio::test]
async fn list_rejects_unexpected_response_shape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "ctl.sock");
    spawn_control_server(std::path::PathBuf::from(&ep.address), |_| ControlResponse::Ok);
    let err = list(&ep, OutputFormat::Text).await.unwrap_err();
    assert!(matches!(err, CliError::UnexpectedResponse));
}
