// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::client::MAX_MESSAGE_BYTES;
use drv_wire::{read_message, write_message, ControlResponse, RecommendedInstallOutcome};
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
async fn install_recommended_succeeds_when_all_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "ctl.sock");
    spawn_control_server(std::path::PathBuf::from(&ep.address), |_| {
        ControlResponse::InstallRecommended(vec![
            RecommendedInstallOutcome { language: "python".into(), ok: true, message: None },
            RecommendedInstallOutcome { language: "ruby".into(), ok: true, message: None },
        ])
    });
    install_recommended(&ep, OutputFormat::Text).await.expect("install_recommended");
}

#[tokio::test]
async fn install_recommended_surfaces_partial_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "ctl.sock");
    spawn_control_server(std::path::PathBuf::from(&ep.address), |_| {
        ControlResponse::InstallRecommended(vec![
            RecommendedInstallOutcome { language: "python".into(), ok: true, message: None },
            RecommendedInstallOutcome { language: "ruby".into(), ok: false, message: Some("timeout".into()) },
        ])
    });
    let err = install_recommended(&ep, OutputFormat::Json).await.unwrap_err();
    assert!(matches!(err, CliError::Remote { .. }));
}
