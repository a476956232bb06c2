// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::FakeContainerRuntime;

#[tokio::test]
async fn start_handshakes_and_becomes_running() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let runtime = FakeContainerRuntime::new();
    let worker = DriverWorker::start(
        WorkerId::new(),
        DriverReference::new("docker://bblfsh/python-driver:latest"),
        tmp.path().to_path_buf(),
        &runtime,
        tmp.path(),
        WorkerOptions::default(),
    )
    .await
    .expect("start");

    assert_eq!(worker.status().await, WorkerStatus::Running);
}

#[tokio::test]
async fn call_echoes_parse_content() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let runtime = FakeContainerRuntime::new();
    let worker = DriverWorker::start(
        WorkerId::new(),
        DriverReference::new("docker://bblfsh/python-driver:latest"),
        tmp.path().to_path_buf(),
        &runtime,
        tmp.path(),
        WorkerOptions::default(),
    )
    .await
    .expect("start");

    let request = ClientRequest::Parse(drv_wire::ParseRequest {
        filename: "a.py".into(),
        language: Some("python".into()),
        content: b"# -*- python -*-\nimport foo".to_vec(),
        mode: None,
        timeout_ms: None,
    });
    let response = worker.call(request).await.expect("call");
    match response {
        ClientResponse::Parse(parsed) => assert_eq!(parsed.tree, b"# -*- python -*-\nimport foo"),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn stop_releases_socket_dir_and_becomes_stopped() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let runtime = FakeContainerRuntime::new();
    let id = WorkerId::new();
    let worker = DriverWorker::start(
        id,
        DriverReference::new("docker://bblfsh/python-driver:latest"),
        tmp.path().to_path_buf(),
        &runtime,
        tmp.path(),
        WorkerOptions::default(),
    )
    .await
    .expect("start");

    worker.stop().await.expect("stop");
    assert_eq!(worker.status().await, WorkerStatus::Stopped);
    assert!(!tmp.path().join(id.as_str()).exists());
}

#[tokio::test]
async fn start_fails_fast_when_runtime_rejects() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let runtime = FakeContainerRuntime::failing();
    let err = DriverWorker::start(
        WorkerId::new(),
        DriverReference::new("docker://bblfsh/python-driver:latest"),
        tmp.path().to_path_buf(),
        &runtime,
        tmp.path(),
        WorkerOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AdapterError::Spawn(_)));
}

#[tokio::test]
async fn call_after_stop_fails_without_touching_rpc() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let runtime = FakeContainerRuntime::new();
    let worker = DriverWorker::start(
        WorkerId::new(),
        DriverReference::new("docker://bblfsh/python-driver:latest"),
        tmp.path().to_path_buf(),
        &runtime,
        tmp.path(),
        WorkerOptions::default(),
    )
    .await
    .expect("start");
    worker.stop().await.expect("stop");

    let err = worker.call(ClientRequest::Version).await.unwrap_err();
    assert!(matches!(err, AdapterError::NotRunning(_)));
}
