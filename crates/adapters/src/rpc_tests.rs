// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use drv_wire::{ParseRequest, ParseResponse, VersionInfo};
use tokio::net::UnixListener;

/// Spawns a one-shot echo server: accepts a single connection, reads one
/// versioned message, and replies according to `responder`.
fn spawn_server<F>(socket_path: std::path::PathBuf, responder: F)
where
    F: Fn(ClientRequest) -> ClientResponse + Send + 'static,
{
    tokio::spawn(async move {
        let listener = UnixListener::bind(&socket_path).expect("bind");
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(pair) => pair,
                Err(_) => return,
            };
            let (version, request) =
                read_versioned_message::<_, ClientRequest>(&mut stream, MAX_MESSAGE_BYTES)
                    .await
                    .expect("read request");
            let response = responder(request);
            write_versioned_message(&mut stream, version, &response).await.expect("write response");
        }
    });
}

#[tokio::test]
async fn connect_waits_for_socket_to_appear() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rpc.sock");
    let path_clone = path.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        spawn_server(path_clone, |_| {
            ClientResponse::Version(VersionInfo { version: "1.0.0".into(), build_time: "now".into() })
        });
    });
    let client = RpcClient::connect(&path, Duration::from_secs(2)).await.expect("connect");
    client.handshake().await.expect("handshake");
}

#[tokio::test]
async fn connect_times_out_when_socket_never_appears() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.sock");
    let err = RpcClient::connect(&path, Duration::from_millis(100)).await.unwrap_err();
    assert!(matches!(err, AdapterError::SocketTimeout(_)));
}

#[tokio::test]
async fn handshake_fails_on_error_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rpc.sock");
    spawn_server(path.clone(), |_| ClientResponse::Error {
        kind: drv_core::ErrorKind::Unexpected,
        message: "boom".into(),
    });
    let client = RpcClient::connect(&path, Duration::from_secs(1)).await.expect("connect");
    let err = client.handshake().await.unwrap_err();
    assert!(matches!(err, AdapterError::Handshake(_)));
}

#[tokio::test]
async fn call_round_trips_a_parse_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rpc.sock");
    spawn_server(path.clone(), |req| match req {
        ClientRequest::Parse(ParseRequest { content, language, .. }) => {
            ClientResponse::Parse(ParseResponse {
                tree: content,
                language: language.unwrap_or_default(),
                errors: vec![],
                elapsed_ms: 1,
            })
        }
        _ => panic!("unexpected request"),
    });
    let client = RpcClient::connect(&path, Duration::from_secs(1)).await.expect("connect");
    let request = ClientRequest::Parse(ParseRequest {
        filename: "a.py".into(),
        language: Some("python".into()),
        content: b"import os".to_vec(),
        mode: None,
        timeout_ms: None,
    });
    let response = client.call(ProtocolVersion::V2, &request).await.expect("call");
    match response {
        ClientResponse::Parse(parsed) => assert_eq!(parsed.tree, b"import os"),
        other => panic!("unexpected response: {other:?}"),
    }
}
