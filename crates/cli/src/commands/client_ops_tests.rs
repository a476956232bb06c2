// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::client::MAX_MESSAGE_BYTES;
use drv_wire::{read_versioned_message, write_versioned_message, ParseResponse, ProtocolVersion, VersionInfo};
use tokio::net::UnixListener;

fn spawn_client_server<F>(socket_path: std::path::PathBuf, responder: F)
where
    F: Fn(ClientRequest) -> ClientResponse + Send + 'static,
{
    tokio::spawn(async move {
        let listener = UnixListener::bind(&socket_path).expect("bind");
        let (mut stream, _) = listener.accept().await.expect("accept");
        let (version, request) =
            read_versioned_message::<_, ClientRequest>(&mut stream, MAX_MESSAGE_BYTES).await.expect("read");
        let response = responder(request);
        write_versioned_message(&mut stream, version, &response).await.expect("write");
    });
}

fn endpoint(dir: &tempfile::TempDir, name: &str) -> ClientEndpoint {
    ClientEndpoint { network: "unix".to_string(), address: dir.path().join(name).to_string_lossy().into_owned() }
}

#[tokio::test]
async fn version_prints_daemon_version() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "client.sock");
    spawn_client_server(std::path::PathBuf::from(&ep.address), |request| {
        assert!(matches!(request, ClientRequest::Version));
        ClientResponse::Version(VersionInfo { version: "1.2.3".into(), build_time: "2026-01-01".into() })
    });
    version(&ep).await.expect("version");
}

#[tokio::test]
async fn parse_reads_file_and_sends_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "client.sock");
    let file = dir.path().join("sample.py");
    std::fs::write(&file, b"import os").expect("write sample file");

    spawn_client_server(std::path::PathBuf::from(&ep.address), |request| match request {
        ClientRequest::Parse(req) => {
            assert_eq!(req.content, b"import os");
            assert_eq!(req.language.as_deref(), Some("python"));
            ClientResponse::Parse(ParseResponse {
                tree: req.content,
                language: "python".into(),
                errors: vec![],
                elapsed_ms: 3,
            })
        }
        other => panic!("unexpected request: {other:?}"),
    });

    parse(&ep, &file, Some("python".to_string()), Some(ParseModeArg::Semantic), None).await.expect("parse");
}

#[tokio::test]
async fn parse_surfaces_remote_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "client.sock");
    let file = dir.path().join("sample.bin");
    std::fs::write(&file, [0xff, 0xfe]).expect("write sample file");

    spawn_client_server(std::path::PathBuf::from(&ep.address), |_| ClientResponse::Error {
        kind: drv_core::ErrorKind::UnknownEncoding,
        message: "not utf-8".into(),
    });

    let err = parse(&ep, &file, None, None, None).await.unwrap_err();
    assert!(matches!(err, CliError::Remote { kind: drv_core::ErrorKind::UnknownEncoding, .. }));
}

#[tokio::test]
async fn parse_fails_fast_on_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ep = endpoint(&dir, "client.sock");
    let err = parse(&ep, &dir.path().join("missing.py"), None, None, None).await.unwrap_err();
    assert!(matches!(err, CliError::Io(_)));
}
