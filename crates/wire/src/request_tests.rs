// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn v1_style_parse_request_omits_mode_and_timeout() {
    let json = r#"{"op":"Parse","filename":"a.py","language":"python","content":[112,121]}"#;
    let req: ClientRequest = serde_json::from_str(json).unwrap();
    match req {
        ClientRequest::Parse(p) => {
            assert_eq!(p.filename, "a.py");
            assert_eq!(p.mode, None);
            assert_eq!(p.timeout_ms, None);
        }
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn v2_style_parse_request_carries_mode_and_timeout() {
    let req = ClientRequest::Parse(ParseRequest {
        filename: "a.py".to_string(),
        language: None,
        content: b"py".to_vec(),
        mode: Some(ParseMode::Native),
        timeout_ms: Some(5000),
    });
    let encoded = serde_json::to_string(&req).unwrap();
    let decoded: ClientRequest = serde_json::from_str(&encoded).unwrap();
    assert_eq!(req, decoded);
}

#[test]
fn default_parse_mode_is_semantic() {
    assert_eq!(ParseMode::default(), ParseMode::Semantic);
}

#[test]
fn language_omitted_decodes_to_none() {
    let json = r#"{"op":"NativeParse","filename":"a.py","content":[]}"#;
    let req: ClientRequest = serde_json::from_str(json).unwrap();
    match req {
        ClientRequest::NativeParse(p) => assert_eq!(p.language, None),
        other => panic!("expected NativeParse, got {other:?}"),
    }
}
