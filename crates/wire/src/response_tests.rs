// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use drv_core::ErrorKind;

#[test]
fn parse_response_round_trips_through_json() {
    let response = ClientResponse::Parse(ParseResponse {
        tree: vec![1, 2, 3],
        language: "python".to_string(),
        errors: vec![],
        elapsed_ms: 12,
    });
    let encoded = serde_json::to_string(&response).unwrap();
    let decoded: ClientResponse = serde_json::from_str(&encoded).unwrap();
    assert_eq!(response, decoded);
}

#[test]
fn error_response_carries_a_machine_recognizable_kind() {
    let response = ClientResponse::Error {
        kind: ErrorKind::LanguageDetection,
        message: "could not detect language".to_string(),
    };
    let encoded = serde_json::to_string(&response).unwrap();
    assert!(encoded.contains("LanguageDetection") || encoded.contains("languagedetection"));
    let decoded: ClientResponse = serde_json::from_str(&encoded).unwrap();
    assert_eq!(response, decoded);
}

#[test]
fn supported_languages_response_round_trips() {
    let response = ClientResponse::SupportedLanguages(vec![LanguageInfo {
        name: "Python".to_string(),
        language: "python".to_string(),
        version: "0.1.0".to_string(),
        status: "beta".to_string(),
        features: vec!["ast".to_string()],
        runtime: "python3.11".to_string(),
    }]);
    let encoded = serde_json::to_string(&response).unwrap();
    let decoded: ClientResponse = serde_json::from_str(&encoded).unwrap();
    assert_eq!(response, decoded);
}
