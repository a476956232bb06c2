// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn missing_driver_maps_to_missing_driver_kind() {
    let err = DaemonError::MissingDriver { language: "python".to_string() };
    assert_eq!(err.kind(), ErrorKind::MissingDriver);
    assert!(err.to_string().contains("python"));
}

#[test]
fn storage_error_kind_passes_through() {
    let err: DaemonError = StorageError::AlreadyInstalled { reference: "docker://x".to_string() }.into();
    assert_eq!(err.kind(), ErrorKind::AlreadyInstalled);
}

#[test]
fn execute_error_pool_variant_becomes_pool_error() {
    let err: DaemonError = ExecuteError::<AdapterError>::Pool(PoolError::Cancelled).into();
    assert!(matches!(err, DaemonError::Pool(PoolError::Cancelled)));
}

#[test]
fn execute_error_fn_variant_becomes_adapter_error() {
    let err: DaemonError = ExecuteError::Fn(AdapterError::NotRunning("stopped".to_string())).into();
    assert!(matches!(err, DaemonError::Adapter(AdapterError::NotRunning(_))));
    assert_eq!(err.kind(), ErrorKind::DriverStopped);
}
