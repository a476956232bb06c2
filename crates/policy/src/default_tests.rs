// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
fn samples_in_window_divides_evenly() {
    assert_eq!(samples_in_window(Duration::from_secs(5), Duration::from_millis(500)), 10);
}

#[test]
fn samples_in_window_rounds_up() {
    assert_eq!(samples_in_window(Duration::from_millis(1200), Duration::from_millis(500)), 3);
}

#[test]
#[serial]
fn builds_a_usable_policy_with_defaults() {
    for var in [
        "BBLFSHD_MIN_DRIVER_INSTANCES",
        "BBLFSHD_MAX_DRIVER_INSTANCES",
        "BBLFSHD_POLICY_WINDOW",
        "BBLFSHD_POLICY_TICK",
        "BBLFSHD_POLICY_SCALE_INC",
        "BBLFSHD_POLICY_DOWNSCALE_MULT",
    ] {
        std::env::remove_var(var);
    }
    let mut policy = default_policy();
    let target = policy.scale(1, 0, 0);
    assert!(target >= 1);
}

#[test]
#[serial]
fn respects_min_instances_override() {
    std::env::set_var("BBLFSHD_MIN_DRIVER_INSTANCES", "4");
    let mut policy = default_policy();
    let target = policy.scale(1, 1, 0);
    assert!(target >= 4);
    std::env::remove_var("BBLFSHD_MIN_DRIVER_INSTANCES");
}
