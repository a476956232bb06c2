// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn absent_vars_yield_none() {
    std::env::remove_var("BBLFSHD_MIN_DRIVER_INSTANCES");
    assert_eq!(min_driver_instances(), None);
}

#[test]
#[serial]
fn parses_integer_overrides() {
    std::env::set_var("BBLFSHD_MIN_DRIVER_INSTANCES", "3");
    std::env::set_var("BBLFSHD_MAX_DRIVER_INSTANCES", "16");
    std::env::set_var("BBLFSHD_POLICY_SCALE_INC", "2");
    assert_eq!(min_driver_instances(), Some(3));
    assert_eq!(max_driver_instances(), Some(16));
    assert_eq!(policy_scale_inc(), Some(2));
    std::env::remove_var("BBLFSHD_MIN_DRIVER_INSTANCES");
    std::env::remove_var("BBLFSHD_MAX_DRIVER_INSTANCES");
    std::env::remove_var("BBLFSHD_POLICY_SCALE_INC");
}

#[test]
#[serial]
fn parses_duration_overrides_as_milliseconds() {
    std::env::set_var("BBLFSHD_POLICY_WINDOW", "5000");
    std::env::set_var("BBLFSHD_POLICY_TICK", "500");
    assert_eq!(policy_window(), Some(Duration::from_millis(5000)));
    assert_eq!(policy_tick(), Some(Duration::from_millis(500)));
    std::env::remove_var("BBLFSHD_POLICY_WINDOW");
    std::env::remove_var("BBLFSHD_POLICY_TICK");
}

#[test]
#[serial]
fn malformed_value_yields_none() {
    std::env::set_var("BBLFSHD_POLICY_DOWNSCALE_MULT", "not-a-number");
    assert_eq!(policy_downscale_mult(), None);
    std::env::remove_var("BBLFSHD_POLICY_DOWNSCALE_MULT");
}
