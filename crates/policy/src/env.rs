// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `BBLFSHD_*` environment overrides for the default scaling policy (spec §6).

use std::time::Duration;

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

pub fn min_driver_instances() -> Option<usize> {
    parse_env("BBLFSHD_MIN_DRIVER_INSTANCES")
}

pub fn max_driver_instances() -> Option<usize> {
    parse_env("BBLFSHD_MAX_DRIVER_INSTANCES")
}

pub fn policy_window() -> Option<Duration> {
    parse_env::<u64>("BBLFSHD_POLICY_WINDOW").map(Duration::from_millis)
}

pub fn policy_tick() -> Option<Duration> {
    parse_env::<u64>("BBLFSHD_POLICY_TICK").map(Duration::from_millis)
}

pub fn policy_scale_inc() -> Option<usize> {
    parse_env("BBLFSHD_POLICY_SCALE_INC")
}

pub fn policy_downscale_mult() -> Option<f64> {
    parse_env("BBLFSHD_POLICY_DOWNSCALE_MULT")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
