// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

/// Concrete scenario 6: `AIMD(1, 0.5).Scale(total=1, idle=0, waiting=1) = 2`;
/// `Scale(2, 2, 0) = 1` (idle 2, waiting 0 → load −2 → decrease by ceil(2·0.5)=1).
#[parameterized(
    grows_by_one = { 1, 0, 1, 2 },
    shrinks_by_ceil_half_of_slack = { 2, 2, 0, 1 },
)]
fn matches_spec_scenario_6(total: usize, idle: usize, waiting: usize, expected: usize) {
    let mut policy = Aimd::new(1, 0.5);
    assert_eq!(policy.scale(total, idle, waiting), expected);
}

#[test]
fn never_goes_below_one() {
    let mut policy = Aimd::new(1, 1.0);
    assert_eq!(policy.scale(1, 10, 0), 1);
}

#[test]
fn additive_increase_is_capped_by_add() {
    let mut policy = Aimd::new(2, 0.5);
    // load = waiting - idle = 10, but add caps growth at 2.
    assert_eq!(policy.scale(3, 0, 10), 5);
}

#[test]
fn zero_load_holds_steady() {
    let mut policy = Aimd::new(1, 0.5);
    assert_eq!(policy.scale(4, 2, 2), 4);
}
