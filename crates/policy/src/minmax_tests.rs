// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::Fixed;

#[test]
fn clamps_above_hi() {
    let mut policy = MinMax::new(1, 4, Box::new(Fixed(10)));
    assert_eq!(policy.scale(1, 0, 0), 4);
}

#[test]
fn clamps_below_lo() {
    let mut policy = MinMax::new(2, 8, Box::new(Fixed(0)));
    assert_eq!(policy.scale(1, 0, 0), 2);
}

#[test]
fn lo_is_coerced_to_at_least_one() {
    let mut policy = MinMax::new(0, 8, Box::new(Fixed(0)));
    assert_eq!(policy.scale(1, 0, 0), 1);
}

#[test]
fn passes_through_within_range() {
    let mut policy = MinMax::new(1, 8, Box::new(Fixed(5)));
    assert_eq!(policy.scale(1, 0, 0), 5);
}
