// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::Fixed;

#[test]
fn damps_a_single_outlier_target() {
    let mut policy = TargetMovingAverage::new(2, Box::new(Fixed(10)));
    let first = policy.scale(0, 0, 0);
    assert_eq!(first, 10);
    // With a constant inner output the average settles at that output.
    let second = policy.scale(0, 0, 0);
    assert_eq!(second, 10);
}

#[test]
fn window_of_one_passes_through() {
    let mut policy = TargetMovingAverage::new(1, Box::new(Fixed(4)));
    assert_eq!(policy.scale(0, 0, 0), 4);
}

#[test]
fn averages_varying_inner_targets() {
    struct Alternating(bool);
    impl crate::ScalingPolicy for Alternating {
        fn scale(&mut self, _t: usize, _i: usize, _w: usize) -> usize {
            self.0 = !self.0;
            if self.0 { 2 } else { 6 }
        }
    }
    let mut policy = TargetMovingAverage::new(2, Box::new(Alternating(false)));
    policy.scale(0, 0, 0); // inner -> 2, window [2] -> 2
    let result = policy.scale(0, 0, 0); // inner -> 6, window [2,6] -> ceil(8/2)=4
    assert_eq!(result, 4);
}
