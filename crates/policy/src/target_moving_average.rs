// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::ScalingPolicy;
use std::collections::VecDeque;

/// Averages the *output* of `inner` over the last `window` samples to damp
/// target flicker (spec §4.3).
pub struct TargetMovingAverage {
    window: usize,
    targets: VecDeque<usize>,
    inner: Box<dyn ScalingPolicy>,
}

impl TargetMovingAverage {
    pub fn new(window: usize, inner: Box<dyn ScalingPolicy>) -> Self {
        Self { window: window.max(1), targets: VecDeque::new(), inner }
    }
}

impl ScalingPolicy for TargetMovingAverage {
    fn scale(&mut self, total: usize, idle: usize, waiting: usize) -> usize {
        let target = self.inner.scale(total, idle, waiting);
        self.targets.push_back(target);
        while self.targets.len() > self.window {
            self.targets.pop_front();
        }
        let sum: usize = self.targets.iter().sum();
        let count = self.targets.len();
        ((sum + count - 1) / count).max(1)
    }
}

#[cfg(test)]
#[path = "target_moving_average_tests.rs"]
mod tests;
