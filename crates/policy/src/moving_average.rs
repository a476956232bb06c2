// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::ScalingPolicy;
use std::collections::VecDeque;

/// Feeds `inner` an averaged `waiting` over the last `window` samples
/// (fixed-size ring, integer ceiling), damping noisy per-tick spikes.
pub struct MovingAverage {
    window: usize,
    samples: VecDeque<usize>,
    inner: Box<dyn ScalingPolicy>,
}

impl MovingAverage {
    pub fn new(window: usize, inner: Box<dyn ScalingPolicy>) -> Self {
        Self { window: window.max(1), samples: VecDeque::new(), inner }
    }

    fn push_and_average(&mut self, waiting: usize) -> usize {
        self.samples.push_back(waiting);
        while self.samples.len() > self.window {
            self.samples.pop_front();
        }
        let sum: usize = self.samples.iter().sum();
        let count = self.samples.len();
        (sum + count - 1) / count
    }
}

impl ScalingPolicy for MovingAverage {
    fn scale(&mut self, total: usize, idle: usize, waiting: usize) -> usize {
        let averaged = self.push_and_average(waiting);
        self.inner.scale(total, idle, averaged)
    }
}

#[cfg(test)]
#[path = "moving_average_tests.rs"]
mod tests;
