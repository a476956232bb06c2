// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::{env, Aimd, MinMax, MovingAverage, ScalingPolicy, TargetMovingAverage};
use std::time::Duration;

const DEFAULT_TICK: Duration = Duration::from_millis(500);
const DEFAULT_WINDOW: Duration = Duration::from_secs(5);
const DEFAULT_MIN_INSTANCES: usize = 1;
const DEFAULT_TARGET_WINDOW: usize = 5;
const DEFAULT_SCALE_INC: usize = 1;
const DEFAULT_DOWNSCALE_MULT: f64 = 0.25;

fn default_max_instances() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Builds the default policy (spec §4.3):
///
/// `TargetMovingAverage(5, MovingAverage(W/T, MinMax(minN, maxN, AIMD(1, 0.25))))`
///
/// where `T` is the tick interval (default 500ms), `W` the averaging window
/// (default 5s), `minN` defaults to 1, `maxN` to the host's hardware
/// concurrency. All overridable via `BBLFSHD_*` environment variables.
pub fn default_policy() -> Box<dyn ScalingPolicy> {
    let tick = env::policy_tick().unwrap_or(DEFAULT_TICK);
    let window = env::policy_window().unwrap_or(DEFAULT_WINDOW);
    let min_n = env::min_driver_instances().unwrap_or(DEFAULT_MIN_INSTANCES);
    let max_n = env::max_driver_instances().unwrap_or_else(default_max_instances);
    let scale_inc = env::policy_scale_inc().unwrap_or(DEFAULT_SCALE_INC);
    let downscale_mult = env::policy_downscale_mult().unwrap_or(DEFAULT_DOWNSCALE_MULT);

    let samples_per_window = samples_in_window(window, tick);

    let aimd = Aimd::new(scale_inc, downscale_mult);
    let clamped = MinMax::new(min_n, max_n, Box::new(aimd));
    let averaged = MovingAverage::new(samples_per_window, Box::new(clamped));
    Box::new(TargetMovingAverage::new(DEFAULT_TARGET_WINDOW, Box::new(averaged)))
}

fn samples_in_window(window: Duration, tick: Duration) -> usize {
    if tick.is_zero() {
        return 1;
    }
    ((window.as_secs_f64() / tick.as_secs_f64()).ceil() as usize).max(1)
}

#[cfg(test)]
#[path = "default_tests.rs"]
mod tests;
