// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drv-engine: the driver pool scheduler (spec §4.4) — the core of this
//! system.
//!
//! A [`DriverPool`] is a per-language elastic pool of [`PoolWorker`]s. A
//! single manager task is the sole mutator of scheduling decisions
//! (spec §4.4 "Concurrency architecture", §5, §9); a policy task ticks a
//! [`drv_policy::ScalingPolicy`] to publish a target worker count, and a
//! spawner task turns spawn signals into new workers with backoff,
//! escalating persistent failures to a fatal signal the manager observes.

mod error;
mod factory;
mod pool;
mod worker;

pub use error::{ExecuteError, PoolError};
pub use factory::{DriverWorkerFactory, WorkerFactory};
pub use pool::{DriverPool, PoolHandle, PoolState};
pub use worker::PoolWorker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
