// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drv-adapters: the container-backed driver worker lifecycle (spec §4.2).
//!
//! [`container`] is the narrow interface onto the out-of-scope container
//! runtime primitives; [`runtime::process`] is the one concrete runtime
//! this workspace ships (a plain child process standing in for the
//! namespace/cgroup-isolated container spec §1 treats as an external
//! collaborator). [`rpc`] is the local-socket client a [`worker::DriverWorker`]
//! uses to talk to the driver binary running inside its container.

pub mod container;
pub mod error;
pub mod rpc;
pub mod runtime;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use container::{BindMount, ContainerHandle, ContainerRuntime, ContainerSpec, ContainerState};
pub use error::AdapterError;
pub use rpc::RpcClient;
pub use worker::{DriverWorker, WorkerOptions};
