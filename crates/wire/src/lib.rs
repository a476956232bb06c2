// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drv-wire: wire framing and request/response shapes (spec §6).
//!
//! The RPC transport and codec proper are an out-of-scope external
//! collaborator (spec §1); this crate is the narrow interface the core
//! consumes — length-prefixed JSON framing plus the serde shapes for the
//! client-facing and control-facing RPCs.

mod control;
mod error;
mod framing;
mod request;
mod response;

pub use control::{
    ControlRequest, ControlResponse, DriverInstanceStateEntry, DriverPoolStateEntry,
    DriverStateEntry, RecommendedInstallOutcome,
};
pub use error::ProtocolError;
pub use framing::{
    decode, encode, read_message, read_versioned_message, write_message, write_versioned_message,
    ProtocolVersion,
};
pub use request::{ClientRequest, NativeParseRequest, ParseMode, ParseRequest};
pub use response::{ClientResponse, LanguageInfo, NativeParseResponse, ParseResponse, VersionInfo};
