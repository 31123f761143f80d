// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// idvbridge — Core types, error definitions, and configuration shared across
// all crates.

pub mod codes;
pub mod config;
pub mod error;
pub mod types;

pub use config::BridgeConfig;
pub use error::{BridgeError, ImageErrorKind, ImageLoadError};
pub use types::*;
