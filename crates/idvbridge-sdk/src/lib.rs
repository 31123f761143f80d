// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// idvbridge-sdk — Bridge between a host runtime and the native verification
// SDK.
//
// Translates the host's loosely typed configuration into an SDK session,
// hands the SDK a lazily resolved branding logo, and marshals the session
// outcome back through a host promise.

pub mod branding;
pub mod bridge;
pub mod config;
pub mod promise;
pub mod stub;
pub mod traits;

pub use branding::{Branding, Color, ColorRole, FontSet, LogoProvider};
pub use bridge::VerificationBridge;
pub use config::{LaunchRequest, SdkConfiguration};
pub use promise::{ChannelPromise, PromiseReceiver, Rejection};
pub use stub::{StubScript, StubSdk};
pub use traits::{HostPromise, ResultMap, SdkCompletion, SdkSession, VerificationSdk};
