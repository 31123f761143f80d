// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Seams to the two external collaborators: the native verification SDK and
// the host runtime's promise.

use std::collections::BTreeMap;
use std::sync::Arc;

use idvbridge_core::error::Result;
use idvbridge_core::{ImageLoadError, ImageReference, ResolvedImage, SdkResult};

use crate::config::SdkConfiguration;

/// Plain string map handed back to the host on resolution.
pub type ResultMap = BTreeMap<String, String>;

/// Settles a host-side promise. Each method consumes the promise, so it can
/// be settled only once.
pub trait HostPromise: Send {
    fn resolve(self: Box<Self>, result: ResultMap);
    fn reject(self: Box<Self>, code: &str, message: &str);
}

/// Lazily loads a branding image for the SDK, on whatever thread the SDK
/// chooses.
pub trait DrawableProvider: Send + Sync {
    fn reference(&self) -> &ImageReference;
    fn load_image(&self) -> std::result::Result<ResolvedImage, ImageLoadError>;
}

/// Everything the SDK needs to start one session.
pub struct SdkSession {
    pub start_url: String,
    pub configuration: SdkConfiguration,
    /// Present when branding names a logo.
    pub logo: Option<Arc<dyn DrawableProvider>>,
}

/// Delivered by the SDK when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkCompletion {
    /// The session the SDK says it finished (token or start URL).
    pub session_url: String,
    /// `None` when the SDK produced no parsable result.
    pub result: Option<SdkResult>,
    /// The hosting screen was dismissed rather than finishing normally.
    pub cancelled_by_host: bool,
}

/// Receives session completions. May be called for sessions other than the
/// one it was registered for.
pub type SdkListener = Arc<dyn Fn(SdkCompletion) + Send + Sync>;

/// The native verification SDK.
pub trait VerificationSdk: Send + Sync {
    /// Human-readable platform name (e.g. "iOS 17", "Android 14").
    fn platform_name(&self) -> &str;

    /// Whether a host screen is available to present the flow on.
    fn is_attached(&self) -> bool;

    /// Start the flow. Returns once the flow is launched; the outcome
    /// arrives later through `listener`.
    fn start(&self, session: SdkSession, listener: SdkListener) -> Result<()>;
}
