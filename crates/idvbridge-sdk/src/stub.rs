// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub SDK for desktop/CI builds where the native verification flow is
// unavailable.
//
// Each launch plays back a scripted completion on a background thread. The
// branding logo is resolved first, the way the native SDK draws it while the
// flow is on screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use idvbridge_core::error::{BridgeError, Result};
use idvbridge_core::{ImageErrorKind, SdkResult};
use tracing::{debug, warn};

use crate::config::SdkConfiguration;
use crate::traits::{SdkCompletion, SdkListener, SdkSession, VerificationSdk};

/// What the stub reports when a session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubScript {
    pub result: Option<SdkResult>,
    pub cancelled_by_host: bool,
    /// Deliver a completion for an unrelated session before the real one.
    pub stray_completion_first: bool,
    /// Make `start` itself fail with this message.
    pub start_failure: Option<String>,
}

impl Default for StubScript {
    fn default() -> Self {
        Self {
            result: Some(SdkResult::Done),
            cancelled_by_host: false,
            stray_completion_first: false,
            start_failure: None,
        }
    }
}

/// One session the stub was asked to run.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub start_url: String,
    pub configuration: SdkConfiguration,
    /// Logo dimensions, or why it could not be loaded. `None` without a logo.
    pub logo: Option<std::result::Result<(u32, u32), ImageErrorKind>>,
}

/// No-op SDK returned on platforms without a native verification flow.
pub struct StubSdk {
    attached: AtomicBool,
    script: Mutex<StubScript>,
    launches: Arc<Mutex<Vec<LaunchRecord>>>,
}

impl StubSdk {
    pub fn new(script: StubScript) -> Self {
        Self {
            attached: AtomicBool::new(true),
            script: Mutex::new(script),
            launches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_attached(&self, attached: bool) {
        self.attached.store(attached, Ordering::SeqCst);
    }

    pub fn set_script(&self, script: StubScript) {
        *self.script.lock().unwrap_or_else(PoisonError::into_inner) = script;
    }

    /// Sessions whose completion has been delivered, oldest first.
    pub fn launches(&self) -> Vec<LaunchRecord> {
        self.launches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for StubSdk {
    fn default() -> Self {
        Self::new(StubScript::default())
    }
}

impl VerificationSdk for StubSdk {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn start(&self, session: SdkSession, listener: SdkListener) -> Result<()> {
        let script = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(message) = script.start_failure {
            warn!(%message, "stub SDK refused to start");
            return Err(BridgeError::Launch(message));
        }

        let launches = Arc::clone(&self.launches);
        std::thread::Builder::new()
            .name("idv-stub-sdk".into())
            .spawn(move || {
                let logo = session.logo.as_ref().map(|provider| {
                    provider
                        .load_image()
                        .map(|image| (image.width(), image.height()))
                        .map_err(|err| {
                            warn!(reference = %provider.reference(), error = %err, "logo unavailable");
                            err.kind()
                        })
                });
                launches
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(LaunchRecord {
                        start_url: session.start_url.clone(),
                        configuration: session.configuration,
                        logo,
                    });

                if script.stray_completion_first {
                    listener(SdkCompletion {
                        session_url: "stray-session".into(),
                        result: Some(SdkResult::Done),
                        cancelled_by_host: false,
                    });
                }
                debug!(start_url = %session.start_url, result = ?script.result, "stub session finished");
                listener(SdkCompletion {
                    session_url: session.start_url,
                    result: script.result,
                    cancelled_by_host: script.cancelled_by_host,
                });
            })?;
        Ok(())
    }
}
