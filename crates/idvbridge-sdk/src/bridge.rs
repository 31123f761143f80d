// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Launches verification sessions and marshals their outcome back to the host.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use idvbridge_core::error::{BridgeError, Result};
use idvbridge_core::{BridgeConfig, SessionStatus, codes};
use idvbridge_imaging::{AsyncDecodePipeline, SyncImageResolver};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::branding::LogoProvider;
use crate::config::LaunchRequest;
use crate::traits::{
    DrawableProvider, HostPromise, ResultMap, SdkCompletion, SdkListener, SdkSession,
    VerificationSdk,
};

type PendingPromise = Arc<Mutex<Option<Box<dyn HostPromise>>>>;

/// Host-facing entry point.
pub struct VerificationBridge {
    sdk: Arc<dyn VerificationSdk>,
    resolver: SyncImageResolver,
    config: BridgeConfig,
    last_result: Arc<Mutex<Option<ResultMap>>>,
}

impl VerificationBridge {
    pub fn new(sdk: Arc<dyn VerificationSdk>, resolver: SyncImageResolver, config: BridgeConfig) -> Self {
        Self {
            sdk,
            resolver,
            config,
            last_result: Arc::new(Mutex::new(None)),
        }
    }

    /// Bridge whose logos are loaded by the production decode pipeline.
    pub fn with_decode_pipeline(sdk: Arc<dyn VerificationSdk>, config: BridgeConfig) -> Result<Self> {
        let pipeline = AsyncDecodePipeline::new(&config)?;
        Ok(Self::new(sdk, SyncImageResolver::new(pipeline), config))
    }

    /// Start a verification session described by `host_config`.
    ///
    /// `promise` is settled exactly once: rejected on a bad configuration or
    /// launch failure, otherwise resolved with the session's result map when
    /// the SDK reports back.
    #[instrument(skip_all, fields(platform = self.sdk.platform_name()))]
    pub fn launch(&self, host_config: &Value, promise: impl HostPromise + 'static) {
        let promise: Box<dyn HostPromise> = Box::new(promise);

        let request = match LaunchRequest::from_host(host_config, &self.config) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "rejecting launch");
                promise.reject(err.code(), &err.to_string());
                return;
            }
        };

        // A new launch supersedes any unrecovered result, even if it is
        // rejected below.
        *self
            .last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;

        if !self.sdk.is_attached() {
            let err = BridgeError::NotAttached;
            warn!(error = %err, "rejecting launch");
            promise.reject(err.code(), &err.to_string());
            return;
        }

        let logo = request
            .configuration
            .branding
            .as_ref()
            .and_then(|branding| branding.logo.clone())
            .map(|reference| {
                Arc::new(LogoProvider::new(reference, self.resolver.clone()))
                    as Arc<dyn DrawableProvider>
            });

        let pending: PendingPromise = Arc::new(Mutex::new(Some(promise)));
        let listener = self.listener(&request, Arc::clone(&pending));
        let session = SdkSession {
            start_url: request.start_url.clone(),
            configuration: request.configuration,
            logo,
        };

        info!(start_url = %session.start_url, "starting verification");
        if let Err(err) = self.sdk.start(session, listener) {
            warn!(error = %err, "SDK failed to start");
            if let Some(promise) = pending.lock().unwrap_or_else(PoisonError::into_inner).take() {
                promise.reject(codes::ERROR_LAUNCH_FAILED, &err.to_string());
            }
        }
    }

    fn listener(&self, request: &LaunchRequest, pending: PendingPromise) -> SdkListener {
        let token = request.session_token.clone();
        let start_url = request.start_url.clone();
        let last_result = Arc::clone(&self.last_result);

        Arc::new(move |completion: SdkCompletion| {
            if completion.session_url != token && completion.session_url != start_url {
                debug!(session = %completion.session_url, "ignoring completion for another session");
                return;
            }
            let Some(promise) = pending.lock().unwrap_or_else(PoisonError::into_inner).take() else {
                debug!("session already settled");
                return;
            };

            let map = result_map(&token, &completion);
            info!(status = %map[codes::KEY_STATUS], "verification finished");
            *last_result.lock().unwrap_or_else(PoisonError::into_inner) = Some(map.clone());
            promise.resolve(map);
        })
    }

    /// The most recent result, handed out once. Lets a host that lost its
    /// promise (e.g. after being restarted) pick the outcome up later.
    pub fn recover_last_result(&self) -> Option<ResultMap> {
        self.last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Constants the host reads to interpret rejections and statuses.
    pub fn exported_constants() -> BTreeMap<&'static str, &'static str> {
        BTreeMap::from([
            ("errorInvalidArgs", codes::ERROR_INVALID_ARGS),
            ("errorActivityNotAttached", codes::ERROR_ACTIVITY_NOT_ATTACHED),
            ("statusCanceled", codes::STATUS_CANCELED),
            ("statusDone", codes::STATUS_DONE),
            ("statusError", codes::STATUS_ERROR),
        ])
    }
}

fn result_map(session_token: &str, completion: &SdkCompletion) -> ResultMap {
    let status = match completion.result {
        Some(result) => result.status(),
        None if completion.cancelled_by_host => SessionStatus::Canceled,
        None => SessionStatus::Error,
    };

    let mut map = ResultMap::new();
    map.insert(codes::KEY_SESSION_TOKEN.into(), session_token.into());
    map.insert(codes::KEY_STATUS.into(), status.as_host_str().into());
    if let Some(kind) = completion.result.and_then(|result| result.error()) {
        map.insert(codes::KEY_RESULT_ERROR.into(), kind.code().into());
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promise::{ChannelPromise, PromiseReceiver};
    use crate::stub::{StubScript, StubSdk};
    use idvbridge_core::{ImageErrorKind, SdkErrorKind, SdkResult};
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use serde_json::json;

    struct Fixture {
        sdk: Arc<StubSdk>,
        bridge: VerificationBridge,
        _resources: tempfile::TempDir,
    }

    fn fixture(script: StubScript) -> Fixture {
        let resources = tempfile::tempdir().unwrap();
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([1, 2, 3, 255])));
        logo.save_with_format(resources.path().join("brand_logo.png"), ImageFormat::Png)
            .unwrap();

        let config = BridgeConfig {
            resource_dir: resources.path().to_path_buf(),
            decode_threads: 1,
            ..Default::default()
        };
        let sdk = Arc::new(StubSdk::new(script));
        let bridge = VerificationBridge::with_decode_pipeline(sdk.clone(), config).unwrap();
        Fixture {
            sdk,
            bridge,
            _resources: resources,
        }
    }

    fn launch(fixture: &Fixture, host: Value) -> PromiseReceiver {
        let (promise, receiver) = ChannelPromise::new();
        fixture.bridge.launch(&host, promise);
        receiver
    }

    #[test]
    fn done_session_resolves_with_token_and_status() {
        let fixture = fixture(StubScript::default());
        let result = launch(&fixture, json!({ "sessionToken": "tok" }))
            .blocking_wait()
            .unwrap();

        assert_eq!(result[codes::KEY_STATUS], "STATUS_DONE");
        assert_eq!(result[codes::KEY_SESSION_TOKEN], "tok");
        assert!(!result.contains_key(codes::KEY_RESULT_ERROR));
    }

    #[test]
    fn sdk_error_is_reported_in_result() {
        let fixture = fixture(StubScript {
            result: Some(SdkResult::Error(SdkErrorKind::Network)),
            ..Default::default()
        });
        let result = launch(&fixture, json!({ "sessionToken": "tok" }))
            .blocking_wait()
            .unwrap();
        assert_eq!(result[codes::KEY_STATUS], "STATUS_ERROR");
        assert_eq!(result[codes::KEY_RESULT_ERROR], "NETWORK_ERROR");
    }

    #[test]
    fn missing_result_maps_to_cancel_or_error() {
        let fixture = fixture(StubScript {
            result: None,
            cancelled_by_host: true,
            ..Default::default()
        });
        let result = launch(&fixture, json!({ "sessionToken": "tok" }))
            .blocking_wait()
            .unwrap();
        assert_eq!(result[codes::KEY_STATUS], "STATUS_CANCELED");

        fixture.sdk.set_script(StubScript {
            result: None,
            ..Default::default()
        });
        let result = launch(&fixture, json!({ "sessionToken": "tok" }))
            .blocking_wait()
            .unwrap();
        assert_eq!(result[codes::KEY_STATUS], "STATUS_ERROR");
    }

    #[test]
    fn stray_completion_is_ignored() {
        let fixture = fixture(StubScript {
            result: Some(SdkResult::Canceled),
            stray_completion_first: true,
            ..Default::default()
        });
        let result = launch(&fixture, json!({ "sessionToken": "tok" }))
            .blocking_wait()
            .unwrap();
        assert_eq!(result[codes::KEY_STATUS], "STATUS_CANCELED");
        assert_eq!(result[codes::KEY_SESSION_TOKEN], "tok");
    }

    #[test]
    fn invalid_config_is_rejected_without_starting() {
        let fixture = fixture(StubScript::default());
        let rejection = launch(&fixture, json!({})).blocking_wait().unwrap_err();
        assert_eq!(rejection.code, codes::ERROR_INVALID_ARGS);
        assert!(fixture.sdk.launches().is_empty());
    }

    #[test]
    fn detached_sdk_is_rejected() {
        let fixture = fixture(StubScript::default());
        fixture.sdk.set_attached(false);
        let rejection = launch(&fixture, json!({ "sessionToken": "tok" }))
            .blocking_wait()
            .unwrap_err();
        assert_eq!(rejection.code, codes::ERROR_ACTIVITY_NOT_ATTACHED);
    }

    #[test]
    fn start_failure_is_launch_failed() {
        let fixture = fixture(StubScript {
            start_failure: Some("no camera permission flow".into()),
            ..Default::default()
        });
        let rejection = launch(&fixture, json!({ "sessionToken": "tok" }))
            .blocking_wait()
            .unwrap_err();
        assert_eq!(rejection.code, codes::ERROR_LAUNCH_FAILED);
        assert!(rejection.message.contains("no camera permission flow"));
    }

    #[test]
    fn logo_is_resolved_by_the_sdk() {
        let fixture = fixture(StubScript::default());
        launch(
            &fixture,
            json!({ "sessionToken": "tok", "branding": { "logo": "brand_logo" } }),
        )
        .blocking_wait()
        .unwrap();
        launch(
            &fixture,
            json!({ "sessionToken": "tok", "branding": { "logo": "logo_missing" } }),
        )
        .blocking_wait()
        .unwrap();

        let logos: Vec<_> = fixture.sdk.launches().into_iter().map(|l| l.logo).collect();
        assert_eq!(
            logos,
            vec![Some(Ok((16, 8))), Some(Err(ImageErrorKind::DecodeFailed))]
        );
    }

    #[test]
    fn last_result_is_recovered_once() {
        let fixture = fixture(StubScript::default());
        assert_eq!(fixture.bridge.recover_last_result(), None);

        let delivered = launch(&fixture, json!({ "sessionUrl": "https://magic.veriff.me/v/abc" }))
            .blocking_wait()
            .unwrap();
        assert_eq!(fixture.bridge.recover_last_result(), Some(delivered));
        assert_eq!(fixture.bridge.recover_last_result(), None);
    }

    #[test]
    fn detached_launch_discards_previous_result() {
        let fixture = fixture(StubScript::default());
        launch(&fixture, json!({ "sessionToken": "first" }))
            .blocking_wait()
            .unwrap();

        fixture.sdk.set_attached(false);
        let rejection = launch(&fixture, json!({ "sessionToken": "second" }))
            .blocking_wait()
            .unwrap_err();
        assert_eq!(rejection.code, codes::ERROR_ACTIVITY_NOT_ATTACHED);
        assert_eq!(fixture.bridge.recover_last_result(), None);
    }

    #[test]
    fn exported_constants_match_codes() {
        let constants = VerificationBridge::exported_constants();
        assert_eq!(constants.len(), 5);
        assert_eq!(constants["errorInvalidArgs"], "E_VERIFF_INVALID_ARGUMENTS");
        assert_eq!(constants["errorActivityNotAttached"], "E_VERIFF_ACTIVITY_NOT_ATTACHED");
        assert_eq!(constants["statusCanceled"], "STATUS_CANCELED");
        assert_eq!(constants["statusDone"], "STATUS_DONE");
        assert_eq!(constants["statusError"], "STATUS_ERROR");
    }
}
