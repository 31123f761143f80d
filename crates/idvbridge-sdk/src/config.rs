// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host configuration → typed SDK launch request.

use idvbridge_core::BridgeConfig;
use idvbridge_core::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use crate::branding::Branding;

pub const KEY_SESSION_TOKEN: &str = "sessionToken";
pub const KEY_SESSION_URL: &str = "sessionUrl";
pub const KEY_BASE_URL: &str = "baseUrl";
pub const KEY_BRANDING: &str = "branding";
pub const KEY_LOCALE: &str = "locale";
pub const KEY_VENDOR_DATA: &str = "vendorData";
pub const KEY_CUSTOM_INTRO_SCREEN: &str = "customIntroScreen";

/// SDK-side configuration for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SdkConfiguration {
    pub branding: Option<Branding>,
    /// BCP-47 language tag, passed through untouched.
    pub locale: Option<String>,
    pub vendor_data: Option<String>,
    pub custom_intro_screen: bool,
}

/// A validated launch: where to start and how to configure the SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRequest {
    pub session_token: String,
    pub start_url: String,
    pub configuration: SdkConfiguration,
}

impl LaunchRequest {
    /// Translate the host's configuration object.
    ///
    /// `sessionUrl` wins over `sessionToken`; the token form builds the start
    /// URL from `baseUrl` or the configured default.
    #[instrument(skip_all)]
    pub fn from_host(host: &Value, config: &BridgeConfig) -> Result<Self> {
        let map = host.as_object().ok_or_else(|| {
            BridgeError::InvalidArguments("Veriff SDK configuration must be an object".into())
        })?;

        let (session_token, start_url) = match get_str(map, KEY_SESSION_URL)? {
            Some(session_url) if !session_url.is_empty() => {
                let token = session_token_from_url(session_url).ok_or_else(|| {
                    BridgeError::InvalidArguments(format!("Invalid session url {session_url}"))
                })?;
                (token, session_url.to_owned())
            }
            _ => {
                let token = get_str(map, KEY_SESSION_TOKEN)?
                    .filter(|token| !token.is_empty())
                    .ok_or_else(|| {
                        BridgeError::InvalidArguments(
                            "No sessionToken in Veriff SDK configuration".into(),
                        )
                    })?;
                let base = get_str(map, KEY_BASE_URL)?
                    .filter(|base| !base.is_empty())
                    .unwrap_or(&config.default_base_url);
                if Url::parse(base).is_err() {
                    return Err(BridgeError::InvalidArguments(format!(
                        "Invalid baseUrl: {base}"
                    )));
                }
                let base = base.strip_suffix('/').unwrap_or(base);
                (token.to_owned(), format!("{base}/v/{token}"))
            }
        };

        let branding = match map.get(KEY_BRANDING) {
            Some(Value::Object(branding)) => Some(Branding::from_host(branding)?),
            _ => None,
        };

        let configuration = SdkConfiguration {
            branding,
            locale: get_str(map, KEY_LOCALE)?.map(str::to_owned),
            vendor_data: get_str(map, KEY_VENDOR_DATA)?.map(str::to_owned),
            custom_intro_screen: get_bool(map, KEY_CUSTOM_INTRO_SCREEN)?.unwrap_or(false),
        };
        debug!(%start_url, ?configuration, "launch request built");

        Ok(Self {
            session_token,
            start_url,
            configuration,
        })
    }
}

/// The token is the second path segment of a session URL (`/v/<token>`).
pub fn session_token_from_url(session_url: &str) -> Option<String> {
    let url = Url::parse(session_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.path_segments()?
        .nth(1)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Typed getters over a JSON map. `null` counts as absent.
// ---------------------------------------------------------------------------

pub(crate) fn get_str<'a>(map: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(wrong_type(key, "a string")),
    }
}

pub(crate) fn get_f64(map: &Map<String, Value>, key: &str) -> Result<Option<f64>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(value)) => Ok(value.as_f64()),
        Some(_) => Err(wrong_type(key, "a number")),
    }
}

pub(crate) fn get_bool(map: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(wrong_type(key, "a boolean")),
    }
}

fn wrong_type(key: &str, expected: &str) -> BridgeError {
    BridgeError::InvalidArguments(format!("`{key}` must be {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use idvbridge_core::ImageReference;
    use serde_json::json;

    fn request(host: Value) -> Result<LaunchRequest> {
        LaunchRequest::from_host(&host, &BridgeConfig::default())
    }

    #[test]
    fn session_url_supplies_token() {
        let launch = request(json!({
            "sessionUrl": "https://magic.veriff.me/v/eyJhbGciOi.abc"
        }))
        .unwrap();
        assert_eq!(launch.session_token, "eyJhbGciOi.abc");
        assert_eq!(launch.start_url, "https://magic.veriff.me/v/eyJhbGciOi.abc");
        assert_eq!(launch.configuration, SdkConfiguration::default());
    }

    #[test]
    fn session_url_without_token_is_rejected() {
        for url in ["https://magic.veriff.me/", "https://magic.veriff.me/v", "not a url"] {
            let err = request(json!({ "sessionUrl": url })).unwrap_err();
            assert_eq!(err.code(), "E_VERIFF_INVALID_ARGUMENTS");
            assert_eq!(err.to_string(), format!("Invalid session url {url}"));
        }
    }

    #[test]
    fn token_form_uses_default_base() {
        let launch = request(json!({ "sessionToken": "tok123" })).unwrap();
        assert_eq!(launch.start_url, "https://magic.veriff.me/v/tok123");
    }

    #[test]
    fn token_form_strips_trailing_slash_from_base() {
        let launch = request(json!({
            "sessionToken": "tok123",
            "baseUrl": "https://alt.example.test/"
        }))
        .unwrap();
        assert_eq!(launch.start_url, "https://alt.example.test/v/tok123");
    }

    #[test]
    fn empty_session_url_falls_back_to_token() {
        let launch = request(json!({ "sessionUrl": "", "sessionToken": "tok" })).unwrap();
        assert_eq!(launch.session_token, "tok");
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = request(json!({ "sessionToken": "" })).unwrap_err();
        assert_eq!(err.to_string(), "No sessionToken in Veriff SDK configuration");
        assert!(request(json!("tok")).is_err());
    }

    #[test]
    fn optional_fields_are_carried() {
        let launch = request(json!({
            "sessionToken": "tok",
            "locale": "et-EE",
            "vendorData": "order-42",
            "customIntroScreen": true,
            "branding": { "logo": "brand_logo", "primary": "#123456" }
        }))
        .unwrap();
        let config = launch.configuration;
        assert_eq!(config.locale.as_deref(), Some("et-EE"));
        assert_eq!(config.vendor_data.as_deref(), Some("order-42"));
        assert!(config.custom_intro_screen);
        assert_eq!(
            config.branding.and_then(|b| b.logo),
            Some(ImageReference::local("brand_logo"))
        );
    }

    #[test]
    fn bad_branding_color_rejects_launch() {
        let err = request(json!({
            "sessionToken": "tok",
            "branding": { "background": "#nothex" }
        }))
        .unwrap_err();
        assert_eq!(err.code(), "E_VERIFF_INVALID_ARGUMENTS");
    }

    #[test]
    fn wrongly_typed_flag_rejects_launch() {
        let err = request(json!({ "sessionToken": "tok", "customIntroScreen": "yes" })).unwrap_err();
        assert_eq!(err.to_string(), "`customIntroScreen` must be a boolean");
    }
}
