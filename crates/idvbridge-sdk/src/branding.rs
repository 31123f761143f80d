// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Branding translation: colours, button radius, fonts, and the logo.
//
// Host branding arrives as a loosely typed JSON map. Unknown keys are
// ignored; known keys with the wrong type reject the whole launch.

use std::collections::BTreeMap;

use idvbridge_core::error::{BridgeError, Result};
use idvbridge_core::{ImageLoadError, ImageReference, ResolvedImage};
use idvbridge_imaging::SyncImageResolver;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{get_f64, get_str};
use crate::traits::DrawableProvider;

pub const KEY_LOGO: &str = "logo";
pub const KEY_BUTTON_RADIUS: &str = "buttonRadius";
pub const KEY_ANDROID_FONT: &str = "androidFont";
pub const KEY_IOS_FONT: &str = "iOSFont";
pub const KEY_IMAGE_URI: &str = "uri";

/// Schemes that make a logo `uri` an asynchronous fetch rather than a
/// bundled-resource name.
const ASYNC_LOGO_SCHEMES: [&str; 3] = ["https://", "http://", "file://"];

// ---------------------------------------------------------------------------
// Colours
// ---------------------------------------------------------------------------

/// A packed ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self(u32::from_be_bytes([a, r, g, b]))
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn parse(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || BridgeError::InvalidArguments(format!("Invalid color `{hex}`"));
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let mut value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        let mut alpha = 0xff;
        if digits.len() == 8 {
            alpha = (value & 0xff) as u8;
            value >>= 8;
        }
        let [_, r, g, b] = value.to_be_bytes();
        Ok(Self::from_argb(alpha, r, g, b))
    }

    pub fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    pub fn red(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    pub fn green(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    pub fn blue(self) -> u8 {
        self.0.to_be_bytes()[3]
    }
}

/// Every colour slot the SDK exposes for theming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColorRole {
    Background,
    OnBackground,
    OnBackgroundSecondary,
    OnBackgroundTertiary,
    Primary,
    OnPrimary,
    Secondary,
    OnSecondary,
    CameraOverlay,
    OnCameraOverlay,
    Outline,
    Success,
    Error,
}

impl ColorRole {
    pub const ALL: [ColorRole; 13] = [
        ColorRole::Background,
        ColorRole::OnBackground,
        ColorRole::OnBackgroundSecondary,
        ColorRole::OnBackgroundTertiary,
        ColorRole::Primary,
        ColorRole::OnPrimary,
        ColorRole::Secondary,
        ColorRole::OnSecondary,
        ColorRole::CameraOverlay,
        ColorRole::OnCameraOverlay,
        ColorRole::Outline,
        ColorRole::Success,
        ColorRole::Error,
    ];

    /// Host configuration key for this slot.
    pub fn key(self) -> &'static str {
        match self {
            ColorRole::Background => "background",
            ColorRole::OnBackground => "onBackground",
            ColorRole::OnBackgroundSecondary => "onBackgroundSecondary",
            ColorRole::OnBackgroundTertiary => "onBackgroundTertiary",
            ColorRole::Primary => "primary",
            ColorRole::OnPrimary => "onPrimary",
            ColorRole::Secondary => "secondary",
            ColorRole::OnSecondary => "onSecondary",
            ColorRole::CameraOverlay => "cameraOverlay",
            ColorRole::OnCameraOverlay => "onCameraOverlay",
            ColorRole::Outline => "outline",
            ColorRole::Success => "success",
            ColorRole::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Branding
// ---------------------------------------------------------------------------

/// Font resource names for the three weights the SDK uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSet {
    pub regular: Option<String>,
    pub medium: Option<String>,
    pub bold: Option<String>,
}

/// Typed branding configuration for the SDK.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    pub logo: Option<ImageReference>,
    pub colors: BTreeMap<ColorRole, Color>,
    pub button_radius: Option<f32>,
    pub font: Option<FontSet>,
}

impl Branding {
    pub fn color(&self, role: ColorRole) -> Option<Color> {
        self.colors.get(&role).copied()
    }

    /// Translate the host's `branding` map.
    pub fn from_host(map: &Map<String, Value>) -> Result<Self> {
        let mut branding = Branding {
            logo: map.get(KEY_LOGO).and_then(logo_reference),
            ..Default::default()
        };

        for role in ColorRole::ALL {
            if let Some(hex) = get_str(map, role.key())? {
                branding.colors.insert(role, Color::parse(hex)?);
            }
        }

        branding.button_radius = get_f64(map, KEY_BUTTON_RADIUS)?.map(|radius| radius as f32);

        let font = match map.get(KEY_ANDROID_FONT) {
            Some(Value::Object(font)) => Some(font),
            _ => match map.get(KEY_IOS_FONT) {
                Some(Value::Object(font)) => Some(font),
                _ => None,
            },
        };
        if let Some(font) = font {
            let set = FontSet {
                regular: get_str(font, "regular")?.map(str::to_owned),
                medium: get_str(font, "medium")?.map(str::to_owned),
                bold: get_str(font, "bold")?.map(str::to_owned),
            };
            debug!(?set, "font set");
            branding.font = Some(set);
        }

        Ok(branding)
    }
}

/// Interpret the host's `logo` value.
///
/// Unusable values are logged and dropped; a bad logo never blocks a launch.
pub fn logo_reference(value: &Value) -> Option<ImageReference> {
    match value {
        Value::String(name) => Some(ImageReference::local(name.clone())),
        Value::Object(image) => match image.get(KEY_IMAGE_URI) {
            Some(Value::String(uri)) if !uri.is_empty() => {
                if ASYNC_LOGO_SCHEMES.iter().any(|scheme| uri.starts_with(scheme)) {
                    debug!(uri = %uri, "async logo");
                    Some(ImageReference::uri(uri.clone()))
                } else {
                    debug!(uri = %uri, "logo from resource");
                    Some(ImageReference::local(uri.clone()))
                }
            }
            Some(_) => {
                warn!("logo uri is empty or not a string");
                None
            }
            None => {
                let keys: Vec<&str> = image.keys().map(String::as_str).collect();
                warn!(?keys, "logo map has no uri");
                None
            }
        },
        Value::Null => {
            warn!("provided logo is null");
            None
        }
        other => {
            warn!(kind = json_kind(other), "unexpected logo type");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Logo provider
// ---------------------------------------------------------------------------

/// Resolves the branding logo on demand, on the SDK's thread.
#[derive(Debug, Clone)]
pub struct LogoProvider {
    reference: ImageReference,
    resolver: SyncImageResolver,
}

impl LogoProvider {
    pub fn new(reference: ImageReference, resolver: SyncImageResolver) -> Self {
        Self {
            reference,
            resolver,
        }
    }
}

impl DrawableProvider for LogoProvider {
    fn reference(&self) -> &ImageReference {
        &self.reference
    }

    fn load_image(&self) -> std::result::Result<ResolvedImage, ImageLoadError> {
        let image = self.resolver.resolve(&self.reference)?;
        debug!(
            reference = %self.reference,
            width = image.width(),
            height = image.height(),
            "logo loaded"
        );
        Ok(image)
    }
}
