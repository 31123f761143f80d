// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the verification bridge.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::codes;
use crate::error::{ImageErrorKind, ImageLoadError};

// ---------------------------------------------------------------------------
// Branding images
// ---------------------------------------------------------------------------

/// Where a branding image should be obtained from.
///
/// Crosses the host/SDK boundary as a plain `(kind, value)` string pair, see
/// [`ImageReference::to_parts`] and [`ImageReference::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageReference {
    /// A resource bundled with the host application, looked up by name.
    LocalResource { name: String },
    /// An `http(s)://` or `file://` URI.
    RemoteOrLocalFile { uri: String },
}

impl ImageReference {
    pub const KIND_LOCAL_RESOURCE: &'static str = "local_resource";
    pub const KIND_REMOTE_OR_LOCAL_FILE: &'static str = "remote_or_local_file";

    pub fn local(name: impl Into<String>) -> Self {
        Self::LocalResource { name: name.into() }
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self::RemoteOrLocalFile { uri: uri.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImageReference::LocalResource { .. } => Self::KIND_LOCAL_RESOURCE,
            ImageReference::RemoteOrLocalFile { .. } => Self::KIND_REMOTE_OR_LOCAL_FILE,
        }
    }

    /// The resource name or URI string.
    pub fn value(&self) -> &str {
        match self {
            ImageReference::LocalResource { name } => name,
            ImageReference::RemoteOrLocalFile { uri } => uri,
        }
    }

    pub fn to_parts(&self) -> (&'static str, String) {
        (self.kind(), self.value().to_owned())
    }

    /// Rebuild a reference from a transported `(kind, value)` pair.
    pub fn from_parts(kind: &str, value: impl Into<String>) -> Result<Self, ImageLoadError> {
        match kind {
            Self::KIND_LOCAL_RESOURCE => Ok(Self::local(value)),
            Self::KIND_REMOTE_OR_LOCAL_FILE => Ok(Self::uri(value)),
            other => Err(ImageLoadError::invalid_reference(format!(
                "unknown image reference kind `{other}`"
            ))),
        }
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

/// A fully decoded, caller-owned RGBA8 image.
///
/// The pixel buffer is never shared with the decode pipeline that produced it.
#[derive(PartialEq, Eq)]
pub struct ResolvedImage {
    pixels: RgbaImage,
}

impl ResolvedImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}

impl std::fmt::Debug for ResolvedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

/// Result of a single resolution attempt. Exactly one variant is produced.
#[derive(Debug)]
pub enum ResolutionOutcome {
    Success(ResolvedImage),
    Failure(ImageLoadError),
}

impl ResolutionOutcome {
    pub fn failure(kind: ImageErrorKind, message: impl Into<String>) -> Self {
        Self::Failure(ImageLoadError::new(kind, message))
    }

    pub fn into_result(self) -> Result<ResolvedImage, ImageLoadError> {
        match self {
            ResolutionOutcome::Success(image) => Ok(image),
            ResolutionOutcome::Failure(err) => Err(err),
        }
    }
}

// ---------------------------------------------------------------------------
// Verification session results
// ---------------------------------------------------------------------------

/// Terminal status of a verification session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Done,
    Canceled,
    Error,
}

impl SessionStatus {
    pub fn as_host_str(self) -> &'static str {
        match self {
            SessionStatus::Done => codes::STATUS_DONE,
            SessionStatus::Canceled => codes::STATUS_CANCELED,
            SessionStatus::Error => codes::STATUS_ERROR,
        }
    }
}

/// Error reported by the native SDK when a session ends in `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SdkErrorKind {
    UnableToAccessCamera,
    /// Microphone unavailable.
    UnableToRecordAudio,
    UnableToStartCamera,
    NoIdentificationMethodsAvailable,
    UnsupportedSdkVersion,
    Session,
    Setup,
    /// Network or upload failure.
    Network,
    NfcDisabled,
    DeviceHasNoNfc,
    Unknown,
}

impl SdkErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            SdkErrorKind::UnableToAccessCamera => codes::ERROR_UNABLE_TO_ACCESS_CAMERA,
            SdkErrorKind::UnableToRecordAudio => codes::ERROR_UNABLE_TO_RECORD_AUDIO,
            SdkErrorKind::UnableToStartCamera => codes::ERROR_UNABLE_TO_START_CAMERA,
            SdkErrorKind::NoIdentificationMethodsAvailable => {
                codes::ERROR_NO_IDENTIFICATION_METHODS_AVAILABLE
            }
            SdkErrorKind::UnsupportedSdkVersion => codes::ERROR_UNSUPPORTED_SDK_VERSION,
            SdkErrorKind::Session => codes::ERROR_SESSION,
            SdkErrorKind::Setup => codes::ERROR_SETUP,
            SdkErrorKind::Network => codes::ERROR_NETWORK,
            SdkErrorKind::NfcDisabled => codes::ERROR_NFC_DISABLED,
            SdkErrorKind::DeviceHasNoNfc => codes::ERROR_DEVICE_HAS_NO_NFC,
            SdkErrorKind::Unknown => codes::ERROR_UNKNOWN,
        }
    }
}

/// Outcome reported by the native SDK for a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SdkResult {
    Done,
    Canceled,
    Error(SdkErrorKind),
}

impl SdkResult {
    pub fn status(self) -> SessionStatus {
        match self {
            SdkResult::Done => SessionStatus::Done,
            SdkResult::Canceled => SessionStatus::Canceled,
            SdkResult::Error(_) => SessionStatus::Error,
        }
    }

    pub fn error(self) -> Option<SdkErrorKind> {
        match self {
            SdkResult::Error(kind) => Some(kind),
            _ => None,
        }
    }
}
