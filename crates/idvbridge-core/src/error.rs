// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for idvbridge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codes;

/// Top-level error type for bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Host configuration --
    #[error("{0}")]
    InvalidArguments(String),

    #[error("no activity attached while launching the verification flow")]
    NotAttached,

    // -- Native SDK --
    #[error("verification flow could not be started: {0}")]
    Launch(String),

    // -- Branding assets --
    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),

    #[error("image pipeline setup failed: {0}")]
    PipelineSetup(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Stable rejection code handed back to the host application.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::InvalidArguments(_) => codes::ERROR_INVALID_ARGS,
            BridgeError::NotAttached => codes::ERROR_ACTIVITY_NOT_ATTACHED,
            BridgeError::ImageLoad(err) => err.kind().code(),
            BridgeError::Launch(_)
            | BridgeError::PipelineSetup(_)
            | BridgeError::Io(_)
            | BridgeError::Serialization(_) => codes::ERROR_LAUNCH_FAILED,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Classification of a failed image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageErrorKind {
    /// Reference was empty or malformed; no pipeline work was issued.
    InvalidReference,
    /// Pipeline reported success but produced no usable image.
    DecodeFailed,
    /// Pipeline reported an explicit failure cause.
    PipelineFailure,
    /// Pipeline reported failure without a cause, or never reported at all.
    DegenerateFailure,
    /// The waiting thread was interrupted before the pipeline completed.
    Interrupted,
}

impl ImageErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ImageErrorKind::InvalidReference => codes::IMAGE_INVALID_REFERENCE,
            ImageErrorKind::DecodeFailed => codes::IMAGE_DECODE_FAILED,
            ImageErrorKind::PipelineFailure => codes::IMAGE_PIPELINE_FAILURE,
            ImageErrorKind::DegenerateFailure => codes::IMAGE_DEGENERATE_FAILURE,
            ImageErrorKind::Interrupted => codes::IMAGE_INTERRUPTED,
        }
    }
}

impl std::fmt::Display for ImageErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A classified image-loading failure.
///
/// Every failure surfaced by the resolver carries one of the
/// [`ImageErrorKind`] variants; raw pipeline errors only ever appear as the
/// attached `source()`.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ImageLoadError {
    kind: ImageErrorKind,
    message: String,
    #[source]
    cause: Option<BoxedCause>,
}

impl ImageLoadError {
    pub fn new(kind: ImageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        kind: ImageErrorKind,
        message: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::new(ImageErrorKind::InvalidReference, message)
    }

    pub fn interrupted() -> Self {
        Self::new(
            ImageErrorKind::Interrupted,
            "interrupted while loading image",
        )
    }

    pub fn kind(&self) -> ImageErrorKind {
        self.kind
    }

    /// Whether an underlying pipeline error is attached.
    pub fn has_cause(&self) -> bool {
        self.cause.is_some()
    }
}
