// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stable string codes exchanged with the host application.
//
// Hosts match on these values, so they must never change once shipped.

// -- Promise rejection codes --

/// The configuration passed to `launch` was invalid.
pub const ERROR_INVALID_ARGS: &str = "E_VERIFF_INVALID_ARGUMENTS";
/// No host activity/view controller was attached at launch time.
pub const ERROR_ACTIVITY_NOT_ATTACHED: &str = "E_VERIFF_ACTIVITY_NOT_ATTACHED";
/// The native SDK refused to start the flow.
pub const ERROR_LAUNCH_FAILED: &str = "E_VERIFF_LAUNCH_FAILED";

// -- Promise resolution statuses --

/// The user left the flow before completing it.
pub const STATUS_CANCELED: &str = "STATUS_CANCELED";
/// The flow was completed. This does not mean a decision exists yet.
pub const STATUS_DONE: &str = "STATUS_DONE";
/// The flow did not complete successfully.
pub const STATUS_ERROR: &str = "STATUS_ERROR";

// -- SDK error codes (reported under `result_error`) --

pub const ERROR_UNABLE_TO_ACCESS_CAMERA: &str = "UNABLE_TO_ACCESS_CAMERA";
pub const ERROR_UNABLE_TO_RECORD_AUDIO: &str = "UNABLE_TO_RECORD_AUDIO";
pub const ERROR_UNABLE_TO_START_CAMERA: &str = "UNABLE_TO_START_CAMERA";
pub const ERROR_NO_IDENTIFICATION_METHODS_AVAILABLE: &str = "NO_IDENTIFICATION_METHODS_AVAILABLE";
pub const ERROR_UNSUPPORTED_SDK_VERSION: &str = "UNSUPPORTED_SDK_VERSION";
pub const ERROR_SESSION: &str = "SESSION_ERROR";
pub const ERROR_SETUP: &str = "SETUP_ERROR";
pub const ERROR_NETWORK: &str = "NETWORK_ERROR";
pub const ERROR_NFC_DISABLED: &str = "NFC_DISABLED";
pub const ERROR_DEVICE_HAS_NO_NFC: &str = "DEVICE_HAS_NO_NFC";
pub const ERROR_UNKNOWN: &str = "UNKNOWN_ERROR";

// -- Branding image failures --

pub const IMAGE_INVALID_REFERENCE: &str = "IMAGE_INVALID_REFERENCE";
pub const IMAGE_DECODE_FAILED: &str = "IMAGE_DECODE_FAILED";
pub const IMAGE_PIPELINE_FAILURE: &str = "IMAGE_PIPELINE_FAILURE";
pub const IMAGE_DEGENERATE_FAILURE: &str = "IMAGE_DEGENERATE_FAILURE";
pub const IMAGE_INTERRUPTED: &str = "IMAGE_INTERRUPTED";

// -- Result map keys --

pub const KEY_SESSION_TOKEN: &str = "sessionToken";
pub const KEY_STATUS: &str = "status";
pub const KEY_RESULT_ERROR: &str = "result_error";
