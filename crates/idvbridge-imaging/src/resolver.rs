// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synchronous image resolver.
//
// Turns the callback-driven `ImagePipeline` into a single blocking call. Each
// call owns a fresh one-shot gate; the pipeline's completion classifies the
// event, copies the pixels out of pipeline memory, and publishes the outcome.
// Nothing is shared between calls, so concurrent resolves need no
// coordination.

use std::sync::Arc;

use idvbridge_core::{
    ImageErrorKind, ImageLoadError, ImageReference, ResolutionOutcome, ResolvedImage,
};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::gate::{Interrupted, OneShot};
use crate::interrupt::InterruptHandle;
use crate::pipeline::{Completion, DecodeEvent, DecodeRequest, ImagePipeline};

/// URI schemes the pipeline can fetch.
pub const SUPPORTED_SCHEMES: [&str; 3] = ["http", "https", "file"];

/// Blocking front-end over an asynchronous [`ImagePipeline`].
#[derive(Clone)]
pub struct SyncImageResolver {
    pipeline: Arc<dyn ImagePipeline>,
}

impl SyncImageResolver {
    pub fn new(pipeline: impl ImagePipeline + 'static) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    /// Resolve `reference` into a decoded, caller-owned image, blocking the
    /// current thread until the pipeline reports back.
    ///
    /// The wait is interruptible through [`InterruptHandle::current`]. On
    /// interruption the thread's flag is re-asserted before returning
    /// [`ImageErrorKind::Interrupted`].
    pub fn resolve(&self, reference: &ImageReference) -> Result<ResolvedImage, ImageLoadError> {
        self.resolve_with_interrupt(reference, &InterruptHandle::current())
    }

    /// Like [`resolve`](Self::resolve), but waits on an explicit interrupt
    /// handle instead of the calling thread's own.
    #[instrument(skip_all, fields(reference = %reference))]
    pub fn resolve_with_interrupt(
        &self,
        reference: &ImageReference,
        interrupt: &InterruptHandle,
    ) -> Result<ResolvedImage, ImageLoadError> {
        let request = validate(reference).inspect_err(|err| {
            warn!(code = err.kind().code(), %err, "rejected image reference");
        })?;

        let gate: Arc<OneShot<ResolutionOutcome>> = Arc::new(OneShot::new());
        let publisher = Arc::clone(&gate);
        debug!(%request, "issuing decode request");
        self.pipeline.fetch_decoded(
            request,
            Completion::new(move |event| {
                publisher.publish(classify(event));
            }),
        );

        match gate.wait(interrupt).map(ResolutionOutcome::into_result) {
            Ok(Ok(image)) => {
                debug!(
                    width = image.width(),
                    height = image.height(),
                    "image resolved"
                );
                Ok(image)
            }
            Ok(Err(err)) => {
                warn!(code = err.kind().code(), %err, "loading image failed");
                Err(err)
            }
            Err(Interrupted) => {
                // Waiting consumed the flag; put it back for callers further up.
                interrupt.interrupt();
                warn!("interrupted while loading image");
                Err(ImageLoadError::interrupted())
            }
        }
    }
}

impl std::fmt::Debug for SyncImageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncImageResolver").finish_non_exhaustive()
    }
}

/// Check a reference and turn it into a pipeline request.
pub fn validate(reference: &ImageReference) -> Result<DecodeRequest, ImageLoadError> {
    match reference {
        ImageReference::LocalResource { name } => {
            if name.trim().is_empty() {
                return Err(ImageLoadError::invalid_reference("empty resource name"));
            }
            if name.contains(['/', '\\']) || name.contains("..") {
                return Err(ImageLoadError::invalid_reference(format!(
                    "resource name `{name}` must not contain a path"
                )));
            }
            Ok(DecodeRequest::Resource(name.clone()))
        }
        ImageReference::RemoteOrLocalFile { uri } => {
            if uri.trim().is_empty() {
                return Err(ImageLoadError::invalid_reference("empty image URI"));
            }
            let url = Url::parse(uri).map_err(|err| {
                ImageLoadError::with_cause(
                    ImageErrorKind::InvalidReference,
                    format!("malformed image URI `{uri}`"),
                    err,
                )
            })?;
            if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
                return Err(ImageLoadError::invalid_reference(format!(
                    "unsupported scheme `{}` in `{uri}`",
                    url.scheme()
                )));
            }
            Ok(DecodeRequest::Uri(url))
        }
    }
}

/// Map a pipeline event onto an outcome, detaching pixels on success.
fn classify(event: DecodeEvent) -> ResolutionOutcome {
    match event {
        DecodeEvent::NewResult(Some(image)) => {
            if image.width() == 0 || image.height() == 0 {
                return ResolutionOutcome::failure(
                    ImageErrorKind::DecodeFailed,
                    "decoded image has no pixels",
                );
            }
            // `to_rgba8` always allocates, so the caller never aliases the
            // pipeline's buffer.
            ResolutionOutcome::Success(ResolvedImage::from_rgba(image.to_rgba8()))
        }
        DecodeEvent::NewResult(None) => {
            ResolutionOutcome::failure(ImageErrorKind::DecodeFailed, "pipeline produced no image")
        }
        DecodeEvent::Failure(Some(cause)) => ResolutionOutcome::Failure(
            ImageLoadError::with_cause(ImageErrorKind::PipelineFailure, "failed loading image", cause),
        ),
        DecodeEvent::Failure(None) => ResolutionOutcome::failure(
            ImageErrorKind::DegenerateFailure,
            "pipeline reported failure without a cause",
        ),
        DecodeEvent::Abandoned => ResolutionOutcome::failure(
            ImageErrorKind::DegenerateFailure,
            "pipeline dropped the request without reporting",
        ),
    }
}
