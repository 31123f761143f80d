// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decode pipeline abstraction.
//
// A pipeline accepts one request per call and reports back through a
// `Completion` on a thread of its choosing. The completion is consumed by
// whichever of `succeed`/`fail` runs, so it fires at most once; dropping it
// unfired reports `Abandoned`, so it also fires at least once.

use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use thiserror::Error;
use url::Url;

/// What to fetch and decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeRequest {
    /// Bundled resource, by name.
    Resource(String),
    /// `http`, `https` or `file` URI.
    Uri(Url),
}

impl std::fmt::Display for DecodeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeRequest::Resource(name) => write!(f, "resource `{name}`"),
            DecodeRequest::Uri(url) => write!(f, "{url}"),
        }
    }
}

/// Failure cause reported by a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("image decoding failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unsupported URI scheme `{0}`")]
    UnsupportedScheme(String),

    #[error("decode task failed: {0}")]
    Task(String),
}

/// Terminal event delivered to a completion handler.
#[derive(Debug)]
pub enum DecodeEvent {
    /// The pipeline finished. `None` means it produced no image.
    NewResult(Option<Arc<DynamicImage>>),
    /// The pipeline failed, possibly without saying why.
    Failure(Option<PipelineError>),
    /// The completion was dropped without either of the above.
    Abandoned,
}

type Handler = Box<dyn FnOnce(DecodeEvent) + Send + 'static>;

/// Single-use completion handle passed to [`ImagePipeline::fetch_decoded`].
pub struct Completion {
    handler: Option<Handler>,
}

impl Completion {
    pub fn new(handler: impl FnOnce(DecodeEvent) + Send + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
        }
    }

    pub fn succeed(mut self, image: Option<Arc<DynamicImage>>) {
        self.fire(DecodeEvent::NewResult(image));
    }

    pub fn fail(mut self, cause: Option<PipelineError>) {
        self.fire(DecodeEvent::Failure(cause));
    }

    /// Report a `Result` from a fetch-and-decode future.
    pub fn finish(self, result: Result<Option<Arc<DynamicImage>>, PipelineError>) {
        match result {
            Ok(image) => self.succeed(image),
            Err(err) => self.fail(Some(err)),
        }
    }

    fn fire(&mut self, event: DecodeEvent) {
        if let Some(handler) = self.handler.take() {
            handler(event);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.fire(DecodeEvent::Abandoned);
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("fired", &self.handler.is_none())
            .finish()
    }
}

/// Asynchronous image fetch-and-decode facility.
pub trait ImagePipeline: Send + Sync {
    /// Start fetching and decoding `request`. Must not block on the work
    /// itself; `completion` is fired later from the pipeline's own context.
    fn fetch_decoded(&self, request: DecodeRequest, completion: Completion);
}

impl<P: ImagePipeline + ?Sized> ImagePipeline for Arc<P> {
    fn fetch_decoded(&self, request: DecodeRequest, completion: Completion) {
        (**self).fetch_decoded(request, completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording() -> (Completion, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let completion = Completion::new(move |event| {
            let label = match event {
                DecodeEvent::NewResult(Some(_)) => "image",
                DecodeEvent::NewResult(None) => "empty",
                DecodeEvent::Failure(Some(_)) => "failure",
                DecodeEvent::Failure(None) => "bare-failure",
                DecodeEvent::Abandoned => "abandoned",
            };
            sink.lock().unwrap().push(label.to_string());
        });
        (completion, events)
    }

    #[test]
    fn success_fires_once() {
        let (completion, events) = recording();
        completion.succeed(Some(Arc::new(DynamicImage::new_rgba8(1, 1))));
        assert_eq!(*events.lock().unwrap(), vec!["image"]);
    }

    #[test]
    fn drop_reports_abandoned() {
        let (completion, events) = recording();
        drop(completion);
        assert_eq!(*events.lock().unwrap(), vec!["abandoned"]);
    }

    #[test]
    fn finish_routes_errors_to_failure() {
        let (completion, events) = recording();
        completion.finish(Err(PipelineError::UnsupportedScheme("ftp".into())));
        assert_eq!(*events.lock().unwrap(), vec!["failure"]);
    }
}
