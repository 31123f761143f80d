// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decode pipeline backed by a tokio runtime, `reqwest` for remote logos, and
// the `image` crate for decoding.
//
// Fetches run as tasks on the pipeline's own runtime and decoding happens on
// its blocking pool, so completions never fire on the caller's thread.

use std::path::PathBuf;
use std::sync::Arc;

use idvbridge_core::BridgeConfig;
use idvbridge_core::error::{BridgeError, Result};
use image::DynamicImage;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, instrument};
use url::Url;

use crate::pipeline::{Completion, DecodeRequest, ImagePipeline, PipelineError};
use crate::resources::ResourceCatalog;

/// Production decode pipeline.
pub struct AsyncDecodePipeline {
    runtime: Runtime,
    client: reqwest::Client,
    resources: ResourceCatalog,
}

impl AsyncDecodePipeline {
    /// Build the pipeline from configuration.
    ///
    /// Must not be called from, or dropped inside, an async context: the
    /// pipeline owns its runtime.
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.decode_threads.max(1))
            .thread_name("idv-decode")
            .enable_all()
            .build()?;
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| BridgeError::PipelineSetup(err.to_string()))?;
        info!(
            threads = config.decode_threads.max(1),
            resources = %config.resource_dir.display(),
            "decode pipeline ready"
        );
        Ok(Self {
            runtime,
            client,
            resources: ResourceCatalog::new(config.resource_dir.clone()),
        })
    }

}

impl ImagePipeline for AsyncDecodePipeline {
    fn fetch_decoded(&self, request: DecodeRequest, completion: Completion) {
        let client = self.client.clone();
        let resources = self.resources.clone();
        // A task dropped by a shut-down runtime drops `completion`, which
        // reports the request as abandoned.
        self.runtime.spawn(async move {
            let result = fetch_and_decode(&client, &resources, request).await;
            completion.finish(result);
        });
    }
}

#[instrument(skip_all, fields(request = %request))]
async fn fetch_and_decode(
    client: &reqwest::Client,
    resources: &ResourceCatalog,
    request: DecodeRequest,
) -> std::result::Result<Option<Arc<DynamicImage>>, PipelineError> {
    let bytes = match request {
        DecodeRequest::Resource(name) => match resources.lookup(&name) {
            Some(path) => read_file(path).await?,
            None => {
                debug!(name = %name, "no such resource");
                return Ok(None);
            }
        },
        DecodeRequest::Uri(url) => match url.scheme() {
            "file" => read_file(file_path(&url)?).await?,
            "http" | "https" => fetch_remote(client, url).await?,
            other => return Err(PipelineError::UnsupportedScheme(other.to_owned())),
        },
    };

    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|err| PipelineError::Task(err.to_string()))??;
    debug!(width = image.width(), height = image.height(), "decoded");
    Ok(Some(Arc::new(image)))
}

fn file_path(url: &Url) -> std::result::Result<PathBuf, PipelineError> {
    url.to_file_path().map_err(|()| PipelineError::Io {
        path: PathBuf::from(url.path()),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "URI does not name a local file",
        ),
    })
}

async fn read_file(path: PathBuf) -> std::result::Result<Vec<u8>, PipelineError> {
    tokio::fs::read(&path)
        .await
        .map_err(|source| PipelineError::Io { path, source })
}

async fn fetch_remote(
    client: &reqwest::Client,
    url: Url,
) -> std::result::Result<Vec<u8>, PipelineError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SyncImageResolver;
    use idvbridge_core::{ImageErrorKind, ImageReference};
    use image::{ImageFormat, Rgba, RgbaImage};
    use mockito::Server;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([10, 20, 30, 255]),
        ));
        let mut buffer = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn pipeline_for(dir: &std::path::Path) -> AsyncDecodePipeline {
        let config = BridgeConfig {
            resource_dir: dir.to_path_buf(),
            http_timeout_secs: 5,
            decode_threads: 1,
            ..Default::default()
        };
        AsyncDecodePipeline::new(&config).unwrap()
    }

    #[test]
    fn bundled_resource_resolves() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("brand_logo.png"), png_bytes(24, 12)).unwrap();
        let resolver = SyncImageResolver::new(pipeline_for(dir.path()));

        let image = resolver.resolve(&ImageReference::local("brand_logo")).unwrap();
        assert_eq!((image.width(), image.height()), (24, 12));
        assert_eq!(&image.pixels()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn missing_resource_is_decode_failed() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = SyncImageResolver::new(pipeline_for(dir.path()));
        let err = resolver
            .resolve(&ImageReference::local("logo_missing"))
            .unwrap_err();
        assert_eq!(err.kind(), ImageErrorKind::DecodeFailed);
    }

    #[test]
    fn file_uri_resolves_and_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splash.png");
        std::fs::write(&path, png_bytes(3, 7)).unwrap();
        let resolver = SyncImageResolver::new(pipeline_for(dir.path()));

        let uri = Url::from_file_path(&path).unwrap().to_string();
        let image = resolver.resolve(&ImageReference::uri(uri)).unwrap();
        assert_eq!((image.width(), image.height()), (3, 7));

        let missing = Url::from_file_path(dir.path().join("gone.png")).unwrap().to_string();
        let err = resolver.resolve(&ImageReference::uri(missing)).unwrap_err();
        assert_eq!(err.kind(), ImageErrorKind::PipelineFailure);
    }

    #[test]
    fn corrupt_resource_is_pipeline_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"definitely not a png").unwrap();
        let resolver = SyncImageResolver::new(pipeline_for(dir.path()));
        let err = resolver.resolve(&ImageReference::local("broken")).unwrap_err();
        assert_eq!(err.kind(), ImageErrorKind::PipelineFailure);
        assert!(err.has_cause());
    }

    #[test]
    fn remote_logo_and_404() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = Server::new();
        let logo = server
            .mock("GET", "/logo.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(png_bytes(10, 10))
            .create();
        let missing = server
            .mock("GET", "/missing.png")
            .with_status(404)
            .with_body("not found")
            .create();
        let resolver = SyncImageResolver::new(pipeline_for(dir.path()));

        let image = resolver
            .resolve(&ImageReference::uri(format!("{}/logo.png", server.url())))
            .unwrap();
        assert_eq!((image.width(), image.height()), (10, 10));

        let err = resolver
            .resolve(&ImageReference::uri(format!("{}/missing.png", server.url())))
            .unwrap_err();
        assert_eq!(err.kind(), ImageErrorKind::PipelineFailure);
        assert!(err.to_string().contains("failed loading image"));

        logo.assert();
        missing.assert();
    }
}
