// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// idvbridge-imaging — Branding image resolution.
//
// Provides a blocking resolver (`SyncImageResolver`) on top of an
// asynchronous decode pipeline, the interrupt and one-shot primitives it
// waits on, and a production pipeline that loads bundled resources, local
// files, and remote URLs.

pub mod decode;
pub mod gate;
pub mod interrupt;
pub mod pipeline;
pub mod resolver;
pub mod resources;

// Re-export the primary types so callers can use `idvbridge_imaging::SyncImageResolver` etc.
pub use decode::AsyncDecodePipeline;
pub use interrupt::InterruptHandle;
pub use pipeline::{Completion, DecodeEvent, DecodeRequest, ImagePipeline, PipelineError};
pub use resolver::SyncImageResolver;
pub use resources::ResourceCatalog;
