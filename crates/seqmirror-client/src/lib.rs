//! Polling client for the imaging-sequence controller: HTTP transport,
//! reconciliation engine, and the single-slot image cache.

pub mod api;
pub mod engine;
pub mod error;
pub mod image_cache;

pub use api::{HttpSequencerApi, SequencerApi};
pub use engine::{EngineHandle, PollingEngine, MINIMUM_API_VERSION};
pub use error::{ClientError, Result};
pub use image_cache::ImageCache;
