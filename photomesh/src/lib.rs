//! Photomesh library
//!
//! The pipeline stage behind the `photomesh` binary: turn an input image
//! (and optionally a base mesh) into a GLB model plus a JSON metadata file,
//! degrading through fallbacks instead of failing.

pub mod capability;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod image_probe;
pub mod metadata;
pub mod pipeline;
pub mod resolve;
pub mod utils;
