//! Shared utilities for the photomesh CLI

pub mod format;
pub mod io;
pub mod logging;

pub use format::*;
pub use io::*;
