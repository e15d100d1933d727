//! Input image inspection: decode, then report the preview size

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// Dimensions of the downscaled preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewDims {
    pub width: u32,
    pub height: u32,
}

/// Something that can decode an image and report its preview dimensions
pub trait ImageInspector {
    /// Decode `path` and return its size scaled to `percent`
    ///
    /// An error means the file is not a decodable image.
    fn preview(&self, path: &Path, percent: u32) -> Result<PreviewDims>;
}

/// Scale `width x height` by `percent`, flooring each axis and never going below 1
pub fn preview_dimensions(width: u32, height: u32, percent: u32) -> PreviewDims {
    let scale = |side: u32| {
        let scaled = (u64::from(side) * u64::from(percent) / 100).max(1);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    };
    PreviewDims {
        width: scale(width),
        height: scale(height),
    }
}

#[cfg(feature = "image")]
pub use self::decoder::ImageCrateInspector;

#[cfg(feature = "image")]
mod decoder {
    use super::{ImageInspector, PreviewDims, preview_dimensions};
    use anyhow::{Context, Result};
    use image::ImageReader;
    use std::path::Path;

    /// [`ImageInspector`] backed by the `image` crate
    ///
    /// The image is fully decoded so that a truncated or corrupt file is
    /// caught here. The preview itself is never rendered: only its size is
    /// reported, and the size can be far larger than memory allows.
    #[derive(Debug, Default)]
    pub struct ImageCrateInspector;

    impl ImageInspector for ImageCrateInspector {
        fn preview(&self, path: &Path, percent: u32) -> Result<PreviewDims> {
            let img = ImageReader::open(path)
                .with_context(|| format!("Failed to open image file: {}", path.display()))?
                .with_guessed_format()
                .with_context(|| format!("Failed to read image header: {}", path.display()))?
                .decode()
                .with_context(|| format!("Failed to decode image: {}", path.display()))?;

            let dims = preview_dimensions(img.width(), img.height(), percent);
            log::debug!(
                "Preview of {}x{} at {percent}%: {}x{}",
                img.width(),
                img.height(),
                dims.width,
                dims.height
            );
            Ok(dims)
        }
    }
}
