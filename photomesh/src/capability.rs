//! Optional capabilities the stage can run with or without
//!
//! Image decoding and mesh generation are both optional. Instead of probing
//! for them at the point of use, [`Capabilities::detect`] decides once at
//! startup which ones are present, and the pipeline branches on the result.

use crate::geometry::GeometryEngine;
use crate::image_probe::ImageInspector;

/// A capability that is either present or absent for a reason
pub enum Capability<T> {
    Available(T),
    Unavailable { reason: &'static str },
}

impl<T> Capability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// The capability, or the reason it is missing
    pub fn get(&self) -> Result<&T, &'static str> {
        match self {
            Self::Available(inner) => Ok(inner),
            Self::Unavailable { reason } => Err(*reason),
        }
    }
}

/// The set of capabilities injected into the pipeline
pub struct Capabilities {
    pub image: Capability<Box<dyn ImageInspector>>,
    pub geometry: Capability<Box<dyn GeometryEngine>>,
}

impl Capabilities {
    /// Capabilities compiled into this binary
    pub fn detect() -> Self {
        Self {
            image: detect_image(),
            geometry: detect_geometry(),
        }
    }

    /// No optional capability at all
    pub fn none() -> Self {
        Self {
            image: Capability::Unavailable {
                reason: "disabled",
            },
            geometry: Capability::Unavailable {
                reason: "disabled",
            },
        }
    }

    /// One-line summary for startup logging
    pub fn describe(&self) -> String {
        let state = |available: bool| if available { "available" } else { "unavailable" };
        format!(
            "image decoder {}, geometry engine {}",
            state(self.image.is_available()),
            state(self.geometry.is_available())
        )
    }
}

#[cfg(feature = "image")]
fn detect_image() -> Capability<Box<dyn ImageInspector>> {
    Capability::Available(Box::new(crate::image_probe::ImageCrateInspector))
}

#[cfg(not(feature = "image"))]
fn detect_image() -> Capability<Box<dyn ImageInspector>> {
    Capability::Unavailable {
        reason: "built without the `image` feature",
    }
}

#[cfg(feature = "geometry")]
fn detect_geometry() -> Capability<Box<dyn GeometryEngine>> {
    Capability::Available(Box::new(crate::geometry::NativeGeometry))
}

#[cfg(not(feature = "geometry"))]
fn detect_geometry() -> Capability<Box<dyn GeometryEngine>> {
    Capability::Unavailable {
        reason: "built without the `geometry` feature",
    }
}
