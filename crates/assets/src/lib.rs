//! Environment map assets: equirectangular HDRI loading, a box-filtered mip
//! chain standing in for roughness prefiltering, and a background loader.
//!
//! The renderer consumes [`EnvironmentMap`] values, never raw file paths.

mod environment;
mod loader;

pub use environment::{EnvironmentMap, MipLevel, load_environment};
pub use loader::EnvironmentLoader;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("environment map has no pixels")]
    Empty,
    #[error("pixel count {actual} does not match {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
    #[error("environment loader stopped before sending a result")]
    LoaderDisconnected,
}

pub fn crate_info() -> &'static str {
    "crossfield-assets v0.1.0"
}
