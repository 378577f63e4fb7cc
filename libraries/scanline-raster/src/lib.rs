//! Scanline-raster: anti-aliased non-zero winding fills of parsed vector documents into RGBA8 buffers
//!
//! ```
//! use scanline_raster::RasterContext;
//! use vector_document::{Document, ParseOptions};
//!
//! let document = Document::parse(r##"<svg width="4" height="4"><rect width="4" height="4" fill="#00f"/></svg>"##, &ParseOptions::default()).unwrap();
//! let pixels = RasterContext::new().render_to_vec(&document, 4, 4).unwrap();
//! assert_eq!(&pixels[..4], &[0, 0, 255, 255]);
//! ```
mod composite;
pub mod consts;
mod context;
mod error;
mod flatten;
mod paint;
mod pool;
mod scan;

pub use context::{PixelBufferMut, RasterContext, RasterOptions, fitted_size};
pub use error::RasterError;
pub use paint::{GradientLut, Rgba};
