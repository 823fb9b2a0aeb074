//! # zenpict
//!
//! Decoder for Apple PICT (QuickDraw picture) raster data.
//!
//! A PICT file is a 512-byte preamble, a small header and a stream of
//! opcodes. This crate walks that stream once, keeping only what describes
//! raster pixels, and then assembles any sub-rectangle of the image on
//! request.
//!
//! ## Supported Content
//!
//! - Version 1 and version 2 pictures
//! - Bitmaps (`BitsRect`/`BitsRgn`, 1 bit per pixel)
//! - Indexed pixmaps with a color table (1, 2, 4 and 8 bits per pixel)
//! - 16-bit direct pixmaps (packed 5-5-5) and 24/32-bit direct pixmaps
//!   (planar PackBits rows)
//! - Uncompressed rows and PackBits-compressed rows, including the 16-bit
//!   word variant
//! - Embedded JPEG spans (`jpeg` feature, via zune-jpeg)
//!
//! ## Non-Goals
//!
//! - Vector/QuickDraw drawing opcodes (lines, text, polygons)
//! - Validating the full opcode grammar
//! - Encoding
//!
//! ## Usage
//!
//! ```no_run
//! use zenpict::{ImageInfo, PixelLayout, Unstoppable};
//!
//! let data: &[u8] = &[]; // your PICT bytes
//!
//! // Probe without walking the opcode stream
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.version);
//!
//! // Decode once, then read any window
//! let state = zenpict::decode(data, Unstoppable)?;
//! let plane = state.read_plane(0, 0, state.width(), state.height(), Unstoppable)?;
//! if plane.layout == PixelLayout::Indexed8 {
//!     let palette = state.color_table();
//! #   let _ = palette;
//! }
//! # Ok::<(), zenpict::PictError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod decode;
mod error;
mod info;
mod limits;
mod pict;
mod pixel;

// Re-exports
pub use decode::{DecodeOutput, DecodeRequest};
pub use enough::{Stop, Unstoppable};
pub use error::PictError;
pub use info::{ImageInfo, PictVersion};
pub use limits::Limits;
pub use pict::{ColorTable, DecodeState, FallbackDecoder, PlaneRequest, Strip};
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::PixelLayout;

/// Walk the header and opcode stream of `data` with no resource limits.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeState<'_>, PictError> {
    DecodeRequest::new(data).decode(stop)
}

/// Read only the header of `data`.
pub fn probe(data: &[u8]) -> Result<ImageInfo, PictError> {
    ImageInfo::from_bytes(data)
}
