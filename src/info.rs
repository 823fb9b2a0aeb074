use crate::error::PictError;

/// PICT format version, fixed once the header has been read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PictVersion {
    /// Version 1: single-byte opcodes, bitmaps only.
    V1,
    /// Version 2: word-aligned two-byte opcodes, pixmaps and direct bits.
    V2,
}

/// Header information available without walking the opcode stream.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageInfo {
    /// Provisional canvas width (raster opcodes may refine it).
    pub width: u32,
    /// Provisional canvas height (raster opcodes may refine it).
    pub height: u32,
    pub version: PictVersion,
    /// Horizontal and vertical resolution in pixels per inch (version 2 only).
    pub resolution: Option<(f32, f32)>,
}

impl ImageInfo {
    /// Parse only the fixed header.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PictError> {
        crate::pict::probe_header(data)
    }
}
