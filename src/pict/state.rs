use alloc::vec::Vec;

use crate::info::{ImageInfo, PictVersion};
use crate::limits::Limits;
use crate::pixel::PixelLayout;

use super::header::Header;

/// One decoded row, or one channel of a row for planar direct-color data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Strip {
    /// 8-bit samples, or sub-byte pixels expanded to one byte each.
    Bytes(Vec<u8>),
    /// 16-bit packed pixels (`xRRRRRGGGGGBBBBB`).
    Words(Vec<u16>),
}

impl Strip {
    /// Number of samples in the strip.
    pub fn len(&self) -> usize {
        match self {
            Strip::Bytes(b) => b.len(),
            Strip::Words(w) => w.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn heap_bytes(&self) -> usize {
        match self {
            Strip::Bytes(b) => b.len(),
            Strip::Words(w) => w.len() * 2,
        }
    }
}

/// Palette read from a pixmap: index -> (R, G, B), high byte of each
/// 16-bit QuickDraw component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorTable {
    pub flags: u16,
    entries: Vec<[u8; 3]>,
}

impl ColorTable {
    pub(crate) fn new(flags: u16, entries: Vec<[u8; 3]>) -> Self {
        Self { flags, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// RGB triple for a palette index.
    pub fn get(&self, index: u8) -> Option<[u8; 3]> {
        self.entries.get(usize::from(index)).copied()
    }

    pub fn entries(&self) -> &[[u8; 3]] {
        &self.entries
    }
}

/// Result of the decode pass over one PICT source.
///
/// Holds the canvas geometry, color table, decoded strips and embedded JPEG
/// offsets. Created by [`crate::decode`] / [`crate::DecodeRequest::decode`];
/// planes are then served by [`DecodeState::read_plane`], which never
/// mutates the state.
#[derive(Clone, Debug)]
pub struct DecodeState<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) limits: Option<&'a Limits>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) version: PictVersion,
    pub(crate) resolution: Option<(f32, f32)>,
    pub(crate) row_bytes: usize,
    pub(crate) color_table: Option<ColorTable>,
    pub(crate) strips: Vec<Strip>,
    pub(crate) strip_bytes: usize,
    pub(crate) jpeg_offsets: Vec<usize>,
    pub(crate) channels: u8,
    pub(crate) interleaved: bool,
}

impl<'a> DecodeState<'a> {
    pub(crate) fn new(data: &'a [u8], header: &Header, limits: Option<&'a Limits>) -> Self {
        Self {
            data,
            limits,
            width: header.width,
            height: header.height,
            version: header.version,
            resolution: header.resolution,
            row_bytes: 0,
            color_table: None,
            strips: Vec::new(),
            strip_bytes: 0,
            jpeg_offsets: Vec::new(),
            channels: 1,
            interleaved: false,
        }
    }

    pub(crate) fn push_strip(&mut self, strip: Strip) {
        self.strip_bytes += strip.heap_bytes();
        self.strips.push(strip);
    }

    /// Canvas width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height used for plane assembly.
    ///
    /// The declared height is advisory: when far more strips were decoded
    /// than it allows for (`height * 4 < strips`) and the strip count is not
    /// a clean multiple of three channels per row, the strip count wins.
    pub fn height(&self) -> u32 {
        let strips = self.strips.len();
        let declared = self.height as usize;
        if declared * 4 < strips && (declared == 0 || (strips / 3) % declared != 0) {
            u32::try_from(strips).unwrap_or(u32::MAX)
        } else {
            self.height
        }
    }

    /// Height as declared by the header or the last raster bounds.
    pub fn declared_height(&self) -> u32 {
        self.height
    }

    pub fn version(&self) -> PictVersion {
        self.version
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width,
            height: self.height(),
            version: self.version,
            resolution: self.resolution,
        }
    }

    /// Byte count of one packed row for the last raster opcode.
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    pub fn color_table(&self) -> Option<&ColorTable> {
        self.color_table.as_ref()
    }

    /// Decoded rows in stream order.
    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    /// Source offsets of each embedded JPEG start-of-image marker.
    pub fn jpeg_offsets(&self) -> &[usize] {
        &self.jpeg_offsets
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn is_rgb(&self) -> bool {
        self.channels > 1
    }

    pub fn is_indexed(&self) -> bool {
        !self.is_rgb() && self.color_table.is_some()
    }

    pub fn is_interleaved(&self) -> bool {
        self.interleaved
    }

    /// Layout of planes returned by [`DecodeState::read_plane`].
    pub fn layout(&self) -> PixelLayout {
        super::assemble::Assembly::select(self, self.height(), false).layout(self)
    }
}
