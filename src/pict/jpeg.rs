//! Embedded JPEG spans, decoded with zune-jpeg.

use alloc::format;
use alloc::vec::Vec;
use std::io::Cursor;

use log::debug;
use zune_jpeg::JpegDecoder;
use zune_jpeg::zune_core::colorspace::ColorSpace;
use zune_jpeg::zune_core::options::DecoderOptions;

use crate::error::PictError;

/// Interleaved RGB bytes of all spans stacked top to bottom.
pub(crate) struct JpegImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

/// Decode every span recorded by the opcode walk. Spans are addressed
/// relative to the first one and each runs to its own end-of-image marker.
pub(crate) fn decode_spans(data: &[u8], offsets: &[usize]) -> Result<JpegImage, PictError> {
    let first = offsets.first().copied().unwrap_or(0);
    let source = data.get(first..).unwrap_or(&[]);

    let mut image = JpegImage {
        width: 0,
        height: 0,
        pixels: Vec::new(),
    };
    for &offset in offsets {
        let span = source.get(offset.saturating_sub(first)..).unwrap_or(&[]);
        let (width, height, pixels) = decode_rgb(span)?;
        debug!("JPEG span at {offset}: {width}x{height}");
        if image.width == 0 {
            image.width = width;
        }
        image.height += height;
        image.pixels.extend_from_slice(&pixels);
    }
    Ok(image)
}

/// Decode one JPEG stream to interleaved 8-bit RGB.
pub(crate) fn decode_rgb(bytes: &[u8]) -> Result<(usize, usize, Vec<u8>), PictError> {
    let options = DecoderOptions::default()
        .set_max_width(u16::MAX as usize)
        .set_max_height(u16::MAX as usize)
        .jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(Cursor::new(bytes), options);
    let pixels = decoder
        .decode()
        .map_err(|e| PictError::Jpeg(format!("{e:?}")))?;
    let (width, height) = decoder
        .dimensions()
        .ok_or_else(|| PictError::Jpeg("missing frame dimensions".into()))?;
    Ok((width, height, pixels))
}
