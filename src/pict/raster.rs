//! Bitmap and pixmap opcodes: sub-header, color table, and row unpacking
//! into [`Strip`]s.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;
use log::{debug, warn};

use super::cursor::Cursor;
use super::expand::expand_pixels;
use super::opcode::{RasterKind, RasterOp};
use super::packbits;
use super::state::{ColorTable, DecodeState, Strip};
use crate::error::PictError;

/// Pixel format of the raster being decoded. Bitmaps are always 1 bit, one
/// component.
#[derive(Clone, Copy, Debug)]
struct PixelFormat {
    pixel_size: u16,
    comp_count: u16,
}

const BITMAP: PixelFormat = PixelFormat {
    pixel_size: 1,
    comp_count: 1,
};

/// Decode one raster opcode whose opcode word (and row bytes, if any) has
/// already been read.
pub(crate) fn decode_raster(
    cursor: &mut Cursor<'_>,
    state: &mut DecodeState<'_>,
    op: RasterOp,
    stop: &dyn Stop,
) -> Result<(), PictError> {
    if read_image_header(cursor, state, op).is_none() {
        warn!("raster opcode {:?} truncated in its bounds header", op.kind);
        return Ok(());
    }

    let format = if op.pixmap {
        match read_pixmap_header(cursor, state, op)? {
            Some(format) => format,
            None => {
                warn!("pixmap header truncated at offset {}", cursor.position());
                return Ok(());
            }
        }
    } else {
        BITMAP
    };

    if let Some(limits) = state.limits {
        limits.check(state.width, state.height)?;
        let sample_bytes = if format.pixel_size == 16 { 2 } else { 1 };
        let row_units = usize::from(format.comp_count.max(1)) * sample_bytes;
        let estimate = (state.width as usize)
            .saturating_mul(state.height as usize)
            .saturating_mul(row_units);
        limits.check_memory(state.strip_bytes.saturating_add(estimate))?;
    }

    unpack_rows(cursor, state, format, stop)
}

/// Row bytes fixup and bounds rectangle, which refines the canvas size.
fn read_image_header(
    cursor: &mut Cursor<'_>,
    state: &mut DecodeState<'_>,
    op: RasterOp,
) -> Option<()> {
    match op.row_bytes {
        // base address + row bytes, recomputed from the pixel size later
        None => cursor.skip(6),
        Some(row_bytes) => state.row_bytes = usize::from(row_bytes & 0x3FFF),
    }

    let top = i32::from(cursor.read_i16()?);
    let left = i32::from(cursor.read_i16()?);
    let bottom = i32::from(cursor.read_i16()?);
    let right = i32::from(cursor.read_i16()?);

    if right - left > 0 {
        state.width = (right - left) as u32;
    }
    if bottom - top > 0 {
        state.height = (bottom - top) as u32;
    }

    // bitmap: source rect, destination rect, mode
    // pixmap: version, pack type, pack size, resolution, pixel type
    cursor.skip(18);
    Some(())
}

/// Pixel size, component count and color table of a pixmap. `Ok(None)` when
/// the stream ends inside the header.
fn read_pixmap_header(
    cursor: &mut Cursor<'_>,
    state: &mut DecodeState<'_>,
    op: RasterOp,
) -> Result<Option<PixelFormat>, PictError> {
    let (Some(pixel_size), Some(comp_count)) = (cursor.read_i16(), cursor.read_i16()) else {
        return Ok(None);
    };
    let pixel_size = pixel_size.max(0) as u16;
    let comp_count = comp_count.max(0) as u16;
    // component size, plane bytes, color table handle, reserved
    cursor.skip(14);

    debug!(
        "pixmap {:?}: pixel size {pixel_size}, {comp_count} components",
        op.kind
    );

    if op.kind == RasterKind::DirectBits {
        let width = state.width as usize;
        state.row_bytes = match pixel_size {
            32 => width * usize::from(comp_count),
            16 => width * 2,
            other => return Err(PictError::UnsupportedVectorData(other)),
        };
    } else {
        match read_color_table(cursor) {
            Some(table) => state.color_table = Some(table),
            None => return Ok(None),
        }
    }

    // source and destination rectangles, transfer mode
    cursor.skip(18);
    if op.kind.has_region() {
        cursor.skip(2);
    }

    Ok(Some(PixelFormat {
        pixel_size,
        comp_count,
    }))
}

fn read_color_table(cursor: &mut Cursor<'_>) -> Option<ColorTable> {
    // seed
    cursor.skip(4);
    let flags = cursor.read_u16()?;
    let mut count = (i32::from(cursor.read_i16()?) + 1).max(0) as usize;

    let available = cursor.remaining() / 8;
    if count > available {
        warn!("color table declares {count} entries, only {available} present");
        count = available;
    }

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        // entry value, then the high byte of each 16-bit component
        cursor.skip(2);
        let r = cursor.read_u8()?;
        cursor.skip(1);
        let g = cursor.read_u8()?;
        cursor.skip(1);
        let b = cursor.read_u8()?;
        cursor.skip(1);
        entries.push([r, g, b]);
    }
    Some(ColorTable::new(flags, entries))
}

fn unpack_rows(
    cursor: &mut Cursor<'_>,
    state: &mut DecodeState<'_>,
    format: PixelFormat,
    stop: &dyn Stop,
) -> Result<(), PictError> {
    let compressed = state.row_bytes >= 8 || format.pixel_size == 32;
    debug!(
        "unpacking {} rows: row bytes {}, pixel size {}, {} components, compressed {compressed}",
        state.height, state.row_bytes, format.pixel_size, format.comp_count
    );

    if compressed {
        unpack_compressed(cursor, state, format, stop)
    } else {
        unpack_uncompressed(cursor, state, format, stop)
    }
}

fn unpack_uncompressed(
    cursor: &mut Cursor<'_>,
    state: &mut DecodeState<'_>,
    format: PixelFormat,
    stop: &dyn Stop,
) -> Result<(), PictError> {
    let width = state.width as usize;
    let height = state.height as usize;
    let mut buf = vec![0u8; state.row_bytes];

    for row in 0..height {
        if row % 16 == 0 {
            stop.check()?;
        }
        if cursor.eof() {
            warn!("stream ended after {row} of {height} uncompressed rows");
            break;
        }
        let got = cursor.read_into(&mut buf);
        if got < buf.len() {
            warn!("row {row} truncated: {got} of {} bytes", buf.len());
        }

        match format.pixel_size {
            16 => {
                let mut words = vec![0u16; width];
                for (word, pair) in words.iter_mut().zip(buf.chunks_exact(2)) {
                    *word = u16::from_be_bytes([pair[0], pair[1]]);
                }
                state.push_strip(Strip::Words(words));
                state.channels = 3;
            }
            8 => state.push_strip(Strip::Bytes(buf.clone())),
            depth => {
                let mut out = vec![0u8; width];
                expand_pixels(depth, &buf, &mut out)?;
                state.push_strip(Strip::Bytes(out));
            }
        }
    }
    Ok(())
}

fn unpack_compressed(
    cursor: &mut Cursor<'_>,
    state: &mut DecodeState<'_>,
    format: PixelFormat,
    stop: &dyn Stop,
) -> Result<(), PictError> {
    let width = state.width as usize;
    let height = state.height as usize;
    let row_bytes = state.row_bytes;
    // worst-case PackBits expansion of one row
    let capacity = row_bytes + 1 + row_bytes / 128;
    let mut buf = vec![0u8; capacity];

    for row in 0..height {
        if row % 16 == 0 {
            stop.check()?;
        }
        let declared = if row_bytes > 250 {
            cursor.read_i16().map(isize::from)
        } else {
            cursor.read_u8().map(isize::from)
        };
        let Some(declared) = declared else {
            warn!("stream ended after {row} of {height} compressed rows");
            break;
        };

        let raw_len = clamp_row_len(cursor, declared, capacity);
        cursor.read_into(&mut buf[..raw_len]);
        let packed = &buf[..raw_len];

        if format.pixel_size == 16 {
            state.push_strip(Strip::Words(packbits::decode_words(packed, width)));
            state.channels = 3;
            continue;
        }

        let unpacked = packbits::decode(packed, width * 4);
        match format.pixel_size {
            0..=7 => {
                let mut out = vec![0u8; width];
                expand_pixels(format.pixel_size, &unpacked, &mut out)?;
                state.push_strip(Strip::Bytes(out));
            }
            8 => state.push_strip(Strip::Bytes(unpacked)),
            24 | 32 => {
                for channel in 0..usize::from(format.comp_count) {
                    let offset = channel * width;
                    let mut plane = vec![0u8; width];
                    if let Some(src) = unpacked.get(offset..) {
                        let len = width.min(src.len());
                        plane[..len].copy_from_slice(&src[..len]);
                    }
                    state.push_strip(Strip::Bytes(plane));
                }
                state.channels = 3;
            }
            other => debug!("ignoring row of unsupported pixel size {other}"),
        }
    }
    Ok(())
}

/// Clamp a declared packed-row length to the row buffer and to the bytes left
/// in the stream. A row that cannot fit at all parks the cursor on the last
/// byte and reads nothing.
fn clamp_row_len(cursor: &mut Cursor<'_>, declared: isize, capacity: usize) -> usize {
    let mut len = declared;
    if len > capacity as isize {
        warn!("packed row length {len} exceeds buffer of {capacity} bytes");
        len = capacity as isize;
    }

    let remaining = cursor.remaining() as isize;
    if remaining <= len {
        len = remaining - 1;
    }

    if len < 0 {
        warn!("packed row length {declared} out of range at offset {}", cursor.position());
        cursor.seek(cursor.len().saturating_sub(1));
        return 0;
    }
    len as usize
}
