//! Apple PICT decoder (internal).
//!
//! Use top-level [`crate::decode`], [`crate::DecodeRequest`] and
//! [`crate::ImageInfo::from_bytes`].
//!
//! A PICT is a 512-byte preamble, a picture frame and a version marker,
//! followed by a stream of opcodes. Only the opcodes that carry or frame
//! raster data are interpreted; drawing opcodes are skipped over.

mod assemble;
mod cursor;
mod expand;
mod header;
#[cfg(feature = "jpeg")]
mod jpeg;
mod opcode;
mod packbits;
mod raster;
mod state;

pub use assemble::{FallbackDecoder, PlaneRequest};
pub use state::{ColorTable, DecodeState, Strip};

use enough::Stop;
use log::{debug, warn};

use crate::error::PictError;
use crate::info::ImageInfo;
use crate::limits::Limits;
use cursor::Cursor;
use opcode::Opcode;

const JPEG_SOI: u16 = 0xFFD8;
const JPEG_EOI: u16 = 0xFFD9;

/// Probe header for ImageInfo without walking the opcodes.
pub(crate) fn probe_header(data: &[u8]) -> Result<ImageInfo, PictError> {
    let header = header::parse_header(&mut Cursor::new(data))?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        version: header.version,
        resolution: header.resolution,
    })
}

/// Parse the header, then dispatch opcodes until the end opcode or the end
/// of the data.
pub(crate) fn decode<'a>(
    data: &'a [u8],
    limits: Option<&'a Limits>,
    stop: &dyn Stop,
) -> Result<DecodeState<'a>, PictError> {
    let mut cursor = Cursor::new(data);
    let header = header::parse_header(&mut cursor)?;
    if let Some(limits) = limits {
        limits.check(header.width, header.height)?;
    }
    stop.check()?;

    let mut state = DecodeState::new(data, &header, limits);

    while let Some(opcode) = Opcode::read(&mut cursor, state.version) {
        stop.check()?;
        debug!("opcode {opcode:?} @ {}", cursor.position());

        match opcode {
            Opcode::Raster(op) => raster::decode_raster(&mut cursor, &mut state, op, stop)?,
            Opcode::ClipRegion => {
                // region size includes its own two bytes
                let len = cursor.read_i16().map_or(0, |n| isize::from(n) - 2);
                skip_payload(&mut cursor, len, "clip region");
            }
            Opcode::LongComment => {
                cursor.skip(2);
                let len = cursor.read_i16().map_or(0, isize::from);
                skip_payload(&mut cursor, len, "long comment");
            }
            Opcode::ShortSkip(code) => {
                let len = cursor.read_u8().map_or(0, isize::from);
                skip_payload(&mut cursor, len, "opcode payload");
                debug!("skipped {len} bytes for opcode {code:#06x}");
            }
            Opcode::Jpeg => scan_jpeg(&mut cursor, &mut state),
            Opcode::End => break,
            Opcode::Unknown(code) => {
                warn!("unrecognized opcode {code:#06x} at offset {}", cursor.position());
            }
        }

        if cursor.eof() {
            break;
        }
    }

    debug!(
        "decoded {} strips, {} JPEG spans, {} channels",
        state.strips.len(),
        state.jpeg_offsets.len(),
        state.channels
    );
    Ok(state)
}

fn skip_payload(cursor: &mut Cursor<'_>, len: isize, what: &str) {
    if len <= 0 {
        return;
    }
    let len = len as usize;
    if len > cursor.remaining() {
        warn!(
            "{what} of {len} bytes at offset {} runs past the end of the data",
            cursor.position()
        );
    }
    cursor.skip(len);
}

/// Record the first JPEG at two bytes past the opcode, find its end marker,
/// then record every further start marker. Markers are searched word by word.
/// Consumes the rest of the stream.
fn scan_jpeg(cursor: &mut Cursor<'_>, state: &mut DecodeState<'_>) {
    state.jpeg_offsets.push(cursor.position() + 2);
    state.channels = 3;

    while let Some(word) = cursor.read_u16() {
        if word == JPEG_EOI {
            break;
        }
    }

    while !cursor.eof() {
        let mut found = false;
        while let Some(word) = cursor.read_u16() {
            if word == JPEG_SOI {
                found = true;
                break;
            }
        }
        if !found {
            break;
        }
        if !cursor.eof() {
            state.jpeg_offsets.push(cursor.position() - 2);
        }
    }

    cursor.seek(cursor.len());
    state.interleaved = true;
}
