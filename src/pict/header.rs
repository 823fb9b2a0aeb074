//! Fixed PICT header: 512-byte preamble, picture frame and version marker.

use log::debug;

use super::cursor::Cursor;
use crate::error::PictError;
use crate::info::PictVersion;

/// Legacy resource-fork padding in front of every PICT file.
pub(crate) const PREAMBLE_LEN: usize = 512;

const FRAME_BOTTOM_OFFSET: usize = 518;
const VERSION_2_MARKER: u16 = 0x02FF;

pub(crate) struct Header {
    pub width: u32,
    pub height: u32,
    pub version: PictVersion,
    pub resolution: Option<(f32, f32)>,
}

/// Parse the header, leaving `cursor` on the first opcode.
pub(crate) fn parse_header(cursor: &mut Cursor<'_>) -> Result<Header, PictError> {
    cursor.seek(FRAME_BOTTOM_OFFSET);
    let height = cursor.read_i16().ok_or(PictError::UnexpectedEof)?;
    let width = cursor.read_i16().ok_or(PictError::UnexpectedEof)?;
    let ver_opcode = cursor.read_u8().ok_or(PictError::UnexpectedEof)?;
    let ver_number = cursor.read_u8().ok_or(PictError::UnexpectedEof)?;

    let mut header = Header {
        width: width.max(0) as u32,
        height: height.max(0) as u32,
        version: PictVersion::V1,
        resolution: None,
    };

    match (ver_opcode, ver_number) {
        (0x11, 0x01) => {}
        (0x00, 0x11) => {
            let marker = cursor.read_u16().ok_or(PictError::UnexpectedEof)?;
            if marker != VERSION_2_MARKER {
                return Err(PictError::InvalidVersion(marker));
            }
            header.version = PictVersion::V2;
            read_v2_header(cursor, &mut header).ok_or(PictError::UnexpectedEof)?;
        }
        _ => return Err(PictError::UnrecognizedFormat),
    }

    debug!(
        "PICT {:?} header: {}x{} at offset {}",
        header.version,
        header.width,
        header.height,
        cursor.position()
    );
    Ok(header)
}

/// Header opcode 0x0C00: version, reserved, resolution, optional source
/// rectangle override, reserved.
fn read_v2_header(cursor: &mut Cursor<'_>, header: &mut Header) -> Option<()> {
    cursor.skip(6);
    let h_res = cursor.read_u32()?;
    let v_res = cursor.read_u32()?;
    cursor.skip(4);
    let bottom = cursor.read_i16()?;
    let right = cursor.read_i16()?;
    cursor.skip(4);

    if right > 0 {
        header.width = right as u32;
    }
    if bottom > 0 {
        header.height = bottom as u32;
    }
    header.resolution = Some((fixed_to_f32(h_res), fixed_to_f32(v_res)));
    Some(())
}

fn fixed_to_f32(v: u32) -> f32 {
    v as f32 / 65536.0
}
