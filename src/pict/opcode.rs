//! Opcode decoding: each loop iteration of the dispatcher reads exactly one
//! [`Opcode`], including the fixed fields that select its handler.

use super::cursor::Cursor;
use crate::info::PictVersion;

const CLIP_RGN: u16 = 0x0001;
const JPEG: u16 = 0x0018;
const BITS_RECT: u16 = 0x0090;
const BITS_RGN: u16 = 0x0091;
const PACK_BITS_RECT: u16 = 0x0098;
const PACK_BITS_RGN: u16 = 0x0099;
const DIRECT_BITS_RECT: u16 = 0x009A;
const LONG_COMMENT: u16 = 0x00A1;
const END: u16 = 0x00FF;
const SHORT_SKIP_A: u16 = 0x0A9F;
const SHORT_SKIP_B: u16 = 0x9190;

/// Raster opcode flavours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RasterKind {
    BitsRect,
    BitsRegion,
    PackBitsRect,
    PackBitsRegion,
    /// 0x9A: direct-color pixmap with no row-bytes field and no color table.
    DirectBits,
}

impl RasterKind {
    /// Region variants carry a mask region after the destination rectangle.
    pub(crate) fn has_region(self) -> bool {
        matches!(self, Self::BitsRegion | Self::PackBitsRegion)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RasterOp {
    pub kind: RasterKind,
    /// Declared row bytes with the pixmap flag bits still set; `None` for
    /// [`RasterKind::DirectBits`].
    pub row_bytes: Option<u16>,
    /// Pixmap (pixel size, component count, color table) rather than a
    /// 1-bit bitmap.
    pub pixmap: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Opcode {
    ClipRegion,
    Raster(RasterOp),
    LongComment,
    /// Opcodes followed by a one-byte length and that many bytes.
    ShortSkip(u16),
    Jpeg,
    End,
    Unknown(u16),
}

impl Opcode {
    /// Read the next opcode. `None` once the stream is exhausted.
    pub(crate) fn read(cursor: &mut Cursor<'_>, version: PictVersion) -> Option<Self> {
        let code = match version {
            PictVersion::V1 => u16::from(cursor.read_u8()?),
            PictVersion::V2 => {
                // v2 opcodes are word aligned
                if cursor.position() & 1 != 0 {
                    cursor.skip(1);
                }
                if cursor.position() + 2 >= cursor.len() {
                    return None;
                }
                cursor.read_u16()?
            }
        };

        Some(match code {
            BITS_RECT => Self::raster(RasterKind::BitsRect, version, cursor)?,
            BITS_RGN => Self::raster(RasterKind::BitsRegion, version, cursor)?,
            PACK_BITS_RECT => Self::raster(RasterKind::PackBitsRect, version, cursor)?,
            PACK_BITS_RGN => Self::raster(RasterKind::PackBitsRegion, version, cursor)?,
            DIRECT_BITS_RECT => Self::Raster(RasterOp {
                kind: RasterKind::DirectBits,
                row_bytes: None,
                pixmap: true,
            }),
            CLIP_RGN => Self::ClipRegion,
            LONG_COMMENT => Self::LongComment,
            SHORT_SKIP_A | SHORT_SKIP_B => Self::ShortSkip(code),
            JPEG => Self::Jpeg,
            END => Self::End,
            other => Self::Unknown(other),
        })
    }

    /// Bitmap vs. pixmap is decided by the high bit of row bytes, which v1
    /// files never set.
    fn raster(kind: RasterKind, version: PictVersion, cursor: &mut Cursor<'_>) -> Option<Self> {
        let row_bytes = cursor.read_u16()?;
        let pixmap = version == PictVersion::V2 && row_bytes & 0x8000 != 0;
        Some(Self::Raster(RasterOp {
            kind,
            row_bytes: Some(row_bytes),
            pixmap,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_opcodes_are_single_bytes() {
        let data = [0x90, 0x00, 0x02, 0xA1, 0xFF];
        let mut c = Cursor::new(&data);
        assert_eq!(
            Opcode::read(&mut c, PictVersion::V1),
            Some(Opcode::Raster(RasterOp {
                kind: RasterKind::BitsRect,
                row_bytes: Some(2),
                pixmap: false,
            }))
        );
        assert_eq!(Opcode::read(&mut c, PictVersion::V1), Some(Opcode::LongComment));
        assert_eq!(Opcode::read(&mut c, PictVersion::V1), Some(Opcode::End));
        assert_eq!(Opcode::read(&mut c, PictVersion::V1), None);
    }

    #[test]
    fn v1_ignores_pixmap_flag() {
        let data = [0x98, 0x80, 0x10];
        let Some(Opcode::Raster(op)) = Opcode::read(&mut Cursor::new(&data), PictVersion::V1)
        else {
            panic!("expected raster opcode");
        };
        assert!(!op.pixmap);
    }

    #[test]
    fn v2_skips_pad_byte_and_reads_words() {
        // odd start offset: one pad byte, then 0x0098 with the pixmap flag set
        let data = [0x00, 0x00, 0x00, 0x98, 0x80, 0x10, 0x00];
        let mut c = Cursor::new(&data);
        c.skip(1);
        let Some(Opcode::Raster(op)) = Opcode::read(&mut c, PictVersion::V2) else {
            panic!("expected raster opcode");
        };
        assert_eq!(op.kind, RasterKind::PackBitsRect);
        assert_eq!(op.row_bytes, Some(0x8010));
        assert!(op.pixmap);
        assert_eq!(c.position(), 6);
    }

    #[test]
    fn v2_classifies_other_opcodes() {
        let data = [
            0x00, 0x9A, 0x0A, 0x9F, 0x91, 0x90, 0x00, 0x18, 0x12, 0x34, 0x00, 0x01, 0x00, 0xFF,
            0x00, 0x00,
        ];
        let mut c = Cursor::new(&data);
        let mut seen = alloc::vec::Vec::new();
        while let Some(op) = Opcode::read(&mut c, PictVersion::V2) {
            seen.push(op);
        }
        assert_eq!(
            seen,
            [
                Opcode::Raster(RasterOp {
                    kind: RasterKind::DirectBits,
                    row_bytes: None,
                    pixmap: true,
                }),
                Opcode::ShortSkip(0x0A9F),
                Opcode::ShortSkip(0x9190),
                Opcode::Jpeg,
                Opcode::Unknown(0x1234),
                Opcode::ClipRegion,
                Opcode::End,
            ]
        );
    }

    #[test]
    fn v2_stops_near_end() {
        let data = [0x00, 0xFF];
        assert_eq!(Opcode::read(&mut Cursor::new(&data), PictVersion::V2), None);
    }
}
