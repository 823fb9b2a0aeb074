//! Sub-byte pixel expansion (1, 2 and 4 bits per pixel) to one byte per pixel.
//!
//! Output values are raw indices (0/1 for bitmaps), never scaled.

use crate::error::PictError;

/// `EXPANSION_TABLE[b * 8 + i]` is bit `7 - i` of `b`.
pub(crate) static EXPANSION_TABLE: [u8; 256 * 8] = build_expansion_table();

const fn build_expansion_table() -> [u8; 256 * 8] {
    let mut table = [0u8; 256 * 8];
    let mut b = 0;
    while b < 256 {
        let mut i = 0;
        while i < 8 {
            table[b * 8 + i] = ((b >> (7 - i)) & 1) as u8;
            i += 1;
        }
        b += 1;
    }
    table
}

/// Expand packed `depth`-bit pixels from `input` into `out`, one byte each.
///
/// Fills at most `out.len()` pixels; pixels past the end of `input` are
/// left untouched.
pub(crate) fn expand_pixels(depth: u16, input: &[u8], out: &mut [u8]) -> Result<(), PictError> {
    if depth == 1 {
        for (out_vals, &in_val) in out.chunks_mut(8).zip(input) {
            let look = usize::from(in_val) * 8;
            out_vals.copy_from_slice(&EXPANSION_TABLE[look..look + out_vals.len()]);
        }
        return Ok(());
    }

    if depth != 2 && depth != 4 {
        return Err(PictError::UnsupportedBitDepth(depth));
    }

    let depth = depth as u8;
    let per_byte = usize::from(8 / depth);
    let mask = ((1u8 << depth) - 1) << (8 - depth);

    for (out_vals, &in_val) in out.chunks_mut(per_byte).zip(input) {
        let mut tmask = mask;
        let mut shift = 8 - depth;
        for o in out_vals {
            *o = (in_val & tmask) >> shift;
            tmask >>= depth;
            shift = shift.saturating_sub(depth);
        }
    }
    Ok(())
}
