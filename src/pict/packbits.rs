//! PackBits run-length decoding for compressed pixmap rows.
//!
//! Control byte `n` (as `i8`):
//! - `0..=127`: copy the next `n + 1` literal units
//! - `-127..=-1`: repeat the next unit `1 - n` times
//! - `-128`: no-op
//!
//! A unit is one byte for [`decode`] and one big-endian 16-bit word for
//! [`decode_words`].

use alloc::vec::Vec;

/// Decode byte-oriented PackBits, producing at most `max_out` bytes.
///
/// Runs cut short by the end of `input` are clamped.
pub(crate) fn decode(input: &[u8], max_out: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(max_out.min(input.len().saturating_mul(128)));
    let mut pos = 0;

    while pos < input.len() && out.len() < max_out {
        let header = input[pos] as i8;
        pos += 1;

        match header {
            -128 => {}
            0..=127 => {
                let end = (pos + header as usize + 1).min(input.len());
                let take = (end - pos).min(max_out - out.len());
                out.extend_from_slice(&input[pos..pos + take]);
                pos = end;
            }
            _ => {
                let Some(&byte) = input.get(pos) else {
                    break;
                };
                pos += 1;
                let count = (1 - isize::from(header)) as usize;
                let n = count.min(max_out - out.len());
                out.resize(out.len() + n, byte);
            }
        }
    }

    out
}

/// Decode the 16-bit PackBits variant used by 16-bit pixmaps into exactly
/// `width` words. Words not covered by `input` stay zero.
pub(crate) fn decode_words(input: &[u8], width: usize) -> Vec<u16> {
    let mut out = alloc::vec![0u16; width];
    let mut o = 0;
    let mut i = 0;

    let word_at = |i: usize| u16::from_be_bytes([input[i], input[i + 1]]);

    while o < width && i + 1 < input.len() {
        let header = input[i] as i8;
        i += 1;

        match header {
            -128 => {}
            0..=127 => {
                let end = o + header as usize + 1;
                while o < end && o < width && i + 1 < input.len() {
                    out[o] = word_at(i);
                    o += 1;
                    i += 2;
                }
            }
            _ => {
                if i + 1 >= input.len() {
                    break;
                }
                let rep = word_at(i);
                i += 2;
                let end = (o + (1 - isize::from(header)) as usize).min(width);
                out[o..end].fill(rep);
                o = end;
            }
        }
    }

    out
}

/// Literal/replicate encoder, only used to produce test vectors.
#[cfg(test)]
pub(crate) fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let byte = input[pos];
        let run = input[pos..]
            .iter()
            .take(128)
            .take_while(|&&b| b == byte)
            .count();
        if run >= 2 {
            out.push((1 - run as isize) as i8 as u8);
            out.push(byte);
            pos += run;
            continue;
        }

        let start = pos;
        while pos < input.len() && pos - start < 128 {
            if pos + 1 < input.len() && input[pos] == input[pos + 1] {
                break;
            }
            pos += 1;
        }
        out.push((pos - start - 1) as u8);
        out.extend_from_slice(&input[start..pos]);
    }

    out
}
