//! Byte-level PICT stream builder shared by the integration tests.

#![allow(dead_code)]

pub const V1_FIRST_OPCODE: usize = 524;
pub const V2_FIRST_OPCODE: usize = 552;

pub struct PictBuilder {
    data: Vec<u8>,
    v2: bool,
}

impl PictBuilder {
    fn preamble(width: i16, height: i16) -> Vec<u8> {
        let mut data = vec![0u8; 518];
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data
    }

    pub fn v1(width: i16, height: i16) -> Self {
        let mut data = Self::preamble(width, height);
        data.extend_from_slice(&[0x11, 0x01]);
        Self { data, v2: false }
    }

    /// Version 2 picture at 72 dpi. The header rectangle repeats the frame.
    pub fn v2(width: i16, height: i16) -> Self {
        Self::v2_with_rect(width, height, height, width)
    }

    pub fn v2_with_rect(width: i16, height: i16, bottom: i16, right: i16) -> Self {
        let mut data = Self::preamble(width, height);
        data.extend_from_slice(&[0x00, 0x11, 0x02, 0xFF]);
        data.extend_from_slice(&[0x0C, 0x00, 0xFF, 0xFE, 0x00, 0x00]);
        data.extend_from_slice(&(72u32 << 16).to_be_bytes());
        data.extend_from_slice(&(72u32 << 16).to_be_bytes());
        data.extend_from_slice(&[0, 0, 0, 0]);
        data.extend_from_slice(&bottom.to_be_bytes());
        data.extend_from_slice(&right.to_be_bytes());
        data.extend_from_slice(&[0, 0, 0, 0]);
        Self { data, v2: true }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Opcode in the width of the picture version; v2 opcodes are padded to
    /// an even offset.
    pub fn op(mut self, code: u16) -> Self {
        if self.v2 {
            if self.data.len() % 2 == 1 {
                self.data.push(0);
            }
            self.data.extend_from_slice(&code.to_be_bytes());
        } else {
            self.data.push(code as u8);
        }
        self
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.data.push(v);
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.data.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn i16(mut self, v: i16) -> Self {
        self.data.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn bytes(mut self, b: &[u8]) -> Self {
        self.data.extend_from_slice(b);
        self
    }

    pub fn zeros(mut self, n: usize) -> Self {
        self.data.resize(self.data.len() + n, 0);
        self
    }

    pub fn rect(self, top: i16, left: i16, bottom: i16, right: i16) -> Self {
        self.i16(top).i16(left).i16(bottom).i16(right)
    }

    /// Bitmap opcode (`0x90` or `0x98` without the pixmap flag): row bytes,
    /// bounds, source/destination rectangles and mode.
    pub fn bitmap(self, code: u16, row_bytes: u16, bounds: (i16, i16, i16, i16)) -> Self {
        let (top, left, bottom, right) = bounds;
        self.op(code).u16(row_bytes).rect(top, left, bottom, right).zeros(18)
    }

    /// Indexed pixmap opcode up to and including its mode/region trailer.
    pub fn indexed_pixmap(
        self,
        code: u16,
        row_bytes: u16,
        bounds: (i16, i16, i16, i16),
        pixel_size: i16,
        palette: &[[u8; 3]],
    ) -> Self {
        let (top, left, bottom, right) = bounds;
        let b = self
            .op(code)
            .u16(row_bytes | 0x8000)
            .rect(top, left, bottom, right)
            .zeros(18)
            .i16(pixel_size)
            .i16(1)
            .zeros(14)
            .color_table(palette)
            .zeros(18);
        if code == 0x99 { b.zeros(2) } else { b }
    }

    /// `DirectBitsRect` up to and including its mode field.
    pub fn direct_bits(self, bounds: (i16, i16, i16, i16), pixel_size: i16, comps: i16) -> Self {
        let (top, left, bottom, right) = bounds;
        self.op(0x9A)
            .zeros(6)
            .rect(top, left, bottom, right)
            .zeros(18)
            .i16(pixel_size)
            .i16(comps)
            .zeros(14)
            .zeros(18)
    }

    pub fn color_table(self, palette: &[[u8; 3]]) -> Self {
        let mut b = self.zeros(4).u16(0).i16(palette.len() as i16 - 1);
        for (i, [r, g, bl]) in palette.iter().copied().enumerate() {
            b = b.u16(i as u16).bytes(&[r, r, g, g, bl, bl]);
        }
        b
    }

    /// One compressed row: length prefix (word when rows exceed 250 bytes),
    /// then the packed bytes.
    pub fn packed_row(self, row_bytes: usize, packed: &[u8]) -> Self {
        let b = if row_bytes > 250 {
            self.i16(packed.len() as i16)
        } else {
            self.u8(packed.len() as u8)
        };
        b.bytes(packed)
    }

    pub fn end(self) -> Self {
        self.op(0xFF)
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// PackBits literal runs covering `bytes`.
pub fn pack_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in bytes.chunks(128) {
        out.push((chunk.len() - 1) as u8);
        out.extend_from_slice(chunk);
    }
    out
}

/// PackBits replicate run of `count` (2..=128) copies of `byte`.
pub fn pack_run(byte: u8, count: usize) -> Vec<u8> {
    vec![(1 - count as isize) as i8 as u8, byte]
}

/// 16-bit PackBits literal run covering `words`.
pub fn pack_words(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in words.chunks(128) {
        out.push((chunk.len() - 1) as u8);
        for w in chunk {
            out.extend_from_slice(&w.to_be_bytes());
        }
    }
    out
}

pub fn rgb555(r: u16, g: u16, b: u16) -> u16 {
    (r << 10) | (g << 5) | b
}
