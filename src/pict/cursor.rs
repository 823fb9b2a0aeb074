//! Big-endian cursor over the source bytes.
//!
//! Every read is bounds-checked; running off the end yields `None` (or a
//! zero-filled tail for [`Cursor::read_into`]) rather than a panic.

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Absolute seek, clamped to the end of the data.
    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.data.len());
    }

    /// Relative skip, clamped to the end of the data.
    pub(crate) fn skip(&mut self, n: usize) {
        self.pos = self.pos.saturating_add(n).min(self.data.len());
    }

    pub(crate) fn read_u8(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    pub(crate) fn read_u16(&mut self) -> Option<u16> {
        let bytes = self.read_array::<2>()?;
        Some(u16::from_be_bytes(bytes))
    }

    pub(crate) fn read_i16(&mut self) -> Option<i16> {
        let bytes = self.read_array::<2>()?;
        Some(i16::from_be_bytes(bytes))
    }

    pub(crate) fn read_u32(&mut self) -> Option<u32> {
        let bytes = self.read_array::<4>()?;
        Some(u32::from_be_bytes(bytes))
    }

    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let end = self.pos.checked_add(N)?;
        let bytes: [u8; N] = self.data.get(self.pos..end)?.try_into().ok()?;
        self.pos = end;
        Some(bytes)
    }

    /// Fill `buf` from the stream. A short read zero-fills the tail and
    /// returns the number of bytes actually copied.
    pub(crate) fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let available = buf.len().min(self.remaining());
        buf[..available].copy_from_slice(&self.data[self.pos..self.pos + available]);
        buf[available..].fill(0);
        self.pos += available;
        available
    }
}
