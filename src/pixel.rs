/// Pixel memory layout of an assembled plane buffer.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// Single channel, 8-bit samples with no palette (expanded bitmaps).
    Gray8,
    /// Single channel, 8-bit palette indices into the image's color table.
    Indexed8,
    /// 3 channels, 8-bit RGB, interleaved (embedded JPEG output).
    Rgb8,
    /// 3 channels, 8-bit, channel-major: the whole R plane, then G, then B.
    PlanarRgb8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout (summed over all planes).
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 | Self::Indexed8 => 1,
            Self::Rgb8 | Self::PlanarRgb8 => 3,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray8 | Self::Indexed8 => 1,
            Self::Rgb8 | Self::PlanarRgb8 => 3,
        }
    }

    /// Whether samples of one pixel are stored next to each other.
    pub fn is_interleaved(&self) -> bool {
        matches!(self, Self::Rgb8)
    }

    /// Whether this layout has the same memory representation as `other`.
    ///
    /// `Gray8` and `Indexed8` are compatible (one byte per pixel); the planar
    /// layout is only compatible with itself.
    pub fn is_memory_compatible(&self, other: PixelLayout) -> bool {
        if *self == other {
            return true;
        }
        matches!(
            (*self, other),
            (Self::Gray8, Self::Indexed8) | (Self::Indexed8, Self::Gray8)
        )
    }
}

/// Pixel types that typed views of a [`crate::DecodeOutput`] can produce.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    /// The interleaved layout this pixel type corresponds to.
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGB8 {
    fn layout() -> PixelLayout {
        PixelLayout::Rgb8
    }
}
