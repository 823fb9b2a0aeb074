use alloc::vec::Vec;

use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::error::PictError;
use crate::limits::Limits;
use crate::pict::DecodeState;
use crate::pixel::PixelLayout;

/// Builder for a PICT decode pass.
///
/// ```no_run
/// use zenpict::{DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your PICT bytes
/// let limits = Limits { max_pixels: Some(1 << 24), ..Limits::default() };
/// let state = DecodeRequest::new(data).with_limits(&limits).decode(Unstoppable)?;
/// let plane = state.read_plane(0, 0, state.width(), state.height(), Unstoppable)?;
/// # Ok::<(), zenpict::PictError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    /// Apply resource limits to the decode pass and to later plane reads.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Walk the header and the whole opcode stream.
    pub fn decode(self, stop: impl Stop) -> Result<DecodeState<'a>, PictError> {
        crate::pict::decode(self.data, self.limits, &stop)
    }
}

/// An assembled plane buffer.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Set when the bytes came from the fallback path rather than from
    /// decoded strips or embedded JPEG spans.
    pub best_effort: bool,
}

impl DecodeOutput {
    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Channel planes of a `PlanarRgb8` buffer, or the whole buffer as a
    /// single plane for every other layout.
    pub fn planes(&self) -> impl Iterator<Item = &[u8]> {
        let plane_len = self.width as usize * self.height as usize;
        let count = match self.layout {
            PixelLayout::PlanarRgb8 => 3,
            _ => 1,
        };
        let chunk = if count == 1 { self.pixels.len() } else { plane_len };
        self.pixels.chunks(chunk.max(1)).take(count)
    }

    pub(crate) fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        layout: PixelLayout,
        best_effort: bool,
    ) -> Self {
        Self {
            pixels,
            width,
            height,
            layout,
            best_effort,
        }
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Only interleaved layouts can be viewed this way; returns
    /// [`crate::PictError::UnsupportedVariant`] otherwise.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], PictError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if !self.layout.is_memory_compatible(P::layout()) {
            return Err(PictError::UnsupportedVariant(alloc::format!(
                "{:?} plane cannot be viewed as {:?} pixels",
                self.layout,
                P::layout()
            )));
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, PictError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, PictError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}
