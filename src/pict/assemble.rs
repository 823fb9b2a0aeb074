//! Plane assembly: crop a window out of the decoded strips (or embedded JPEG
//! spans) into the caller's channel layout.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;
use log::warn;

use super::header::PREAMBLE_LEN;
use super::state::{DecodeState, Strip};
use crate::decode::DecodeOutput;
use crate::error::PictError;
use crate::pixel::PixelLayout;

/// Whole-image decoder used when the opcode walk produced no raster strips,
/// or when a caller asks for the legacy path explicitly.
pub trait FallbackDecoder {
    /// Decode the PICT bytes that follow the 512-byte preamble into channel
    /// planes. `None` if the image could not be decoded.
    fn decode_planes(&self, pict: &[u8]) -> Option<Vec<Vec<u8>>>;
}

/// A window to assemble, plus fallback options.
#[derive(Clone, Copy)]
pub struct PlaneRequest<'f> {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    legacy: bool,
    fallback: Option<&'f dyn FallbackDecoder>,
}

impl<'f> PlaneRequest<'f> {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            legacy: false,
            fallback: None,
        }
    }

    /// The whole canvas of `state`.
    pub fn full(state: &DecodeState<'_>) -> Self {
        Self::new(0, 0, state.width(), state.height())
    }

    /// Skip strip assembly and go straight to the best-effort fallback.
    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    pub fn with_fallback(mut self, fallback: &'f dyn FallbackDecoder) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// How the strips of a state map onto an output plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Assembly {
    Jpeg,
    Fallback,
    /// One byte row per scanline, palette indices.
    Indexed,
    /// One byte row per scanline, no palette (1-bit bitmaps).
    Gray,
    /// `stride` byte rows per scanline; the last three are R, G, B.
    Planar { stride: usize },
    /// One word row per scanline, `xRRRRRGGGGGBBBBB`.
    Packed555,
}

impl Assembly {
    pub(crate) fn select(state: &DecodeState<'_>, height: u32, legacy: bool) -> Self {
        if !state.jpeg_offsets.is_empty() {
            return Self::Jpeg;
        }
        let Some(first) = state.strips.first() else {
            return Self::Fallback;
        };
        if legacy {
            return Self::Fallback;
        }

        let strips = state.strips.len();
        let height = height as usize;
        let words = matches!(first, Strip::Words(_));

        if words {
            Self::Packed555
        } else if state.color_table.is_some() {
            Self::Indexed
        } else if height != 0 && (strips == height * 3 || strips == height * 4) {
            Self::Planar {
                stride: strips / height,
            }
        } else {
            Self::Gray
        }
    }

    pub(crate) fn layout(self, state: &DecodeState<'_>) -> PixelLayout {
        match self {
            Self::Jpeg => PixelLayout::Rgb8,
            Self::Indexed => PixelLayout::Indexed8,
            Self::Gray => PixelLayout::Gray8,
            Self::Planar { .. } | Self::Packed555 => PixelLayout::PlanarRgb8,
            Self::Fallback if state.is_rgb() => PixelLayout::PlanarRgb8,
            Self::Fallback if state.is_indexed() => PixelLayout::Indexed8,
            Self::Fallback => PixelLayout::Gray8,
        }
    }
}

impl<'a> DecodeState<'a> {
    /// Assemble the `w`×`h` window at (`x`, `y`).
    ///
    /// Calling this repeatedly with the same arguments returns identical
    /// buffers; the state is never modified.
    pub fn read_plane(
        &self,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        stop: impl Stop,
    ) -> Result<DecodeOutput, PictError> {
        self.read(&PlaneRequest::new(x, y, w, h), stop)
    }

    /// Assemble the window described by `request`.
    pub fn read(&self, request: &PlaneRequest<'_>, stop: impl Stop) -> Result<DecodeOutput, PictError> {
        let (assembly, layout, out_len) = self.plan(request)?;
        let mut out = vec![0u8; out_len];
        self.fill(assembly, request, &mut out, &stop)?;
        Ok(DecodeOutput::new(
            out,
            request.width,
            request.height,
            layout,
            assembly == Assembly::Fallback,
        ))
    }

    /// Assemble the window described by `request` into the front of `buf`.
    ///
    /// Returns the layout written; `width * height * layout.bytes_per_pixel()`
    /// bytes are overwritten.
    pub fn read_into(
        &self,
        request: &PlaneRequest<'_>,
        buf: &mut [u8],
        stop: impl Stop,
    ) -> Result<PixelLayout, PictError> {
        let (assembly, layout, out_len) = self.plan(request)?;
        let actual = buf.len();
        let out = buf.get_mut(..out_len).ok_or(PictError::BufferTooSmall {
            needed: out_len,
            actual,
        })?;
        out.fill(0);
        self.fill(assembly, request, out, &stop)?;
        Ok(layout)
    }

    /// Pick the assembly path, validate the window and size the output.
    fn plan(&self, request: &PlaneRequest<'_>) -> Result<(Assembly, PixelLayout, usize), PictError> {
        let height = self.height();
        let assembly = Assembly::select(self, height, request.legacy);
        let layout = assembly.layout(self);
        let (x, y, w, h) = (request.x, request.y, request.width, request.height);

        if u64::from(x) + u64::from(w) > u64::from(self.width)
            || u64::from(y) + u64::from(h) > u64::from(height)
        {
            return Err(PictError::InvalidRegion {
                x,
                y,
                w,
                h,
                width: self.width,
                height,
            });
        }

        let too_large = PictError::DimensionsTooLarge {
            width: w,
            height: h,
        };
        let out_len = (w as usize)
            .checked_mul(h as usize)
            .and_then(|n| n.checked_mul(layout.bytes_per_pixel()))
            .ok_or(too_large)?;
        if let Some(limits) = self.limits {
            limits.check_memory(out_len)?;
        }
        Ok((assembly, layout, out_len))
    }

    fn fill(
        &self,
        assembly: Assembly,
        request: &PlaneRequest<'_>,
        out: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<(), PictError> {
        let window = Window {
            x: request.x as usize,
            y: request.y as usize,
            w: request.width as usize,
            h: request.height as usize,
        };
        match assembly {
            Assembly::Jpeg => self.assemble_jpeg(&window, out),
            Assembly::Fallback => {
                self.assemble_fallback(request.fallback, out);
                Ok(())
            }
            Assembly::Indexed | Assembly::Gray => self.assemble_rows(&window, out, stop),
            Assembly::Planar { stride } => self.assemble_planar(&window, stride, out, stop),
            Assembly::Packed555 => self.assemble_packed555(&window, out, stop),
        }
    }

    fn assemble_rows(&self, win: &Window, out: &mut [u8], stop: &dyn Stop) -> Result<(), PictError> {
        let mut missing = 0;
        for (i, dst) in out.chunks_exact_mut(win.w.max(1)).take(win.h).enumerate() {
            if i % 16 == 0 {
                stop.check()?;
            }
            match self.strips.get(win.y + i) {
                Some(Strip::Bytes(row)) => copy_clamped(row, win.x, dst),
                _ => missing += 1,
            }
        }
        if missing > 0 {
            warn!("{missing} requested rows have no decoded byte strip; left blank");
        }
        Ok(())
    }

    fn assemble_planar(
        &self,
        win: &Window,
        stride: usize,
        out: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<(), PictError> {
        let plane_len = win.w * win.h;
        for i in 0..win.h {
            if i % 16 == 0 {
                stop.check()?;
            }
            let row = win.y + i;
            let base = i * win.w;
            for c in 0..3 {
                let index = row * stride + stride - 3 + c;
                let dst = &mut out[c * plane_len + base..c * plane_len + base + win.w];
                if let Some(Strip::Bytes(src)) = self.strips.get(index) {
                    copy_clamped(src, win.x, dst);
                }
            }
        }
        Ok(())
    }

    fn assemble_packed555(
        &self,
        win: &Window,
        out: &mut [u8],
        stop: &dyn Stop,
    ) -> Result<(), PictError> {
        let plane_len = win.w * win.h;
        let mut missing = 0;
        for i in 0..win.h {
            if i % 16 == 0 {
                stop.check()?;
            }
            let Some(Strip::Words(row)) = self.strips.get(win.y + i) else {
                missing += 1;
                continue;
            };
            for j in 0..win.w {
                let v = row.get(win.x + j).copied().unwrap_or(0);
                let base = i * win.w + j;
                out[base] = ((v & 0x7C00) >> 10) as u8;
                out[plane_len + base] = ((v & 0x03E0) >> 5) as u8;
                out[2 * plane_len + base] = (v & 0x001F) as u8;
            }
        }
        if missing > 0 {
            warn!("{missing} requested rows have no decoded word strip; left blank");
        }
        Ok(())
    }

    fn assemble_fallback(&self, fallback: Option<&dyn FallbackDecoder>, out: &mut [u8]) {
        warn!("no usable raster strips; using best-effort whole-image fallback");
        let pict = self.data.get(PREAMBLE_LEN..).unwrap_or(&[]);
        let Some(planes) = fallback.and_then(|f| f.decode_planes(pict)) else {
            return;
        };
        for (i, plane) in planes.iter().enumerate() {
            let Some(dst) = out.get_mut(i * plane.len()..) else {
                break;
            };
            let len = dst.len().min(plane.len());
            dst[..len].copy_from_slice(&plane[..len]);
        }
    }

    #[cfg(feature = "jpeg")]
    fn assemble_jpeg(&self, win: &Window, out: &mut [u8]) -> Result<(), PictError> {
        let image = super::jpeg::decode_spans(self.data, &self.jpeg_offsets)?;
        let stride = image.width * 3;
        let row_len = win.w * 3;
        for (i, dst) in out.chunks_exact_mut(row_len.max(1)).take(win.h).enumerate() {
            let start = (win.y + i) * stride + win.x * 3;
            if let Some(src) = image.pixels.get(start..) {
                let len = row_len.min(src.len()).min(stride.saturating_sub(win.x * 3));
                dst[..len].copy_from_slice(&src[..len]);
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "jpeg"))]
    fn assemble_jpeg(&self, _win: &Window, _out: &mut [u8]) -> Result<(), PictError> {
        Err(PictError::UnsupportedVariant(
            "embedded JPEG data requires the `jpeg` feature".into(),
        ))
    }
}

struct Window {
    x: usize,
    y: usize,
    w: usize,
    h: usize,
}

/// Copy `src[x..x + dst.len()]` into `dst`, as far as `src` reaches.
fn copy_clamped(src: &[u8], x: usize, dst: &mut [u8]) {
    if let Some(src) = src.get(x..) {
        let len = dst.len().min(src.len());
        dst[..len].copy_from_slice(&src[..len]);
    }
}
