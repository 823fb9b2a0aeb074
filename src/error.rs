use alloc::string::String;
use enough::StopReason;

/// Errors from PICT decoding and plane assembly.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PictError {
    #[error("not a recognized container")]
    UnrecognizedFormat,

    #[error("invalid version marker: {0:#06x}")]
    InvalidVersion(u16),

    #[error("vector data unsupported (pixel size {0})")]
    UnsupportedVectorData(u16),

    #[error("unsupported bit depth: {0} (only 1, 2 and 4 bit pixels expand)")]
    UnsupportedBitDepth(u16),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("region {x},{y} {w}x{h} lies outside the {width}x{height} canvas")]
    InvalidRegion {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("embedded JPEG failed to decode: {0}")]
    Jpeg(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl PictError {
    /// Whether this is one of the fatal format errors raised while walking
    /// the header and opcode stream.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedFormat
                | Self::InvalidVersion(_)
                | Self::UnsupportedVectorData(_)
                | Self::UnsupportedBitDepth(_)
        )
    }
}

impl From<StopReason> for PictError {
    fn from(r: StopReason) -> Self {
        PictError::Cancelled(r)
    }
}
