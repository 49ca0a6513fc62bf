//! Decode error taxonomy.

/// Everything that can go wrong while decoding a Presentation Graphic Stream.
///
/// Errors fall into three classes with different blast radii:
///
/// - stream framing ([`MalformedSegment`](DecodeError::MalformedSegment)):
///   byte alignment is lost, the whole decode aborts;
/// - structural validation (malformed payloads, RLE failures): fatal to the
///   display set being accumulated or rendered;
/// - epoch protocol (missing/duplicate compositions, unresolved references):
///   fatal to the display set, decoding resumes at the next one.
///
/// [`SupDecoder`](crate::SupDecoder) only ever propagates the first class;
/// the rest are logged, counted and recovered from internally.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Marker bytes were not "PG", or the stream ended mid-header or
    /// mid-payload. Alignment is lost; nothing after this can be trusted.
    #[error("malformed segment at offset {offset}: {reason}")]
    MalformedSegment { offset: usize, reason: &'static str },

    /// Palette payload too short, or its entry area is not a multiple of
    /// the 5-byte entry size.
    #[error("malformed palette segment")]
    MalformedPalette,

    /// Image fragment payload shorter than its fixed fields require.
    #[error("malformed image fragment segment")]
    MalformedImage,

    /// Window list whose declared count does not consume exactly the
    /// payload length.
    #[error("malformed window list segment")]
    MalformedWindowList,

    /// Composition payload whose object records do not consume exactly the
    /// payload length.
    #[error("malformed composition segment")]
    MalformedComposition,

    /// End-of-display-set segment carried a non-empty payload.
    #[error("end-of-display-set segment with non-empty payload")]
    MalformedEnd,

    /// An RLE escape code with an undefined length-prefix combination.
    #[error("invalid RLE run code {code:#04x}")]
    InvalidRunCode { code: u8 },

    /// An RLE run tried to emit pixels past the raster bounds.
    #[error("RLE run overflows the {width}x{height} raster")]
    RasterOverflow { width: u16, height: u16 },

    /// RLE input ended in the middle of an escape sequence.
    #[error("RLE data ends mid-run")]
    TruncatedImage,

    /// A fragment chain not bounded by first/last sequence flags.
    #[error("image {id} fragment chain has bad sequence flags")]
    InvalidImageSequence { id: u16 },

    /// A display set ended without any composition.
    #[error("display set contains no composition")]
    NoComposition,

    /// A display set ended with more than one composition.
    #[error("display set contains {count} compositions")]
    MultipleCompositions { count: usize },

    /// A normal-state display set arrived with no epoch started.
    #[error("normal display set without a started epoch")]
    UnstartedEpoch,

    /// A composition object referenced a window id not in the baseline.
    #[error("window {id} not found in baseline")]
    WindowNotFound { id: u8 },

    /// The composition's palette id resolved to no palette.
    #[error("palette {id} not found in baseline")]
    PaletteNotFound { id: u8 },

    /// The composition's palette id resolved to more than one version.
    #[error("palette {id} has {count} versions in baseline")]
    AmbiguousPalette { id: u8, count: usize },

    /// The baseline holds no image fragment group.
    #[error("no image in baseline")]
    ImageNotFound,

    /// The baseline holds more than one image fragment group.
    #[error("{count} distinct images in baseline")]
    AmbiguousImage { count: usize },
}

impl DecodeError {
    /// Whether this error invalidates the rest of the stream rather than
    /// just the current display set.
    pub fn is_stream_fatal(&self) -> bool {
        matches!(self, DecodeError::MalformedSegment { .. })
    }
}
