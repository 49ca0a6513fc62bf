//! Epoch assembly state machine and the public decode driver.

use std::collections::HashMap;
use std::mem;

use log::warn;

use crate::composition::{Composition, CompositionState};
use crate::error::DecodeError;
use crate::object::{assemble_fragments, ImageFragment};
use crate::palette::Palette;
use crate::reader::SegmentReader;
use crate::rle::decode_rle;
use crate::segment::{Segment, SegmentPayload};
use crate::subtitle::{SubImage, Subtitle};
use crate::window::Window;

/// Everything accumulated between two end-of-display-set markers.
///
/// Windows are keyed by their declared id (ids are not guaranteed
/// contiguous), palettes and image fragments by id in arrival order.
#[derive(Debug, Default)]
struct DisplaySetBag {
    palettes: HashMap<u8, Vec<Palette>>,
    images: HashMap<u16, Vec<ImageFragment>>,
    windows: HashMap<u8, Window>,
    compositions: Vec<Composition>,
    /// A structural parse failure occurred while accumulating; the set is
    /// discarded at its end marker.
    poisoned: bool,
}

impl DisplaySetBag {
    fn is_empty(&self) -> bool {
        self.palettes.is_empty()
            && self.images.is_empty()
            && self.windows.is_empty()
            && self.compositions.is_empty()
    }
}

/// Decoder for a raw stream of PGS segments.
///
/// Feed whole streams to [`decode`](SupDecoder::decode); completed
/// [`Subtitle`]s stay retrievable even when the stream later fails with a
/// framing error. Display sets that fail validation are logged, counted in
/// [`skipped_display_sets`](SupDecoder::skipped_display_sets) and skipped
/// without affecting the rest of the stream.
///
/// Rendering follows the epoch protocol: an epoch-start display set is
/// promoted to the baseline and renders nothing; each following
/// normal-state display set renders the baseline's composition objects and
/// consumes the baseline.
pub struct SupDecoder {
    /// Segments seen since the previous end marker
    pending: DisplaySetBag,
    /// The display set promoted at the most recent epoch start
    baseline: DisplaySetBag,
    subtitles: Vec<Subtitle>,
    skipped: usize,
    plane_width: u16,
    plane_height: u16,
    fps: u32,
}

impl SupDecoder {
    pub fn new() -> Self {
        Self {
            pending: DisplaySetBag::default(),
            baseline: DisplaySetBag::default(),
            subtitles: Vec::new(),
            skipped: 0,
            plane_width: 0,
            plane_height: 0,
            fps: 0,
        }
    }

    /// Decode one raw segment stream, appending completed subtitles.
    ///
    /// Returns `Err` only for stream-framing failures, after which byte
    /// alignment is lost and no further segments are read. Subtitles
    /// completed before the failure point remain available.
    pub fn decode(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        let mut reader = SegmentReader::new(data);
        loop {
            match reader.next_segment() {
                Ok(Some(segment)) => self.accept(segment),
                Ok(None) => return Ok(()),
                Err(err) if err.is_stream_fatal() => return Err(err),
                Err(DecodeError::MalformedEnd) => {
                    warn!("skipping display set: malformed end segment");
                    self.skip_display_set();
                }
                Err(err) => {
                    warn!("display set will be skipped: {err}");
                    self.pending.poisoned = true;
                }
            }
        }
    }

    /// Subtitles completed so far, in stream order.
    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    pub fn into_subtitles(self) -> Vec<Subtitle> {
        self.subtitles
    }

    /// Display sets discarded due to recoverable validation failures.
    pub fn skipped_display_sets(&self) -> usize {
        self.skipped
    }

    /// Route one segment into the pending display set, or close the set on
    /// an end marker.
    fn accept(&mut self, segment: Segment) {
        match segment.payload {
            SegmentPayload::Palette(palette) => {
                self.pending
                    .palettes
                    .entry(palette.id)
                    .or_default()
                    .push(palette);
            }
            SegmentPayload::ImageFragment(fragment) => {
                self.pending
                    .images
                    .entry(fragment.id)
                    .or_default()
                    .push(fragment);
            }
            SegmentPayload::WindowList(windows) => {
                for window in windows {
                    self.pending.windows.insert(window.id, window);
                }
            }
            SegmentPayload::Composition(composition) => {
                self.learn_geometry(&composition);
                self.pending.compositions.push(composition);
            }
            SegmentPayload::EndOfDisplaySet => {
                if self.pending.poisoned {
                    warn!("skipping poisoned display set");
                    self.skip_display_set();
                    return;
                }
                if let Err(err) = self.end_display_set() {
                    warn!("skipping display set: {err}");
                    self.skip_display_set();
                }
            }
        }
    }

    /// Recoverable failure: both accumulators reset, decoding continues
    /// with the next display set.
    fn skip_display_set(&mut self) {
        self.pending = DisplaySetBag::default();
        self.baseline = DisplaySetBag::default();
        self.skipped += 1;
    }

    fn end_display_set(&mut self) -> Result<(), DecodeError> {
        let pending = mem::take(&mut self.pending);
        let state = match pending.compositions.as_slice() {
            [] => return Err(DecodeError::NoComposition),
            [composition] => composition.state,
            many => {
                return Err(DecodeError::MultipleCompositions { count: many.len() });
            }
        };

        match state {
            CompositionState::EpochStart => {
                if !self.baseline.is_empty() {
                    warn!("overlapping epoch: discarding undisplayed baseline");
                }
                self.baseline = pending;
                Ok(())
            }
            CompositionState::Normal => {
                if self.baseline.is_empty() {
                    return Err(DecodeError::UnstartedEpoch);
                }
                let baseline = mem::take(&mut self.baseline);
                let subtitle = self.render(&baseline)?;
                self.subtitles.push(subtitle);
                Ok(())
            }
        }
    }

    /// Render every composition object of the baseline into one subtitle.
    fn render(&self, baseline: &DisplaySetBag) -> Result<Subtitle, DecodeError> {
        let composition = baseline
            .compositions
            .first()
            .ok_or(DecodeError::NoComposition)?;

        let palette_id = composition.palette_id;
        let palette = match baseline.palettes.get(&palette_id).map(Vec::as_slice) {
            None | Some([]) => return Err(DecodeError::PaletteNotFound { id: palette_id }),
            Some([palette]) => palette,
            Some(many) => {
                return Err(DecodeError::AmbiguousPalette {
                    id: palette_id,
                    count: many.len(),
                });
            }
        };
        let table = palette.rgba_table();

        // A single fragment group per display set; the chain is validated
        // and concatenated before expansion.
        let fragments = match baseline.images.len() {
            0 => return Err(DecodeError::ImageNotFound),
            1 => baseline
                .images
                .values()
                .next()
                .ok_or(DecodeError::ImageNotFound)?,
            count => return Err(DecodeError::AmbiguousImage { count }),
        };
        let data = assemble_fragments(fragments)?;

        let mut subtitle = Subtitle::new(self.plane_width, self.plane_height, self.fps);
        for object in &composition.objects {
            let window = baseline
                .windows
                .get(&object.window_id)
                .ok_or(DecodeError::WindowNotFound {
                    id: object.window_id,
                })?;
            let rgba = decode_rle(&data, window.width, window.height, &table)?;
            subtitle.images.push(SubImage {
                x: window.x,
                y: window.y,
                width: window.width,
                height: window.height,
                forced: object.forced,
                rgba,
            });
        }
        Ok(subtitle)
    }

    /// The first composition observed supplies the plane geometry; the
    /// frame rate is taken from the first composition with a known code.
    fn learn_geometry(&mut self, composition: &Composition) {
        if self.plane_width == 0 && self.plane_height == 0 {
            self.plane_width = composition.width;
            self.plane_height = composition.height;
        }
        if self.fps == 0 {
            self.fps = composition.fps();
        }
    }
}

impl Default for SupDecoder {
    fn default() -> Self {
        Self::new()
    }
}
