//! # supdec
//!
//! Decoder for Presentation Graphic Stream subtitle bitstreams (.sup).
//!
//! The input is a raw stream of timestamped, typed, length-prefixed
//! segments carrying palettes, run-length-compressed bitmap fragments,
//! window placements and composition records. The decoder frames those
//! segments, assembles them into display sets, and renders each
//! normal-state display set of a started epoch into RGBA subtitle images.
//!
//! ```no_run
//! use supdec::SupDecoder;
//!
//! let data = std::fs::read("subtitles.sup").unwrap();
//! let mut decoder = SupDecoder::new();
//! decoder.decode(&data).unwrap();
//! for subtitle in decoder.subtitles() {
//!     for image in &subtitle.images {
//!         println!("{}x{} at ({}, {})", image.width, image.height, image.x, image.y);
//!     }
//! }
//! ```
//!
//! Re-encoding and container demultiplexing are out of scope; the input
//! must already be a bare segment stream.

mod composition;
mod decoder;
mod error;
mod object;
mod palette;
mod reader;
mod rle;
mod segment;
mod subtitle;
mod utils;
mod window;

pub use composition::{Composition, CompositionObject, CompositionState};
pub use decoder::SupDecoder;
pub use error::DecodeError;
pub use object::ImageFragment;
pub use palette::{Palette, PaletteEntry};
pub use reader::SegmentReader;
pub use rle::decode_rle;
pub use segment::{Segment, SegmentPayload, SegmentType};
pub use subtitle::{SubImage, Subtitle};
pub use window::Window;
