//! Decoded subtitle output model, shared with raster consumers.

/// One rendered subtitle image positioned on the display plane.
///
/// `rgba` holds `width * height` packed `(R<<24)|(G<<16)|(B<<8)|A` pixels,
/// row-major, top-to-bottom.
#[derive(Debug, Clone)]
pub struct SubImage {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Must be shown regardless of player subtitle preference
    pub forced: bool,
    pub rgba: Vec<u32>,
}

/// All images produced by one rendered display set, plus stream metadata.
#[derive(Debug, Clone, Default)]
pub struct Subtitle {
    pub title: String,
    pub lang: String,
    /// Display plane width, 0 until a composition supplies it
    pub width: u16,
    /// Display plane height, 0 until a composition supplies it
    pub height: u16,
    /// Frames per second, 0 if unknown
    pub fps: u32,
    pub images: Vec<SubImage>,
}

impl Subtitle {
    pub fn new(width: u16, height: u16, fps: u32) -> Self {
        Self {
            width,
            height,
            fps,
            ..Self::default()
        }
    }
}
