use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per pixel in a BGRA buffer.
pub const BYTES_PER_PIXEL: usize = 4;

/// Offset of the alpha byte inside a pixel. Alpha is never masked or counted.
pub const ALPHA_OFFSET: usize = 3;

/// One of the three color channels of a BGRA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 3] = [ColorChannel::Red, ColorChannel::Green, ColorChannel::Blue];

    /// Byte offset of this channel inside a BGRA pixel.
    ///
    /// This is the only place the pixel layout is spelled out; masking and
    /// counting both go through it.
    pub const fn offset(self) -> usize {
        match self {
            ColorChannel::Blue => 0,
            ColorChannel::Green => 1,
            ColorChannel::Red => 2,
        }
    }

    /// Offsets of the two color bytes that are not this channel.
    pub const fn other_offsets(self) -> [usize; 2] {
        match self {
            ColorChannel::Red => [ColorChannel::Blue.offset(), ColorChannel::Green.offset()],
            ColorChannel::Green => [ColorChannel::Blue.offset(), ColorChannel::Red.offset()],
            ColorChannel::Blue => [ColorChannel::Green.offset(), ColorChannel::Red.offset()],
        }
    }

    /// Reads this channel's intensity from a single BGRA pixel.
    #[inline]
    pub fn value(self, pixel: &[u8]) -> u8 {
        pixel[self.offset()]
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorChannel::Red => "red",
            ColorChannel::Green => "green",
            ColorChannel::Blue => "blue",
        }
    }

    /// Pure display color as (r, g, b).
    pub fn display_rgb(self) -> [u8; 3] {
        match self {
            ColorChannel::Red => [255, 0, 0],
            ColorChannel::Green => [0, 128, 0],
            ColorChannel::Blue => [0, 0, 255],
        }
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
