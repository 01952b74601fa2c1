//! Split an 8-bit image into single-channel images and per-channel histograms.
//!
//! The core works on [`channels::BgraImage`], a tightly packed BGRA buffer.
//! [`channels::isolate`] keeps one color channel and zeroes the other two,
//! [`channels::histogram`] counts the 256 intensities of one channel, and
//! [`channels::split_channels`] runs both for red, green and blue.

pub mod channels;
pub mod chart;
pub mod errors;
pub mod export;
pub mod image_loader;
pub mod logging;
pub mod settings;


pub use channels::{
    histogram, isolate, split_channels, BgraImage, ChannelSplit, ColorChannel, Histogram,
    SplitMode,
};
pub use errors::{Result, SplitError};
