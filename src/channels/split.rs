use super::buffer::BgraImage;
use super::channel::ColorChannel;
use super::histogram::{histogram, Histogram};
use super::isolate::isolate;
use crate::errors::Result;
use std::time::Instant;

/// How the three channel jobs of a split are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    Sequential,
    #[default]
    Parallel,
}

/// Channel image and histogram for one channel.
#[derive(Debug)]
pub struct ChannelOutput {
    pub image: BgraImage,
    pub histogram: Histogram,
}

/// The three isolated images and histograms derived from one source.
#[derive(Debug)]
pub struct ChannelSplit {
    red: ChannelOutput,
    green: ChannelOutput,
    blue: ChannelOutput,
}

impl ChannelSplit {
    pub fn output(&self, channel: ColorChannel) -> &ChannelOutput {
        match channel {
            ColorChannel::Red => &self.red,
            ColorChannel::Green => &self.green,
            ColorChannel::Blue => &self.blue,
        }
    }

    pub fn image(&self, channel: ColorChannel) -> &BgraImage {
        &self.output(channel).image
    }

    pub fn histogram(&self, channel: ColorChannel) -> &Histogram {
        &self.output(channel).histogram
    }

    /// Outputs in red, green, blue order.
    pub fn iter(&self) -> impl Iterator<Item = (ColorChannel, &ChannelOutput)> {
        ColorChannel::ALL.into_iter().map(move |c| (c, self.output(c)))
    }
}

fn split_one(source: &BgraImage, channel: ColorChannel) -> Result<ChannelOutput> {
    Ok(ChannelOutput {
        image: isolate(source, channel)?,
        histogram: histogram(source, channel)?,
    })
}

/// Runs the isolator and the accumulator for every channel of `source`.
///
/// Either all three outputs are returned or the first error is.
pub fn split_channels(source: &BgraImage, mode: SplitMode) -> Result<ChannelSplit> {
    let start = Instant::now();

    let (red, green, blue) = match mode {
        SplitMode::Sequential => (
            split_one(source, ColorChannel::Red)?,
            split_one(source, ColorChannel::Green)?,
            split_one(source, ColorChannel::Blue)?,
        ),
        SplitMode::Parallel => {
            let (red, (green, blue)) = rayon::join(
                || split_one(source, ColorChannel::Red),
                || {
                    rayon::join(
                        || split_one(source, ColorChannel::Green),
                        || split_one(source, ColorChannel::Blue),
                    )
                },
            );
            (red?, green?, blue?)
        }
    };

    tracing::info!(
        ?mode,
        width = source.width(),
        height = source.height(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "split image into channels"
    );
    Ok(ChannelSplit { red, green, blue })
}
