use super::buffer::BgraImage;
use super::channel::{ColorChannel, BYTES_PER_PIXEL};
use crate::errors::Result;
use rayon::prelude::*;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Number of intensity buckets for an 8-bit channel.
pub const BUCKETS: usize = 256;

/// Per-intensity pixel counts for one channel of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    channel: ColorChannel,
    counts: [u32; BUCKETS],
}

impl Histogram {
    pub fn channel(&self) -> ColorChannel {
        self.channel
    }

    pub fn counts(&self) -> &[u32; BUCKETS] {
        &self.counts
    }

    /// Pixel count for a single intensity value.
    pub fn count(&self, value: u8) -> u32 {
        self.counts[value as usize]
    }

    /// Sum of all buckets; equals the image's pixel count.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Largest bucket, handy for scaling a chart.
    pub fn peak(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

impl Serialize for Histogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Histogram", 2)?;
        state.serialize_field("channel", &self.channel)?;
        state.serialize_field("counts", &self.counts[..])?;
        state.end()
    }
}

fn count_into(counts: &mut [u32; BUCKETS], bytes: &[u8], channel: ColorChannel) {
    for px in bytes.chunks_exact(BYTES_PER_PIXEL) {
        counts[channel.value(px) as usize] += 1;
    }
}

/// Counts how many pixels of `source` have each intensity in `channel`.
///
/// Buckets are `u32`; [`BgraImage`] caps the pixel count at
/// [`MAX_PIXELS`](super::buffer::MAX_PIXELS) so no bucket can overflow.
pub fn histogram(source: &BgraImage, channel: ColorChannel) -> Result<Histogram> {
    let mut counts = [0u32; BUCKETS];
    {
        let view = source.lock_pixels()?;
        count_into(&mut counts, &view, channel);
    }

    tracing::debug!(%channel, pixels = source.pixel_count(), "histogram computed");
    Ok(Histogram { channel, counts })
}

/// Same result as [`histogram`], with the rows split into `bands` ranges
/// counted in parallel and merged.
pub fn histogram_banded(source: &BgraImage, channel: ColorChannel, bands: usize) -> Result<Histogram> {
    let height = source.height() as usize;
    let bands = bands.clamp(1, height.max(1));
    let band_height = height / bands;

    let ranges: Vec<_> = (0..bands)
        .map(|i| {
            let start = i * band_height;
            let end = if i == bands - 1 { height } else { (i + 1) * band_height };
            start..end
        })
        .collect();

    let counts = {
        let view = source.lock_pixels()?;
        ranges
            .into_par_iter()
            .map(|rows| {
                let mut local = [0u32; BUCKETS];
                count_into(&mut local, view.rows(rows), channel);
                local
            })
            .reduce(
                || [0u32; BUCKETS],
                |mut acc, local| {
                    for (a, l) in acc.iter_mut().zip(local.iter()) {
                        *a += l;
                    }
                    acc
                },
            )
    };

    tracing::debug!(%channel, bands, pixels = source.pixel_count(), "banded histogram computed");
    Ok(Histogram { channel, counts })
}

/// Band count based on image size
pub fn optimal_band_count(width: u32, height: u32) -> usize {
    let total_pixels = width as u64 * height as u64;
    let min_bands = 2;
    let max_bands = num_cpus::get().max(min_bands);

    if total_pixels < 1_000_000 {
        min_bands
    } else if total_pixels < 10_000_000 {
        (max_bands / 2).max(min_bands)
    } else {
        max_bands
    }
}
