//! Chart descriptions for histogram output.
//!
//! Nothing here draws. A [`HistogramChart`] carries the axis setup and the
//! line series a charting front end needs to plot one channel.

use crate::channels::{ColorChannel, Histogram, BUCKETS};
use serde::Serialize;

pub const X_AXIS_TITLE: &str = "Pixel";
pub const Y_AXIS_TITLE: &str = "Count";
pub const X_AXIS_MAX: u32 = BUCKETS as u32;
pub const X_AXIS_INTERVAL: u32 = 64;
pub const LINE_WIDTH: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis {
    pub title: String,
    pub minimum: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: SeriesKind,
    pub border_width: u32,
    /// RGB line color
    pub color: [u8; 3],
    /// (intensity, count) pairs
    pub points: Vec<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramChart {
    pub channel: ColorChannel,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Option<Series>,
}

impl HistogramChart {
    /// Axes only, no data. This is what a chart shows before an image is loaded.
    pub fn empty(channel: ColorChannel) -> Self {
        Self {
            channel,
            x_axis: Axis {
                title: X_AXIS_TITLE.to_string(),
                minimum: 0,
                maximum: Some(X_AXIS_MAX),
                interval: Some(X_AXIS_INTERVAL),
            },
            y_axis: Axis {
                title: Y_AXIS_TITLE.to_string(),
                minimum: 0,
                maximum: None,
                interval: None,
            },
            series: None,
        }
    }

    pub fn from_histogram(histogram: &Histogram) -> Self {
        let channel = histogram.channel();
        let points = histogram
            .counts()
            .iter()
            .enumerate()
            .map(|(value, &count)| (value as u32, count))
            .collect();

        Self {
            series: Some(Series {
                name: "Histogram".to_string(),
                kind: SeriesKind::Line,
                border_width: LINE_WIDTH,
                color: channel.display_rgb(),
                points,
            }),
            ..Self::empty(channel)
        }
    }
}
