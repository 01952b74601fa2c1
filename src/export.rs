use crate::channels::{BgraImage, ChannelSplit, Histogram};
use crate::chart::HistogramChart;
use crate::errors::{Result, SplitError};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// `<dir>/<input stem>_<suffix>.<extension>`
pub fn output_path(dir: &Path, input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    dir.join(format!("{}_{}.{}", stem, suffix, extension))
}

pub fn save_channel_image(image: &BgraImage, path: &Path) -> Result<()> {
    image
        .to_rgba_image()?
        .save(path)
        .map_err(|e| SplitError::ExportError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

pub fn write_chart_json(charts: &[HistogramChart], path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(charts)?;
    std::fs::write(path, content).map_err(|e| SplitError::ExportError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn write_histogram_csv(histogram: &Histogram, path: &Path) -> Result<()> {
    let mut content = String::from("value,count\n");
    for (value, count) in histogram.counts().iter().enumerate() {
        let _ = writeln!(content, "{},{}", value, count);
    }
    std::fs::write(path, content).map_err(|e| SplitError::ExportError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Writes the three channel images, the chart file and optionally one CSV per channel.
/// Returns the written paths.
pub fn export_split(
    split: &ChannelSplit,
    input: &Path,
    dir: &Path,
    write_csv: bool,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    let mut charts = Vec::with_capacity(3);

    for (channel, output) in split.iter() {
        let image_path = output_path(dir, input, channel.name(), "png");
        save_channel_image(&output.image, &image_path)?;
        written.push(image_path);

        if write_csv {
            let csv_path = output_path(dir, input, channel.name(), "csv");
            write_histogram_csv(&output.histogram, &csv_path)?;
            written.push(csv_path);
        }

        charts.push(HistogramChart::from_histogram(&output.histogram));
    }

    let chart_path = output_path(dir, input, "histograms", "json");
    write_chart_json(&charts, &chart_path)?;
    written.push(chart_path);

    tracing::info!(files = written.len(), dir = ?dir, "exported channel split");
    Ok(written)
}
