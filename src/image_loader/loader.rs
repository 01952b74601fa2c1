use super::extensions::is_supported_image;
use crate::errors::{Result, SplitError};
use image::{DynamicImage, GenericImageView};
use std::path::Path;

/// Files above this size are decoded from a memory map.
const MMAP_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;

/// Upper bounds applied before and after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLimits {
    pub max_file_size_mb: u64,
    pub max_megapixels: u64,
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            max_file_size_mb: 500,
            max_megapixels: 100,
        }
    }
}

pub fn load_image(path: &Path, limits: LoadLimits) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(SplitError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if !is_supported_image(path) {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string();
        return Err(SplitError::UnsupportedFormat { format });
    }

    let file_size = std::fs::metadata(path)?.len();
    if file_size > limits.max_file_size_mb.saturating_mul(1024 * 1024) {
        return Err(SplitError::ImageLoadError {
            path: path.to_path_buf(),
            message: format!(
                "File too large: {}MB (max {}MB)",
                file_size / (1024 * 1024),
                limits.max_file_size_mb
            ),
        });
    }

    log::info!("Loading image: {:?}", path);
    let img = if file_size > MMAP_THRESHOLD_BYTES {
        load_image_memory_mapped(path)?
    } else {
        image::open(path).map_err(|e| SplitError::ImageLoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    let (width, height) = img.dimensions();
    let megapixels = (width as u64 * height as u64) / 1_000_000;
    if megapixels > limits.max_megapixels {
        return Err(SplitError::ImageLoadError {
            path: path.to_path_buf(),
            message: format!(
                "Image too large: {}MP (max {}MP)",
                megapixels, limits.max_megapixels
            ),
        });
    }

    log::debug!("Decoded {:?}: {}x{}", path, width, height);
    Ok(img)
}

fn load_image_memory_mapped(path: &Path) -> Result<DynamicImage> {
    use memmap2::Mmap;
    use std::fs::File;

    let file = File::open(path).map_err(|e| SplitError::ImageLoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // The file is only read while the map is alive
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| SplitError::ImageLoadError {
        path: path.to_path_buf(),
        message: format!("Memory mapping failed: {}", e),
    })?;

    image::load_from_memory(&mmap).map_err(|e| SplitError::ImageLoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_missing_file() {
        let err = load_image(Path::new("/definitely/not/here.png"), LoadLimits::default()).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let err = load_image(&path, LoadLimits::default()).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])).save(&path).unwrap();

        let img = load_image(&path, LoadLimits::default()).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
    }

    #[test]
    fn test_corrupt_png_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        let err = load_image(&path, LoadLimits::default()).unwrap_err();
        assert_eq!(err.error_code(), "IMAGE_LOAD_ERROR");
    }

    #[test]
    fn test_huge_size_limit_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])).save(&path).unwrap();

        let limits = LoadLimits {
            max_file_size_mb: u64::MAX,
            max_megapixels: u64::MAX,
        };
        assert_eq!(load_image(&path, limits).unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn test_file_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        RgbImage::from_pixel(2, 2, Rgb([9, 9, 9])).save(&path).unwrap();

        let limits = LoadLimits {
            max_file_size_mb: 0,
            ..LoadLimits::default()
        };
        let err = load_image(&path, limits).unwrap_err();
        assert_eq!(err.error_code(), "IMAGE_LOAD_ERROR");
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn test_megapixel_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(1500, 1000, Rgb([0, 0, 0])).save(&path).unwrap();

        let limits = LoadLimits {
            max_megapixels: 1,
            ..LoadLimits::default()
        };
        assert!(load_image(&path, limits).is_ok());

        let limits = LoadLimits {
            max_megapixels: 0,
            ..LoadLimits::default()
        };
        assert_eq!(load_image(&path, limits).unwrap_err().error_code(), "IMAGE_LOAD_ERROR");
    }
}
