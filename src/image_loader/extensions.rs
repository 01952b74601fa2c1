use std::path::Path;

/// Formats the bundled decoders handle.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_filter() {
        assert!(is_supported_image(Path::new("photo.PNG")));
        assert!(is_supported_image(Path::new("/tmp/a.jpeg")));
        assert!(is_supported_image(Path::new("scan.bmp")));
        assert!(!is_supported_image(Path::new("raw.cr2")));
        assert!(!is_supported_image(Path::new("noextension")));
    }
}
