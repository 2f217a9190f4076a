//! Extension → MIME table for embedded media

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

const MIME_TABLE: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
    ("emf", "image/emf"),
    ("wmf", "image/wmf"),
    ("wdp", "image/vnd.ms-photo"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("mp4", "video/mp4"),
];

/// MIME type for a media filename, by extension (case-insensitive).
pub fn mime_type_for(filename: &str) -> &'static str {
    let extension = match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return FALLBACK_MIME_TYPE,
    };

    MIME_TABLE
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(mime_type_for("image1.png"), "image/png");
        assert_eq!(mime_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(mime_type_for("chart.jpeg"), "image/jpeg");
        assert_eq!(mime_type_for("vector.emf"), "image/emf");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(mime_type_for("blob.bin"), FALLBACK_MIME_TYPE);
        assert_eq!(mime_type_for("noextension"), FALLBACK_MIME_TYPE);
    }
}
