//! Key generation for files the disk backend places itself.

use std::path::Path;

/// Reduce a filename to its base name; path components such as `../` are dropped.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(str::to_string)
}

/// Storage key for a stored filename: `documents/{filename}`.
pub fn generate_storage_key(stored_filename: &str) -> Option<String> {
    sanitize_filename(stored_filename).map(|name| format!("documents/{}", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename("quiz.docx").as_deref(), Some("quiz.docx"));
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename(".."), None);
    }

    #[test]
    fn test_generate_storage_key() {
        assert_eq!(
            generate_storage_key("1700-quiz.docx").as_deref(),
            Some("documents/1700-quiz.docx")
        );
        assert_eq!(generate_storage_key("."), None);
    }
}
