//! Small string helpers for derived track columns.

/// The final path segment of a relative path.
pub(crate) fn filename(relative_path: &str) -> String {
    match relative_path.rsplit(['/', '\\']).next() {
        Some(name) => name.to_owned(),
        None => relative_path.to_owned(),
    }
}

/// The extension of a filename, without the dot. Empty when there is none.
pub(crate) fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_owned()))
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext)
}

/// Formats whole seconds as zero-padded "MM:SS" metadata.
pub(crate) fn format_mm_ss(total_seconds: i64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_takes_the_last_segment() {
        assert_eq!(filename("a/b/c.mp3"), "c.mp3");
        assert_eq!(filename("../01 - Track.mp3"), "01 - Track.mp3");
        assert_eq!(filename("plain.flac"), "plain.flac");
    }

    #[test]
    fn extension_is_optional() {
        assert_eq!(file_extension("c.mp3").as_deref(), Some("mp3"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".hidden"), None);
    }

    #[test]
    fn mm_ss_is_zero_padded() {
        assert_eq!(format_mm_ss(395), "06:35");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(3600), "60:00");
    }
}
