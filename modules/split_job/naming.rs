//! File names for uploads, chunk files and the download archive

use std::path::Path;

/// Stem used when nothing of the original name survives sanitizing
const FALLBACK_STEM: &str = "upload";

/// Reduce an arbitrary client file name to a safe ASCII name.
///
/// Path separators become whitespace, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9._-]` is dropped and leading/trailing `.`/`_` are
/// trimmed. Returns an empty string when nothing is left.
pub fn secure_filename(name: &str) -> String {
    let spaced = name.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Sanitize an upload name while keeping its extension intact
pub fn upload_file_name(original: &str) -> String {
    match original.rsplit_once('.') {
        Some((stem, ext)) => {
            let stem = secure_filename(stem);
            let stem = if stem.is_empty() { FALLBACK_STEM } else { stem.as_str() };
            format!("{}.{}", stem, secure_filename(ext))
        }
        None => {
            let name = secure_filename(original);
            if name.is_empty() {
                FALLBACK_STEM.to_string()
            } else {
                name
            }
        }
    }
}

fn split_name(file_name: &str) -> (&str, Option<&str>) {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let ext = path.extension().and_then(|e| e.to_str());
    (stem, ext)
}

/// `{stem}_chunk_{index}.{ext}` with a 1-based index
pub fn chunk_file_name(file_name: &str, index: usize) -> String {
    match split_name(file_name) {
        (stem, Some(ext)) => format!("{}_chunk_{}.{}", stem, index, ext),
        (stem, None) => format!("{}_chunk_{}", stem, index),
    }
}

/// `{stem}_chunks.zip`
pub fn archive_download_name(file_name: &str) -> String {
    let (stem, _) = split_name(file_name);
    format!("{}_chunks.zip", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My Report.xlsx"), "My_Report.xlsx");
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\data.xls"), "C_Users_me_data.xls");
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("résumé.xlsx"), "rsum.xlsx");
    }

    #[test]
    fn test_upload_file_name_keeps_extension() {
        assert_eq!(upload_file_name("Quarterly Sales.xlsx"), "Quarterly_Sales.xlsx");
        assert_eq!(upload_file_name("報告.xlsx"), "upload.xlsx");
        assert_eq!(upload_file_name("../secret.xls"), "secret.xls");
        assert_eq!(upload_file_name("a.b.XLSX"), "a.b.XLSX");
    }

    #[test]
    fn test_chunk_file_name() {
        assert_eq!(chunk_file_name("sales.xlsx", 1), "sales_chunk_1.xlsx");
        assert_eq!(chunk_file_name("v1.2.xls", 12), "v1.2_chunk_12.xls");
        assert_eq!(chunk_file_name("noext", 3), "noext_chunk_3");
    }

    #[test]
    fn test_archive_download_name() {
        assert_eq!(archive_download_name("sales.xlsx"), "sales_chunks.zip");
        assert_eq!(archive_download_name("v1.2.xls"), "v1.2_chunks.zip");
    }
}
