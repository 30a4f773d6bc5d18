// ============================================================
// FILE READER
// ============================================================
// Read import files as text, with a fallback encoding for legacy exports

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::path::Path;
use tracing::warn;

use crate::domain::error::{AppError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Reads a whole file into a `String`
pub struct FileReader {
    /// Used when the bytes are not valid UTF-8
    fallback: &'static Encoding,
}

impl Default for FileReader {
    fn default() -> Self {
        Self {
            fallback: WINDOWS_1252,
        }
    }
}

impl FileReader {
    /// Create a reader with the given fallback encoding label (e.g. "latin1", "shift_jis")
    pub fn with_fallback(label: &str) -> Result<Self> {
        let fallback = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            AppError::ConfigError(format!("Unknown fallback encoding: {}", label))
        })?;
        Ok(Self { fallback })
    }

    pub fn fallback_name(&self) -> &'static str {
        self.fallback.name()
    }

    /// Read a file. Any I/O failure is a `FileReadError`.
    pub fn read(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::FileReadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(self.decode(&bytes))
    }

    /// Decode bytes: strip a UTF-8 BOM, use UTF-8 when valid, otherwise the fallback
    pub fn decode(&self, bytes: &[u8]) -> String {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        if let Some(content) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
            return content.into_owned();
        }

        warn!(
            encoding = self.fallback.name(),
            "Input is not valid UTF-8, decoding with fallback encoding"
        );
        let (content, _had_errors) = self.fallback.decode_without_bom_handling(bytes);
        content.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_strips_utf8_bom() {
        let reader = FileReader::default();
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"FNSKU,Qty");
        assert_eq!(reader.decode(&bytes), "FNSKU,Qty");
    }

    #[test]
    fn test_falls_back_to_windows_1252() {
        let reader = FileReader::default();
        // "Caf\xe9" is "Café" in windows-1252 and invalid UTF-8
        assert_eq!(reader.decode(b"Caf\xe9"), "Café");
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!(matches!(
            FileReader::with_fallback("klingon"),
            Err(AppError::ConfigError(_))
        ));
        assert_eq!(
            FileReader::with_fallback("latin1").unwrap().fallback_name(),
            "windows-1252"
        );
    }

    #[test]
    fn test_read_missing_file_is_file_read_error() {
        let reader = FileReader::default();
        let err = reader
            .read(Path::new("/definitely/not/here/manifest.csv"))
            .unwrap_err();
        assert!(matches!(err, AppError::FileReadError(_)));
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"FNSKU\nX001\n").unwrap();

        let content = FileReader::default().read(file.path()).unwrap();
        assert_eq!(content, "FNSKU\nX001\n");
    }
}
