//! Upload format detection
//!
//! The declared file extension is the only format signal; content is never
//! sniffed.

use std::path::Path;

use super::error::InputError;

/// Image extensions recognized directly without rasterization
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "heic", "heif", "tif", "tiff", "bmp", "gif",
];

/// Input format of an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Paginated document that must be rasterized first
    Pdf,
    /// Single image, recognized as one page
    Image(String),
}

impl DocumentFormat {
    /// Detect the format from a declared file name
    pub fn from_file_name(file_name: &str) -> Result<Self, InputError> {
        let ext = extension_of(file_name)
            .ok_or_else(|| InputError::UnsupportedFormat(String::new()))?;
        Self::from_extension(&ext)
    }

    /// Detect the format from a lowercase extension
    pub fn from_extension(ext: &str) -> Result<Self, InputError> {
        match ext {
            "pdf" => Ok(Self::Pdf),
            ext if IMAGE_EXTENSIONS.contains(&ext) => Ok(Self::Image(ext.to_string())),
            other => Err(InputError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Whether pages must be rendered before recognition
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// Lowercase extension of a file name, without the dot
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_is_paginated() {
        let format = DocumentFormat::from_file_name("Report.PDF").unwrap();
        assert_eq!(format, DocumentFormat::Pdf);
        assert!(format.is_paginated());
    }

    #[test]
    fn test_images_are_single_page() {
        for name in ["a.png", "b.JPG", "c.jpeg", "d.webp", "e.heic"] {
            let format = DocumentFormat::from_file_name(name).unwrap();
            assert!(!format.is_paginated(), "{} should be an image", name);
        }
        assert_eq!(
            DocumentFormat::from_file_name("photo.JPEG").unwrap(),
            DocumentFormat::Image("jpeg".to_string())
        );
    }

    #[test]
    fn test_unsupported_and_missing_extension() {
        assert!(matches!(
            DocumentFormat::from_file_name("notes.docx"),
            Err(InputError::UnsupportedFormat(ext)) if ext == "docx"
        ));
        assert!(matches!(
            DocumentFormat::from_file_name("README"),
            Err(InputError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_file_name("archive.pdf.zip").is_err());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("scan.Tiff").as_deref(), Some("tiff"));
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
