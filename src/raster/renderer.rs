//! MuPDF page rasterizer
//!
//! Renders each PDF page to an RGB pixmap and writes it as PNG.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use mupdf::{Colorspace, Document, Matrix};

use super::pages::{collect_pages, page_file_name, PAGE_PREFIX};
use super::{PageRasterizer, RasterPage, RasterizationError};

/// Default render scale (2x = 144 DPI, good enough for OCR)
pub const DEFAULT_RENDER_SCALE: f32 = 2.0;

/// PDF rasterizer backed by MuPDF
#[derive(Debug, Clone)]
pub struct MupdfRasterizer {
    scale: f32,
}

impl MupdfRasterizer {
    pub fn new(scale: f32) -> Self {
        Self {
            scale: scale.clamp(0.5, 4.0),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for MupdfRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RENDER_SCALE)
    }
}

impl PageRasterizer for MupdfRasterizer {
    fn rasterize(&self, source: &Path, out_dir: &Path) -> Result<Vec<RasterPage>, RasterizationError> {
        let path_str = source.to_string_lossy();
        let doc = Document::open(&*path_str)?;
        let page_count = doc.page_count()?.max(0) as usize;

        tracing::debug!(
            source = %source.display(),
            pages = page_count,
            scale = self.scale,
            "Rasterizing document"
        );

        if page_count == 0 {
            return Err(RasterizationError::NoPages);
        }

        let matrix = Matrix::new_scale(self.scale, self.scale);
        let colorspace = Colorspace::device_rgb();

        for page_index in 0..page_count {
            let page_number = page_index + 1;
            let render_err = |e: mupdf::Error| RasterizationError::Render {
                page: page_number,
                message: e.to_string(),
            };

            let page = doc.load_page(page_index as i32).map_err(render_err)?;
            let pixmap = page
                .to_pixmap(&matrix, &colorspace, false, true)
                .map_err(render_err)?;

            let image = pixmap_to_image(&pixmap).ok_or_else(|| RasterizationError::Render {
                page: page_number,
                message: "pixmap buffer does not match its dimensions".to_string(),
            })?;

            let out_path = out_dir.join(page_file_name(PAGE_PREFIX, page_number));
            image
                .save_with_format(&out_path, image::ImageFormat::Png)
                .map_err(|e| RasterizationError::Render {
                    page: page_number,
                    message: e.to_string(),
                })?;
        }

        let pages = collect_pages(out_dir, PAGE_PREFIX)?;
        if pages.is_empty() {
            return Err(RasterizationError::NoPages);
        }
        if pages.len() != page_count {
            return Err(RasterizationError::PageSequence(format!(
                "rendered {} pages but found {} page images",
                page_count,
                pages.len()
            )));
        }

        Ok(pages)
    }
}

/// Convert a MuPDF pixmap into an RGB image
///
/// Handles both RGB and RGBA sample layouts; alpha is dropped.
fn pixmap_to_image(pixmap: &mupdf::Pixmap) -> Option<DynamicImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    if n < 3 {
        return None;
    }

    let mut rgb_buffer = Vec::with_capacity(rgb_buffer_len(width, height));
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    RgbImage::from_raw(width, height, rgb_buffer).map(DynamicImage::ImageRgb8)
}

/// Bytes needed for a packed RGB buffer, computed without `u32` overflow
fn rgb_buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scale_is_clamped() {
        assert_eq!(MupdfRasterizer::new(10.0).scale(), 4.0);
        assert_eq!(MupdfRasterizer::new(0.1).scale(), 0.5);
        assert_eq!(MupdfRasterizer::default().scale(), DEFAULT_RENDER_SCALE);
    }

    /// Build a small PDF with one line of Helvetica text per page
    fn multipage_pdf(page_count: usize) -> Vec<u8> {
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                (0..page_count)
                    .map(|i| format!("{} 0 R", 3 + i * 2))
                    .collect::<Vec<_>>()
                    .join(" "),
                page_count
            ),
        ];

        for i in 0..page_count {
            let content = format!("BT /F1 18 Tf 20 100 Td (Page {}) Tj ET", i + 1);
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 200] /Contents {} 0 R \
                 /Resources << /Font << /F1 << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> >> >> >>",
                4 + i * 2
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }

        let xref_offset = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));

        pdf.into_bytes()
    }

    #[test]
    fn test_renders_one_png_per_page() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("two-pages.pdf");
        std::fs::write(&source, multipage_pdf(2)).unwrap();
        let out_dir = dir.path().join("pages");
        std::fs::create_dir(&out_dir).unwrap();

        let pages = MupdfRasterizer::new(1.0).rasterize(&source, &out_dir).unwrap();

        let indices: Vec<usize> = pages.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(pages[0].path, out_dir.join("page-1.png"));
        assert_eq!(pages[1].path, out_dir.join("page-2.png"));

        for page in &pages {
            let image = image::open(&page.path).unwrap();
            assert_eq!((image.width(), image.height()), (200, 200));
        }
        assert!(source.exists(), "source must not be deleted");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_rgb_buffer_len_does_not_overflow() {
        // 70000 * 70000 * 3 does not fit in u32
        assert_eq!(rgb_buffer_len(70_000, 70_000), 14_700_000_000);
        assert_eq!(rgb_buffer_len(200, 100), 60_000);
    }

    #[test]
    fn test_garbage_is_not_a_pdf() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("broken.pdf");
        std::fs::write(&source, b"this is definitely not a pdf").unwrap();
        let out_dir = dir.path().join("pages");
        std::fs::create_dir(&out_dir).unwrap();

        let result = MupdfRasterizer::default().rasterize(&source, &out_dir);
        assert!(result.is_err());
        assert!(source.exists(), "source must not be deleted");
    }
}
