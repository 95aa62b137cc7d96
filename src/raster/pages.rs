//! Page image naming and collection

use std::path::Path;

use super::{RasterPage, RasterizationError};

/// File name prefix for rendered pages
pub const PAGE_PREFIX: &str = "page";

const PAGE_EXTENSION: &str = "png";

/// Build the file name for a rendered page (`<prefix>-<index>.png`)
pub fn page_file_name(prefix: &str, index: usize) -> String {
    format!("{}-{}.{}", prefix, index, PAGE_EXTENSION)
}

/// Parse the page index out of a page file name
///
/// Returns `None` for files that are not page images of this prefix.
/// Returns `Some(Err(_))` for page images whose index is not a number.
fn parse_page_index(prefix: &str, file_name: &str) -> Option<Result<usize, RasterizationError>> {
    let stem = file_name.strip_prefix(prefix)?.strip_prefix('-')?;
    let (number, ext) = stem.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case(PAGE_EXTENSION) {
        return None;
    }

    Some(number.parse::<usize>().map_err(|_| {
        RasterizationError::PageSequence(format!("unnumbered page image: {}", file_name))
    }))
}

/// Collect the page images in `dir`, ascending by page index
///
/// Indices must form the contiguous range `1..=N`; a gap or two files with
/// the same index is an error. An empty directory yields an empty list.
pub fn collect_pages(dir: &Path, prefix: &str) -> Result<Vec<RasterPage>, RasterizationError> {
    let mut pages = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        if let Some(index) = parse_page_index(prefix, file_name) {
            pages.push(RasterPage {
                index: index?,
                path: entry.path(),
            });
        }
    }

    pages.sort_by_key(|page| page.index);

    for (position, page) in pages.iter().enumerate() {
        let expected = position + 1;
        if page.index != expected {
            let problem = if page.index < expected { "duplicate" } else { "missing" };
            return Err(RasterizationError::PageSequence(format!(
                "{} page {} (found index {})",
                problem, expected, page.index
            )));
        }
    }

    Ok(pages)
}
