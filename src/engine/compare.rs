// src/engine/compare.rs
//
// Equality between two decoded images.

use crate::engine::image::RawImage;

/// Outcome of comparing two images, first difference wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageComparison {
    Identical,
    /// Marker, width, height or format word differ.
    HeaderMismatch,
    /// Dimensions or bytes per pixel differ, so payloads cannot be lined up.
    ShapeMismatch,
    /// First differing pixel in row-major order.
    PixelMismatch { row: u32, column: u32 },
}

impl ImageComparison {
    pub fn is_identical(self) -> bool {
        self == Self::Identical
    }
}

/// Compare pixel payloads only. Shapes are checked first; a shape
/// mismatch is reported as "not equal" instead of indexing out of range.
pub fn pixels_equal(a: &RawImage, b: &RawImage) -> bool {
    first_pixel_difference(a, b) == Some(None)
}

/// `None` when shapes differ, `Some(None)` when every pixel matches,
/// `Some(Some((row, col)))` at the first differing pixel.
fn first_pixel_difference(a: &RawImage, b: &RawImage) -> Option<Option<(u32, u32)>> {
    if a.dimensions() != b.dimensions() || a.bytes_per_pixel() != b.bytes_per_pixel() {
        return None;
    }
    let bpp = a.bytes_per_pixel() as usize;
    for (row, (ra, rb)) in a.rows().zip(b.rows()).enumerate() {
        if ra == rb {
            continue;
        }
        let column = ra
            .chunks_exact(bpp)
            .zip(rb.chunks_exact(bpp))
            .position(|(pa, pb)| pa != pb)
            .unwrap_or(0);
        return Some(Some((row as u32, column as u32)));
    }
    Some(None)
}

/// Full comparison: header field by field, then pixel payload.
pub fn compare_images(a: &RawImage, b: &RawImage) -> ImageComparison {
    if a.header() != b.header() {
        return ImageComparison::HeaderMismatch;
    }
    match first_pixel_difference(a, b) {
        None => ImageComparison::ShapeMismatch,
        Some(None) => ImageComparison::Identical,
        Some(Some((row, column))) => ImageComparison::PixelMismatch { row, column },
    }
}
