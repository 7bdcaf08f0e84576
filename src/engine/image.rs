// src/engine/image.rs
//
// RawImage: a fully decoded pixel grid backed by one flat buffer.
//
// Pixels are stored row-major with no padding, exactly as they appear in
// the file payload. Pixel (row, col) lives at
// `(row * width + col) * bytes_per_pixel`.

use crate::engine::header::Header;
use crate::error::ImgFlipError;

/// Decoded image. Either fully populated or never constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    header: Header,
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Build an image from a validated header and its full payload.
    pub fn from_parts(header: Header, pixels: Vec<u8>) -> crate::error::Result<Self> {
        let bytes_per_pixel = header.bytes_per_pixel()?;
        let expected = header.payload_len()?;
        if pixels.len() as u64 != expected {
            return Err(ImgFlipError::payload_length_mismatch(
                expected,
                pixels.len() as u64,
            ));
        }
        Ok(Self {
            header,
            width: u32::from(header.width),
            height: u32::from(header.height),
            bytes_per_pixel,
            pixels,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.bytes_per_pixel
    }

    /// Raw payload in row-major order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn row_len(&self) -> usize {
        self.width as usize * self.bytes_per_pixel as usize
    }

    pub fn row(&self, row: u32) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let len = self.row_len();
        let start = row as usize * len;
        Some(&self.pixels[start..start + len])
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.pixels.chunks_exact(self.row_len())
    }

    pub fn pixel(&self, row: u32, col: u32) -> Option<&[u8]> {
        if col >= self.width {
            return None;
        }
        let bpp = self.bytes_per_pixel as usize;
        let start = col as usize * bpp;
        self.row(row).map(|r| &r[start..start + bpp])
    }

    /// Mirror each row in place: column `i` swaps with `width - 1 - i`.
    /// An odd middle column stays put.
    pub fn flip_horizontal(&mut self) {
        let bpp = self.bytes_per_pixel as usize;
        let width = self.width as usize;
        let row_len = self.row_len();
        for row in self.pixels.chunks_exact_mut(row_len) {
            for i in 0..width / 2 {
                let j = width - 1 - i;
                let (head, tail) = row.split_at_mut(j * bpp);
                head[i * bpp..(i + 1) * bpp].swap_with_slice(&mut tail[..bpp]);
            }
        }
    }

    /// Mirror the row order in place: row `i` swaps with `height - 1 - i`.
    /// An odd middle row stays put.
    pub fn flip_vertical(&mut self) {
        let height = self.height as usize;
        let row_len = self.row_len();
        for i in 0..height / 2 {
            let j = height - 1 - i;
            let (top, bottom) = self.pixels.split_at_mut(j * row_len);
            top[i * row_len..(i + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
        }
    }
}
