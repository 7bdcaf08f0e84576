// lib.rs
//
// imgflip: decode, mirror and re-encode images in the 8-byte-header
// raw format, and check two files for byte-level identity.
//
// The boolean entry points (`flip_image`, `identical_files`) swallow the
// error into `false` after logging it; the `try_*` variants return it.

pub mod engine;
pub mod error;
pub mod ops;

use engine::{
    compare_images, decode_from_path, decode_header, ByteOrder, FirewallConfig, ImageComparison,
    ImageEngine,
};
use error::ImgFlipError;
use ops::FlipFlags;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::warn;

/// Header summary returned by inspection, without decoding pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectMetadata {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub bits_per_channel: u8,
    pub byte_order: ByteOrder,
}

fn read_inspect_metadata(bytes: &[u8]) -> std::result::Result<InspectMetadata, ImgFlipError> {
    let header = decode_header(bytes)?;
    Ok(InspectMetadata {
        width: u32::from(header.width),
        height: u32::from(header.height),
        channels: header.channels(),
        bits_per_channel: header.bits_per_channel(),
        byte_order: header.byte_order,
    })
}

/// Inspect header bytes. Payload length is not validated.
pub fn inspect_header_from_bytes(
    data: &[u8],
) -> std::result::Result<InspectMetadata, ImgFlipError> {
    read_inspect_metadata(data)
}

pub fn inspect_header_from_path(
    path: impl AsRef<Path>,
) -> std::result::Result<InspectMetadata, ImgFlipError> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().to_string();
    let file = File::open(path).map_err(|e| ImgFlipError::from_open_error(path_str.clone(), e))?;
    let mut header = Vec::with_capacity(engine::HEADER_LEN);
    BufReader::new(file)
        .take(engine::HEADER_LEN as u64)
        .read_to_end(&mut header)
        .map_err(|e| ImgFlipError::file_read_failed(path_str, e))?;
    read_inspect_metadata(&header)
}

/// Metrics payload version.
pub const PROCESSING_METRICS_VERSION: &str = "1.0.0";

/// Processing metrics for performance monitoring
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingMetrics {
    /// Schema version for compatibility negotiation
    pub version: String,
    /// Decode stage duration in milliseconds
    pub decode_ms: f64,
    /// Ops (flip) stage duration in milliseconds
    pub ops_ms: f64,
    /// Encode stage duration in milliseconds
    pub encode_ms: f64,
    /// Total wall-clock duration in milliseconds
    pub total_ms: f64,
    /// Input file size in bytes
    pub bytes_in: u64,
    /// Output file size in bytes
    pub bytes_out: u64,
}

impl Default for ProcessingMetrics {
    fn default() -> Self {
        Self {
            version: PROCESSING_METRICS_VERSION.to_string(),
            decode_ms: 0.0,
            ops_ms: 0.0,
            encode_ms: 0.0,
            total_ms: 0.0,
            bytes_in: 0,
            bytes_out: 0,
        }
    }
}

/// Read `src`, mirror it, write `dst`. Horizontal is applied before vertical.
pub fn try_flip_image(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> error::Result<()> {
    ImageEngine::from_path(src.as_ref())
        .flips(FlipFlags::from_bools(flip_horizontal, flip_vertical))
        .to_file(dst)?;
    Ok(())
}

/// Same as [`try_flip_image`], also reporting stage timings.
pub fn flip_image_with_metrics(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> error::Result<ProcessingMetrics> {
    ImageEngine::from_path(src.as_ref())
        .flips(FlipFlags::from_bools(flip_horizontal, flip_vertical))
        .to_file_with_metrics(dst)
}

/// Boolean form of [`try_flip_image`]: `true` only on full success.
pub fn flip_image(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> bool {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    match try_flip_image(src, dst, flip_horizontal, flip_vertical) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                src = %src.display(),
                dst = %dst.display(),
                category = err.category().as_str(),
                error = %err,
                "flip_image failed"
            );
            false
        }
    }
}

/// Decode both files and compare header fields and pixel payloads.
pub fn try_compare_files(
    path_a: impl AsRef<Path>,
    path_b: impl AsRef<Path>,
) -> error::Result<ImageComparison> {
    let firewall = FirewallConfig::default();
    let a = decode_from_path(path_a, &firewall)?;
    let b = decode_from_path(path_b, &firewall)?;
    Ok(compare_images(&a, &b))
}

pub fn try_identical_files(
    path_a: impl AsRef<Path>,
    path_b: impl AsRef<Path>,
) -> error::Result<bool> {
    Ok(try_compare_files(path_a, path_b)?.is_identical())
}

/// `true` only if both files decode and match in header and payload.
pub fn identical_files(path_a: impl AsRef<Path>, path_b: impl AsRef<Path>) -> bool {
    let (a, b) = (path_a.as_ref(), path_b.as_ref());
    match try_identical_files(a, b) {
        Ok(identical) => identical,
        Err(err) => {
            warn!(
                a = %a.display(),
                b = %b.display(),
                category = err.category().as_str(),
                error = %err,
                "identical_files failed"
            );
            false
        }
    }
}
