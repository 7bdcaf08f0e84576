// src/engine/api.rs
//
// ImageEngine: the builder-style public API.
//
// Usage:
// ```ignore
// let written = ImageEngine::from_path("in.img")
//     .flip_h()
//     .flip_v()
//     .to_file("out.img")?;
// ```

use crate::engine::decoder::{decode_header, decode_source};
use crate::engine::encoder::{encode_to_vec, write_to_path};
use crate::engine::firewall::{FirewallConfig, FirewallPolicy};
use crate::engine::header::{Header, HEADER_LEN};
use crate::engine::image::RawImage;
use crate::engine::io::Source;
use crate::engine::pipeline::apply_ops;
use crate::error::ImgFlipError;
use crate::ops::{FlipFlags, Operation};
use crate::ProcessingMetrics;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

type ApiResult<T> = std::result::Result<T, ImgFlipError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Lazy image pipeline: nothing is read until a terminal method runs.
#[derive(Clone, Debug)]
pub struct ImageEngine {
    source: Source,
    ops: Vec<Operation>,
    firewall: FirewallConfig,
}

impl ImageEngine {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::from_source(Source::Path(path.into()))
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::from_source(Source::from(data))
    }

    /// Memory-map the file now; decoding still happens lazily.
    pub fn open_mapped(path: impl AsRef<Path>) -> ApiResult<Self> {
        Ok(Self::from_source(Source::map(path)?))
    }

    pub fn from_source(source: Source) -> Self {
        Self {
            source,
            ops: Vec::new(),
            firewall: FirewallConfig::default(),
        }
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    pub fn flip_h(mut self) -> Self {
        self.ops.push(Operation::FlipH);
        self
    }

    pub fn flip_v(mut self) -> Self {
        self.ops.push(Operation::FlipV);
        self
    }

    pub fn flips(mut self, flags: FlipFlags) -> Self {
        self.ops.extend(flags.to_ops());
        self
    }

    pub fn ops(&self) -> &[Operation] {
        &self.ops
    }

    // =========================================================================
    // LIMITS
    // =========================================================================

    pub fn sanitize(mut self, policy: FirewallPolicy) -> Self {
        self.firewall = FirewallConfig::apply_policy(policy);
        self
    }

    pub fn limits(mut self, max_bytes: Option<u64>, max_pixels: Option<u64>) -> Self {
        self.firewall = FirewallConfig::custom(max_bytes, max_pixels);
        self
    }

    // =========================================================================
    // TERMINALS
    // =========================================================================

    /// Read only the header.
    pub fn header(&self) -> ApiResult<Header> {
        match &self.source {
            Source::Path(path) => {
                let path_str = path.to_string_lossy().to_string();
                let file = std::fs::File::open(path)
                    .map_err(|e| ImgFlipError::from_open_error(path_str.clone(), e))?;
                let mut buf = Vec::with_capacity(HEADER_LEN);
                file.take(HEADER_LEN as u64)
                    .read_to_end(&mut buf)
                    .map_err(|e| ImgFlipError::file_read_failed(path_str, e))?;
                decode_header(&buf)
            }
            Source::Memory(data) => decode_header(data),
            Source::Mapped(mmap) => decode_header(mmap),
        }
    }

    /// Get dimensions without decoding pixels.
    pub fn dimensions(&self) -> ApiResult<Dimensions> {
        let header = self.header()?;
        Ok(Dimensions {
            width: u32::from(header.width),
            height: u32::from(header.height),
        })
    }

    /// Decode and apply queued operations.
    pub fn decode(&self) -> ApiResult<RawImage> {
        let mut img = decode_source(&self.source, &self.firewall)?;
        apply_ops(&mut img, &self.ops);
        Ok(img)
    }

    pub fn to_bytes(&self) -> ApiResult<Vec<u8>> {
        Ok(encode_to_vec(&self.decode()?))
    }

    /// Decode, transform and atomically write to `path`. Returns bytes written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> ApiResult<u64> {
        write_to_path(&self.decode()?, path)
    }

    /// Same as [`to_file`](Self::to_file) with per-stage timings.
    pub fn to_file_with_metrics(&self, path: impl AsRef<Path>) -> ApiResult<ProcessingMetrics> {
        let start_total = Instant::now();
        let bytes_in = self.source.byte_len()?;

        let start = Instant::now();
        let mut img = decode_source(&self.source, &self.firewall)?;
        let decode_ms = elapsed_ms(start);

        let start = Instant::now();
        apply_ops(&mut img, &self.ops);
        let ops_ms = elapsed_ms(start);

        let start = Instant::now();
        let bytes_out = write_to_path(&img, path)?;
        let encode_ms = elapsed_ms(start);

        Ok(ProcessingMetrics {
            decode_ms,
            ops_ms,
            encode_ms,
            total_ms: elapsed_ms(start_total),
            bytes_in,
            bytes_out,
            ..ProcessingMetrics::default()
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
