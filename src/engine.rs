// src/engine.rs
//
// The core of imgflip:
// 1. Header codec validates the 8-byte header
// 2. Decoder reads the full payload into a flat pixel grid
// 3. Pipeline mirrors the grid in place
// 4. Encoder writes it back in the original byte order
//
// This file is a facade over the decomposed modules in engine/

// =============================================================================
// MODULE DECOMPOSITION
// =============================================================================

mod api;
mod compare;
mod decoder;
mod encoder;
mod firewall;
mod header;
mod image;
mod io;
mod pipeline;

pub use api::{Dimensions, ImageEngine};
pub use compare::{compare_images, pixels_equal, ImageComparison};
pub use decoder::{
    decode_from_bytes, decode_from_bytes_with, decode_from_path, decode_from_reader,
    decode_header, decode_source,
};
pub use encoder::{encode_to_vec, encode_to_writer, write_to_path};
pub use firewall::{FirewallConfig, FirewallPolicy};
pub use header::{ByteOrder, FormatWord, Header, HEADER_LEN, MARKER_BIG, MARKER_LITTLE};
pub use image::RawImage;
pub use io::Source;
pub use pipeline::{apply_ops, optimize_ops};
