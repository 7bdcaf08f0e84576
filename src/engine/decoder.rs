// src/engine/decoder.rs
//
// Decoder: header validation, length check, full payload read.
//
// Nothing is allocated for pixels until the header is valid and the
// declared payload size matches the bytes actually available.

use crate::engine::firewall::FirewallConfig;
use crate::engine::header::{Header, HEADER_LEN};
use crate::engine::image::RawImage;
use crate::engine::io::Source;
use crate::error::ImgFlipError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

type DecoderResult<T> = std::result::Result<T, ImgFlipError>;

/// Validate a parsed header against the total input length and limits.
/// Returns the payload length in bytes.
fn validate_layout(header: &Header, total_len: u64, firewall: &FirewallConfig) -> DecoderResult<u64> {
    firewall.enforce_source_len(total_len)?;
    firewall.enforce_pixels(u32::from(header.width), u32::from(header.height))?;

    let expected = header.payload_len()?;
    let actual = total_len.saturating_sub(HEADER_LEN as u64);
    if expected != actual {
        return Err(ImgFlipError::payload_length_mismatch(expected, actual));
    }
    Ok(expected)
}

fn allocate_payload(len: u64) -> DecoderResult<Vec<u8>> {
    let len = usize::try_from(len).map_err(|_| {
        ImgFlipError::firewall_violation(format!("payload of {len} bytes does not fit in memory"))
    })?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        ImgFlipError::firewall_violation(format!("cannot allocate {len} byte payload: {e}"))
    })?;
    Ok(buf)
}

fn log_decoded(img: &RawImage) {
    debug!(
        target: "imgflip::decode",
        width = img.width(),
        height = img.height(),
        bytes_per_pixel = img.bytes_per_pixel(),
        byte_order = img.header().byte_order.as_str(),
        "decoded image"
    );
}

/// Parse and validate only the header. Payload length is not checked.
pub fn decode_header(data: &[u8]) -> DecoderResult<Header> {
    Header::parse(data)
}

/// Decode a complete in-memory file.
pub fn decode_from_bytes(data: &[u8]) -> DecoderResult<RawImage> {
    decode_from_bytes_with(data, &FirewallConfig::default())
}

pub fn decode_from_bytes_with(data: &[u8], firewall: &FirewallConfig) -> DecoderResult<RawImage> {
    let header = Header::parse(data)?;
    let payload_len = validate_layout(&header, data.len() as u64, firewall)?;

    let mut pixels = allocate_payload(payload_len)?;
    pixels.extend_from_slice(&data[HEADER_LEN..]);

    let img = RawImage::from_parts(header, pixels)?;
    log_decoded(&img);
    Ok(img)
}

/// Decode from a stream whose total length (header included) is known up front.
///
/// A short read at any point drops the partially filled buffer and fails.
pub fn decode_from_reader<R: Read>(
    mut reader: R,
    total_len: u64,
    firewall: &FirewallConfig,
) -> DecoderResult<RawImage> {
    let io_err = |e: std::io::Error| ImgFlipError::file_read_failed("<stream>", e);

    let mut header_bytes = Vec::with_capacity(HEADER_LEN);
    (&mut reader)
        .take(HEADER_LEN as u64)
        .read_to_end(&mut header_bytes)
        .map_err(io_err)?;
    let header = Header::parse(&header_bytes)?;
    let payload_len = validate_layout(&header, total_len, firewall)?;

    let mut pixels = allocate_payload(payload_len)?;
    let read = reader
        .take(payload_len)
        .read_to_end(&mut pixels)
        .map_err(io_err)? as u64;
    if read != payload_len {
        return Err(ImgFlipError::truncated_payload(payload_len, read));
    }

    let img = RawImage::from_parts(header, pixels)?;
    log_decoded(&img);
    Ok(img)
}

/// Decode a file by streaming it. The file handle is closed on every path.
pub fn decode_from_path(
    path: impl AsRef<Path>,
    firewall: &FirewallConfig,
) -> DecoderResult<RawImage> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().to_string();
    let file = File::open(path).map_err(|e| ImgFlipError::from_open_error(path_str.clone(), e))?;
    let total_len = file
        .metadata()
        .map_err(|e| ImgFlipError::file_read_failed(path_str.clone(), e))?
        .len();

    decode_from_reader(BufReader::new(file), total_len, firewall).map_err(|err| match err {
        ImgFlipError::FileReadFailed { source, .. } => {
            ImgFlipError::file_read_failed(path_str, source)
        }
        other => other,
    })
}

/// Decode whatever the source holds.
pub fn decode_source(source: &Source, firewall: &FirewallConfig) -> DecoderResult<RawImage> {
    match source {
        Source::Path(path) => decode_from_path(path, firewall),
        Source::Memory(data) => decode_from_bytes_with(data, firewall),
        Source::Mapped(mmap) => decode_from_bytes_with(mmap, firewall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::header::ByteOrder;
    use std::io::{Cursor, Write};

    fn gray8_file(pixels: &[u8], width: u16, height: u16) -> Vec<u8> {
        let mut out = vec![0x49, 0x49];
        out.extend_from_slice(&width.to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&0x000cu16.to_le_bytes());
        out.extend_from_slice(pixels);
        out
    }

    #[test]
    fn test_decode_from_bytes() {
        let data = gray8_file(&[0, 1, 2, 3], 2, 2);
        let img = decode_from_bytes(&data).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.bytes_per_pixel(), 1);
        assert_eq!(img.header().byte_order, ByteOrder::Little);
        assert_eq!(img.as_bytes(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_length_mismatch_both_directions() {
        let short = gray8_file(&[0, 1, 2], 2, 2);
        assert!(matches!(
            decode_from_bytes(&short),
            Err(ImgFlipError::PayloadLengthMismatch {
                expected: 4,
                actual: 3
            })
        ));
        let long = gray8_file(&[0, 1, 2, 3, 4], 2, 2);
        assert!(matches!(
            decode_from_bytes(&long),
            Err(ImgFlipError::PayloadLengthMismatch {
                expected: 4,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_reader_short_read_after_length_check() {
        // Declared total length passes the check, but the stream ends early.
        let data = gray8_file(&[0, 1], 2, 2);
        let err = decode_from_reader(
            Cursor::new(data),
            (HEADER_LEN + 4) as u64,
            &FirewallConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ImgFlipError::TruncatedPayload {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_reader_truncated_header() {
        let err = decode_from_reader(
            Cursor::new(vec![0x49, 0x49, 2]),
            3,
            &FirewallConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ImgFlipError::TruncatedHeader { actual: 3 }));
    }

    #[test]
    fn test_one_bit_depth_fails_cleanly() {
        let mut data = vec![0x49, 0x49, 8, 0, 1, 0, 0, 0];
        data.push(0xff);
        assert!(matches!(
            decode_from_bytes(&data),
            Err(ImgFlipError::UnsupportedBitDepth { bits: 1 })
        ));
    }

    #[test]
    fn test_firewall_rejects_before_allocation() {
        let data = gray8_file(&[0; 16], 4, 4);
        let cfg = FirewallConfig::custom(None, Some(15));
        assert!(matches!(
            decode_from_bytes_with(&data, &cfg),
            Err(ImgFlipError::FirewallViolation { .. })
        ));
    }

    #[test]
    fn test_decode_from_path_and_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&gray8_file(&[5, 6, 7], 3, 1)).unwrap();

        let from_path = decode_from_path(file.path(), &FirewallConfig::default()).unwrap();
        let mapped = Source::map(file.path()).unwrap();
        let from_map = decode_source(&mapped, &FirewallConfig::default()).unwrap();
        assert_eq!(from_path, from_map);
        assert_eq!(from_path.as_bytes(), &[5, 6, 7]);
    }

    #[test]
    fn test_decode_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_from_path(dir.path().join("missing.img"), &FirewallConfig::default())
            .unwrap_err();
        assert!(matches!(err, ImgFlipError::FileNotFound { .. }));
    }
}
