// src/engine/encoder.rs
//
// Encoder: header back in its original byte order, then the raw payload.

use crate::engine::header::HEADER_LEN;
use crate::engine::image::RawImage;
use crate::error::ImgFlipError;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;
use tracing::debug;

type EncoderResult<T> = std::result::Result<T, ImgFlipError>;

/// Serialize to an in-memory file image.
///
/// The in-memory header is never mutated; the on-wire order is computed
/// into a local buffer.
pub fn encode_to_vec(img: &RawImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + img.as_bytes().len());
    out.extend_from_slice(&img.header().to_bytes());
    out.extend_from_slice(img.as_bytes());
    out
}

/// Stream header and rows into any writer.
pub fn encode_to_writer<W: Write>(img: &RawImage, mut writer: W) -> std::io::Result<u64> {
    writer.write_all(&img.header().to_bytes())?;
    for row in img.rows() {
        writer.write_all(row)?;
    }
    writer.flush()?;
    Ok((HEADER_LEN + img.as_bytes().len()) as u64)
}

/// Write the image to `path` atomically.
///
/// Data goes to a temp file in the destination directory first and is
/// renamed over `path` only after a successful flush, so a failed write
/// never leaves a partial destination behind.
pub fn write_to_path(img: &RawImage, path: impl AsRef<Path>) -> EncoderResult<u64> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().to_string();

    let output_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    // Same directory as the target so the rename never crosses filesystems.
    // Created with the same mode a plain File::create would get (umask applies).
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut temp_file = builder
        .tempfile_in(output_dir)
        .map_err(|e| ImgFlipError::file_write_failed(path_str.clone(), e))?;

    // An existing destination keeps its permissions across the replace.
    if let Ok(existing) = std::fs::metadata(path) {
        temp_file
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| ImgFlipError::file_write_failed(path_str.clone(), e))?;
    }

    let written = encode_to_writer(img, std::io::BufWriter::new(temp_file.as_file_mut()))
        .map_err(|e| ImgFlipError::file_write_failed(path_str.clone(), e))?;

    temp_file
        .as_file_mut()
        .sync_all()
        .map_err(|e| ImgFlipError::file_write_failed(path_str.clone(), e))?;

    temp_file
        .persist(path)
        .map_err(|e| ImgFlipError::file_write_failed(path_str.clone(), e.error))?;

    debug!(
        target: "imgflip::encode",
        path = %path.display(),
        bytes = written,
        byte_order = img.header().byte_order.as_str(),
        "wrote image"
    );
    Ok(written)
}
