// tests/integration_tests.rs
//
// End-to-end tests through the public file-based API.
// Each test builds its own input and reference files in a temp directory,
// runs flip_image, then checks the output with identical_files.

use imgflip::engine::HEADER_LEN;
use imgflip::{
    flip_image, flip_image_with_metrics, identical_files, try_compare_files, try_flip_image,
    try_identical_files,
};
use imgflip::engine::ImageComparison;
use imgflip::error::{ErrorCategory, ImgFlipError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn encode(marker: u16, width: u16, height: u16, format: u16, pixels: &[u8]) -> Vec<u8> {
    let big = marker == 0x4d4d;
    let enc = |v: u16| if big { v.to_be_bytes() } else { v.to_le_bytes() };
    let mut out = marker.to_le_bytes().to_vec();
    out.extend_from_slice(&enc(width));
    out.extend_from_slice(&enc(height));
    out.extend_from_slice(&enc(format));
    out.extend_from_slice(pixels);
    out
}

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn gray_2x2(pixels: [u8; 4]) -> Vec<u8> {
    encode(0x4949, 2, 2, 0x000c, &pixels)
}

fn check_flip(input: &[u8], reference: &[u8], horizontal: bool, vertical: bool) {
    let dir = TempDir::new().unwrap();
    let src = write(&dir, "input.img", input);
    let reference = write(&dir, "ref.img", reference);
    let dst = dir.path().join("output.img");

    assert!(flip_image(&src, &dst, horizontal, vertical));
    assert!(identical_files(&dst, &reference));
}

#[test]
fn test_2x2_gray_horizontal() {
    check_flip(&gray_2x2([0, 1, 2, 3]), &gray_2x2([1, 0, 3, 2]), true, false);
}

#[test]
fn test_2x2_gray_vertical() {
    check_flip(&gray_2x2([0, 1, 2, 3]), &gray_2x2([2, 3, 0, 1]), false, true);
}

#[test]
fn test_2x2_gray_both() {
    check_flip(&gray_2x2([0, 1, 2, 3]), &gray_2x2([3, 2, 1, 0]), true, true);
}

#[test]
fn test_no_flip_round_trips_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let input = encode(0x4d4d, 3, 2, 0x0012, &(0u8..36).collect::<Vec<_>>());
    let src = write(&dir, "input.img", &input);
    let dst = dir.path().join("output.img");

    assert!(flip_image(&src, &dst, false, false));
    assert_eq!(std::fs::read(&dst).unwrap(), input);
}

#[test]
fn test_rgba_big_endian_horizontal() {
    // 3x1 RGBA8, big-endian; middle pixel stays in place.
    let pixels: Vec<u8> = (0u8..12).collect();
    let flipped: Vec<u8> = [8u8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3].to_vec();
    check_flip(
        &encode(0x4d4d, 3, 1, 0x000f, &pixels),
        &encode(0x4d4d, 3, 1, 0x000f, &flipped),
        true,
        false,
    );
}

#[test]
fn test_flip_fails_on_truncated_input() {
    let dir = TempDir::new().unwrap();
    let mut input = gray_2x2([0, 1, 2, 3]);
    input.pop();
    let src = write(&dir, "input.img", &input);
    let dst = dir.path().join("output.img");

    assert!(!flip_image(&src, &dst, true, false));
    assert!(!dst.exists());

    let err = try_flip_image(&src, &dst, true, false).unwrap_err();
    assert!(matches!(err, ImgFlipError::PayloadLengthMismatch { .. }));
    assert_eq!(err.category(), ErrorCategory::FormatError);
}

#[test]
fn test_flip_fails_on_missing_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("missing.img");
    let dst = dir.path().join("output.img");
    assert!(!flip_image(&src, &dst, true, true));
    assert!(matches!(
        try_flip_image(&src, &dst, true, true),
        Err(ImgFlipError::FileNotFound { .. })
    ));
}

#[test]
fn test_flip_fails_on_unwritable_destination() {
    let dir = TempDir::new().unwrap();
    let src = write(&dir, "input.img", &gray_2x2([0, 1, 2, 3]));
    let dst = dir.path().join("missing-dir").join("output.img");
    let err = try_flip_image(&src, &dst, false, true).unwrap_err();
    assert!(matches!(err, ImgFlipError::FileWriteFailed { .. }));
    assert_eq!(err.category(), ErrorCategory::IoError);
}

#[test]
fn test_identical_files_true_and_false() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.img", &gray_2x2([0, 1, 2, 3]));
    let b = write(&dir, "b.img", &gray_2x2([0, 1, 2, 3]));
    let c = write(&dir, "c.img", &gray_2x2([0, 1, 2, 4]));

    assert!(identical_files(&a, &b));
    assert!(!identical_files(&a, &c));
    assert!(!identical_files(&c, &a));
}

#[test]
fn test_identical_files_compares_distinct_files_not_self() {
    // Each file is trivially equal to itself; the check must still see
    // that the two files differ.
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.img", &gray_2x2([9, 9, 9, 9]));
    let b = write(&dir, "b.img", &gray_2x2([0, 0, 0, 0]));
    assert!(identical_files(&a, &a));
    assert!(identical_files(&b, &b));
    assert!(!identical_files(&a, &b));
}

#[test]
fn test_identical_files_reports_mismatch_kind() {
    let dir = TempDir::new().unwrap();
    let little = write(&dir, "l.img", &encode(0x4949, 1, 1, 0x000c, &[5]));
    let big = write(&dir, "b.img", &encode(0x4d4d, 1, 1, 0x000c, &[5]));
    let wide = write(&dir, "w.img", &encode(0x4949, 4, 1, 0x000c, &[0; 4]));
    let tall = write(&dir, "t.img", &encode(0x4949, 1, 4, 0x000c, &[0; 4]));

    assert_eq!(
        try_compare_files(&little, &big).unwrap(),
        ImageComparison::HeaderMismatch
    );
    assert_eq!(
        try_compare_files(&wide, &tall).unwrap(),
        ImageComparison::HeaderMismatch
    );
    assert!(!try_identical_files(&little, &big).unwrap());
}

#[test]
fn test_identical_files_false_when_either_unreadable() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.img", &gray_2x2([0, 1, 2, 3]));
    let bad = write(&dir, "bad.img", &[0x49, 0x49, 2, 0]);
    assert!(!identical_files(&good, &bad));
    assert!(!identical_files(&bad, &good));
    assert!(!identical_files(&good, Path::new("/definitely/not/here.img")));
}

#[test]
fn test_flip_with_metrics() {
    let dir = TempDir::new().unwrap();
    let src = write(&dir, "input.img", &gray_2x2([0, 1, 2, 3]));
    let dst = dir.path().join("output.img");

    let metrics = flip_image_with_metrics(&src, &dst, true, true).unwrap();
    assert_eq!(metrics.bytes_in, (HEADER_LEN + 4) as u64);
    assert_eq!(metrics.bytes_out, metrics.bytes_in);
    assert!(metrics.total_ms >= metrics.decode_ms);
    assert_eq!(std::fs::read(&dst).unwrap(), gray_2x2([3, 2, 1, 0]));
}

#[test]
fn test_destination_may_overwrite_source() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "inplace.img", &gray_2x2([0, 1, 2, 3]));
    assert!(flip_image(&path, &path, true, false));
    assert_eq!(std::fs::read(&path).unwrap(), gray_2x2([1, 0, 3, 2]));
}

#[cfg(unix)]
mod output_mode {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn mode(path: &Path) -> u32 {
        std::fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[test]
    fn test_new_output_gets_default_create_mode() {
        let dir = TempDir::new().unwrap();
        let src = write(&dir, "input.img", &gray_2x2([0, 1, 2, 3]));
        let plain = write(&dir, "plain.img", &gray_2x2([0, 1, 2, 3]));
        let dst = dir.path().join("output.img");

        assert!(flip_image(&src, &dst, true, false));
        // Same mode as a file created with std::fs::write under this umask.
        assert_eq!(mode(&dst), mode(&plain));
    }

    #[test]
    fn test_overwritten_output_keeps_its_mode() {
        let dir = TempDir::new().unwrap();
        let src = write(&dir, "input.img", &gray_2x2([0, 1, 2, 3]));
        let dst = write(&dir, "output.img", b"stale");
        std::fs::set_permissions(&dst, std::fs::Permissions::from_mode(0o640)).unwrap();

        assert!(flip_image(&src, &dst, false, true));
        assert_eq!(mode(&dst), 0o640);
        assert_eq!(std::fs::read(&dst).unwrap(), gray_2x2([2, 3, 0, 1]));
    }
}
