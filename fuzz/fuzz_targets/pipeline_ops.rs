#![no_main]

use arbitrary::Arbitrary;
use imgflip::engine::{apply_ops, decode_from_bytes, pixels_equal};
use imgflip::ops::Operation;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    width: u8,
    height: u8,
    layout: u8,
    ops: Vec<bool>,
    fill: Vec<u8>,
}

fn build_file(input: &Input) -> Vec<u8> {
    let (format, bpp): (u16, usize) = match input.layout % 6 {
        0 => (0x0c, 1),
        1 => (0x0e, 3),
        2 => (0x0f, 4),
        3 => (0x10, 2),
        4 => (0x12, 6),
        _ => (0x13, 8),
    };
    let width = u16::from(input.width % 32) + 1;
    let height = u16::from(input.height % 32) + 1;
    let mut out = vec![0x49, 0x49];
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&format.to_le_bytes());
    let len = width as usize * height as usize * bpp;
    out.extend((0..len).map(|i| input.fill.get(i % input.fill.len().max(1)).copied().unwrap_or(i as u8)));
    out
}

fuzz_target!(|input: Input| {
    let data = build_file(&input);
    let original = decode_from_bytes(&data).expect("generated file must decode");
    let ops: Vec<Operation> = input
        .ops
        .iter()
        .take(16)
        .map(|&h| if h { Operation::FlipH } else { Operation::FlipV })
        .collect();

    let mut img = original.clone();
    apply_ops(&mut img, &ops);
    assert_eq!(img.dimensions(), original.dimensions());

    // Undo by replaying the same ops in reverse.
    let undo: Vec<Operation> = ops.iter().rev().copied().collect();
    apply_ops(&mut img, &undo);
    assert!(pixels_equal(&img, &original));
});
