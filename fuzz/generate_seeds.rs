#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header_v1(width: i16, height: i16) -> Vec<u8> {
    let mut d = vec![0u8; 518];
    d.extend_from_slice(&height.to_be_bytes());
    d.extend_from_slice(&width.to_be_bytes());
    d.extend_from_slice(&[0x11, 0x01]);
    d
}

fn header_v2(width: i16, height: i16) -> Vec<u8> {
    let mut d = vec![0u8; 518];
    d.extend_from_slice(&height.to_be_bytes());
    d.extend_from_slice(&width.to_be_bytes());
    d.extend_from_slice(&[0x00, 0x11, 0x02, 0xFF, 0x0C, 0x00, 0xFF, 0xFE, 0x00, 0x00]);
    d.extend_from_slice(&(72u32 << 16).to_be_bytes());
    d.extend_from_slice(&(72u32 << 16).to_be_bytes());
    d.extend_from_slice(&[0; 4]);
    d.extend_from_slice(&height.to_be_bytes());
    d.extend_from_slice(&width.to_be_bytes());
    d.extend_from_slice(&[0; 4]);
    d
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // v1 bitmap 8x2
    let mut v1 = header_v1(8, 2);
    v1.extend_from_slice(&[0x90, 0x00, 0x01]);
    v1.extend_from_slice(&[0, 0, 0, 0, 0, 2, 0, 8]); // bounds
    v1.extend_from_slice(&[0; 18]);
    v1.extend_from_slice(&[0b1010_1010, 0b0101_0101, 0xFF]);
    fs::write(format!("{dir}/v1_bitmap_8x2.pict"), v1).unwrap();

    // v2 indexed 4x2, two-entry palette, PackBits rows
    let mut v2 = header_v2(8, 2);
    v2.extend_from_slice(&[0x00, 0x98, 0x80, 0x08]);
    v2.extend_from_slice(&[0, 0, 0, 0, 0, 2, 0, 8]); // bounds
    v2.extend_from_slice(&[0; 18]);
    v2.extend_from_slice(&[0, 8, 0, 1]); // pixel size, components
    v2.extend_from_slice(&[0; 14]);
    v2.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]); // seed, flags, count - 1
    v2.extend_from_slice(&[0, 0, 0xFF, 0xFF, 0, 0, 0, 0]);
    v2.extend_from_slice(&[0, 1, 0, 0, 0xFF, 0xFF, 0, 0]);
    v2.extend_from_slice(&[0; 18]);
    v2.extend_from_slice(&[2, 0xF9, 0x00, 2, 0xF9, 0x01]);
    v2.extend_from_slice(&[0x00, 0xFF, 0x00]);
    fs::write(format!("{dir}/v2_indexed_8x2.pict"), v2).unwrap();

    // v2 direct bits, 16-bit, 4x1
    let mut direct = header_v2(4, 1);
    direct.extend_from_slice(&[0x00, 0x9A]);
    direct.extend_from_slice(&[0; 6]);
    direct.extend_from_slice(&[0, 0, 0, 0, 0, 1, 0, 4]); // bounds
    direct.extend_from_slice(&[0; 18]);
    direct.extend_from_slice(&[0, 16, 0, 3]);
    direct.extend_from_slice(&[0; 14]);
    direct.extend_from_slice(&[0; 18]);
    direct.extend_from_slice(&[3, 0xFD, 0x7C, 0x00]);
    direct.extend_from_slice(&[0x00, 0xFF, 0x00]);
    fs::write(format!("{dir}/v2_direct16_4x1.pict"), direct).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/preamble_only.bin"), vec![0u8; 512]).unwrap();
    let mut bad_marker = header_v2(4, 4);
    bad_marker[524] = 0x03;
    fs::write(format!("{dir}/v2_bad_marker.bin"), bad_marker).unwrap();
    let mut jpeg_stub = header_v2(4, 4);
    jpeg_stub.extend_from_slice(&[0x00, 0x18, 0x00, 0x00, 0xFF, 0xD8, 0xFF, 0xD9]);
    fs::write(format!("{dir}/v2_jpeg_stub.bin"), jpeg_stub).unwrap();

    println!("Generated seed corpus in {dir}/");
}
