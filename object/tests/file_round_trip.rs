//! Write ADAC files to disk and read them back.
use adac_object::dictionary_std::Key;
use adac_object::{
    find_preambles, open_file, BitDepth, EncodeGeometry, Encoder, FieldValue, OpenFileOptions,
};
use std::io::Read;

const DUMP: &str = "Patient name = DOE^JOHN\n\
                    Patient ID = 12345\n\
                    Data type = GE\n\
                    Zoom = 1.0\n\
                    Frame time = 40\n\
                    Start frame, reconstruction limit = 8\n\
                    Program specific = CALB=0.625|WLAS=1.2.840.1234";

fn geometry() -> EncodeGeometry {
    EncodeGeometry {
        width: 64,
        height: 64,
        z_dim: 16,
        bit_depth: BitDepth::Gray16Signed,
    }
}

#[test]
fn write_and_open_gated_study() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gated.adac");

    let geometry = geometry();
    let pixels: Vec<u8> = (0..64 * 64 * 2 * 16 * 8).map(|i| (i % 251) as u8).collect();
    Encoder::new(geometry)
        .write_to_file(DUMP, &pixels, &path)
        .unwrap();

    let header = open_file(&path).unwrap();
    let geometry = header.geometry().unwrap();
    assert_eq!(geometry.width, 64);
    assert_eq!(geometry.height, 64);
    assert_eq!(geometry.bit_depth, BitDepth::Gray16Signed);
    assert!(geometry.is_gated);
    assert!(!geometry.is_reconstruction);
    assert_eq!(geometry.intervals, 8);
    assert_eq!(geometry.number_of_images, 16 * 8);
    assert_eq!(geometry.image_byte_offset, 2048 + 8 * 1664);
    assert_eq!(geometry.pixel_size_mm, 10.);
    assert_eq!(geometry.frame_interval_seconds, 0.04);

    assert_eq!(
        header.get(Key::PatientId),
        Some(&FieldValue::Text("12345".to_string()))
    );

    // pixel data starts at the derived offset
    let mut file = std::fs::read(&path).unwrap();
    let pixel_data = file.split_off(geometry.image_byte_offset as usize);
    assert_eq!(pixel_data, pixels);
}

#[test]
fn dump_survives_a_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.adac");
    let second = dir.path().join("second.adac");

    let encoder = Encoder::new(geometry());
    encoder.write_to_file(DUMP, &[], &first).unwrap();
    let header = open_file(&first).unwrap();
    encoder.write_to_file(&header.dump(), &[], &second).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
    assert_eq!(open_file(&second).unwrap().dump(), header.dump());
}

#[test]
fn scan_concatenated_headers() {
    let encoder = Encoder::new(geometry());
    let mut data = encoder.to_vec("Data type = ST", &[0; 100]).unwrap();
    let second = encoder.to_vec("Data type = ST", &[]).unwrap();
    data.extend_from_slice(&second);

    let found = find_preambles(&data[..]).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[1].position, 2148);
    assert_eq!(found[1].since_previous, 2148);

    // the second header decodes from its own position
    let mut source = &data[2148..];
    let header = OpenFileOptions::new()
        .strict_geometry(true)
        .from_reader(&mut source)
        .unwrap();
    assert_eq!(header.data_type_code(), Some("ST"));
    let mut rest = Vec::new();
    source.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn not_an_adac_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.bin");
    std::fs::write(&path, vec![0x20u8; 4096]).unwrap();

    let err = open_file(&path).unwrap_err();
    assert!(err.is_malformed_header());
}
