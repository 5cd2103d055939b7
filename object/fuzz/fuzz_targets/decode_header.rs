#![no_main]
use adac_object::{EncodeGeometry, Encoder};
use libfuzzer_sys::{fuzz_target, Corpus};
use std::error::Error;

fuzz_target!(|data: &[u8]| -> Corpus {
    match fuzz(data) {
        Ok(_) => Corpus::Keep,
        Err(_) => Corpus::Reject,
    }
});

fn fuzz(data: &[u8]) -> Result<(), Box<dyn Error>> {
    // deserialize random bytes
    let header = adac_object::from_reader(data)?;

    // derived values never fail
    let _ = header.number_of_images();
    let _ = header.image_byte_offset();
    let _ = header.pixel_size_mm();

    let geometry = header.geometry()?;
    let geometry = EncodeGeometry {
        width: u16::try_from(geometry.width)?,
        height: u16::try_from(geometry.height)?,
        z_dim: u16::try_from(geometry.z_dim)?,
        bit_depth: geometry.bit_depth,
    };

    // serialize the header back to bytes,
    // which may fail only if there are too many fields
    let bytes = match Encoder::new(geometry).to_vec(&header.dump(), &[]) {
        Ok(bytes) => bytes,
        Err(adac_object::WriteError::KeyTableOverflow { .. }) => return Ok(()),
        Err(e) => panic!("encoding a decoded header failed: {}", e),
    };

    // deserialize back to a header
    let header2 = adac_object::from_reader(bytes.as_slice())
        .expect("encoded header should always decode");

    assert_eq!(header.width()?, header2.width()?);
    assert_eq!(header.height()?, header2.height()?);
    assert_eq!(header.bit_depth(), header2.bit_depth());

    Ok(())
}
