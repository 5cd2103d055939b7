//! The decoded ADAC header and its derived image geometry.
use crate::log::Logger;
use crate::store::FieldStore;
use crate::{AccessError, InvalidDimensionSnafu, MissingRequiredFieldSnafu};
use adac_dictionary_std::{
    Key, IM_OFFSET, RECON_SUBHEADER_SIZE, SPECT_SUBHEADER_SIZE,
};
use adac_encoding::FieldValue;
use snafu::{ensure, OptionExt};
use std::fmt;

/// The pixel sample format of an image.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 8-bit unsigned gray levels
    Gray8,
    /// 16-bit signed gray levels
    Gray16Signed,
    /// 32-bit floating point gray levels
    Gray32Float,
}

impl BitDepth {
    /// Interpret the pixel bit depth field.
    ///
    /// Values other than 8 or 32 are taken as 16-bit.
    pub fn from_bits(bits: i16) -> Self {
        match bits {
            8 => BitDepth::Gray8,
            32 => BitDepth::Gray32Float,
            _ => BitDepth::Gray16Signed,
        }
    }

    /// The number of bits per sample.
    pub fn bits(self) -> i16 {
        match self {
            BitDepth::Gray8 => 8,
            BitDepth::Gray16Signed => 16,
            BitDepth::Gray32Float => 32,
        }
    }

    /// The number of bytes per sample.
    pub fn bytes_per_sample(self) -> usize {
        self.bits() as usize / 8
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BitDepth::Gray8 => "GRAY8",
            BitDepth::Gray16Signed => "GRAY16_SIGNED",
            BitDepth::Gray32Float => "GRAY32_FLOAT",
        })
    }
}

/// A complete snapshot of the image geometry described by a header.
///
/// Obtained with [`AdacHeader::geometry`],
/// which only succeeds if width and height are present and non-zero.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
    pub z_dim: u32,
    pub slices: u32,
    pub intervals: u32,
    pub bit_depth: BitDepth,
    pub frame_interval_seconds: f64,
    pub is_gated: bool,
    pub is_reconstruction: bool,
    pub image_byte_offset: u64,
    pub number_of_images: u64,
    pub pixel_size_mm: f64,
}

impl ImageGeometry {
    /// The size in bytes of a single image plane.
    pub fn image_size(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * self.bit_depth.bytes_per_sample() as u64
    }
}

/// A decoded ADAC header.
///
/// Holds the fields found in the key table,
/// and provides the image geometry derived from them.
/// A header is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct AdacHeader {
    fields: FieldStore,
    subheader_count: u8,
    is_gated: bool,
    calibration_factor: f32,
}

impl AdacHeader {
    /// Build a header from a complete set of fields.
    ///
    /// The gated flag and the calibration factor are resolved here, once.
    /// A calibration factor which is not a number
    /// is reported to the logger and taken as 0.
    pub fn from_fields<L>(fields: FieldStore, subheader_count: u8, logger: &L) -> Self
    where
        L: Logger + ?Sized,
    {
        let is_gated = fields
            .text(Key::DataTypeCode)
            .map(|code| code.starts_with('G'))
            .unwrap_or(false);

        let calibration_factor = match fields
            .get(Key::ProgramSpecific)
            .and_then(FieldValue::as_extras)
            .and_then(|extras| extras.try_calibration_factor())
        {
            Some(Ok(factor)) => factor,
            Some(Err(e)) => {
                logger.error(
                    "Calibration factor",
                    &format!("Could not parse calibration factor: {}", e),
                );
                0.
            }
            None => 0.,
        };

        AdacHeader {
            fields,
            subheader_count,
            is_gated,
            calibration_factor,
        }
    }

    /// The decoded fields, in key table order.
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// Retrieve the value of a field.
    pub fn get(&self, key: Key) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// The sub-header count byte of the header.
    pub fn subheader_count(&self) -> u8 {
        self.subheader_count
    }

    fn required_dimension(&self, key: Key) -> Result<u32, AccessError> {
        let value = self
            .fields
            .short(key)
            .context(MissingRequiredFieldSnafu { key })?;
        u32::try_from(value)
            .ok()
            .context(InvalidDimensionSnafu { key, value })
    }

    /// Non-negative value of an optional count, 0 if absent.
    fn count(&self, key: Key) -> u32 {
        self.fields
            .short(key)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    }

    /// The image width in pixels (X-dimensions).
    pub fn width(&self) -> Result<u32, AccessError> {
        self.required_dimension(Key::XDimensions)
    }

    /// The image height in pixels (Y-dimensions).
    pub fn height(&self) -> Result<u32, AccessError> {
        self.required_dimension(Key::YDimensions)
    }

    /// The number of frames or slices (Z-dimensions), 0 if absent.
    pub fn z_dim(&self) -> u32 {
        self.count(Key::ZDimensions)
    }

    /// The number of image sets, 0 if absent.
    pub fn slices(&self) -> u32 {
        self.count(Key::NumberOfImageSets)
    }

    /// The number of gated intervals, 0 if absent.
    pub fn intervals(&self) -> u32 {
        self.count(Key::StartFrame)
    }

    pub fn bit_depth(&self) -> BitDepth {
        BitDepth::from_bits(self.fields.short(Key::PixelBitDepth).unwrap_or(0))
    }

    /// The frame time in seconds, 0 if absent.
    pub fn frame_interval_seconds(&self) -> f64 {
        f64::from(self.fields.int(Key::FrameTime).unwrap_or(0)) / 1000.
    }

    /// The two letter data type code, such as `GE` or `ST`.
    pub fn data_type_code(&self) -> Option<&str> {
        self.fields.text(Key::DataTypeCode)
    }

    /// Whether this is a gated study.
    #[inline]
    pub fn is_gated(&self) -> bool {
        self.is_gated
    }

    /// Whether this is a study of reconstructed slices.
    pub fn is_reconstruction(&self) -> bool {
        self.fields.short(Key::ReconstructedSlices).unwrap_or(0) > 0
    }

    /// The calibration factor in the program specific extras, 0 if absent.
    #[inline]
    pub fn calibration_factor(&self) -> f32 {
        self.calibration_factor
    }

    /// The absolute position in the file where the pixel data starts.
    ///
    /// Gated studies have one sub-header per interval between
    /// the header and the pixel data.
    pub fn image_byte_offset(&self) -> u64 {
        if !self.is_gated {
            return IM_OFFSET as u64;
        }
        let subheader_size = if self.is_reconstruction() {
            RECON_SUBHEADER_SIZE
        } else {
            SPECT_SUBHEADER_SIZE
        };
        IM_OFFSET as u64 + u64::from(self.intervals()) * subheader_size as u64
    }

    /// The total number of image planes in the file.
    pub fn number_of_images(&self) -> u64 {
        let at_least_one = |v: u32| u64::from(v.max(1));
        at_least_one(self.z_dim()) * at_least_one(self.slices()) * at_least_one(self.intervals())
    }

    /// The size of a pixel in millimeters.
    ///
    /// Computed from the calibration factor and the zoom when both are known,
    /// otherwise estimated from a 380 mm field of view.
    /// 0 if neither is possible.
    pub fn pixel_size_mm(&self) -> f64 {
        let width = self.count(Key::XDimensions);
        let height = self.count(Key::YDimensions);
        let dim = f64::from(width.max(height));
        let zoom = f64::from(self.fields.float(Key::Zoom).unwrap_or(0.));
        let calibration = f64::from(self.calibration_factor);

        if calibration != 0. && zoom > 0. && dim > 0. {
            1024. * calibration / (dim * zoom)
        } else if height > 0 {
            380. / f64::from(height)
        } else {
            0.
        }
    }

    /// Collect all derived geometry values.
    ///
    /// Fails if the width or height is missing or zero.
    pub fn geometry(&self) -> Result<ImageGeometry, AccessError> {
        let width = self.width()?;
        ensure!(
            width > 0,
            InvalidDimensionSnafu {
                key: Key::XDimensions,
                value: 0i16,
            }
        );
        let height = self.height()?;
        ensure!(
            height > 0,
            InvalidDimensionSnafu {
                key: Key::YDimensions,
                value: 0i16,
            }
        );
        Ok(ImageGeometry {
            width,
            height,
            z_dim: self.z_dim(),
            slices: self.slices(),
            intervals: self.intervals(),
            bit_depth: self.bit_depth(),
            frame_interval_seconds: self.frame_interval_seconds(),
            is_gated: self.is_gated,
            is_reconstruction: self.is_reconstruction(),
            image_byte_offset: self.image_byte_offset(),
            number_of_images: self.number_of_images(),
            pixel_size_mm: self.pixel_size_mm(),
        })
    }

    /// Render all fields as text,
    /// one `<description> = <value>` line per field in key table order.
    ///
    /// This is the text accepted by the [`Encoder`](crate::Encoder).
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.fields.iter() {
            out.push_str(key.entry().description);
            out.push_str(" = ");
            out.push_str(&value.to_string());
            out.push('\n');
        }
        out.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{AdacHeader, BitDepth};
    use crate::log::testing::RecordingLogger;
    use crate::log::TracingLogger;
    use crate::store::FieldStore;
    use crate::AccessError;
    use adac_dictionary_std::Key;
    use adac_encoding::{ExtrasMap, FieldValue};

    fn header(fields: &[(Key, FieldValue)]) -> AdacHeader {
        let mut store = FieldStore::new();
        for (key, value) in fields {
            store.insert(*key, value.clone());
        }
        AdacHeader::from_fields(store, 2, &TracingLogger)
    }

    fn extras(calibration: &str) -> FieldValue {
        let mut map = ExtrasMap::new();
        map.insert("CALB", calibration);
        FieldValue::Extras(map)
    }

    #[test]
    fn gated_detection() {
        for (code, gated) in [("GE", true), ("GP", true), ("DP", false), ("ST", false), ("", false)] {
            let h = header(&[(Key::DataTypeCode, code.into())]);
            assert_eq!(h.is_gated(), gated, "data type {:?}", code);
        }
        assert!(!header(&[]).is_gated());
    }

    #[test]
    fn image_offset_not_gated() {
        let h = header(&[
            (Key::DataTypeCode, "ST".into()),
            (Key::StartFrame, FieldValue::Short(16)),
        ]);
        assert_eq!(h.image_byte_offset(), 2048);
        assert_eq!(header(&[]).image_byte_offset(), 2048);
    }

    #[test]
    fn image_offset_gated_reconstruction() {
        let h = header(&[
            (Key::DataTypeCode, "GE".into()),
            (Key::StartFrame, FieldValue::Short(16)),
            (Key::ReconstructedSlices, FieldValue::Short(1)),
        ]);
        assert!(h.is_reconstruction());
        assert_eq!(h.image_byte_offset(), 4096);
    }

    #[test]
    fn image_offset_gated_spect() {
        let h = header(&[
            (Key::DataTypeCode, "GE".into()),
            (Key::StartFrame, FieldValue::Short(16)),
        ]);
        assert!(!h.is_reconstruction());
        assert_eq!(h.image_byte_offset(), 28672);
    }

    #[test]
    fn number_of_images() {
        let h = header(&[(Key::ZDimensions, FieldValue::Short(10))]);
        assert_eq!(h.number_of_images(), 10);

        let h = header(&[
            (Key::ZDimensions, FieldValue::Short(10)),
            (Key::NumberOfImageSets, FieldValue::Short(4)),
            (Key::StartFrame, FieldValue::Short(8)),
        ]);
        assert_eq!(h.number_of_images(), 320);

        // gated study: one slice per image set
        let h = header(&[
            (Key::ZDimensions, FieldValue::Short(1)),
            (Key::NumberOfImageSets, FieldValue::Short(20)),
            (Key::StartFrame, FieldValue::Short(16)),
        ]);
        assert_eq!(h.number_of_images(), 320);

        let h = header(&[
            (Key::ZDimensions, FieldValue::Short(0)),
            (Key::NumberOfImageSets, FieldValue::Short(0)),
        ]);
        assert_eq!(h.number_of_images(), 1);
    }

    #[test]
    fn pixel_size_from_calibration() {
        let h = header(&[
            (Key::XDimensions, FieldValue::Short(128)),
            (Key::YDimensions, FieldValue::Short(128)),
            (Key::Zoom, FieldValue::Float(1.)),
            (Key::ProgramSpecific, extras("0.625")),
        ]);
        assert_eq!(h.calibration_factor(), 0.625);
        assert_eq!(h.pixel_size_mm(), 5.);
    }

    #[test]
    fn pixel_size_fallback() {
        let h = header(&[
            (Key::XDimensions, FieldValue::Short(256)),
            (Key::YDimensions, FieldValue::Short(256)),
        ]);
        assert_eq!(h.pixel_size_mm(), 380. / 256.);

        // zero zoom disables the calibrated formula
        let h = header(&[
            (Key::XDimensions, FieldValue::Short(256)),
            (Key::YDimensions, FieldValue::Short(256)),
            (Key::Zoom, FieldValue::Float(0.)),
            (Key::ProgramSpecific, extras("0.625")),
        ]);
        assert_eq!(h.pixel_size_mm(), 380. / 256.);

        assert_eq!(header(&[]).pixel_size_mm(), 0.);
    }

    #[test]
    fn unparseable_calibration_is_logged() {
        let mut store = FieldStore::new();
        store.insert(Key::ProgramSpecific, extras("abc"));
        let logger = RecordingLogger::default();
        let h = AdacHeader::from_fields(store, 2, &logger);
        assert_eq!(h.calibration_factor(), 0.);
        assert_eq!(logger.errors.borrow().len(), 1);
    }

    #[test]
    fn bit_depths() {
        for (bits, depth) in [
            (8, BitDepth::Gray8),
            (16, BitDepth::Gray16Signed),
            (32, BitDepth::Gray32Float),
            (12, BitDepth::Gray16Signed),
        ] {
            let h = header(&[(Key::PixelBitDepth, FieldValue::Short(bits))]);
            assert_eq!(h.bit_depth(), depth);
        }
        assert_eq!(header(&[]).bit_depth(), BitDepth::Gray16Signed);
    }

    #[test]
    fn frame_interval() {
        let h = header(&[(Key::FrameTime, FieldValue::Int(250))]);
        assert_eq!(h.frame_interval_seconds(), 0.25);
    }

    #[test]
    fn missing_dimensions() {
        let h = header(&[(Key::YDimensions, FieldValue::Short(64))]);
        assert!(matches!(
            h.width(),
            Err(AccessError::MissingRequiredField {
                key: Key::XDimensions,
                ..
            })
        ));
        assert_eq!(h.height().unwrap(), 64);
        assert!(h.geometry().is_err());

        let h = header(&[
            (Key::XDimensions, FieldValue::Short(0)),
            (Key::YDimensions, FieldValue::Short(64)),
        ]);
        assert_eq!(h.width().unwrap(), 0);
        assert!(matches!(
            h.geometry(),
            Err(AccessError::InvalidDimension { .. })
        ));

        let h = header(&[
            (Key::XDimensions, FieldValue::Short(-4)),
            (Key::YDimensions, FieldValue::Short(64)),
        ]);
        assert!(matches!(
            h.width(),
            Err(AccessError::InvalidDimension { value: -4, .. })
        ));
    }

    #[test]
    fn geometry_snapshot() {
        let h = header(&[
            (Key::XDimensions, FieldValue::Short(64)),
            (Key::YDimensions, FieldValue::Short(64)),
            (Key::ZDimensions, FieldValue::Short(16)),
            (Key::PixelBitDepth, FieldValue::Short(16)),
            (Key::DataTypeCode, "GE".into()),
            (Key::StartFrame, FieldValue::Short(8)),
        ]);
        let geometry = h.geometry().unwrap();
        assert_eq!(geometry.width, 64);
        assert_eq!(geometry.number_of_images, 128);
        assert_eq!(geometry.image_byte_offset, 2048 + 8 * 1664);
        assert_eq!(geometry.image_size(), 64 * 64 * 2);
        assert!(geometry.is_gated);
    }

    #[test]
    fn dump_in_encounter_order() {
        let h = header(&[
            (Key::YDimensions, FieldValue::Short(64)),
            (Key::PatientName, "DOE^JOHN".into()),
            (Key::Zoom, FieldValue::Float(1.)),
            (Key::ProgramSpecific, extras("0.625")),
        ]);
        assert_eq!(
            h.dump(),
            "Y-dimensions = 64\n\
             Patient name = DOE^JOHN\n\
             Zoom = 1.0\n\
             Program specific = CALB=0.625"
        );
        assert_eq!(header(&[]).dump(), "");
    }
}
