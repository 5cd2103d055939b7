//! ADAC header keys and their definitions.
//!
//! Entries are declared once, in key number order,
//! and expanded into both the [`Key`] enumeration and the [`ENTRIES`] table,
//! so that `ENTRIES[k - 1]` is always the definition of key number `k`.

use crate::{DataType, DictionaryEntry};

macro_rules! declare_keys {
    ($($key:ident = $num:literal, $desc:literal, $ty:ident, $len:literal;)*) => {
        /// An ADAC header key.
        ///
        /// The discriminant of each variant is its key number.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum Key {
            $(
                #[doc = $desc]
                $key = $num,
            )*
        }

        /// All header field definitions, sorted by key number.
        pub static ENTRIES: &[DictionaryEntry] = &[
            $(
                DictionaryEntry {
                    key: Key::$key,
                    description: $desc,
                    data_type: DataType::$ty,
                    value_length: $len,
                },
            )*
        ];
    };
}

declare_keys! {
    // patient demographics and exam information
    PatientName = 1, "Patient name", Byte, 20;
    PatientId = 2, "Patient ID", Byte, 11;
    PatientSex = 3, "Patient sex", Byte, 1;
    PatientAge = 4, "Patient age", Short, 2;
    PatientHeight = 5, "Patient height", Short, 2;
    PatientWeight = 6, "Patient weight", Short, 2;
    AcquisitionDate = 7, "Acquisition date", Byte, 8;
    DoseAdminTime = 8, "Dose admin. time", Byte, 8;
    UniqueExamKey = 9, "Unique exam key", Byte, 8;
    ExamProcedure = 10, "Exam procedure", Byte, 36;
    ReferringPhysician = 11, "Reffering physician", Byte, 20;
    AttendingPhysician = 12, "Attending physician", Byte, 20;
    ImagingModality = 13, "Imaging modality", Byte, 2;
    InstitutionName = 14, "Institution name", Byte, 20;
    HistogramCurveFileName = 15, "Histog. crv file name", Byte, 20;
    AcquisitionStartTime = 16, "Acquisition start time", Byte, 10;
    // relational information
    DataTypeCode = 17, "Data type", Byte, 2;
    ImageViewId = 18, "Image view ID", Byte, 16;
    // acquisition, general
    ImagingDeviceName = 19, "Imaging device name", Byte, 10;
    DeviceSerialNumber = 20, "Device serial number", Byte, 12;
    CollimatorUsed = 21, "Collimator used", Byte, 6;
    SoftwareVersion = 22, "Software version number", Byte, 8;
    Radiopharmaceutical1 = 23, "Radiopharmaceutical 1", Byte, 16;
    Dosage1 = 24, "Dosage 1", Short, 2;
    Radiopharmaceutical2 = 25, "Radiopharmaceutical 2", Byte, 16;
    Dosage2 = 26, "Dosage 2", Short, 2;
    IsotopeImagingMode = 27, "Isotope imaging mode", Byte, 1;
    EnergyWindow1Center = 28, "Enery window 1 (center)", Short, 2;
    EnergyWindow1Width = 29, "Enery window 1 (width)", Short, 2;
    EnergyWindow2Center = 30, "Enery window 2 (center)", Short, 2;
    EnergyWindow2Width = 31, "Enery window 2 (width)", Short, 2;
    EnergyWindow3Center = 32, "Enery window 3 (center)", Short, 2;
    EnergyWindow3Width = 33, "Enery window 3 (width)", Short, 2;
    EnergyWindow4Center = 34, "Enery window 4 (center)", Short, 2;
    EnergyWindow4Width = 35, "Enery window 4 (width)", Short, 2;
    PatientOrientation = 36, "Patient orientation", Byte, 6;
    SpatialResolution = 37, "Spatial resolution", Float, 4;
    SliceThickness = 38, "Slice thickness", Float, 4;
    XDimensions = 39, "X-dimensions", Short, 2;
    YDimensions = 40, "Y-dimensions", Short, 2;
    ZDimensions = 41, "Z-dimensions", Short, 2;
    PixelBitDepth = 42, "Pixel bit-depth", Short, 2;
    UniformityCorrection = 43, "Uniformity correction", Byte, 20;
    Zoom = 44, "Zoom", Float, 4;
    // acquisition, multiframe
    TotalCountsInFrame = 45, "Total counts in frame", Float, 4;
    FrameTime = 46, "Frame time", Int, 4;
    AcquisitionTime = 47, "Acquisition time", Int, 4;
    MaxValueInFrame = 48, "Max value in frame/set", Float, 4;
    MinValueInFrame = 49, "Min value in frame/set", Float, 4;
    // acquisition, gated
    RrIntervalTime = 50, "R-R interval time", Short, 2;
    CyclesImaged = 51, "Cycles imaged (%)", Short, 2;
    CyclesAccepted = 52, "Cycles accepted (%)", Short, 2;
    CyclesRejected = 53, "Cycles rejected (%)", Short, 2;
    EndDiastolicFrame = 54, "End diastolic frame (approx)", Short, 2;
    EndSystolicFrame = 55, "End systolic frame (approx)", Short, 2;
    EjectionFraction = 56, "Ejection fraction (approx)", Float, 4;
    // acquisition, SPECT
    StartingAngle = 57, "Starting angle", Short, 2;
    DegreesOfRotation = 58, "Degrees of rotation", Short, 2;
    DirectionOfRotation = 59, "Direction of rotation", Byte, 1;
    ReorientationType = 60, "Reorientation type", Byte, 1;
    StartFrame = 61, "Start frame, reconstruction limit", Short, 2;
    // display
    UpperWindowGrayLevel = 62, "Upper window gray level", Short, 2;
    LowerWindowGrayLevel = 63, "Lower level gray level", Short, 2;
    AssociatedColourMap = 64, "Associated colour map", Short, 2;
    CustomisedColourMap = 65, "Customised colour map", Byte, 20;
    // processing
    ManipulatedImage = 66, "Manipulated image", Byte, 1;
    AxisOfRotationCorrection = 67, "Axis of rotation corr.", Short, 2;
    ReorientationAzimuth = 68, "Reorientation azimuth", Short, 2;
    ReorientationElevation = 69, "Reorientation elevation", Short, 2;
    FilterType = 70, "Filter type", Byte, 16;
    FilterOrder = 71, "Filter order", Short, 2;
    CutoffFrequency = 72, "Cutoff frequency", Float, 4;
    ReconstructionType = 73, "Reconstruction type", Byte, 4;
    AttenuationCoefficient = 74, "Attenuation coefficient", Float, 4;
    // relational information, continued
    AssociatedParentFile = 75, "Associated parent file", Byte, 20;
    UniquePatientKey = 76, "Unique patient key", Byte, 6;
    // keys 77-81 and 88-108 are not documented by the vendor,
    // these slots are placeholders sized to fit the value region
    AcquisitionMatrixSize = 77, "Acquisition matrix size", Short, 2;
    ReconstructionMatrixSize = 78, "Reconstruction matrix size", Short, 2;
    PixelSize = 79, "Pixel size", Float, 4;
    ImageRowsOffset = 80, "Image rows offset", Short, 2;
    ImageColumnsOffset = 81, "Image columns offset", Short, 2;
    NormalCurveFileName = 82, "Nrml crv file name", Byte, 10;
    UniqueObjectKey = 83, "Unique object key", Byte, 3;
    Unused = 84, "Unused", Byte, 8;
    TrueColourFlag = 85, "True colour flag", Byte, 1;
    NumberOfImageSets = 86, "Number of image sets", Short, 2;
    ScaleFactor = 87, "Scale factor", Float, 4;
    // reconstruction
    ReconstructedSlices = 88, "Reconstructed slices", Short, 2;
    FirstReconstructedSlice = 89, "First reconstructed slice", Short, 2;
    LastReconstructedSlice = 90, "Last reconstructed slice", Short, 2;
    SliceSpacing = 91, "Slice spacing", Float, 4;
    ReconstructionZoom = 92, "Reconstruction zoom", Float, 4;
    ProjectionCount = 93, "Projection count", Short, 2;
    ProjectionTime = 94, "Projection time", Short, 2;
    HeadCount = 95, "Head count", Short, 2;
    HeadOffsetAngle = 96, "Head offset angle", Short, 2;
    AcquiredGatedFrames = 97, "Acquired gated frames", Short, 2;
    BeatsAccepted = 98, "Beats accepted", Short, 2;
    BeatsRejected = 99, "Beats rejected", Short, 2;
    PrefilterType = 100, "Prefilter type", Short, 2;
    PrefilterOrder = 101, "Prefilter order", Short, 2;
    PrefilterCutoff = 102, "Prefilter cutoff", Float, 4;
    ScatterCorrection = 103, "Scatter correction", Short, 2;
    AttenuationCorrection = 104, "Attenuation correction", Short, 2;
    CenterOfRotationX = 105, "Center of rotation X", Float, 4;
    CenterOfRotationY = 106, "Center of rotation Y", Float, 4;
    TableHeight = 107, "Table height", Short, 2;
    RadiusOfRotation = 108, "Radius of rotation", Short, 2;
    // patient and display, late additions
    DateOfBirth = 109, "Date of birth", Byte, 8;
    DirectionalOrientation = 110, "Directional orientation", Byte, 1;
    VfrStruct = 111, "VFR struct", Byte, 64;
    RrLowTolerance = 112, "R-R low tolerance time", Short, 2;
    RrHighTolerance = 113, "R-R high tolerance time", Short, 2;
    // extra objects
    ProgramSpecific = 114, "Program specific", Extras, 800;
}

impl Key {
    /// Resolve a raw key number into a known key.
    ///
    /// Returns `None` if the number is outside of the dictionary's range.
    pub fn from_number(number: u16) -> Option<Key> {
        let index = usize::from(number).checked_sub(1)?;
        ENTRIES.get(index).map(|e| e.key)
    }

    /// The raw key number.
    #[inline]
    pub fn number(self) -> u16 {
        self as u16
    }

    /// The dictionary entry of this key.
    #[inline]
    pub fn entry(self) -> &'static DictionaryEntry {
        &ENTRIES[self.index()]
    }

    /// The zero based position of this key in the dictionary table.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.number()) - 1
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} ({})", self.number(), self.entry().description)
    }
}
