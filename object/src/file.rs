//! Opening ADAC files and readers, with configurable options.
use crate::decode::decode;
use crate::header::AdacHeader;
use crate::log::{Logger, TracingLogger};
use crate::{InvalidGeometrySnafu, OpenFileSnafu, Result};
use snafu::ResultExt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decode an ADAC header by reading from a byte source.
///
/// The source is expected to start with the `adac01` preamble.
pub fn from_reader<R>(source: R) -> Result<AdacHeader>
where
    R: Read,
{
    OpenFileOptions::new().from_reader(source)
}

/// Decode the header of an ADAC file.
pub fn open_file<P>(path: P) -> Result<AdacHeader>
where
    P: AsRef<Path>,
{
    OpenFileOptions::new().open_file(path)
}

/// A builder type for opening an ADAC file with additional options.
///
/// # Example
///
/// Create a `OpenFileOptions`,
/// call adaptor methods in a chain,
/// and finish the operation with [`.open_file()`](OpenFileOptions::open_file).
///
/// ```no_run
/// # use adac_object::OpenFileOptions;
/// let header = OpenFileOptions::new()
///     .strict_geometry(true)
///     .open_file("path/to/file.adac")?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct OpenFileOptions<L = TracingLogger> {
    logger: L,
    strict_geometry: bool,
}

impl OpenFileOptions {
    pub fn new() -> Self {
        OpenFileOptions::default()
    }
}

impl<L> OpenFileOptions<L> {
    /// Set whether to require a header describing a valid image:
    /// width and height must be present and non-zero.
    ///
    /// Disabled by default.
    pub fn strict_geometry(mut self, strict: bool) -> Self {
        self.strict_geometry = strict;
        self
    }

    /// Set the logger for unknown keys and unparseable values.
    pub fn logger<L2>(self, logger: L2) -> OpenFileOptions<L2>
    where
        L2: Logger,
    {
        OpenFileOptions {
            logger,
            strict_geometry: self.strict_geometry,
        }
    }

    /// Open the file at the given path and decode its header.
    pub fn open_file<P>(self, path: P) -> Result<AdacHeader>
    where
        P: AsRef<Path>,
        L: Logger,
    {
        let path = path.as_ref();
        let file = File::open(path).context(OpenFileSnafu { filename: path })?;
        self.from_reader(BufReader::new(file))
    }

    /// Decode a header by reading from a byte source.
    pub fn from_reader<R>(self, source: R) -> Result<AdacHeader>
    where
        R: Read,
        L: Logger,
    {
        let header = decode(source, &self.logger)?;
        if self.strict_geometry {
            header.geometry().context(InvalidGeometrySnafu)?;
        }
        Ok(header)
    }
}
