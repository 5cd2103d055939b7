//! ADAC header dumping library
//!
//! This is a helper library
//! for dumping the contents of ADAC headers
//! in a human readable way.
//!
//! # Examples
//!
//! A quick and easy way to dump the contents of a header
//! is via [`dump_header`]
//! (or [`dump_header_to`] to print to an arbitrary writer).
//!
//! ```no_run
//! use adac_object::open_file;
//! use adac_dump::dump_header;
//!
//! let header = open_file("path/to/file.adac")?;
//! dump_header(&header)?;
//! # Result::<(), Box<dyn std::error::Error>>::Ok(())
//! ```
//!
//! See the [`DumpOptions`] builder for additional dumping options.
//!
//! ```no_run
//! use adac_object::open_file;
//! use adac_dump::DumpOptions;
//!
//! let header = open_file("path/to/file2.adac")?;
//! let mut options = DumpOptions::new();
//! // dump to stdout (width = 100)
//! options.width(100).dump_header(&header)?;
//! # Result::<(), Box<dyn std::error::Error>>::Ok(())
//! ```
use adac_encoding::extras;
use adac_object::dictionary_std::Key;
use adac_object::{AdacHeader, FieldValue, PreambleMatch};
use owo_colors::*;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::io::{stdout, Result as IoResult, Write};
use std::str::FromStr;

/// An enum of all supported output formats for dumping ADAC headers.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum DumpFormat {
    /// The main dump format,
    /// showing the derived image geometry
    /// followed by the key number, description, type and value of each field.
    ///
    /// Note that this format is not stabilized,
    /// and may change with subsequent versions of the crate.
    #[default]
    Main,
    /// One `<description> = <value>` line per field,
    /// which can be fed back to the header encoder.
    /// Never colored nor trimmed.
    Plain,
}

impl FromStr for DumpFormat {
    type Err = DumpFormatError;
    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "main" => Ok(DumpFormat::Main),
            "plain" => Ok(DumpFormat::Plain),
            _ => Err(DumpFormatError),
        }
    }
}

/// The error raised when providing an invalid dump format.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct DumpFormatError;

impl Display for DumpFormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid dump format")
    }
}

impl std::error::Error for DumpFormatError {}

/// Options and flags to configure how to dump an ADAC header.
///
/// This is a builder which exposes the various options available
/// for printing the contents of the header in a readable way.
///
/// # Example
///
/// ```no_run
/// use adac_object::open_file;
/// use adac_dump::{ColorMode, DumpOptions};
///
/// let header = open_file("/path_to_file")?;
/// let mut options = DumpOptions::new();
/// options
///     // maximum 120 characters per line
///     .width(120)
///     // never print colored output
///     .color_mode(ColorMode::Never)
///     // dump to stdout
///     .dump_header(&header)?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
#[non_exhaustive]
pub struct DumpOptions {
    /// the output format
    pub format: DumpFormat,
    /// whether to produce colored output
    pub color: ColorMode,
    /// the console width to assume when trimming long values
    pub width: Option<u32>,
    /// never trim out any values
    pub no_limit: bool,
}

impl DumpOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the output format.
    pub fn format(&mut self, format: DumpFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Set the maximum output width in number of characters.
    ///
    /// [`dump_header_to`](DumpOptions::dump_header_to)
    /// will print everything to the end,
    /// regardless of this option.
    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = Some(width);
        self
    }

    /// Set the maximum output width to automatic,
    /// based on terminal size.
    ///
    /// This is the default behavior.
    /// If a terminal width could not be determined,
    /// the default width of 120 characters is used.
    pub fn width_auto(&mut self) -> &mut Self {
        self.width = None;
        self
    }

    /// Set whether to remove the maximum width restriction for all values.
    pub fn no_limit(&mut self, no_limit: bool) -> &mut Self {
        self.no_limit = no_limit;
        self
    }

    /// Set the output color mode.
    pub fn color_mode(&mut self, color: ColorMode) -> &mut Self {
        self.color = color;
        self
    }

    /// Dump the contents of a header to standard output.
    pub fn dump_header(&self, header: &AdacHeader) -> IoResult<()> {
        self.dump_header_impl(stdout(), header, true)
    }

    /// Dump the contents of a header to the given writer.
    pub fn dump_header_to(&self, to: impl Write, header: &AdacHeader) -> IoResult<()> {
        self.dump_header_impl(to, header, false)
    }

    fn dump_header_impl(
        &self,
        mut to: impl Write,
        header: &AdacHeader,
        to_stdout: bool,
    ) -> IoResult<()> {
        if self.format == DumpFormat::Plain {
            return writeln!(to, "{}", header.dump());
        }

        self.apply_color_mode(to_stdout);

        let width = if self.no_limit || !to_stdout {
            u32::MAX
        } else {
            determine_width(self.width)
        };

        geometry_dump(&mut to, header)?;
        writeln!(to, "{:-<58}", "")?;
        fields_dump(&mut to, header, width)?;
        Ok(())
    }

    /// Print the preamble occurrences found in a file to standard output.
    pub fn dump_preambles(&self, matches: &[PreambleMatch]) -> IoResult<()> {
        self.dump_preambles_impl(stdout(), matches, true)
    }

    /// Print the preamble occurrences found in a file to the given writer.
    pub fn dump_preambles_to(&self, to: impl Write, matches: &[PreambleMatch]) -> IoResult<()> {
        self.dump_preambles_impl(to, matches, false)
    }

    fn dump_preambles_impl(
        &self,
        mut to: impl Write,
        matches: &[PreambleMatch],
        to_stdout: bool,
    ) -> IoResult<()> {
        self.apply_color_mode(to_stdout);
        if matches.is_empty() {
            writeln!(to, "{}", DumpValue::<&str>::Nothing)?;
        }
        for m in matches {
            writeln!(
                to,
                "\"adac01\" found at: {} ; {} bytes since last \"adac01\"",
                DumpValue::Num(m.position),
                DumpValue::Num(m.since_previous),
            )?;
        }
        Ok(())
    }

    fn apply_color_mode(&self, to_stdout: bool) {
        match (self.color, to_stdout) {
            (ColorMode::Never, _) => owo_colors::set_override(false),
            (ColorMode::Always, _) => owo_colors::set_override(true),
            (ColorMode::Auto, false) => owo_colors::set_override(false),
            (ColorMode::Auto, true) => owo_colors::unset_override(),
        }
    }
}

/// Enumeration of output coloring modes.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ColorMode {
    /// Produce colored output if supported by the destination
    /// (namely, if the destination is a terminal).
    /// When calling [`dump_header_to`](DumpOptions::dump_header_to),
    /// the output will not be colored.
    ///
    /// This is the default behavior.
    #[default]
    Auto,
    /// Never produce colored output.
    Never,
    /// Always produce colored output.
    Always,
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorMode::Never => f.write_str("never"),
            ColorMode::Auto => f.write_str("auto"),
            ColorMode::Always => f.write_str("always"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = ColorModeError;
    fn from_str(color: &str) -> Result<Self, Self::Err> {
        match color {
            "never" => Ok(ColorMode::Never),
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            _ => Err(ColorModeError),
        }
    }
}

/// The error raised when providing an invalid color mode.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct ColorModeError;

impl Display for ColorModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid color mode")
    }
}

impl std::error::Error for ColorModeError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DumpValue<T>
where
    T: ToString,
{
    KeyNum(T),
    Label(T),
    Num(T),
    Str(T),
    Invalid(T),
    Nothing,
}

impl<T> fmt::Display for DumpValue<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn write_value_with_width(value: impl fmt::Display, f: &mut fmt::Formatter) -> fmt::Result {
            if let Some(width) = f.width() {
                write!(f, "{:width$}", value, width = width)
            } else {
                write!(f, "{}", value)
            }
        }

        match self {
            DumpValue::KeyNum(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.dimmed());
                write_value_with_width(value, f)
            }
            DumpValue::Label(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.bold());
                write_value_with_width(value, f)
            }
            DumpValue::Num(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.cyan());
                write_value_with_width(value, f)
            }
            DumpValue::Str(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.yellow());
                write_value_with_width(value, f)
            }
            DumpValue::Invalid(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.red());
                write_value_with_width(value, f)
            }
            DumpValue::Nothing => {
                let value = "(no value)".if_supports_color(Stream::Stdout, |v| v.italic());
                write_value_with_width(value, f)
            }
        }
    }
}

/// Dump the contents of an ADAC header to stdout.
pub fn dump_header(header: &AdacHeader) -> IoResult<()> {
    DumpOptions::new().dump_header(header)
}

/// Dump the contents of an ADAC header to the given writer.
pub fn dump_header_to(to: impl Write, header: &AdacHeader) -> IoResult<()> {
    DumpOptions::new().dump_header_to(to, header)
}

fn geometry_dump<W>(to: &mut W, header: &AdacHeader) -> IoResult<()>
where
    W: ?Sized + Write,
{
    match header.geometry() {
        Ok(g) => {
            writeln!(
                to,
                "{}: {} x {} ({}), {} image(s)",
                DumpValue::Label("Image"),
                DumpValue::Num(g.width),
                DumpValue::Num(g.height),
                DumpValue::Str(g.bit_depth),
                DumpValue::Num(g.number_of_images),
            )?;
            writeln!(
                to,
                "{}: {}",
                DumpValue::Label("Pixel data offset"),
                DumpValue::Num(g.image_byte_offset),
            )?;
            writeln!(
                to,
                "{}: {}",
                DumpValue::Label("Pixel size (mm)"),
                DumpValue::Num(g.pixel_size_mm),
            )?;
            writeln!(
                to,
                "{}: {}",
                DumpValue::Label("Frame interval (s)"),
                DumpValue::Num(g.frame_interval_seconds),
            )?;
        }
        Err(e) => {
            writeln!(
                to,
                "{}: {}",
                DumpValue::Label("Image"),
                DumpValue::Invalid(e),
            )?;
        }
    }

    let mut kind = Vec::new();
    if header.is_gated() {
        kind.push("gated");
    }
    if header.is_reconstruction() {
        kind.push("reconstruction");
    }
    let data_type = match header.data_type_code() {
        Some(code) if kind.is_empty() => DumpValue::Str(code.to_string()),
        Some(code) => DumpValue::Str(format!("{} ({})", code, kind.join(", "))),
        None => DumpValue::Nothing,
    };
    writeln!(to, "{}: {}", DumpValue::Label("Data type"), data_type)?;
    Ok(())
}

fn fields_dump<W>(to: &mut W, header: &AdacHeader, width: u32) -> IoResult<()>
where
    W: ?Sized + Write,
{
    for (key, value) in header.fields().iter() {
        dump_field(to, key, value, width)?;
    }
    Ok(())
}

/// Dump a single header field, in the main dump format.
pub fn dump_field<W>(to: &mut W, key: Key, value: &FieldValue, width: u32) -> IoResult<()>
where
    W: ?Sized + Write,
{
    let entry = key.entry();
    let data_type = entry.data_type.to_string();
    // "#nnn " + description + " " + type + " : "
    let prefix_len = 5 + 30 + 1 + 6 + 3;
    let max = width.saturating_sub(prefix_len);

    let value_summary = match value {
        FieldValue::Text(s) if s.trim_end_matches(whitespace_or_null).is_empty() => {
            DumpValue::Nothing
        }
        FieldValue::Text(s) => DumpValue::Str(cut_str(
            &format!("\"{}\"", s.trim_end_matches(whitespace_or_null)),
            max,
        ).into_owned()),
        FieldValue::Extras(map) if map.is_empty() => DumpValue::Nothing,
        FieldValue::Extras(map) => DumpValue::Str(cut_str(
            &format!("{} extra object(s)", map.len()),
            max,
        ).into_owned()),
        FieldValue::Short(_) | FieldValue::Int(_) | FieldValue::Float(_) => {
            DumpValue::Num(cut_str(&value.to_string(), max).into_owned())
        }
    };

    writeln!(
        to,
        "{} {:30} {:6} : {}",
        DumpValue::KeyNum(format!("#{:03}", key.number())),
        DumpValue::Label(entry.description),
        data_type,
        value_summary,
    )?;

    if let FieldValue::Extras(map) = value {
        for (token, extra) in map.iter() {
            let description = extras::describe(token).unwrap_or("unknown");
            let label = format!("{} ({})", token, description);
            writeln!(
                to,
                "  {} {:40} : {}",
                DumpValue::KeyNum(">"),
                DumpValue::Label(label),
                DumpValue::Str(cut_str(extra, max)),
            )?;
        }
    }
    Ok(())
}

#[inline]
fn whitespace_or_null(c: char) -> bool {
    c.is_whitespace() || c == '\0'
}

fn cut_str(s: &str, max_characters: u32) -> Cow<str> {
    let max = (max_characters.saturating_sub(3)) as usize;
    let len = s.chars().count();

    if len > max {
        s.chars()
            .take(max)
            .chain("...".chars())
            .collect::<String>()
            .into()
    } else {
        s.into()
    }
}

fn determine_width(user_width: Option<u32>) -> u32 {
    user_width
        .or_else(|| terminal_size::terminal_size().map(|(width, _)| u32::from(width.0)))
        .unwrap_or(120)
}

#[cfg(test)]
mod tests {
    use adac_object::{BitDepth, EncodeGeometry, Encoder, PreambleMatch};

    use super::{cut_str, determine_width, whitespace_or_null};
    use crate::{ColorMode, DumpFormat, DumpOptions};

    fn header() -> adac_object::AdacHeader {
        let geometry = EncodeGeometry {
            width: 128,
            height: 128,
            z_dim: 10,
            bit_depth: BitDepth::Gray16Signed,
        };
        let dump = "Patient name = DOE^JOHN\n\
                    Data type = GE\n\
                    Zoom = 1.0\n\
                    Start frame, reconstruction limit = 16\n\
                    Reconstructed slices = 1\n\
                    Program specific = CALB=0.625|ZZZZ=1";
        Encoder::new(geometry)
            .encode_header(dump)
            .unwrap()
            .header()
            .clone()
    }

    fn lines(out: &[u8]) -> Vec<&str> {
        std::str::from_utf8(out)
            .expect("output is not valid UTF-8")
            .split('\n')
            .collect()
    }

    #[test]
    fn width_can_be_fixed_or_automatic() {
        let mut options = DumpOptions::new();
        options.width(80);
        assert_eq!(determine_width(options.width), 80);
        options.width_auto();
        assert_eq!(options.width, None);
        assert!(determine_width(options.width) > 0);
    }

    #[test]
    fn trims_all_whitespace() {
        assert_eq!("   ".trim_end_matches(whitespace_or_null), "");
        assert_eq!("\0".trim_end_matches(whitespace_or_null), "");
        assert_eq!("DOE^JOHN \0".trim_end_matches(whitespace_or_null), "DOE^JOHN");
    }

    #[test]
    fn cuts_long_values() {
        assert_eq!(cut_str("0123456789", 8), "01234...");
        assert_eq!(cut_str("0123", 8), "0123");
    }

    #[test]
    fn dump_header_to_covers_properties() {
        let header = header();
        let mut out = Vec::new();
        DumpOptions::new()
            .color_mode(ColorMode::Never)
            .dump_header_to(&mut out, &header)
            .unwrap();
        let lines = lines(&out);

        assert_eq!(lines[0], "Image: 128 x 128 (GRAY16_SIGNED), 160 image(s)");
        assert_eq!(lines[1], "Pixel data offset: 4096");
        assert_eq!(lines[2], "Pixel size (mm): 5");
        assert_eq!(lines[3], "Frame interval (s): 0");
        assert_eq!(lines[4], "Data type: GE (gated, reconstruction)");
        assert_eq!(lines[5], "-".repeat(58));

        let parts: Vec<&str> = lines[6].split(' ').filter(|p| !p.is_empty()).collect();
        assert_eq!(&parts[..], &["#001", "Patient", "name", "BYTE", ":", "\"DOE^JOHN\""]);

        let zoom = lines
            .iter()
            .find(|l| l.starts_with("#044"))
            .expect("zoom line");
        assert!(zoom.ends_with(": 1.0"));

        let extras: Vec<_> = lines.iter().filter(|l| l.starts_with("  >")).collect();
        assert_eq!(extras.len(), 2);
        assert!(extras[0].contains("CALB (Calibration factor)"));
        assert!(extras[0].ends_with(": 0.625"));
        assert!(extras[1].contains("ZZZZ (unknown)"));
    }

    #[test]
    fn plain_format_is_the_header_dump() {
        let header = header();
        let mut out = Vec::new();
        DumpOptions::new()
            .format(DumpFormat::Plain)
            .dump_header_to(&mut out, &header)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", header.dump()));
    }

    #[test]
    fn preamble_listing() {
        let mut out = Vec::new();
        DumpOptions::new()
            .color_mode(ColorMode::Never)
            .dump_preambles_to(
                &mut out,
                &[
                    PreambleMatch {
                        position: 0,
                        since_previous: 0,
                    },
                    PreambleMatch {
                        position: 4096,
                        since_previous: 4096,
                    },
                ],
            )
            .unwrap();
        let lines = lines(&out);
        assert_eq!(
            lines[1],
            "\"adac01\" found at: 4096 ; 4096 bytes since last \"adac01\""
        );
    }
}
