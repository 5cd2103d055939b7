//! A CLI tool for inspecting the header of an ADAC raw image file
//! by printing it in a human readable format.
use adac_dump::{ColorMode, DumpFormat, DumpOptions};
use adac_object::{find_preambles, OpenFileOptions};
use clap::Parser;
use snafu::{Report, ResultExt, Whatever};
use std::fs::File;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, Level};

/// Exit code for when an error emerged while reading the ADAC file.
const ERROR_READ: i32 = -2;
/// Exit code for when an error emerged while dumping the file.
const ERROR_PRINT: i32 = -3;

/// Dump the headers of ADAC files
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// The ADAC file(s) to read
    #[clap(required = true)]
    files: Vec<PathBuf>,
    /// Print all values to the end
    /// (limited to `width` by default)
    #[clap(long = "no-limit")]
    no_limit: bool,
    /// The width of the display
    /// (default is to check automatically)
    #[clap(short = 'w', long = "width")]
    width: Option<u32>,
    /// The color mode
    #[clap(long = "color", default_value = "auto")]
    color: ColorMode,
    /// Print one `description = value` line per field,
    /// as accepted by the header encoder
    #[clap(long = "plain")]
    plain: bool,
    /// Fail if any errors are encountered
    #[clap(long = "fail-first")]
    fail_first: bool,
    /// List every position of the `adac01` preamble in each file
    /// instead of dumping the header
    #[clap(long = "scan")]
    scan: bool,
    /// Verbose mode
    #[clap(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    run().unwrap_or_else(|e| {
        eprintln!("{}", Report::from_error(e));
        std::process::exit(-2);
    });
}

fn run() -> Result<(), Whatever> {
    let App {
        files: filenames,
        no_limit,
        width,
        color,
        plain,
        fail_first,
        scan,
        verbose,
    } = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
            .with_writer(std::io::stderr)
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")?;

    let mut options = DumpOptions::new();
    match width {
        Some(width) => options.width(width),
        None => options.width_auto(),
    };
    options
        .no_limit(no_limit)
        .color_mode(color)
        .format(if plain {
            DumpFormat::Plain
        } else {
            DumpFormat::Main
        });
    let fail_first = filenames.len() == 1 || fail_first;
    let mut errors: i32 = 0;

    for filename in &filenames {
        debug!("Opening file '{}'...", filename.display());
        if !plain {
            println!("{}: ", filename.display());
        }

        let outcome = if scan {
            let matches = match File::open(filename).and_then(find_preambles) {
                Ok(matches) => matches,
                Err(e) => {
                    eprintln!("{}", Report::from_error(e));
                    if fail_first {
                        std::process::exit(ERROR_READ);
                    }
                    errors += 1;
                    continue;
                }
            };
            options.dump_preambles(&matches)
        } else {
            let header = match OpenFileOptions::new().open_file(filename) {
                Ok(header) => header,
                Err(e) => {
                    eprintln!("{}", Report::from_error(e));
                    if fail_first {
                        std::process::exit(ERROR_READ);
                    }
                    errors += 1;
                    continue;
                }
            };
            options.dump_header(&header)
        };

        if let Err(ref e) = outcome {
            if e.kind() == ErrorKind::BrokenPipe {
                // handle broken pipe separately with a no-op
            } else {
                eprintln!("[ERROR] {}", Report::from_error(e));
                if fail_first {
                    std::process::exit(ERROR_PRINT);
                }
            }
            errors += 1;
        }
    }

    std::process::exit(errors);
}
