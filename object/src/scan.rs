//! Search for ADAC preambles in arbitrary data.
//!
//! Some exports carry several headers back to back,
//! or a header embedded after other content.
//! Locating every `adac01` preamble helps in telling them apart.
use adac_dictionary_std::PREAMBLE;
use std::io::{self, BufRead, BufReader, Read};

/// An occurrence of the ADAC preamble in a byte stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PreambleMatch {
    /// The position of the first byte of the preamble
    pub position: u64,
    /// The distance in bytes from the previous occurrence,
    /// or from the start of the stream for the first one
    pub since_previous: u64,
}

/// Find all occurrences of the `adac01` preamble in the given source,
/// reading it to the end.
pub fn find_preambles<R>(source: R) -> io::Result<Vec<PreambleMatch>>
where
    R: Read,
{
    let mut reader = BufReader::new(source);
    let mut matches = Vec::new();
    // the last bytes read, oldest first
    let mut window = [0u8; 6];
    let mut position: u64 = 0;
    let mut last = 0;

    loop {
        let buf = match reader.fill_buf() {
            Ok([]) => break,
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let len = buf.len();
        for &byte in buf {
            window.rotate_left(1);
            window[5] = byte;
            position += 1;
            if &window == PREAMBLE {
                let start = position - PREAMBLE.len() as u64;
                matches.push(PreambleMatch {
                    position: start,
                    since_previous: start - last,
                });
                last = start;
            }
        }
        reader.consume(len);
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::{find_preambles, PreambleMatch};

    #[test]
    fn no_preamble() {
        assert!(find_preambles(&b""[..]).unwrap().is_empty());
        assert!(find_preambles(&b"adac0adac02 adac"[..]).unwrap().is_empty());
    }

    #[test]
    fn overlapping_prefix() {
        let found = find_preambles(&b"adadac01"[..]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, 2);
    }

    #[test]
    fn several_preambles() {
        let mut data = b"adac01".to_vec();
        data.resize(2048, 0);
        data.extend_from_slice(b"xxaadac01");
        let found = find_preambles(&data[..]).unwrap();
        assert_eq!(
            found,
            vec![
                PreambleMatch {
                    position: 0,
                    since_previous: 0,
                },
                PreambleMatch {
                    position: 2051,
                    since_previous: 2051,
                },
            ]
        );
    }
}
