//! Shared facilities for reading the line-oriented input files.

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The extension that marks a gzip-compressed input file.
const GZIP_EXTENSION: &str = "gz";

/// Opens an input file for buffered reading.
///
/// Files whose name ends in `.gz` are transparently decompressed.
///
/// # Examples
///
/// ```no_run
/// let reader = gtfpos::reader::open("annotations.gtf.gz")?;
/// let features = gtfpos::feature::Reader::new(reader);
///
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn open<P>(path: P) -> io::Result<Box<dyn BufRead>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)?;

    let compressed = path
        .extension()
        .map(|ext| ext == GZIP_EXTENSION)
        .unwrap_or(false);

    if compressed {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Reads a line from a buffered reader, stripping the line ending.
///
/// Returns the number of bytes read, including the stripped line ending.
pub(crate) fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    buffer.clear();

    match reader.read_line(buffer) {
        Ok(0) => Ok(0),
        Ok(n) => {
            if buffer.ends_with(NEW_LINE) {
                buffer.pop();

                if buffer.ends_with(CARRIAGE_RETURN) {
                    buffer.pop();
                }
            }

            Ok(n)
        }
        Err(e) => Err(e),
    }
}
