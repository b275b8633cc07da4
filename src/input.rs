use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::Result;

/// Unified input reader that handles both file and pipe input with buffered reading.
pub struct InputReader {
    reader: Box<dyn Read>,
}

impl InputReader {
    /// Create a new InputReader from a path. Use "-" for stdin.
    pub fn new<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path_str = input_path.as_ref().to_string_lossy();

        let reader: Box<dyn Read> = if path_str == "-" {
            Box::new(io::stdin().lock())
        } else {
            let file = File::open(input_path)?;
            Box::new(BufReader::new(file))
        };

        Ok(Self { reader })
    }
}

impl Read for InputReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Unified output writer that handles both file and pipe output.
pub struct OutputWriter {
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new OutputWriter from a path. Use "-" for stdout.
    pub fn new<P: AsRef<Path>>(output_path: P) -> Result<Self> {
        let path_str = output_path.as_ref().to_string_lossy();

        let writer: Box<dyn Write> = if path_str == "-" {
            Box::new(io::stdout().lock())
        } else {
            Box::new(BufWriter::new(File::create(output_path)?))
        };

        Ok(Self { writer })
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Length of the underlying file in bytes, or `None` for pipe input — used
/// to decide between a known-size progress bar and a spinner.
pub fn input_len<P: AsRef<Path>>(input_path: P) -> Option<u64> {
    let path = input_path.as_ref();
    if path.to_string_lossy() == "-" {
        None
    } else {
        std::fs::metadata(path).ok().map(|m| m.len())
    }
}
